#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use ratatui::prelude::Rect;

use super::Scroll;
use crate::domain::models::wrap_lines;
use crate::domain::models::MessageType;
use crate::domain::models::OcrState;
use crate::domain::models::Role;
use crate::domain::models::SessionState;

pub const WELCOME_TITLE: &str = "Welcome to Medical AI Assistant";
pub const WELCOME_TEXT: &str = "I'm here to help with your medical questions and document analysis. How can I assist you today?";
pub const TYPING_INDICATOR: char = '▋';

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TranscriptLine {
    Author(Role, MessageType),
    Text(MessageType, String),
    Blank,
}

/// Terminal-side projection of the chat session and the OCR flow. It only
/// ever holds snapshots; the session itself is owned elsewhere.
pub struct AppState {
    pub session: SessionState,
    pub ocr: OcrState,
    pub notice: Option<String>,
    pub lines: Vec<TranscriptLine>,
    pub last_known_height: u16,
    pub last_known_width: u16,
    pub scroll: Scroll,
}

impl AppState {
    pub fn new(session: SessionState, ocr: OcrState) -> AppState {
        let mut app_state = AppState {
            session,
            ocr,
            notice: None,
            lines: vec![],
            last_known_height: 0,
            last_known_width: 0,
            scroll: Scroll::default(),
        };
        app_state.sync_dependants();

        return app_state;
    }

    pub fn set_session(&mut self, session: SessionState) {
        let follow = self.scroll.is_at_end();
        self.session = session;
        self.sync_dependants();

        if follow {
            self.scroll.last();
        }
    }

    pub fn set_ocr(&mut self, ocr: OcrState) {
        self.ocr = ocr;
    }

    pub fn set_notice(&mut self, notice: Option<String>) {
        self.notice = notice;
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.last_known_width = rect.width;
        self.last_known_height = rect.height;
        self.sync_dependants();
    }

    /// Text for the panel under the transcript. OCR progress wins over any
    /// notice.
    pub fn panel_text(&self) -> Option<String> {
        let file_name = self
            .ocr
            .selected
            .as_ref()
            .and_then(|path| return path.file_name())
            .map(|name| return name.to_string_lossy().to_string());

        if let Some(name) = &file_name {
            if self.ocr.busy {
                return Some(format!("Processing {name}..."));
            }
            if let Some(text) = &self.ocr.extracted_text {
                return Some(format!("Extracted text from {name}:\n{text}"));
            }
            return Some(format!("Selected {name}"));
        }

        return self.notice.clone();
    }

    fn sync_dependants(&mut self) {
        let width = (self.last_known_width.saturating_sub(4) as usize).max(10);
        self.lines = transcript_lines(&self.session, width);

        self.scroll
            .set_state(self.lines.len() as u16, self.last_known_height);
    }
}

fn push_text(lines: &mut Vec<TranscriptLine>, mtype: MessageType, text: &str, width: usize) {
    for line in wrap_lines(text, width) {
        lines.push(TranscriptLine::Text(mtype, line));
    }
}

pub fn transcript_lines(session: &SessionState, width: usize) -> Vec<TranscriptLine> {
    let mut lines = vec![];

    if session.history.is_empty() && session.streaming_buffer.is_none() {
        lines.push(TranscriptLine::Text(
            MessageType::Normal,
            WELCOME_TITLE.to_string(),
        ));
        push_text(&mut lines, MessageType::Normal, WELCOME_TEXT, width);
        return lines;
    }

    for message in session.history.iter() {
        lines.push(TranscriptLine::Author(message.role, message.message_type()));
        for line in message.as_string_lines(width) {
            lines.push(TranscriptLine::Text(message.message_type(), line));
        }
        lines.push(TranscriptLine::Blank);
    }

    if let Some(buffer) = &session.streaming_buffer {
        lines.push(TranscriptLine::Author(Role::Assistant, MessageType::Normal));
        push_text(
            &mut lines,
            MessageType::Normal,
            &format!("{buffer}{TYPING_INDICATOR}"),
            width,
        );
    }

    return lines;
}
