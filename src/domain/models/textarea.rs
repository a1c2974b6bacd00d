use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;

const IDLE_TITLE: &str = "Ask me anything about medical topics (Alt+Enter for a new line)";
const BUSY_TITLE: &str = "Sending... (/ocr [FILE_PATH] still works)";

/// Prompt editor. It stays editable while a reply streams; only the frame
/// changes so the user can tell a prompt is in flight.
pub struct PromptEditor {}

impl<'a> PromptEditor {
    pub fn default() -> tui_textarea::TextArea<'a> {
        let mut textarea = tui_textarea::TextArea::default();
        PromptEditor::set_busy(&mut textarea, false);

        return textarea;
    }

    pub fn set_busy(textarea: &mut tui_textarea::TextArea<'a>, busy: bool) {
        let (title, color) = if busy {
            (BUSY_TITLE, Color::Yellow)
        } else {
            (IDLE_TITLE, Color::Reset)
        };

        textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color))
                .title(title)
                .padding(Padding::new(1, 1, 0, 0)),
        );
    }
}
