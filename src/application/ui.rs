use std::io;
use std::path::PathBuf;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;
use ratatui::Terminal;
#[cfg(feature = "dev")]
use tui_textarea::Input;
#[cfg(feature = "dev")]
use tui_textarea::Key;

use crate::application::cli;
use crate::domain::models::Event;
use crate::domain::models::MessageType;
use crate::domain::models::PromptEditor;
use crate::domain::models::Role;
use crate::domain::models::SlashCommand;
use crate::domain::services::events::EventsService;
use crate::domain::services::AppState;
use crate::domain::services::ChatSession;
use crate::domain::services::OcrUpload;
use crate::domain::services::TranscriptLine;

#[cfg(test)]
#[path = "ui_test.rs"]
mod tests;

fn to_line(line: &TranscriptLine) -> Line<'static> {
    match line {
        TranscriptLine::Author(role, mtype) => {
            let color = match (role, mtype) {
                (_, MessageType::Error) => Color::Red,
                (Role::User, _) => Color::Cyan,
                (Role::Assistant, _) => Color::Green,
            };
            return Line::from(Span::styled(
                role.label().to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ));
        }
        TranscriptLine::Text(MessageType::Error, text) => {
            return Line::from(Span::styled(
                text.to_string(),
                Style::default().fg(Color::Red),
            ));
        }
        TranscriptLine::Text(MessageType::Normal, text) => {
            return Line::from(text.to_string());
        }
        TranscriptLine::Blank => {
            return Line::from("");
        }
    }
}

/// Handles a submitted prompt. Slash commands run even while a reply is
/// streaming; chat prompts are left to the session's own single-flight check.
/// Returns whether the application should exit and whether the prompt was
/// consumed.
fn handle_enter(
    text: &str,
    app_state: &mut AppState,
    session: &ChatSession,
    ocr: &OcrUpload,
) -> (bool, bool) {
    if let Some(command) = SlashCommand::parse(text) {
        if command.is_quit() {
            return (true, true);
        }

        if command.is_help() {
            app_state.set_notice(Some(cli::help_text()));
            return (false, true);
        }

        if command.is_ocr() {
            match command.file_path() {
                Some(file_path) => {
                    let path = PathBuf::from(file_path);
                    if !path.is_file() {
                        app_state
                            .set_notice(Some(format!("No file found at {}", path.display())));
                    } else if ocr.select(path) {
                        app_state.set_notice(None);
                        ocr.upload();
                    } else {
                        app_state.set_notice(Some(
                            "Wait for the current upload to finish first".to_string(),
                        ));
                    }
                }
                None => {
                    app_state.set_notice(Some("Usage: /ocr [FILE_PATH]".to_string()));
                }
            }
            return (false, true);
        }
    }

    return (false, session.submit(text));
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState,
    events: &mut EventsService,
    session: &ChatSession,
    ocr: &OcrUpload,
) -> Result<()> {
    let mut textarea = PromptEditor::default();
    let mut editor_busy = false;

    #[cfg(feature = "dev")]
    {
        let test_str = "What are the common symptoms of iron deficiency?";
        for char in test_str.chars() {
            textarea.input(Input {
                key: Key::Char(char),
                ctrl: false,
                alt: false,
            });
        }
    }

    loop {
        terminal.draw(|frame| {
            let panel_text = app_state.panel_text();
            let mut constraints = vec![Constraint::Min(1)];
            if panel_text.is_some() {
                constraints.push(Constraint::Max(8));
            }
            constraints.push(Constraint::Max(4));

            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints(constraints)
                .split(frame.size());

            let transcript_block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title("Medichat")
                .padding(Padding::new(1, 1, 0, 0));
            let transcript_rect = transcript_block.inner(layout[0]);
            if transcript_rect.width != app_state.last_known_width
                || transcript_rect.height != app_state.last_known_height
            {
                app_state.set_rect(transcript_rect);
            }

            let lines = app_state
                .lines
                .iter()
                .map(|line| return to_line(line))
                .collect::<Vec<Line>>();
            frame.render_widget(
                Paragraph::new(lines)
                    .block(transcript_block)
                    .scroll((app_state.scroll.position, 0)),
                layout[0],
            );

            if let Some(text) = panel_text {
                frame.render_widget(
                    Paragraph::new(text)
                        .block(
                            Block::default()
                                .borders(Borders::ALL)
                                .border_type(BorderType::Rounded)
                                .title("Document")
                                .padding(Padding::new(1, 1, 0, 0)),
                        )
                        .wrap(Wrap { trim: false }),
                    layout[1],
                );
            }

            if editor_busy != app_state.session.busy {
                editor_busy = app_state.session.busy;
                PromptEditor::set_busy(&mut textarea, editor_busy);
            }
            frame.render_widget(textarea.widget(), layout[layout.len() - 1]);
        })?;

        match events.next().await? {
            Event::SessionUpdated(session_state) => {
                app_state.set_session(session_state);
            }
            Event::OcrUpdated(ocr_state) => {
                app_state.set_ocr(ocr_state);
            }
            Event::KeyboardCTRLC() => {
                break;
            }
            Event::KeyboardEnter() => {
                let input_str = textarea.lines().join("\n");
                let (quit, accepted) = handle_enter(&input_str, app_state, session, ocr);
                if quit {
                    break;
                }
                if accepted {
                    textarea = PromptEditor::default();
                    PromptEditor::set_busy(&mut textarea, editor_busy);
                }
            }
            Event::KeyboardNewline() => {
                textarea.insert_newline();
            }
            Event::KeyboardPaste(text) => {
                for char in text.chars() {
                    if char == '\n' {
                        textarea.insert_newline();
                    } else if char != '\r' {
                        textarea.insert_char(char);
                    }
                }
            }
            Event::KeyboardCharInput(input) => {
                textarea.input(input);
            }
            Event::UIScrollDown() => {
                app_state.scroll.down();
            }
            Event::UIScrollUp() => {
                app_state.scroll.up();
            }
            Event::UIScrollPageDown() => {
                app_state.scroll.down_page();
            }
            Event::UIScrollPageUp() => {
                app_state.scroll.up_page();
            }
            Event::UIResize() | Event::UITick() => (),
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    disable_raw_mode().unwrap();
    crossterm::execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )
    .unwrap();
    crossterm::execute!(io::stdout(), cursor::Show).unwrap();
}

pub async fn start(session: ChatSession, ocr: OcrUpload) -> Result<()> {
    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    let mut app_state = AppState::new(session.current_state(), ocr.current_state());
    let mut events = EventsService::new(session.subscribe(), ocr.subscribe());

    let res = start_loop(&mut terminal, &mut app_state, &mut events, &session, &ocr).await;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    return res;
}
