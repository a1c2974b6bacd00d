#[cfg(test)]
#[path = "events_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use crossterm::event::EventStream;
use crossterm::event::MouseEventKind;
use futures::StreamExt;
use tokio::sync::watch;
use tokio::time;
use tui_textarea::Input;
use tui_textarea::Key;

use crate::domain::models::Event;
use crate::domain::models::OcrState;
use crate::domain::models::SessionState;

pub struct EventsService {
    crossterm_events: EventStream,
    session: watch::Receiver<SessionState>,
    ocr: watch::Receiver<OcrState>,
}

impl EventsService {
    pub fn new(
        session: watch::Receiver<SessionState>,
        ocr: watch::Receiver<OcrState>,
    ) -> EventsService {
        return EventsService {
            crossterm_events: EventStream::new(),
            session,
            ocr,
        };
    }

    /// Maps a key press to an application event. Alt+Enter is the newline
    /// combination; a bare Enter submits the prompt.
    pub fn handle_key(input: Input) -> Option<Event> {
        match input {
            Input { key: Key::Down, .. } => {
                return Some(Event::UIScrollDown());
            }
            Input { key: Key::Up, .. } => {
                return Some(Event::UIScrollUp());
            }
            Input {
                key: Key::MouseScrollDown,
                ..
            } => {
                return Some(Event::UIScrollDown());
            }
            Input {
                key: Key::MouseScrollUp,
                ..
            } => {
                return Some(Event::UIScrollUp());
            }
            Input {
                key: Key::PageDown, ..
            } => {
                return Some(Event::UIScrollPageDown());
            }
            Input {
                key: Key::PageUp, ..
            } => {
                return Some(Event::UIScrollPageUp());
            }
            Input {
                key: Key::Char('d'),
                ctrl: true,
                ..
            } => {
                return Some(Event::UIScrollPageDown());
            }
            Input {
                key: Key::Char('u'),
                ctrl: true,
                ..
            } => {
                return Some(Event::UIScrollPageUp());
            }
            Input {
                key: Key::Char('c'),
                ctrl: true,
                ..
            } => {
                return Some(Event::KeyboardCTRLC());
            }
            Input {
                key: Key::Enter,
                alt: true,
                ..
            } => {
                return Some(Event::KeyboardNewline());
            }
            Input {
                key: Key::Enter, ..
            } => {
                return Some(Event::KeyboardEnter());
            }
            input => {
                return Some(Event::KeyboardCharInput(input));
            }
        }
    }

    fn handle_crossterm(&self, event: CrosstermEvent) -> Option<Event> {
        match event {
            CrosstermEvent::Paste(text) => {
                return Some(Event::KeyboardPaste(text));
            }
            CrosstermEvent::Resize(_, _) => {
                return Some(Event::UIResize());
            }
            CrosstermEvent::Mouse(mouseevent) => match mouseevent.kind {
                MouseEventKind::ScrollUp => {
                    return Some(Event::UIScrollUp());
                }
                MouseEventKind::ScrollDown => {
                    return Some(Event::UIScrollDown());
                }
                _ => {
                    return None;
                }
            },
            CrosstermEvent::Key(keyevent) => {
                return EventsService::handle_key(keyevent.into());
            }
            _ => return None,
        }
    }

    pub async fn next(&mut self) -> Result<Event> {
        loop {
            let evt = tokio::select! {
                changed = self.session.changed() => {
                    if changed.is_err() {
                        bail!("Chat session closed");
                    }
                    Some(Event::SessionUpdated(self.session.borrow_and_update().clone()))
                },
                changed = self.ocr.changed() => {
                    if changed.is_err() {
                        bail!("OCR upload closed");
                    }
                    Some(Event::OcrUpdated(self.ocr.borrow_and_update().clone()))
                },
                event = self.crossterm_events.next() => match event {
                    Some(Ok(input)) => self.handle_crossterm(input),
                    Some(Err(_)) => None,
                    None => None
                },
                _ = time::sleep(time::Duration::from_millis(500)) => Some(Event::UITick())
            };

            if let Some(event) = evt {
                return Ok(event);
            }
        }
    }
}
