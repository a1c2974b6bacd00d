use tui_textarea::Input;

use super::OcrState;
use super::SessionState;

pub enum Event {
    KeyboardCharInput(Input),
    KeyboardCTRLC(),
    KeyboardEnter(),
    KeyboardNewline(),
    KeyboardPaste(String),
    OcrUpdated(OcrState),
    SessionUpdated(SessionState),
    UIResize(),
    UIScrollDown(),
    UIScrollUp(),
    UIScrollPageDown(),
    UIScrollPageUp(),
    UITick(),
}
