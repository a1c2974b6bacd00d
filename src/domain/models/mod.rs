mod chat_source;
mod event;
mod message;
mod ocr;
mod role;
mod session_state;
mod slash_commands;
mod textarea;

pub use chat_source::*;
pub use event::*;
pub use message::*;
pub use ocr::*;
pub use role::*;
pub use session_state::*;
pub use slash_commands::*;
pub use textarea::*;
