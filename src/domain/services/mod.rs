mod app_state;
mod chat_session;
mod decoder;
pub mod events;
mod ocr_upload;
mod scroll;
pub mod stream_consumer;

pub use app_state::*;
pub use chat_session::*;
pub use decoder::*;
pub use ocr_upload::*;
pub use scroll::*;
