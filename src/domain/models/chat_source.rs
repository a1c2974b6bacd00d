use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

/// An open response body, read chunk by chunk until the transport closes.
pub type ByteStream = BoxStream<'static, Result<Bytes, ChatError>>;

pub type ChatSourceBox = Arc<dyn ChatSource>;

#[derive(thiserror::Error, Debug)]
pub enum ChatError {
    /// The connection could not be established or was dropped before a
    /// response arrived.
    #[error("unable to reach the chat endpoint: {0}")]
    Network(String),

    #[error("chat endpoint responded with status {status}")]
    NonSuccessResponse { status: u16 },

    /// The body stream failed after the response was accepted.
    #[error("failed to read the chat stream: {0}")]
    StreamRead(String),
}

#[async_trait]
pub trait ChatSource: Send + Sync {
    /// Sends `prompt` to the chat endpoint and returns the reply body as an
    /// unframed byte stream.
    ///
    /// Implementations must map a non-success status to
    /// [`ChatError::NonSuccessResponse`] instead of handing back the body.
    async fn open(&self, prompt: &str) -> Result<ByteStream, ChatError>;
}
