#[cfg(test)]
#[path = "chat_stream_test.rs"]
mod tests;

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use futures::TryStreamExt;

use super::connect_timeout;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ByteStream;
use crate::domain::models::ChatError;
use crate::domain::models::ChatSource;

fn convert_err(err: reqwest::Error) -> ChatError {
    return ChatError::StreamRead(err.to_string());
}

/// Streams replies from `GET <url>?prompt=<prompt>`. The body is plain text
/// written incrementally by the server with no framing of its own.
pub struct ChatStream {
    url: String,
    connect_timeout: Duration,
}

impl Default for ChatStream {
    fn default() -> ChatStream {
        return ChatStream {
            url: Config::get(ConfigKey::ChatURL),
            connect_timeout: connect_timeout(),
        };
    }
}

#[async_trait]
impl ChatSource for ChatStream {
    #[allow(clippy::implicit_return)]
    async fn open(&self, prompt: &str) -> Result<ByteStream, ChatError> {
        let client = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .build()
            .map_err(|err| return ChatError::Network(err.to_string()))?;

        let res = client
            .get(&self.url)
            .query(&[("prompt", prompt)])
            .send()
            .await
            .map_err(|err| {
                tracing::error!(error = ?err, url = self.url, "Chat endpoint is not reachable");
                return ChatError::Network(err.to_string());
            })?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            tracing::error!(status = status, "Chat endpoint rejected the prompt");
            return Err(ChatError::NonSuccessResponse { status });
        }

        return Ok(res.bytes_stream().map_err(convert_err).boxed());
    }
}
