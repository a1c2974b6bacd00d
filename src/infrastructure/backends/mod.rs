pub mod chat_stream;
pub mod ocr;

use std::sync::Arc;
use std::time::Duration;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ChatSourceBox;
use crate::domain::models::OcrClientBox;

const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5000;

pub struct BackendManager {}

impl BackendManager {
    pub fn chat() -> ChatSourceBox {
        return Arc::<chat_stream::ChatStream>::default();
    }

    pub fn ocr() -> OcrClientBox {
        return Arc::<ocr::OcrEndpoint>::default();
    }
}

/// Connect timeout from config. Streams themselves are never timed out, since
/// a reply may legitimately trickle in for a long time.
pub fn connect_timeout() -> Duration {
    let raw = Config::get(ConfigKey::ConnectTimeout);
    let millis = raw.parse::<u64>().unwrap_or_else(|_| {
        tracing::warn!(value = raw, "Invalid connect timeout, using default");
        return DEFAULT_CONNECT_TIMEOUT_MS;
    });

    return Duration::from_millis(millis);
}
