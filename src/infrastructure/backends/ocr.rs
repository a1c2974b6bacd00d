#[cfg(test)]
#[path = "ocr_test.rs"]
mod tests;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::connect_timeout;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::OcrClient;
use crate::domain::models::OcrError;
use crate::domain::models::OcrFile;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct OcrResponse {
    #[serde(alias = "ocr_text")]
    text: Option<String>,
}

/// Uploads a document as `multipart/form-data` under the `file` field.
pub struct OcrEndpoint {
    url: String,
    connect_timeout: Duration,
}

impl Default for OcrEndpoint {
    fn default() -> OcrEndpoint {
        return OcrEndpoint {
            url: Config::get(ConfigKey::OcrURL),
            connect_timeout: connect_timeout(),
        };
    }
}

#[async_trait]
impl OcrClient for OcrEndpoint {
    #[allow(clippy::implicit_return)]
    async fn extract(&self, file: OcrFile) -> Result<Option<String>, OcrError> {
        let client = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .build()
            .map_err(|err| return OcrError::Network(err.to_string()))?;

        let part = multipart::Part::bytes(file.bytes).file_name(file.name);
        let form = multipart::Form::new().part("file", part);

        let res = client
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|err| {
                tracing::error!(error = ?err, url = self.url, "OCR endpoint is not reachable");
                return OcrError::Network(err.to_string());
            })?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            tracing::error!(status = status, "OCR endpoint failed to extract text");
            return Err(OcrError::NonSuccessResponse { status });
        }

        let body = res
            .json::<OcrResponse>()
            .await
            .map_err(|err| return OcrError::Network(err.to_string()))?;

        return Ok(body.text);
    }
}
