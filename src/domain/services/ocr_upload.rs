#[cfg(test)]
#[path = "ocr_upload_test.rs"]
mod tests;

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::fs;
use tokio::sync::watch;

use crate::domain::models::OcrClient;
use crate::domain::models::OcrClientBox;
use crate::domain::models::OcrError;
use crate::domain::models::OcrFile;
use crate::domain::models::OcrState;
use crate::domain::models::OCR_NO_TEXT;

/// Document upload flow. It keeps its own busy flag and shares nothing with
/// the chat session, so both can be in flight together.
pub struct OcrUpload {
    client: OcrClientBox,
    state: Arc<watch::Sender<OcrState>>,
}

impl OcrUpload {
    pub fn new(client: OcrClientBox) -> OcrUpload {
        let (state, _) = watch::channel(OcrState::default());

        return OcrUpload {
            client,
            state: Arc::new(state),
        };
    }

    /// Picks the document for the next upload and clears the previous result.
    /// Ignored while an upload is running, so a result always belongs to the
    /// selected file. Returns whether the selection changed.
    pub fn select(&self, path: PathBuf) -> bool {
        let changed = self.state.send_if_modified(|state| {
            if state.busy {
                return false;
            }

            state.selected = Some(path);
            state.extracted_text = None;
            return true;
        });

        if !changed {
            tracing::debug!("Ignored OCR selection while uploading");
        }

        return changed;
    }

    /// Uploads the selected document. Does nothing without a selection or while
    /// another upload is running. Must be called from within a tokio runtime.
    pub fn upload(&self) -> bool {
        let mut selected: Option<PathBuf> = None;
        self.state.send_if_modified(|state| {
            if state.busy || state.selected.is_none() {
                return false;
            }

            state.busy = true;
            selected = state.selected.clone();
            return true;
        });

        let path = match selected {
            Some(path) => path,
            None => {
                tracing::debug!("Ignored OCR upload");
                return false;
            }
        };

        let client = self.client.clone();
        let state = self.state.clone();
        tokio::spawn(async move {
            let text = match extract(client.as_ref(), &path).await {
                Ok(Some(text)) if !text.is_empty() => text,
                Ok(_) => OCR_NO_TEXT.to_string(),
                Err(err) => {
                    tracing::error!(error = %err, path = ?path, "OCR upload failed");
                    err.display_text().to_string()
                }
            };

            state.send_modify(|state| {
                state.extracted_text = Some(text);
                state.busy = false;
            });
        });

        return true;
    }

    pub fn current_state(&self) -> OcrState {
        return self.state.borrow().clone();
    }

    pub fn subscribe(&self) -> watch::Receiver<OcrState> {
        return self.state.subscribe();
    }

    pub async fn wait_idle(&self) -> OcrState {
        let mut rx = self.state.subscribe();
        if let Ok(state) = rx.wait_for(|state| return !state.busy).await {
            return state.clone();
        }

        return self.current_state();
    }
}

async fn extract(client: &dyn OcrClient, path: &Path) -> Result<Option<String>, OcrError> {
    let bytes = fs::read(path).await?;
    let name = path
        .file_name()
        .map(|name| return name.to_string_lossy().to_string())
        .unwrap_or_else(|| return "upload".to_string());

    return client.extract(OcrFile { name, bytes }).await;
}
