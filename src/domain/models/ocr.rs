use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

pub const OCR_NO_TEXT: &str = "No text extracted";
pub const OCR_FAILED: &str = "Failed to extract text from image";
pub const OCR_UPLOAD_ERROR: &str = "Error occurred during upload";

pub type OcrClientBox = Arc<dyn OcrClient>;

#[derive(thiserror::Error, Debug)]
pub enum OcrError {
    #[error("OCR endpoint responded with status {status}")]
    NonSuccessResponse { status: u16 },

    #[error("OCR upload failed: {0}")]
    Network(String),

    #[error("unable to read the selected file: {0}")]
    ReadFile(#[from] std::io::Error),
}

impl OcrError {
    /// Fixed text shown in place of extracted text for this failure.
    pub fn display_text(&self) -> &'static str {
        match self {
            OcrError::NonSuccessResponse { .. } => return OCR_FAILED,
            OcrError::Network(_) | OcrError::ReadFile(_) => return OCR_UPLOAD_ERROR,
        }
    }
}

/// A document picked for upload, already read into memory.
pub struct OcrFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OcrState {
    pub selected: Option<PathBuf>,
    pub busy: bool,
    pub extracted_text: Option<String>,
}

#[async_trait]
pub trait OcrClient: Send + Sync {
    /// Uploads `file` and returns the extracted text, if the endpoint found
    /// any.
    async fn extract(&self, file: OcrFile) -> Result<Option<String>, OcrError>;
}
