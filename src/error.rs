use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Record(#[from] record_confirm_common::Error),

    #[error("No document given and no default document at {0}")]
    NoDocument(String),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("Save failed: {0}")]
    SaveFailed(String),
}

impl AppError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::Record(e) if e.is_not_found())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
