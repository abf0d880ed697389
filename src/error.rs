use thiserror::Error;

pub type Result<T> = std::result::Result<T, TaskflowError>;

#[derive(Debug, Error)]
pub enum TaskflowError {
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("text cannot be empty")]
    EmptyInput,
    #[error("malformed persisted record: {0}")]
    MalformedPersistedRecord(String),
    #[error("no task is open in the editor")]
    EditorClosed,
    #[error("invalid due date '{0}', expected YYYY-MM-DD")]
    InvalidDueDate(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TaskflowError {
    /// Errors the UI swallows: the action becomes a no-op
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::EmptyInput | Self::EditorClosed | Self::InvalidDueDate(_)
        )
    }
}
