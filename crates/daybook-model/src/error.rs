use thiserror::Error;

/// Rejected user input. Raised before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("Task description cannot be empty.")]
  EmptyDescription
}

#[derive(Debug, Error)]
pub enum StorageError {
  #[error("storage backend unavailable: {0}")]
  Unavailable(String),

  #[error("failed writing key `{key}`: {message}")]
  Write {
    key:     String,
    message: String
  },

  #[error(transparent)]
  Io(#[from] std::io::Error)
}

#[derive(Debug, Error)]
pub enum StoreError {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("failed to serialize task collection")]
  Serialize(#[from] serde_json::Error),

  #[error("failed to persist `{key}`")]
  Persist {
    key:    &'static str,
    #[source]
    source: StorageError
  }
}

impl StoreError {
  pub fn is_validation(&self) -> bool {
    matches!(self, Self::Validation(_))
  }
}
