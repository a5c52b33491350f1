use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid connection string: {0}")]
    InvalidConnection(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("backend: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(context: &str, err: impl std::fmt::Display) -> Self {
        Self::Backend(format!("{context}: {err}"))
    }
}
