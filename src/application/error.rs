//! Top-level application failures reported at process exit.

use thiserror::Error;

use crate::application::batch::BatchError;
use crate::infra::error::InfraError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error(transparent)]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}
