use thiserror::Error;

use crate::gemini::GeminiError;

/// Application-level error type.
/// Every variant ends the run; `main` maps all of them to exit code 1.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Story generation failed: {0}")]
    Story(#[source] GeminiError),

    #[error("Cover generation failed: {0}")]
    Cover(#[source] GeminiError),

    #[error("Illustration generation failed: {0}")]
    Illustrations(#[source] GeminiError),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Input error: {0}")]
    Input(#[from] dialoguer::Error),
}

impl AppError {
    /// Short stage label used in the final status line.
    pub fn stage(&self) -> &'static str {
        match self {
            AppError::Story(_) => "story",
            AppError::Cover(_) => "cover",
            AppError::Illustrations(_) => "illustrations",
            AppError::Task(_) => "render",
            AppError::Input(_) => "input",
        }
    }
}
