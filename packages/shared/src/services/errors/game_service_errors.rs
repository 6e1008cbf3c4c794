use thiserror::Error;

use crate::repositories::errors::game_repository_errors::GameRepositoryError;

#[derive(Debug, Error)]
pub enum GameServiceError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Game not found: {0}")]
    GameNotFound(String),

    #[error("Repository error: {0}")]
    RepositoryError(#[from] GameRepositoryError),
}
