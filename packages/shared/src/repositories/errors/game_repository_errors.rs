use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameRepositoryError {
    #[error("Game not found: {0}")]
    NotFound(String),

    #[error("Game already exists: {0}")]
    AlreadyExists(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("DynamoDB error: {0}")]
    DynamoDb(String),

    #[error("Seed error: {0}")]
    Seed(String),
}

impl From<serde_json::Error> for GameRepositoryError {
    fn from(error: serde_json::Error) -> Self {
        GameRepositoryError::Serialization(error.to_string())
    }
}

impl From<serde_dynamo::Error> for GameRepositoryError {
    fn from(error: serde_dynamo::Error) -> Self {
        GameRepositoryError::Serialization(error.to_string())
    }
}
