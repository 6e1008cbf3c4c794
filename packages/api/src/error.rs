use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::services::errors::game_service_errors::GameServiceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    GameService(GameServiceError),
    /// The request could not be transcoded into an RPC message.
    #[error("Malformed request: {0}")]
    MalformedRequest(String),
}

impl From<GameServiceError> for ApiError {
    fn from(error: GameServiceError) -> Self {
        ApiError::GameService(error)
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::GameService(GameServiceError::ValidationError(_)) => StatusCode::BAD_REQUEST,
            ApiError::GameService(GameServiceError::GameNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::GameService(GameServiceError::RepositoryError(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Storage details stay in the logs.
        let message = if status.is_server_error() {
            "internal error".to_string()
        } else {
            self.to_string()
        };
        let body = ErrorBody {
            code: status.as_u16(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::repositories::errors::game_repository_errors::GameRepositoryError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ApiError::from(GameServiceError::ValidationError("bad".to_string())),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(GameServiceError::GameNotFound("g1".to_string())),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::from(GameServiceError::RepositoryError(
                    GameRepositoryError::DynamoDb("down".to_string()),
                )),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::MalformedRequest("not json".to_string()),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.status(), status, "{}", error);
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_messages() {
        let not_found = ApiError::from(GameServiceError::GameNotFound("g1".to_string()));
        assert_eq!(not_found.to_string(), "Game not found: g1");
    }
}
