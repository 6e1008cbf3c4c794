use std::borrow::Cow;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, RawQuery, State},
    routing::get,
    Router,
};
use serde::Deserialize;
use shared::models::game::{Game, Pagination};
use shared::models::games::requests::{
    CreateGameRequest, DeleteGameRequest, GetGameContentRequest, GetGameRequest, GetGamesRequest,
    ListGamesRequest, UpdateGameRequest,
};
use shared::models::games::responses::{
    CreateGameResponse, DeleteGameResponse, GetGameContentResponse, GetGameResponse,
    GetGamesResponse, ListGamesResponse, UpdateGameResponse,
};
use tracing::{debug, error};

use crate::{
    error::ApiError,
    middleware::wire_format::{Reply, ResponseFormat, WireBody},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/games", get(list_games).post(create_game))
        .route("/v1/games:batchGet", get(get_games))
        .route(
            "/v1/games/{id}",
            get(get_game).patch(update_game).delete(delete_game),
        )
        .route("/v1/games/{id}/content", get(get_game_content))
}

/// `ListGamesRequest` as query parameters. Nested fields use dotted names.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListGamesQuery {
    #[serde(rename = "pagination.pageKey", alias = "pagination.page_key")]
    pub page_key: String,
    #[serde(rename = "pagination.pageOffset", alias = "pagination.page_offset")]
    pub page_offset: i32,
    #[serde(rename = "pagination.pageSize", alias = "pagination.page_size")]
    pub page_size: i32,
    #[serde(rename = "ownerId", alias = "owner_id")]
    pub owner_id: String,
}

impl From<ListGamesQuery> for ListGamesRequest {
    fn from(query: ListGamesQuery) -> Self {
        ListGamesRequest {
            pagination: Some(Pagination {
                page_key: query.page_key,
                page_offset: query.page_offset,
                page_size: query.page_size,
            }),
            owner_id: query.owner_id,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VersionQuery {
    pub version: String,
}

/// Collects `ids` from a query string. Repeated keys and comma-separated
/// values are both accepted.
pub fn parse_ids(raw: Option<&str>) -> Result<Vec<String>, ApiError> {
    let mut ids = Vec::new();
    for pair in raw.unwrap_or_default().split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        if key != "ids" {
            continue;
        }
        let value = value.replace('+', " ");
        let decoded: Cow<str> = urlencoding::decode(&value)
            .map_err(|e| ApiError::MalformedRequest(format!("invalid ids parameter: {}", e)))?;
        ids.extend(
            decoded
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
        );
    }
    Ok(ids)
}

fn query_error(rejection: QueryRejection) -> ApiError {
    ApiError::MalformedRequest(rejection.body_text())
}

async fn create_game(
    State(state): State<AppState>,
    ResponseFormat(format): ResponseFormat,
    WireBody(request): WireBody<CreateGameRequest>,
) -> Result<Reply<CreateGameResponse>, ApiError> {
    let response = state
        .game_service
        .create_game(request)
        .await
        .map_err(|e| {
            error!("Failed to create game: {}", e);
            ApiError::from(e)
        })?;
    if !response.field_errors.is_empty() {
        debug!("Game creation rejected: {:?}", response.field_errors);
    }
    Ok(Reply::new(format, response))
}

async fn get_games(
    State(state): State<AppState>,
    ResponseFormat(format): ResponseFormat,
    RawQuery(raw): RawQuery,
) -> Result<Reply<GetGamesResponse>, ApiError> {
    let ids = parse_ids(raw.as_deref())?;
    let response = state
        .game_service
        .get_games(GetGamesRequest { ids })
        .await
        .map_err(|e| {
            error!("Failed to batch get games: {}", e);
            ApiError::from(e)
        })?;
    Ok(Reply::new(format, response))
}

async fn list_games(
    State(state): State<AppState>,
    ResponseFormat(format): ResponseFormat,
    query: Result<Query<ListGamesQuery>, QueryRejection>,
) -> Result<Reply<ListGamesResponse>, ApiError> {
    let Query(query) = query.map_err(query_error)?;
    let response = state
        .game_service
        .list_games(query.into())
        .await
        .map_err(|e| {
            error!("Failed to list games: {}", e);
            ApiError::from(e)
        })?;
    Ok(Reply::new(format, response))
}

async fn get_game(
    State(state): State<AppState>,
    ResponseFormat(format): ResponseFormat,
    Path(id): Path<String>,
    query: Result<Query<VersionQuery>, QueryRejection>,
) -> Result<Reply<GetGameResponse>, ApiError> {
    let Query(query) = query.map_err(query_error)?;
    let response = state
        .game_service
        .get_game(GetGameRequest {
            id: id.clone(),
            version: query.version,
        })
        .await
        .map_err(|e| {
            debug!("Failed to get game {}: {}", id, e);
            ApiError::from(e)
        })?;
    Ok(Reply::new(format, response))
}

async fn get_game_content(
    State(state): State<AppState>,
    ResponseFormat(format): ResponseFormat,
    Path(id): Path<String>,
    query: Result<Query<VersionQuery>, QueryRejection>,
) -> Result<Reply<GetGameContentResponse>, ApiError> {
    let Query(query) = query.map_err(query_error)?;
    let response = state
        .game_service
        .get_game_content(GetGameContentRequest {
            id: id.clone(),
            version: query.version,
        })
        .await
        .map_err(|e| {
            debug!("Failed to get content of game {}: {}", id, e);
            ApiError::from(e)
        })?;
    Ok(Reply::new(format, response))
}

/// The path segment is bound into `game.id`, replacing any id in the body.
async fn update_game(
    State(state): State<AppState>,
    ResponseFormat(format): ResponseFormat,
    Path(id): Path<String>,
    WireBody(mut request): WireBody<UpdateGameRequest>,
) -> Result<Reply<UpdateGameResponse>, ApiError> {
    request.game.get_or_insert_with(Game::default).id = id.clone();
    let response = state
        .game_service
        .update_game(request)
        .await
        .map_err(|e| {
            error!("Failed to update game {}: {}", id, e);
            ApiError::from(e)
        })?;
    Ok(Reply::new(format, response))
}

async fn delete_game(
    State(state): State<AppState>,
    ResponseFormat(format): ResponseFormat,
    Path(id): Path<String>,
) -> Result<Reply<DeleteGameResponse>, ApiError> {
    let response = state
        .game_service
        .delete_game(DeleteGameRequest { id: id.clone() })
        .await
        .map_err(|e| {
            error!("Failed to delete game {}: {}", id, e);
            ApiError::from(e)
        })?;
    debug!("Game deleted: {}", id);
    Ok(Reply::new(format, response))
}
