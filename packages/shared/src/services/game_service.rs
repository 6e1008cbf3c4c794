use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use uuid::Uuid;

use crate::models::field_mask::apply_mask;
use crate::models::game::{Game, PaginationResponse};
use crate::models::games::requests::{
    CreateGameRequest, DeleteGameRequest, GetGameContentRequest, GetGameRequest, GetGamesRequest,
    ListGamesRequest, UpdateGameRequest,
};
use crate::models::games::responses::{
    CreateGameResponse, DeleteGameResponse, GetGameContentResponse, GetGameResponse,
    GetGamesResponse, ListGamesResponse, UpdateGameResponse,
};
use crate::models::timestamp;
use crate::repositories::errors::game_repository_errors::GameRepositoryError;
use crate::repositories::game_repository::{GameListQuery, GameRepository};
use crate::services::errors::game_service_errors::GameServiceError;
use crate::services::validation::{self, FieldErrors};

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

pub struct GameService {
    repository: Arc<dyn GameRepository + Send + Sync>,
    default_page_size: usize,
    max_page_size: usize,
}

impl GameService {
    pub fn new(repository: Arc<dyn GameRepository + Send + Sync>) -> Self {
        GameService {
            repository,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }

    pub fn with_page_sizes(mut self, default_page_size: usize, max_page_size: usize) -> Self {
        self.max_page_size = max_page_size.max(1);
        self.default_page_size = default_page_size.clamp(1, self.max_page_size);
        self
    }

    /// Validation problems come back as `field_errors` on an otherwise normal
    /// response; only storage failures are returned as `Err`.
    pub async fn create_game(
        &self,
        request: CreateGameRequest,
    ) -> Result<CreateGameResponse, GameServiceError> {
        let Some(mut game) = request.game else {
            let mut errors = FieldErrors::new();
            errors.insert("game".to_string(), "game data is required".to_string());
            return Ok(CreateGameResponse::rejected(errors));
        };

        game.id = game.id.trim().to_string();
        let mut errors = FieldErrors::new();
        validation::validate_id(&game.id, &mut errors);
        validation::validate_game_fields(&game, &mut errors);
        if !game.id.is_empty() && !errors.contains_key("id") {
            if self.repository.get_game(&game.id).await?.is_some() {
                errors.insert("id".to_string(), id_taken(&game.id));
            }
        }
        if !errors.is_empty() {
            tracing::debug!("Rejected game creation: {}", validation::summarize(&errors));
            return Ok(CreateGameResponse::rejected(errors));
        }

        if game.id.is_empty() {
            game.id = Uuid::new_v4().to_string();
        }
        game.name = game.name.trim().to_string();
        let now = timestamp::now();
        game.created_at = Some(now.clone());
        game.updated_at = Some(now);
        game.version = 1;

        match self.repository.create_game(&game).await {
            Ok(()) => {}
            Err(GameRepositoryError::AlreadyExists(id)) => {
                let mut errors = FieldErrors::new();
                errors.insert("id".to_string(), id_taken(&id));
                return Ok(CreateGameResponse::rejected(errors));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!("Created game {}", game.id);
        Ok(CreateGameResponse::created(game))
    }

    pub async fn get_games(
        &self,
        request: GetGamesRequest,
    ) -> Result<GetGamesResponse, GameServiceError> {
        let ids: Vec<String> = request
            .ids
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();
        if ids.is_empty() {
            return Ok(GetGamesResponse::default());
        }

        let games: BTreeMap<String, Game> = self
            .repository
            .get_games(&ids)
            .await?
            .into_iter()
            .map(|game| (game.id.clone(), game))
            .collect();
        tracing::debug!("Batch get found {} of {} games", games.len(), ids.len());
        Ok(GetGamesResponse { games })
    }

    pub async fn list_games(
        &self,
        request: ListGamesRequest,
    ) -> Result<ListGamesResponse, GameServiceError> {
        let pagination = request.pagination.unwrap_or_default();
        let limit = match usize::try_from(pagination.page_size) {
            Ok(0) | Err(_) => self.default_page_size,
            Ok(size) => size.min(self.max_page_size),
        };
        let owner_id = request.owner_id.trim();
        let page_key = pagination.page_key.trim();
        let query = GameListQuery {
            owner_id: (!owner_id.is_empty()).then(|| owner_id.to_string()),
            after: (!page_key.is_empty()).then(|| page_key.to_string()),
            limit,
        };

        let page = self.repository.list_games(&query).await?;

        let next_page_key = if page.has_more {
            page.items.last().map(|g| g.id.clone()).unwrap_or_default()
        } else {
            String::new()
        };
        // Offsets saturate at i32::MAX.
        let next_page_offset = pagination
            .page_offset
            .max(0)
            .saturating_add(saturating_i32(page.items.len()));
        Ok(ListGamesResponse {
            pagination: Some(PaginationResponse {
                next_page_key,
                next_page_offset,
                has_more: page.has_more,
                total_results: saturating_i32(page.total_results),
            }),
            items: page.items,
        })
    }

    pub async fn get_game(
        &self,
        request: GetGameRequest,
    ) -> Result<GetGameResponse, GameServiceError> {
        let game = self.load_version(&request.id, &request.version).await?;
        Ok(GetGameResponse { game: Some(game) })
    }

    pub async fn get_game_content(
        &self,
        request: GetGameContentRequest,
    ) -> Result<GetGameContentResponse, GameServiceError> {
        let game = self.load_version(&request.id, &request.version).await?;
        let content = self
            .repository
            .get_game_content(&game.id)
            .await?
            .unwrap_or_default();
        Ok(content.into())
    }

    /// Applies the masked fields of `request.game` to the stored game.
    pub async fn update_game(
        &self,
        request: UpdateGameRequest,
    ) -> Result<UpdateGameResponse, GameServiceError> {
        let patch = request
            .game
            .ok_or_else(|| GameServiceError::ValidationError("game is required".to_string()))?;
        let mut game = self.load_version(&patch.id, "").await?;

        let written = apply_mask(&mut game, &patch, request.update_mask.as_ref())
            .map_err(|e| GameServiceError::ValidationError(e.to_string()))?;

        let mut errors = FieldErrors::new();
        validation::validate_game_fields(&game, &mut errors);
        if !errors.is_empty() {
            return Err(GameServiceError::ValidationError(validation::summarize(
                &errors,
            )));
        }

        game.updated_at = Some(timestamp::now());
        game.version += 1;
        self.repository
            .update_game(&game)
            .await
            .map_err(|e| match e {
                GameRepositoryError::NotFound(id) => GameServiceError::GameNotFound(id),
                other => GameServiceError::RepositoryError(other),
            })?;

        tracing::info!(
            "Updated game {} to version {} ({} fields)",
            game.id,
            game.version,
            written.len()
        );
        Ok(UpdateGameResponse { game: Some(game) })
    }

    /// Deleting a game that does not exist is not an error.
    pub async fn delete_game(
        &self,
        request: DeleteGameRequest,
    ) -> Result<DeleteGameResponse, GameServiceError> {
        let id = require_id(&request.id)?;
        self.repository.delete_game(id).await?;
        tracing::info!("Deleted game {}", id);
        Ok(DeleteGameResponse {})
    }

    async fn load_version(&self, id: &str, version: &str) -> Result<Game, GameServiceError> {
        let id = require_id(id)?;
        match self.repository.get_game(id).await? {
            Some(game) if game.matches_version(version) => Ok(game),
            Some(_) => Err(GameServiceError::GameNotFound(format!(
                "{} at version {}",
                id,
                version.trim()
            ))),
            None => Err(GameServiceError::GameNotFound(id.to_string())),
        }
    }
}

fn require_id(id: &str) -> Result<&str, GameServiceError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(GameServiceError::ValidationError(
            "Game ID cannot be empty".to_string(),
        ));
    }
    Ok(id)
}

fn saturating_i32(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

fn id_taken(id: &str) -> String {
    format!("a game with id {} already exists", id)
}
