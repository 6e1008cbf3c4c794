use std::sync::Arc;

use shared::repositories::errors::game_repository_errors::GameRepositoryError;
use shared::repositories::game_repository::{DynamoDbGameRepository, GameRepository};
use shared::repositories::in_memory_game_repository::InMemoryGameRepository;
use shared::services::game_service::GameService;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub game_service: Arc<GameService>,
}

impl AppState {
    pub fn new(repository: Arc<dyn GameRepository + Send + Sync>, config: &AppConfig) -> Self {
        let game_service = GameService::new(repository)
            .with_page_sizes(config.default_page_size, config.max_page_size);
        AppState {
            game_service: Arc::new(game_service),
        }
    }

    /// Wires the storage backend selected by `config`.
    pub async fn from_config(config: &AppConfig) -> Result<Self, GameRepositoryError> {
        let repository: Arc<dyn GameRepository + Send + Sync> = match &config.games_table {
            Some(table) => {
                let aws = aws_config::load_from_env().await;
                let client = aws_sdk_dynamodb::Client::new(&aws);
                tracing::info!("Using DynamoDB table {}", table);
                Arc::new(DynamoDbGameRepository::new(
                    client,
                    table.clone(),
                    config.game_content_table.clone(),
                ))
            }
            None => match &config.seed_file {
                Some(path) => Arc::new(InMemoryGameRepository::from_seed_file(path).await?),
                None => {
                    tracing::warn!("GAMES_TABLE not set, games are kept in memory");
                    Arc::new(InMemoryGameRepository::new())
                }
            },
        };
        Ok(Self::new(repository, config))
    }
}
