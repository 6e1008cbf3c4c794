use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::models::game::{Game, GameContent};
use crate::repositories::errors::game_repository_errors::GameRepositoryError;
use crate::repositories::game_repository::{GameListQuery, GamePage, GameRepository};

/// One entry of a seed file: `[{"game": {...}, "content": {...}}, ...]`.
#[derive(Debug, Deserialize)]
pub struct SeedEntry {
    pub game: Game,
    #[serde(default)]
    pub content: Option<GameContent>,
}

/// Process-local store for local runs and tests.
#[derive(Clone, Default)]
pub struct InMemoryGameRepository {
    games: Arc<RwLock<BTreeMap<String, Game>>>,
    contents: Arc<RwLock<HashMap<String, GameContent>>>,
}

impl InMemoryGameRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn from_seed_file(path: impl AsRef<Path>) -> Result<Self, GameRepositoryError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GameRepositoryError::Seed(format!("{}: {}", path.display(), e)))?;
        let entries: Vec<SeedEntry> = serde_json::from_str(&text)?;

        let repository = Self::new();
        for entry in entries {
            if entry.game.id.is_empty() {
                return Err(GameRepositoryError::Seed(
                    "seeded games must carry an id".to_string(),
                ));
            }
            repository.create_game(&entry.game).await?;
            if let Some(content) = entry.content {
                repository.put_game_content(&entry.game.id, &content).await?;
            }
        }
        tracing::info!("Seeded {} games from {}", repository.len().await, path.display());
        Ok(repository)
    }

    pub async fn len(&self) -> usize {
        self.games.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.games.read().await.is_empty()
    }
}

#[async_trait]
impl GameRepository for InMemoryGameRepository {
    async fn create_game(&self, game: &Game) -> Result<(), GameRepositoryError> {
        let mut games = self.games.write().await;
        if games.contains_key(&game.id) {
            return Err(GameRepositoryError::AlreadyExists(game.id.clone()));
        }
        games.insert(game.id.clone(), game.clone());
        Ok(())
    }

    async fn get_game(&self, id: &str) -> Result<Option<Game>, GameRepositoryError> {
        Ok(self.games.read().await.get(id).cloned())
    }

    async fn get_games(&self, ids: &[String]) -> Result<Vec<Game>, GameRepositoryError> {
        let games = self.games.read().await;
        Ok(ids.iter().filter_map(|id| games.get(id).cloned()).collect())
    }

    async fn list_games(&self, query: &GameListQuery) -> Result<GamePage, GameRepositoryError> {
        let games = self.games.read().await;
        Ok(GamePage::from_unordered(
            games.values().cloned().collect(),
            query,
        ))
    }

    async fn update_game(&self, game: &Game) -> Result<(), GameRepositoryError> {
        let mut games = self.games.write().await;
        match games.get_mut(&game.id) {
            Some(stored) => {
                *stored = game.clone();
                Ok(())
            }
            None => Err(GameRepositoryError::NotFound(game.id.clone())),
        }
    }

    async fn delete_game(&self, id: &str) -> Result<(), GameRepositoryError> {
        self.games.write().await.remove(id);
        self.contents.write().await.remove(id);
        Ok(())
    }

    async fn get_game_content(
        &self,
        id: &str,
    ) -> Result<Option<GameContent>, GameRepositoryError> {
        Ok(self.contents.read().await.get(id).cloned())
    }

    async fn put_game_content(
        &self,
        id: &str,
        content: &GameContent,
    ) -> Result<(), GameRepositoryError> {
        self.contents
            .write()
            .await
            .insert(id.to_string(), content.clone());
        Ok(())
    }
}
