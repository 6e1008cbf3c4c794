use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{AttributeValue, KeysAndAttributes};
use aws_sdk_dynamodb::Client;
use serde_dynamo::{from_item, to_attribute_value, to_item};

use crate::models::game::{Game, GameContent};
use crate::repositories::errors::game_repository_errors::GameRepositoryError;

#[cfg(test)]
use mockall::automock;

/// DynamoDB caps BatchGetItem at 100 keys per request.
const BATCH_GET_LIMIT: usize = 100;
const BATCH_GET_MAX_RETRIES: u32 = 5;
const BATCH_GET_BASE_DELAY: Duration = Duration::from_millis(50);

/// Delay before the `attempt`th resend of unprocessed keys (1-based).
fn batch_retry_delay(attempt: u32) -> Duration {
    BATCH_GET_BASE_DELAY * 2u32.pow(attempt.saturating_sub(1).min(10))
}

/// A keyset page request over games ordered by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameListQuery {
    pub owner_id: Option<String>,
    /// Return only games whose id sorts strictly after this key.
    pub after: Option<String>,
    pub limit: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GamePage {
    pub items: Vec<Game>,
    pub has_more: bool,
    /// Number of games matching the owner filter, across all pages.
    pub total_results: usize,
}

impl GamePage {
    /// Cuts one page out of an unordered set of candidate games.
    pub fn from_unordered(mut games: Vec<Game>, query: &GameListQuery) -> Self {
        if let Some(owner) = query.owner_id.as_deref() {
            games.retain(|g| g.creator_id == owner);
        }
        games.sort_by(|a, b| a.id.cmp(&b.id));
        let total_results = games.len();

        let start = match query.after.as_deref() {
            Some(after) => games.partition_point(|g| g.id.as_str() <= after),
            None => 0,
        };
        let remaining = games.len() - start;
        let items: Vec<Game> = games.into_iter().skip(start).take(query.limit).collect();

        GamePage {
            has_more: remaining > items.len(),
            items,
            total_results,
        }
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait GameRepository: Send + Sync {
    /// Fails with `AlreadyExists` when the id is taken.
    async fn create_game(&self, game: &Game) -> Result<(), GameRepositoryError>;
    async fn get_game(&self, id: &str) -> Result<Option<Game>, GameRepositoryError>;
    /// Missing ids are skipped; result order is unspecified.
    async fn get_games(&self, ids: &[String]) -> Result<Vec<Game>, GameRepositoryError>;
    async fn list_games(&self, query: &GameListQuery) -> Result<GamePage, GameRepositoryError>;
    /// Fails with `NotFound` when the game does not exist.
    async fn update_game(&self, game: &Game) -> Result<(), GameRepositoryError>;
    /// Deleting an absent id succeeds.
    async fn delete_game(&self, id: &str) -> Result<(), GameRepositoryError>;
    async fn get_game_content(&self, id: &str)
        -> Result<Option<GameContent>, GameRepositoryError>;
    async fn put_game_content(
        &self,
        id: &str,
        content: &GameContent,
    ) -> Result<(), GameRepositoryError>;
}

pub struct DynamoDbGameRepository {
    pub client: Client,
    pub table_name: String,
    /// Table holding content blobs keyed by game id. Content lookups return
    /// nothing when unset.
    pub content_table_name: Option<String>,
}

impl DynamoDbGameRepository {
    pub fn new(client: Client, table_name: String, content_table_name: Option<String>) -> Self {
        Self {
            client,
            table_name,
            content_table_name,
        }
    }

    fn key(id: &str) -> Result<HashMap<String, AttributeValue>, GameRepositoryError> {
        Ok(HashMap::from([("id".to_string(), to_attribute_value(id)?)]))
    }

    async fn scan_all(&self, owner_id: Option<&str>) -> Result<Vec<Game>, GameRepositoryError> {
        let mut games = Vec::new();
        let mut start_key = None;
        loop {
            let mut request = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(start_key.take());
            if let Some(owner) = owner_id {
                request = request
                    .filter_expression("creatorId = :owner")
                    .expression_attribute_values(":owner", to_attribute_value(owner)?);
            }
            let output = request
                .send()
                .await
                .map_err(|e| GameRepositoryError::DynamoDb(DisplayErrorContext(e).to_string()))?;

            for item in output.items.unwrap_or_default() {
                games.push(from_item(item)?);
            }
            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }
        Ok(games)
    }
}

#[async_trait]
impl GameRepository for DynamoDbGameRepository {
    async fn create_game(&self, game: &Game) -> Result<(), GameRepositoryError> {
        let item = to_item(game)?;
        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(id)")
            .send()
            .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                if e
                    .as_service_error()
                    .is_some_and(|se| se.is_conditional_check_failed_exception())
                {
                    Err(GameRepositoryError::AlreadyExists(game.id.clone()))
                } else {
                    Err(GameRepositoryError::DynamoDb(
                        DisplayErrorContext(e).to_string(),
                    ))
                }
            }
        }
    }

    async fn get_game(&self, id: &str) -> Result<Option<Game>, GameRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(Self::key(id)?))
            .send()
            .await
            .map_err(|e| GameRepositoryError::DynamoDb(DisplayErrorContext(e).to_string()))?;
        match output.item {
            Some(item) => Ok(Some(from_item(item)?)),
            None => Ok(None),
        }
    }

    async fn get_games(&self, ids: &[String]) -> Result<Vec<Game>, GameRepositoryError> {
        let mut games = Vec::new();
        for chunk in ids.chunks(BATCH_GET_LIMIT) {
            let keys = chunk
                .iter()
                .map(|id| Self::key(id))
                .collect::<Result<Vec<_>, _>>()?;
            let keys_and_attributes = KeysAndAttributes::builder()
                .set_keys(Some(keys))
                .build()
                .map_err(|e| GameRepositoryError::DynamoDb(e.to_string()))?;
            let mut request_items = HashMap::from([(self.table_name.clone(), keys_and_attributes)]);

            // DynamoDB may hand back part of the batch as unprocessed.
            let mut attempt = 0;
            loop {
                let output = self
                    .client
                    .batch_get_item()
                    .set_request_items(Some(request_items))
                    .send()
                    .await
                    .map_err(|e| {
                        GameRepositoryError::DynamoDb(DisplayErrorContext(e).to_string())
                    })?;

                if let Some(mut responses) = output.responses {
                    for item in responses.remove(&self.table_name).unwrap_or_default() {
                        games.push(from_item(item)?);
                    }
                }
                match output.unprocessed_keys {
                    Some(unprocessed) if !unprocessed.is_empty() => {
                        attempt += 1;
                        if attempt > BATCH_GET_MAX_RETRIES {
                            return Err(GameRepositoryError::DynamoDb(format!(
                                "batch get left keys unprocessed after {} retries",
                                BATCH_GET_MAX_RETRIES
                            )));
                        }
                        let delay = batch_retry_delay(attempt);
                        tracing::debug!(
                            "Retrying unprocessed batch keys in {:?} (attempt {})",
                            delay,
                            attempt
                        );
                        tokio::time::sleep(delay).await;
                        request_items = unprocessed;
                    }
                    _ => break,
                }
            }
        }
        Ok(games)
    }

    async fn list_games(&self, query: &GameListQuery) -> Result<GamePage, GameRepositoryError> {
        let games = self.scan_all(query.owner_id.as_deref()).await?;
        Ok(GamePage::from_unordered(games, query))
    }

    async fn update_game(&self, game: &Game) -> Result<(), GameRepositoryError> {
        let item = to_item(game)?;
        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_exists(id)")
            .send()
            .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                if e
                    .as_service_error()
                    .is_some_and(|se| se.is_conditional_check_failed_exception())
                {
                    Err(GameRepositoryError::NotFound(game.id.clone()))
                } else {
                    Err(GameRepositoryError::DynamoDb(
                        DisplayErrorContext(e).to_string(),
                    ))
                }
            }
        }
    }

    async fn delete_game(&self, id: &str) -> Result<(), GameRepositoryError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .set_key(Some(Self::key(id)?))
            .send()
            .await
            .map_err(|e| GameRepositoryError::DynamoDb(DisplayErrorContext(e).to_string()))?;

        if let Some(content_table) = &self.content_table_name {
            self.client
                .delete_item()
                .table_name(content_table)
                .set_key(Some(Self::key(id)?))
                .send()
                .await
                .map_err(|e| {
                    GameRepositoryError::DynamoDb(DisplayErrorContext(e).to_string())
                })?;
        }
        Ok(())
    }

    async fn get_game_content(
        &self,
        id: &str,
    ) -> Result<Option<GameContent>, GameRepositoryError> {
        let Some(content_table) = &self.content_table_name else {
            return Ok(None);
        };
        let output = self
            .client
            .get_item()
            .table_name(content_table)
            .set_key(Some(Self::key(id)?))
            .send()
            .await
            .map_err(|e| GameRepositoryError::DynamoDb(DisplayErrorContext(e).to_string()))?;
        match output.item {
            Some(mut item) => {
                item.remove("id");
                Ok(Some(from_item(item)?))
            }
            None => Ok(None),
        }
    }

    async fn put_game_content(
        &self,
        id: &str,
        content: &GameContent,
    ) -> Result<(), GameRepositoryError> {
        let Some(content_table) = &self.content_table_name else {
            return Err(GameRepositoryError::DynamoDb(
                "no content table configured".to_string(),
            ));
        };
        let mut item: HashMap<String, AttributeValue> = to_item(content)?;
        item.extend(Self::key(id)?);
        self.client
            .put_item()
            .table_name(content_table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| GameRepositoryError::DynamoDb(DisplayErrorContext(e).to_string()))?;
        Ok(())
    }
}
