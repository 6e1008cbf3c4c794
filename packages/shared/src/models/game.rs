use prost_types::Timestamp;
use serde::{Deserialize, Serialize};

use crate::models::timestamp;

/// Difficulty labels accepted on a game.
pub const DIFFICULTIES: [&str; 4] = ["easy", "medium", "hard", "expert"];

/// The game resource. Identity is `id`; every other field is metadata owned
/// by whoever created the game.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Game {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(message, optional, tag = "2")]
    #[serde(with = "timestamp::rfc3339", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[prost(message, optional, tag = "3")]
    #[serde(with = "timestamp::rfc3339", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    #[prost(string, tag = "4")]
    pub creator_id: String,
    #[prost(string, tag = "5")]
    pub world_id: String,
    #[prost(string, tag = "6")]
    pub name: String,
    #[prost(string, tag = "7")]
    pub description: String,
    #[prost(string, repeated, tag = "8")]
    pub tags: Vec<String>,
    #[prost(string, tag = "9")]
    pub difficulty: String,
    /// Incremented on every successful update, starting at 1.
    #[prost(int64, tag = "10")]
    #[serde(with = "crate::models::int64")]
    pub version: i64,
}

impl Game {
    pub fn version_label(&self) -> String {
        self.version.to_string()
    }

    /// `true` when `requested` is empty (latest) or names the current version.
    pub fn matches_version(&self, requested: &str) -> bool {
        let requested = requested.trim();
        requested.is_empty() || requested == self.version_label()
    }
}

/// Display and listing metadata for a game.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameInfo {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub description: String,
    #[prost(string, tag = "4")]
    pub category: String,
    #[prost(string, tag = "5")]
    pub difficulty: String,
    #[prost(string, repeated, tag = "6")]
    pub tags: Vec<String>,
    #[prost(string, tag = "7")]
    pub icon: String,
    #[prost(string, tag = "8")]
    pub last_updated: String,
}

impl From<&Game> for GameInfo {
    fn from(game: &Game) -> Self {
        let last_updated = game
            .updated_at
            .as_ref()
            .or(game.created_at.as_ref())
            .and_then(timestamp::to_rfc3339)
            .unwrap_or_default();

        GameInfo {
            id: game.id.clone(),
            name: game.name.clone(),
            description: game.description.clone(),
            category: String::new(),
            difficulty: game.difficulty.clone(),
            tags: game.tags.clone(),
            icon: String::new(),
            last_updated,
        }
    }
}

/// Content blobs stored alongside a game and served by GetGameContent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameContent {
    pub weewar_content: String,
    pub recipe_content: String,
    pub readme_content: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    /// Id of the last item of the previous page; empty starts from the top.
    #[prost(string, tag = "1")]
    pub page_key: String,
    #[prost(int32, tag = "2")]
    pub page_offset: i32,
    #[prost(int32, tag = "3")]
    pub page_size: i32,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaginationResponse {
    #[prost(string, tag = "2")]
    pub next_page_key: String,
    #[prost(int32, tag = "3")]
    pub next_page_offset: i32,
    #[prost(bool, tag = "4")]
    pub has_more: bool,
    #[prost(int32, tag = "5")]
    pub total_results: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use prost::Message;

    fn sample_game() -> Game {
        Game {
            id: "game-1".to_string(),
            created_at: Some(timestamp::from_datetime(
                Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            )),
            updated_at: Some(timestamp::from_datetime(
                Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap(),
            )),
            creator_id: "user-1".to_string(),
            world_id: "world-9".to_string(),
            name: "Island Hop".to_string(),
            description: "Two players, one island".to_string(),
            tags: vec!["naval".to_string(), "small".to_string()],
            difficulty: "medium".to_string(),
            version: 3,
        }
    }

    #[test]
    fn test_game_binary_round_trip() {
        let game = sample_game();

        let bytes = game.encode_to_vec();
        let decoded = Game::decode(bytes.as_slice()).unwrap();

        assert_eq!(decoded, game);
    }

    #[test]
    fn test_game_json_uses_camel_case_names() {
        let json = serde_json::to_value(sample_game()).unwrap();

        assert_eq!(json["creatorId"], "user-1");
        assert_eq!(json["worldId"], "world-9");
        assert_eq!(json["createdAt"], "2024-01-02T03:04:05Z");
        assert_eq!(json["version"], "3");
        assert!(json.get("creator_id").is_none());
    }

    #[test]
    fn test_game_json_round_trip_and_defaults() {
        let game = sample_game();
        let text = serde_json::to_string(&game).unwrap();
        let decoded: Game = serde_json::from_str(&text).unwrap();
        assert_eq!(decoded, game);

        let sparse: Game = serde_json::from_str(r#"{"name":"Only name","unknown":1}"#).unwrap();
        assert_eq!(sparse.name, "Only name");
        assert!(sparse.id.is_empty());
        assert!(sparse.created_at.is_none());
        assert_eq!(sparse.version, 0);

        let numeric: Game = serde_json::from_str(r#"{"id":"g1","version":4}"#).unwrap();
        assert_eq!(numeric.version, 4);
    }

    #[test]
    fn test_matches_version() {
        let game = sample_game();

        assert!(game.matches_version(""));
        assert!(game.matches_version("3"));
        assert!(!game.matches_version("2"));
        assert!(!game.matches_version("latest"));
    }

    #[test]
    fn test_game_info_from_game() {
        let info = GameInfo::from(&sample_game());

        assert_eq!(info.id, "game-1");
        assert_eq!(info.difficulty, "medium");
        assert_eq!(info.tags, vec!["naval", "small"]);
        assert_eq!(info.last_updated, "2024-02-03T04:05:06Z");
    }

    #[test]
    fn test_game_info_falls_back_to_created_at() {
        let mut game = sample_game();
        game.updated_at = None;

        let info = GameInfo::from(&game);

        assert_eq!(info.last_updated, "2024-01-02T03:04:05Z");
    }
}
