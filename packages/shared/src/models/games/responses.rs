use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::game::{Game, GameContent, PaginationResponse};

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListGamesResponse {
    #[prost(message, repeated, tag = "1")]
    pub items: Vec<Game>,
    #[prost(message, optional, tag = "2")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationResponse>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetGameResponse {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game: Option<Game>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetGameContentResponse {
    #[prost(string, tag = "1")]
    pub weewar_content: String,
    #[prost(string, tag = "2")]
    pub recipe_content: String,
    #[prost(string, tag = "3")]
    pub readme_content: String,
}

impl From<GameContent> for GetGameContentResponse {
    fn from(content: GameContent) -> Self {
        GetGameContentResponse {
            weewar_content: content.weewar_content,
            recipe_content: content.recipe_content,
            readme_content: content.readme_content,
        }
    }
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateGameResponse {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game: Option<Game>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct DeleteGameResponse {}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetGamesResponse {
    /// Found games keyed by id. Ids that do not exist are simply absent.
    #[prost(btree_map = "string, message", tag = "1")]
    pub games: BTreeMap<String, Game>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateGameResponse {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game: Option<Game>,
    /// Field name to message. Non-empty means the game was not created.
    #[prost(btree_map = "string, string", tag = "2")]
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub field_errors: BTreeMap<String, String>,
}

impl CreateGameResponse {
    pub fn created(game: Game) -> Self {
        CreateGameResponse {
            game: Some(game),
            field_errors: BTreeMap::new(),
        }
    }

    pub fn rejected(field_errors: BTreeMap<String, String>) -> Self {
        CreateGameResponse {
            game: None,
            field_errors,
        }
    }

    pub fn is_success(&self) -> bool {
        self.field_errors.is_empty() && self.game.is_some()
    }
}
