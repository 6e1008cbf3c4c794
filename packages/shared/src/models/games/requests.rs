use serde::{Deserialize, Serialize};

use crate::models::field_mask::FieldMask;
use crate::models::game::{Game, Pagination};

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListGamesRequest {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    /// Restricts the listing to games created by this owner.
    #[prost(string, tag = "2")]
    pub owner_id: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetGameRequest {
    #[prost(string, tag = "1")]
    pub id: String,
    /// Empty means the latest version.
    #[prost(string, tag = "2")]
    pub version: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetGameContentRequest {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub version: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateGameRequest {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game: Option<Game>,
    /// Paths of `game` to apply; fields outside the mask are ignored.
    #[prost(message, optional, tag = "2")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_mask: Option<FieldMask>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeleteGameRequest {
    #[prost(string, tag = "1")]
    pub id: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetGamesRequest {
    #[prost(string, repeated, tag = "1")]
    pub ids: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateGameRequest {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game: Option<Game>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_list_games_request_json_names() {
        let request = ListGamesRequest {
            pagination: Some(Pagination {
                page_key: "g5".to_string(),
                page_offset: 5,
                page_size: 10,
            }),
            owner_id: "owner-1".to_string(),
        };

        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["ownerId"], "owner-1");
        assert_eq!(json["pagination"]["pageKey"], "g5");
        assert_eq!(json["pagination"]["pageSize"], 10);
    }

    #[test]
    fn test_update_game_request_accepts_string_mask() {
        let request: UpdateGameRequest = serde_json::from_str(
            r#"{"game": {"id": "g1", "name": "Renamed"}, "updateMask": "name"}"#,
        )
        .unwrap();

        assert_eq!(request.game.unwrap().name, "Renamed");
        assert_eq!(request.update_mask.unwrap().paths, vec!["name"]);
    }

    #[test]
    fn test_update_game_request_without_mask() {
        let request: UpdateGameRequest =
            serde_json::from_str(r#"{"game": {"id": "g1"}}"#).unwrap();

        assert!(request.update_mask.is_none());
    }

    #[test]
    fn test_update_game_request_binary_round_trip() {
        let request = UpdateGameRequest {
            game: Some(Game {
                id: "g1".to_string(),
                name: "Renamed".to_string(),
                ..Default::default()
            }),
            update_mask: Some(FieldMask::new(["name", "description"])),
        };

        let decoded = UpdateGameRequest::decode(request.encode_to_vec().as_slice()).unwrap();

        assert_eq!(decoded, request);
    }

    #[test]
    fn test_get_games_request_wire_tag() {
        let request = GetGamesRequest {
            ids: vec!["a".to_string()],
        };

        // field 1, length-delimited
        assert_eq!(request.encode_to_vec(), vec![0x0a, 0x01, b'a']);
    }
}
