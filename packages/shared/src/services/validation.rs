//! Field-level checks on game payloads. Errors are keyed by the JSON
//! (lowerCamelCase) name of the offending field.

use std::collections::BTreeMap;

use crate::models::game::{Game, DIFFICULTIES};

pub const MAX_ID_LEN: usize = 64;
pub const MAX_NAME_LEN: usize = 128;
pub const MAX_DESCRIPTION_LEN: usize = 2048;
pub const MAX_TAGS: usize = 20;

pub type FieldErrors = BTreeMap<String, String>;

pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Checks a client-supplied id. An empty id is fine; the service assigns one.
pub fn validate_id(id: &str, errors: &mut FieldErrors) {
    if !id.is_empty() && !is_valid_id(id) {
        errors.insert(
            "id".to_string(),
            format!(
                "id must be 1-{} characters of letters, digits, '-' or '_'",
                MAX_ID_LEN
            ),
        );
    }
}

/// Checks the mutable metadata of a game.
pub fn validate_game_fields(game: &Game, errors: &mut FieldErrors) {
    let name = game.name.trim();
    if name.is_empty() {
        errors.insert("name".to_string(), "name is required".to_string());
    } else if name.chars().count() > MAX_NAME_LEN {
        errors.insert(
            "name".to_string(),
            format!("name must be at most {} characters", MAX_NAME_LEN),
        );
    }

    if game.description.chars().count() > MAX_DESCRIPTION_LEN {
        errors.insert(
            "description".to_string(),
            format!(
                "description must be at most {} characters",
                MAX_DESCRIPTION_LEN
            ),
        );
    }

    if game.tags.len() > MAX_TAGS {
        errors.insert(
            "tags".to_string(),
            format!("at most {} tags are allowed", MAX_TAGS),
        );
    } else if game.tags.iter().any(|t| t.trim().is_empty()) {
        errors.insert("tags".to_string(), "tags cannot be blank".to_string());
    }

    if !game.difficulty.is_empty() && !DIFFICULTIES.contains(&game.difficulty.as_str()) {
        errors.insert(
            "difficulty".to_string(),
            format!("difficulty must be one of {}", DIFFICULTIES.join(", ")),
        );
    }
}

/// Renders collected errors as one line, for channels that carry a single message.
pub fn summarize(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{}: {}", field, message))
        .collect::<Vec<_>>()
        .join("; ")
}
