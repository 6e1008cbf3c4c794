//! `google.protobuf.FieldMask` and its application to [`Game`] updates.

use std::fmt;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::models::game::Game;

#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct FieldMask {
    #[prost(string, repeated, tag = "1")]
    pub paths: Vec<String>,
}

impl FieldMask {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldMask {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.iter().all(|p| p.trim().is_empty())
    }

    /// Resolves every path to a mutable game field, deduplicated, in mask order.
    pub fn resolve(&self) -> Result<Vec<GameField>, FieldMaskError> {
        let mut fields = Vec::new();
        for path in self.paths.iter().map(|p| p.trim()).filter(|p| !p.is_empty()) {
            let field = GameField::parse(path)?;
            if !fields.contains(&field) {
                fields.push(field);
            }
        }
        Ok(fields)
    }
}

/// Game fields an update may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameField {
    Name,
    Description,
    Tags,
    Difficulty,
    WorldId,
    CreatorId,
}

impl GameField {
    pub const ALL: [GameField; 6] = [
        GameField::Name,
        GameField::Description,
        GameField::Tags,
        GameField::Difficulty,
        GameField::WorldId,
        GameField::CreatorId,
    ];

    const IMMUTABLE: [&'static str; 4] = ["id", "created_at", "updated_at", "version"];

    pub fn parse(path: &str) -> Result<Self, FieldMaskError> {
        let snake = to_snake_case(path);
        match snake.as_str() {
            "name" => Ok(GameField::Name),
            "description" => Ok(GameField::Description),
            "tags" => Ok(GameField::Tags),
            "difficulty" => Ok(GameField::Difficulty),
            "world_id" => Ok(GameField::WorldId),
            "creator_id" => Ok(GameField::CreatorId),
            other if Self::IMMUTABLE.contains(&other) => {
                Err(FieldMaskError::Immutable(path.to_string()))
            }
            _ => Err(FieldMaskError::UnknownPath(path.to_string())),
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            GameField::Name => "name",
            GameField::Description => "description",
            GameField::Tags => "tags",
            GameField::Difficulty => "difficulty",
            GameField::WorldId => "world_id",
            GameField::CreatorId => "creator_id",
        }
    }

    fn copy(&self, target: &mut Game, source: &Game) {
        match self {
            GameField::Name => target.name = source.name.clone(),
            GameField::Description => target.description = source.description.clone(),
            GameField::Tags => target.tags = source.tags.clone(),
            GameField::Difficulty => target.difficulty = source.difficulty.clone(),
            GameField::WorldId => target.world_id = source.world_id.clone(),
            GameField::CreatorId => target.creator_id = source.creator_id.clone(),
        }
    }

    fn is_set(&self, game: &Game) -> bool {
        match self {
            GameField::Name => !game.name.is_empty(),
            GameField::Description => !game.description.is_empty(),
            GameField::Tags => !game.tags.is_empty(),
            GameField::Difficulty => !game.difficulty.is_empty(),
            GameField::WorldId => !game.world_id.is_empty(),
            GameField::CreatorId => !game.creator_id.is_empty(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldMaskError {
    #[error("unknown field mask path: {0}")]
    UnknownPath(String),
    #[error("field cannot be updated: {0}")]
    Immutable(String),
}

/// Copies fields of `patch` into `target`.
///
/// With a non-empty mask exactly the masked fields are copied, empty values
/// included. Without one, every mutable field that is set on `patch` is copied.
/// Returns the fields that were written.
pub fn apply_mask(
    target: &mut Game,
    patch: &Game,
    mask: Option<&FieldMask>,
) -> Result<Vec<GameField>, FieldMaskError> {
    let fields = match mask.filter(|m| !m.is_empty()) {
        Some(mask) => mask.resolve()?,
        None => GameField::ALL
            .into_iter()
            .filter(|f| f.is_set(patch))
            .collect(),
    };
    for field in &fields {
        field.copy(target, patch);
    }
    Ok(fields)
}

pub fn to_snake_case(path: &str) -> String {
    let mut out = String::with_capacity(path.len() + 4);
    for c in path.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

pub fn to_camel_case(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut upper = false;
    for c in path.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

// proto3 JSON renders a FieldMask as one comma-separated string of camelCase paths.
impl Serialize for FieldMask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let joined = self
            .paths
            .iter()
            .map(|p| to_camel_case(p))
            .collect::<Vec<_>>()
            .join(",");
        serializer.serialize_str(&joined)
    }
}

impl<'de> Deserialize<'de> for FieldMask {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FieldMaskVisitor)
    }
}

struct FieldMaskVisitor;

impl<'de> Visitor<'de> for FieldMaskVisitor {
    type Value = FieldMask;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a comma-separated path string, a list of paths, or {\"paths\": [...]}")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<FieldMask, E> {
        Ok(FieldMask::new(
            value
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty()),
        ))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<FieldMask, A::Error> {
        let mut paths = Vec::new();
        while let Some(path) = seq.next_element::<String>()? {
            paths.push(path.trim().to_string());
        }
        Ok(FieldMask { paths })
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<FieldMask, A::Error> {
        let mut paths = Vec::new();
        while let Some(key) = map.next_key::<String>()? {
            if key == "paths" {
                let values: Vec<String> = map.next_value()?;
                paths.extend(values.iter().map(|p| p.trim().to_string()));
            } else {
                map.next_value::<de::IgnoredAny>()?;
            }
        }
        Ok(FieldMask { paths })
    }

    fn visit_unit<E: de::Error>(self) -> Result<FieldMask, E> {
        Ok(FieldMask::default())
    }
}
