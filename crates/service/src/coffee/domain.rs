use std::fmt;

use serde::{Deserialize, Serialize};

/// Store-assigned identifier: an integer row id for SQLite, an opaque record id for Airtable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoffeeId {
    Int(i64),
    Text(String),
}

impl fmt::Display for CoffeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoffeeId::Int(n) => write!(f, "{n}"),
            CoffeeId::Text(s) => f.write_str(s),
        }
    }
}

impl CoffeeId {
    /// Interpret a path segment: numeric ids are SQLite row ids, anything else is opaque.
    pub fn from_path(raw: &str) -> Self {
        raw.parse::<i64>().map(CoffeeId::Int).unwrap_or_else(|_| CoffeeId::Text(raw.to_string()))
    }
}

impl From<i32> for CoffeeId {
    fn from(n: i32) -> Self { CoffeeId::Int(n.into()) }
}

impl From<String> for CoffeeId {
    fn from(s: String) -> Self { CoffeeId::Text(s) }
}

/// A catalog entry as stored and returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coffee {
    pub id: Option<CoffeeId>,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub votes: i64,
}

impl From<models::coffee::Model> for Coffee {
    fn from(m: models::coffee::Model) -> Self {
        Coffee {
            id: Some(m.id.into()),
            name: m.name,
            description: m.description,
            image_url: m.image_url,
            votes: m.votes.into(),
        }
    }
}

/// The client-editable fields; `id` and `votes` are never taken from input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoffeeInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl CoffeeInput {
    pub fn new(name: impl Into<String>, description: Option<&str>, image_url: Option<&str>) -> Self {
        Self {
            name: name.into(),
            description: description.map(str::to_string),
            image_url: image_url.map(str::to_string),
        }
    }

    /// Turn the input into a stored coffee with a fresh id and zero votes.
    pub fn into_coffee(self, id: CoffeeId) -> Coffee {
        Coffee {
            id: Some(id),
            name: self.name,
            description: self.description,
            image_url: self.image_url,
            votes: 0,
        }
    }
}
