use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt::Display, str::FromStr};
use thiserror::Error;
use uuid::Uuid;

/// Anything stored in a repository under its own identifier.
pub trait Entity<T: PartialEq = ID> {
    fn id(&self) -> &T;
}

/// Relay-assigned identifier of push subscriptions and scheduled
/// notifications. Travels over the wire as the hyphenated uuid string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ID(Uuid);

impl ID {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ID {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ID {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<ID> for String {
    fn from(id: ID) -> Self {
        id.0.to_string()
    }
}

impl Display for ID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("`{0}` is not a valid id")]
pub struct InvalidIDError(String);

impl FromStr for ID {
    type Err = InvalidIDError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| InvalidIDError(s.to_string()))
    }
}

impl TryFrom<String> for ID {
    type Error = InvalidIDError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Identifier of a task as handed out by the task store.
///
/// Task ids are opaque to the reminder system: client tasks carry whatever id
/// the document store assigned, relay tasks get a random uuid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new<T: Into<String>>(id: T) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_parses_ids() {
        let id = ID::new();
        let parsed: ID = id.to_string().parse().expect("To parse id");
        assert_eq!(parsed, id);
        assert!("not-an-id".parse::<ID>().is_err());

        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
        assert!(serde_json::from_str::<ID>("\"nope\"").is_err());
    }

    #[test]
    fn it_serializes_task_ids_as_plain_strings() {
        let id = TaskId::new("abc123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc123\"");
    }
}
