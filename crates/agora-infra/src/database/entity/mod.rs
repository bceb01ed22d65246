//! SeaORM entities for the two parent collections.

pub mod subreddit;
pub mod user;

use sea_orm::prelude::Json;
use serde::Serialize;
use serde::de::DeserializeOwned;

use agora_core::error::RepoError;

pub(crate) fn from_json<T: DeserializeOwned>(column: &str, value: Json) -> Result<T, RepoError> {
    serde_json::from_value(value).map_err(|e| RepoError::Corrupt(format!("{column}: {e}")))
}

pub(crate) fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Json, RepoError> {
    serde_json::to_value(value).map_err(|e| RepoError::Query(e.to_string()))
}
