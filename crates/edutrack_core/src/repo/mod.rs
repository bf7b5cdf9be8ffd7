//! Persistence layer: key-value backends and the document store.
//!
//! # Responsibility
//! - Abstract durable blob storage behind `KvBackend`.
//! - Own the single persisted document, its bootstrap and legacy migration.
//!
//! # Invariants
//! - Writes are whole-value overwrites; there is no partial update path.
//! - Read faults never escape `DocumentStore`; they are treated as an
//!   absent document.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod document_store;
pub mod kv_backend;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for backend and document persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Serialize(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize document: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}
