//! Persistent document store.
//!
//! # Responsibility
//! - Load and save the one multi-profile document under `DOCUMENT_KEY`.
//! - Bootstrap a default profile on first run.
//! - Migrate the legacy single-profile layout (a bare student record at the
//!   root) into the multi-profile layout exactly once.
//!
//! # Invariants
//! - Unreadable or malformed stored values are treated as absent and
//!   replaced by a fresh default document.
//! - After `initialize` succeeds, the stored value is a current-layout
//!   document with at least one profile.

use crate::model::document::{Document, Profile};
use crate::model::record::StudentRecord;
use crate::repo::kv_backend::KvBackend;
use crate::repo::RepoResult;
use log::{info, warn};
use serde_json::Value;
use uuid::Uuid;

/// Well-known key of the persisted document.
pub const DOCUMENT_KEY: &str = "edutrack_data";
/// Id given to the bootstrap profile and to migrated legacy data.
pub const DEFAULT_PROFILE_ID: &str = "default";
/// Name of the bootstrap profile and fallback name for legacy data.
pub const DEFAULT_PROFILE_NAME: &str = "Default Profile";

/// Builds a profile with an empty record.
///
/// `id` defaults to a fresh UUID v4 string when omitted.
pub fn create_profile(name: impl Into<String>, id: Option<&str>) -> Profile {
    Profile {
        id: id.map_or_else(|| Uuid::new_v4().to_string(), str::to_string),
        name: name.into(),
        data: StudentRecord::default(),
    }
}

/// Shape of whatever is currently stored under `DOCUMENT_KEY`.
#[derive(Debug)]
enum StoredShape {
    Missing,
    Unreadable(String),
    /// Legacy record plus the student name as literally stored, if any.
    Legacy(StudentRecord, Option<String>),
    Current(Document),
}

/// Owner of the single persisted document.
pub struct DocumentStore<B: KvBackend> {
    backend: B,
}

impl<B: KvBackend> DocumentStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the stored document, or `None` when nothing usable is stored.
    ///
    /// A legacy-layout value also reads as `None`; call [`Self::initialize`]
    /// first to migrate it.
    pub fn load(&self) -> Option<Document> {
        match self.read_shape() {
            StoredShape::Current(doc) => Some(doc),
            _ => None,
        }
    }

    /// Serializes `doc` and overwrites the stored value.
    pub fn save(&self, doc: &Document) -> RepoResult<()> {
        let payload = serde_json::to_string(doc)?;
        self.backend.write(DOCUMENT_KEY, &payload)
    }

    /// Idempotent bootstrap and legacy migration.
    pub fn initialize(&self) -> RepoResult<()> {
        self.ensure_document().map(|_| ())
    }

    /// Runs [`Self::initialize`] and returns the resulting document.
    pub fn load_initialized(&self) -> RepoResult<Document> {
        self.ensure_document()
    }

    fn ensure_document(&self) -> RepoResult<Document> {
        match self.read_shape() {
            StoredShape::Current(doc) => Ok(doc),
            StoredShape::Missing => {
                let doc = default_document();
                self.save(&doc)?;
                info!("event=doc_bootstrap module=store status=ok reason=missing");
                Ok(doc)
            }
            StoredShape::Unreadable(reason) => {
                warn!("event=doc_bootstrap module=store status=ok reason=unreadable detail={reason}");
                let doc = default_document();
                self.save(&doc)?;
                Ok(doc)
            }
            StoredShape::Legacy(record, stored_name) => {
                let name = stored_name.unwrap_or_else(|| DEFAULT_PROFILE_NAME.to_string());
                let doc = Document::with_single_profile(Profile {
                    id: DEFAULT_PROFILE_ID.to_string(),
                    name,
                    data: record,
                });
                self.save(&doc)?;
                info!(
                    "event=doc_migrate module=store status=ok from=legacy profile_id={DEFAULT_PROFILE_ID}"
                );
                Ok(doc)
            }
        }
    }

    fn read_shape(&self) -> StoredShape {
        let raw = match self.backend.read(DOCUMENT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return StoredShape::Missing,
            Err(err) => return StoredShape::Unreadable(format!("read failed: {err}")),
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => classify(value),
            Err(err) => StoredShape::Unreadable(format!("invalid json: {err}")),
        }
    }
}

fn default_document() -> Document {
    Document::with_single_profile(create_profile(
        DEFAULT_PROFILE_NAME,
        Some(DEFAULT_PROFILE_ID),
    ))
}

fn classify(value: Value) -> StoredShape {
    let (has_profiles, has_student) = match &value {
        Value::Null => return StoredShape::Missing,
        Value::Object(map) => (map.contains_key("profiles"), map.contains_key("student")),
        _ => return StoredShape::Unreadable("root is not an object".to_string()),
    };

    if has_profiles {
        return match serde_json::from_value::<Document>(value) {
            Ok(doc) if doc.profiles().is_empty() => {
                StoredShape::Unreadable("document has no profiles".to_string())
            }
            Ok(doc) => StoredShape::Current(doc),
            Err(err) => StoredShape::Unreadable(format!("invalid document: {err}")),
        };
    }

    if has_student {
        let stored_name = value
            .pointer("/student/name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        return match serde_json::from_value::<StudentRecord>(value) {
            Ok(record) => StoredShape::Legacy(record, stored_name),
            Err(err) => StoredShape::Unreadable(format!("invalid legacy record: {err}")),
        };
    }

    StoredShape::Unreadable("unrecognized document layout".to_string())
}
