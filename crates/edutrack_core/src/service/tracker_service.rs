//! Profile-scoped tracker service.
//!
//! # Responsibility
//! - Expose profile lifecycle operations (create, switch, delete, list).
//! - Route every data operation to the active profile (see `record_ops`).
//! - Keep the active pointer, profile names and aggregates consistent.
//!
//! # Invariants
//! - Every operation reads the whole document through
//!   `DocumentStore::load_initialized` and writes it back in one `save`.
//! - The last remaining profile is never deleted.
//! - Failed switches/deletes leave storage untouched.

use crate::model::document::{Document, Profile, ProfileSummary};
use crate::repo::document_store::{create_profile, DocumentStore};
use crate::repo::kv_backend::KvBackend;
use crate::repo::RepoError;
use crate::scoring::ScoringService;
use crate::service::planner::PlannerError;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TrackerResult<T> = Result<T, TrackerError>;

/// Error for tracker use-cases.
#[derive(Debug)]
pub enum TrackerError {
    /// Persistence-layer failure.
    Repo(RepoError),
    /// `activeProfileId` does not reference any stored profile.
    ActiveProfileMissing(String),
    /// Semester, subject or attendance index outside the stored list.
    IndexOutOfRange {
        collection: &'static str,
        index: usize,
        len: usize,
    },
    /// Goal-planning input rejected.
    Planner(PlannerError),
}

impl Display for TrackerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::ActiveProfileMissing(id) => {
                write!(f, "active profile `{id}` is missing from the document")
            }
            Self::IndexOutOfRange {
                collection,
                index,
                len,
            } => write!(f, "{collection} index {index} out of range (len {len})"),
            Self::Planner(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TrackerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Planner(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TrackerError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<PlannerError> for TrackerError {
    fn from(value: PlannerError) -> Self {
        Self::Planner(value)
    }
}

/// Profile-oblivious CRUD surface over the multi-profile document.
pub struct TrackerService<'store, B: KvBackend, S: ScoringService> {
    pub(super) store: &'store DocumentStore<B>,
    pub(super) scoring: S,
}

impl<'store, B: KvBackend, S: ScoringService> TrackerService<'store, B, S> {
    /// Creates a service over `store`, using `scoring` for derived numbers.
    pub fn new(store: &'store DocumentStore<B>, scoring: S) -> Self {
        Self { store, scoring }
    }

    /// Returns the profile referenced by `activeProfileId`.
    pub fn get_active_profile(&self) -> TrackerResult<Profile> {
        let doc = self.load()?;
        active_profile(&doc).cloned()
    }

    /// Lists `{id, name}` for every profile in stored order.
    pub fn list_profiles(&self) -> TrackerResult<Vec<ProfileSummary>> {
        Ok(self.load()?.summaries())
    }

    /// Creates an empty profile, appends it and makes it active.
    pub fn create_profile(&self, name: impl Into<String>) -> TrackerResult<Profile> {
        let profile = create_profile(name, None);
        let doc = self.load()?.with_profile_appended(profile.clone());
        self.persist(&doc)?;
        info!(
            "event=profile_create module=service status=ok profile_id={} profiles={}",
            profile.id,
            doc.profiles().len()
        );
        Ok(profile)
    }

    /// Activates profile `id`. Returns `false` when it does not exist.
    pub fn switch_profile(&self, id: &str) -> TrackerResult<bool> {
        let Some(doc) = self.load()?.with_active(id) else {
            warn!("event=profile_switch module=service status=skip reason=unknown_id");
            return Ok(false);
        };
        self.persist(&doc)?;
        info!("event=profile_switch module=service status=ok profile_id={id}");
        Ok(true)
    }

    /// Deletes profile `id`. Returns `false` when it is the only profile.
    ///
    /// When the active profile is deleted, the first remaining one becomes
    /// active.
    pub fn delete_profile(&self, id: &str) -> TrackerResult<bool> {
        let Some(doc) = self.load()?.without_profile(id) else {
            warn!("event=profile_delete module=service status=skip reason=last_profile");
            return Ok(false);
        };
        self.persist(&doc)?;
        info!(
            "event=profile_delete module=service status=ok profile_id={id} active_profile_id={}",
            doc.active_profile_id()
        );
        Ok(true)
    }

    pub(super) fn load(&self) -> TrackerResult<Document> {
        Ok(self.store.load_initialized()?)
    }

    pub(super) fn persist(&self, doc: &Document) -> TrackerResult<()> {
        self.store.save(doc).map_err(|err| {
            error!("event=doc_save module=service status=error error={err}");
            TrackerError::from(err)
        })
    }
}

pub(super) fn active_profile(doc: &Document) -> TrackerResult<&Profile> {
    doc.active_profile().ok_or_else(|| {
        error!(
            "event=integrity_check module=service status=error error_code=active_profile_missing profile_id={}",
            doc.active_profile_id()
        );
        TrackerError::ActiveProfileMissing(doc.active_profile_id().to_string())
    })
}
