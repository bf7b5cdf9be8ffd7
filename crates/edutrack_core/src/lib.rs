//! Core domain logic for EduTrack.
//! This crate owns the persisted multi-profile document and every invariant
//! on it; UI layers only call the tracker service.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod scoring;
pub mod service;

pub use config::ScoringConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::document::{Document, Profile, ProfileId, ProfileSummary};
pub use model::record::{
    AttendanceSubject, Semester, Student, StudentRecord, StudentUpdate, Subject,
};
pub use repo::document_store::{
    create_profile, DocumentStore, DEFAULT_PROFILE_ID, DEFAULT_PROFILE_NAME, DOCUMENT_KEY,
};
pub use repo::kv_backend::{KvBackend, MemoryKvBackend, SqliteKvBackend};
pub use repo::{RepoError, RepoResult};
pub use scoring::http_client::HttpScoringClient;
pub use scoring::{
    AttendanceRequest, AttendanceStatus, Eligibility, EligibilityRequest, GpaSubject,
    ScoringError, ScoringResult, ScoringService,
};
pub use service::planner::{grade_point_for_marks, GoalOutcome, PlannerError};
pub use service::tracker_service::{TrackerError, TrackerResult, TrackerService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
