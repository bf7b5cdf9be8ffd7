//! Persisted document model for academic records.
//!
//! # Responsibility
//! - Define the serialized shape of the single stored document.
//! - Provide value-level mutation helpers for profile bookkeeping.
//!
//! # Invariants
//! - Field names serialize in camelCase to match the stored layout.
//! - Derived numbers (`sgpa`, `cgpa`) are only written by the tracker
//!   service after asking the scoring collaborator.

pub mod document;
pub mod record;
