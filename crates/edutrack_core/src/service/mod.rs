//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate document store and scoring calls into use-case level APIs.
//! - Keep CLI/UI layers decoupled from storage details.

pub mod planner;
mod record_ops;
pub mod tracker_service;
