//! Scoring collaborator contract.
//!
//! # Responsibility
//! - Define the request/response types of the GPA, attendance and CIE
//!   eligibility endpoints.
//! - Convert collaborator faults into the documented safe defaults so the
//!   tracker service never fails because scoring is unreachable.
//!
//! # Invariants
//! - GPA requests carry only `{credits, gradePoint}` per subject.
//! - CGPA is computed from all subjects of all semesters, in order.

use crate::model::record::{AttendanceSubject, Semester, Subject};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod http_client;

/// Attendance percentage the student aims for when none is given.
pub const DEFAULT_ATTENDANCE_TARGET: f64 = 85.0;
/// Average CIE score required for eligibility when none is given.
pub const DEFAULT_CIE_TARGET_AVG: f64 = 13.0;

pub type ScoringResult<T> = Result<T, ScoringError>;

/// Failure talking to the scoring collaborator.
#[derive(Debug)]
pub enum ScoringError {
    /// Connection, DNS, TLS or timeout failure.
    Transport {
        endpoint: &'static str,
        kind: &'static str,
        message: String,
    },
    /// Non-success HTTP status.
    Status { endpoint: &'static str, status: u16 },
    /// Response body did not match the contract.
    Decode {
        endpoint: &'static str,
        message: String,
    },
}

impl ScoringError {
    /// Short stable label for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { kind, .. } => *kind,
            Self::Status { .. } => "http_status",
            Self::Decode { .. } => "decode",
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Transport { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::Decode { endpoint, .. } => *endpoint,
        }
    }
}

impl Display for ScoringError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport {
                endpoint,
                kind,
                message,
            } => write!(f, "scoring transport error ({kind}) at {endpoint}: {message}"),
            Self::Status { endpoint, status } => {
                write!(f, "scoring endpoint {endpoint} returned http status {status}")
            }
            Self::Decode { endpoint, message } => {
                write!(f, "invalid scoring response from {endpoint}: {message}")
            }
        }
    }
}

impl Error for ScoringError {}

/// One subject as seen by the GPA endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GpaSubject {
    pub credits: f64,
    pub grade_point: f64,
}

impl From<&Subject> for GpaSubject {
    fn from(subject: &Subject) -> Self {
        Self {
            credits: subject.credits,
            grade_point: subject.grade_point,
        }
    }
}

/// Attendance endpoint request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceRequest {
    pub total: i64,
    pub conducted: i64,
    pub attended: i64,
    pub target: f64,
}

impl AttendanceRequest {
    /// Builds a request from stored counters, defaulting the target to 85%.
    pub fn for_subject(subject: &AttendanceSubject, target: Option<f64>) -> Self {
        Self {
            total: subject.total_course,
            conducted: subject.conducted,
            attended: subject.attended,
            target: target.unwrap_or(DEFAULT_ATTENDANCE_TARGET),
        }
    }
}

/// Attendance endpoint response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AttendanceStatus {
    /// Two-decimal percentage rendered as text, e.g. `"87.50"`.
    pub percentage: String,
    /// `safe`, `warning`, `critical`, or `normal` for the fallback.
    pub status: String,
    pub message: String,
    /// Classes that can be skipped or must still be attended.
    #[serde(default)]
    pub count: Option<i64>,
}

impl AttendanceStatus {
    /// Value reported when the collaborator cannot be reached.
    pub fn fallback() -> Self {
        Self {
            percentage: "0.00".to_string(),
            status: "normal".to_string(),
            message: "Error connecting to backend.".to_string(),
            count: None,
        }
    }
}

/// CIE eligibility endpoint request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityRequest {
    pub cie1: Option<f64>,
    pub cie2: Option<f64>,
    pub cie3: Option<f64>,
    pub target_avg: f64,
}

impl EligibilityRequest {
    /// Builds a request from a subject's CIE scores, defaulting the target to 13.
    pub fn for_subject(subject: &Subject, target_avg: Option<f64>) -> Self {
        Self {
            cie1: subject.cie1,
            cie2: subject.cie2,
            cie3: subject.cie3,
            target_avg: target_avg.unwrap_or(DEFAULT_CIE_TARGET_AVG),
        }
    }
}

/// CIE eligibility endpoint response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Eligibility {
    /// `None` means pending: not enough CIE scores yet.
    #[serde(default, deserialize_with = "deserialize_eligible")]
    pub eligible: Option<bool>,
    pub message: String,
}

impl Eligibility {
    /// Value reported when the collaborator cannot be reached.
    pub fn fallback() -> Self {
        Self {
            eligible: Some(false),
            message: "Backend Error".to_string(),
        }
    }
}

// The endpoint reports the pending state as `null` or the string "pending".
fn deserialize_eligible<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(eligible)) => Some(eligible),
        _ => None,
    })
}

/// Request/response contract of the scoring collaborator.
pub trait ScoringService {
    fn gpa(&self, subjects: &[GpaSubject]) -> ScoringResult<f64>;
    fn attendance(&self, request: &AttendanceRequest) -> ScoringResult<AttendanceStatus>;
    fn eligibility(&self, request: &EligibilityRequest) -> ScoringResult<Eligibility>;
}

impl<T: ScoringService + ?Sized> ScoringService for &T {
    fn gpa(&self, subjects: &[GpaSubject]) -> ScoringResult<f64> {
        (**self).gpa(subjects)
    }

    fn attendance(&self, request: &AttendanceRequest) -> ScoringResult<AttendanceStatus> {
        (**self).attendance(request)
    }

    fn eligibility(&self, request: &EligibilityRequest) -> ScoringResult<Eligibility> {
        (**self).eligibility(request)
    }
}

/// GPA of `subjects`, or `0.0` when the collaborator fails.
pub fn gpa_or_default<S: ScoringService + ?Sized>(service: &S, subjects: &[GpaSubject]) -> f64 {
    match service.gpa(subjects) {
        Ok(gpa) => gpa,
        Err(err) => {
            log_fault(&err);
            0.0
        }
    }
}

/// SGPA of one semester's subjects.
pub fn sgpa<S: ScoringService + ?Sized>(service: &S, subjects: &[Subject]) -> f64 {
    let request: Vec<GpaSubject> = subjects.iter().map(GpaSubject::from).collect();
    gpa_or_default(service, &request)
}

/// CGPA over every subject of every semester.
pub fn cgpa<S: ScoringService + ?Sized>(service: &S, semesters: &[Semester]) -> f64 {
    let request: Vec<GpaSubject> = semesters
        .iter()
        .flat_map(|semester| semester.subjects.iter())
        .map(GpaSubject::from)
        .collect();
    gpa_or_default(service, &request)
}

pub fn attendance_or_default<S: ScoringService + ?Sized>(
    service: &S,
    request: &AttendanceRequest,
) -> AttendanceStatus {
    service.attendance(request).unwrap_or_else(|err| {
        log_fault(&err);
        AttendanceStatus::fallback()
    })
}

pub fn eligibility_or_default<S: ScoringService + ?Sized>(
    service: &S,
    request: &EligibilityRequest,
) -> Eligibility {
    service.eligibility(request).unwrap_or_else(|err| {
        log_fault(&err);
        Eligibility::fallback()
    })
}

fn log_fault(err: &ScoringError) {
    warn!(
        "event=scoring_call module=scoring status=error endpoint={} error_kind={} error={}",
        err.endpoint(),
        err.kind(),
        err
    );
}
