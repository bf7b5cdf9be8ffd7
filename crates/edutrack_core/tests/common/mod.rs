#![allow(dead_code)]

use edutrack_core::{
    AttendanceRequest, AttendanceStatus, Eligibility, EligibilityRequest, GpaSubject,
    ScoringError, ScoringResult, ScoringService,
};
use std::cell::{Cell, RefCell};

/// Deterministic stand-in for the scoring collaborator.
///
/// GPA is the credit-weighted mean rounded to two decimals; attendance and
/// eligibility echo their inputs so tests can assert on what was sent.
#[derive(Default)]
pub struct WeightedScoring {
    pub gpa_calls: Cell<usize>,
    pub last_attendance: RefCell<Option<AttendanceRequest>>,
    pub last_eligibility: RefCell<Option<EligibilityRequest>>,
}

impl ScoringService for WeightedScoring {
    fn gpa(&self, subjects: &[GpaSubject]) -> ScoringResult<f64> {
        self.gpa_calls.set(self.gpa_calls.get() + 1);
        Ok(weighted_gpa(subjects))
    }

    fn attendance(&self, request: &AttendanceRequest) -> ScoringResult<AttendanceStatus> {
        *self.last_attendance.borrow_mut() = Some(request.clone());
        let percentage = if request.conducted <= 0 {
            0.0
        } else {
            request.attended as f64 / request.conducted as f64 * 100.0
        };
        Ok(AttendanceStatus {
            percentage: format!("{percentage:.2}"),
            status: if percentage >= request.target {
                "safe".to_string()
            } else {
                "warning".to_string()
            },
            message: "stub".to_string(),
            count: None,
        })
    }

    fn eligibility(&self, request: &EligibilityRequest) -> ScoringResult<Eligibility> {
        *self.last_eligibility.borrow_mut() = Some(request.clone());
        let scores = [request.cie1, request.cie2, request.cie3];
        if scores.iter().any(Option::is_none) {
            return Ok(Eligibility {
                eligible: None,
                message: "pending".to_string(),
            });
        }
        let avg = scores.iter().flatten().sum::<f64>() / 3.0;
        Ok(Eligibility {
            eligible: Some(avg >= request.target_avg),
            message: format!("avg {avg:.1}"),
        })
    }
}

/// Collaborator that is never reachable.
pub struct FailingScoring;

impl FailingScoring {
    fn error(endpoint: &'static str) -> ScoringError {
        ScoringError::Transport {
            endpoint,
            kind: "connection",
            message: "connection refused".to_string(),
        }
    }
}

impl ScoringService for FailingScoring {
    fn gpa(&self, _subjects: &[GpaSubject]) -> ScoringResult<f64> {
        Err(Self::error("/api/calculate-gpa"))
    }

    fn attendance(&self, _request: &AttendanceRequest) -> ScoringResult<AttendanceStatus> {
        Err(Self::error("/api/calculate-attendance"))
    }

    fn eligibility(&self, _request: &EligibilityRequest) -> ScoringResult<Eligibility> {
        Err(Self::error("/api/calculate-cie"))
    }
}

pub fn weighted_gpa(subjects: &[GpaSubject]) -> f64 {
    let credits: f64 = subjects.iter().map(|s| s.credits).sum();
    if credits == 0.0 {
        return 0.0;
    }
    let points: f64 = subjects.iter().map(|s| s.credits * s.grade_point).sum();
    (points / credits * 100.0).round() / 100.0
}
