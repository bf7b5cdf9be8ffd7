//! Local planning helpers that need no scoring round-trip.
//!
//! # Invariants
//! - Grade points use the 10-point scale with 10-mark bands.
//! - Target planning assumes every semester carries equal weight.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Highest grade point on the scale.
pub const MAX_GRADE_POINT: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub enum PlannerError {
    InvalidTarget(f64),
    InvalidRemaining,
}

impl Display for PlannerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTarget(value) => write!(f, "target cgpa must be positive, got {value}"),
            Self::InvalidRemaining => write!(f, "remaining semesters must be at least 1"),
        }
    }
}

impl Error for PlannerError {}

/// Result of planning for a target CGPA.
#[derive(Debug, Clone, PartialEq)]
pub enum GoalOutcome {
    /// Average GPA needed over the remaining semesters.
    Required(f64),
    /// Needed average is above the scale maximum.
    Unreachable(f64),
    /// Current standing already meets the target.
    AlreadyAchieved,
}

/// Maps a percentage mark to a grade point.
pub fn grade_point_for_marks(marks: f64) -> u8 {
    match marks {
        m if m >= 90.0 => 10,
        m if m >= 80.0 => 9,
        m if m >= 70.0 => 8,
        m if m >= 60.0 => 7,
        m if m >= 50.0 => 6,
        m if m >= 40.0 => 5,
        _ => 0,
    }
}

/// Computes the average GPA needed in `remaining` semesters to reach `target`.
pub fn plan_target_cgpa(
    current_cgpa: f64,
    completed_semesters: usize,
    target: f64,
    remaining: u32,
) -> Result<GoalOutcome, PlannerError> {
    if !target.is_finite() || target <= 0.0 {
        return Err(PlannerError::InvalidTarget(target));
    }
    if remaining == 0 {
        return Err(PlannerError::InvalidRemaining);
    }

    let completed = completed_semesters as f64;
    let remaining = f64::from(remaining);
    let required_points = target * (completed + remaining) - current_cgpa * completed;
    let required = round2(required_points / remaining);

    Ok(if required > MAX_GRADE_POINT {
        GoalOutcome::Unreachable(required)
    } else if required < 0.0 {
        GoalOutcome::AlreadyAchieved
    } else {
        GoalOutcome::Required(required)
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::{grade_point_for_marks, plan_target_cgpa, GoalOutcome, PlannerError};

    #[test]
    fn grade_point_bands() {
        assert_eq!(grade_point_for_marks(95.0), 10);
        assert_eq!(grade_point_for_marks(90.0), 10);
        assert_eq!(grade_point_for_marks(89.9), 9);
        assert_eq!(grade_point_for_marks(72.0), 8);
        assert_eq!(grade_point_for_marks(40.0), 5);
        assert_eq!(grade_point_for_marks(39.5), 0);
    }

    #[test]
    fn required_average_over_remaining_semesters() {
        // 2 done at 8.0, aiming for 8.5 over 4 => (34 - 16) / 2 = 9.0
        assert_eq!(
            plan_target_cgpa(8.0, 2, 8.5, 2).unwrap(),
            GoalOutcome::Required(9.0)
        );
    }

    #[test]
    fn unreachable_and_achieved_targets() {
        assert_eq!(
            plan_target_cgpa(6.0, 6, 9.0, 1).unwrap(),
            GoalOutcome::Unreachable(27.0)
        );
        assert_eq!(
            plan_target_cgpa(9.5, 6, 5.0, 1).unwrap(),
            GoalOutcome::AlreadyAchieved
        );
    }

    #[test]
    fn rejects_invalid_inputs() {
        assert_eq!(
            plan_target_cgpa(8.0, 2, 0.0, 2).unwrap_err(),
            PlannerError::InvalidTarget(0.0)
        );
        assert_eq!(
            plan_target_cgpa(8.0, 2, 8.0, 0).unwrap_err(),
            PlannerError::InvalidRemaining
        );
    }
}
