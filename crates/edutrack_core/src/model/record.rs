//! Student record model.
//!
//! # Responsibility
//! - Define one profile's academic payload: identity, semesters, attendance.
//! - Accept documents written by older app versions (missing optional
//!   fields fall back to defaults).
//!
//! # Invariants
//! - `semesters` and `attendance` keep insertion order.
//! - `attendance` is `None` only for records written before attendance
//!   tracking existed; it is healed on first read by the tracker service.

use serde::{Deserialize, Serialize};

/// Student name placed on freshly created profiles.
pub const DEFAULT_STUDENT_NAME: &str = "Student Name";

/// Identity block of a student record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(default = "default_student_name")]
    pub name: String,
    #[serde(default)]
    pub roll_no: String,
    #[serde(default)]
    pub major: String,
    /// Derived from all semesters; never edited directly.
    #[serde(default)]
    pub cgpa: f64,
}

fn default_student_name() -> String {
    DEFAULT_STUDENT_NAME.to_string()
}

impl Default for Student {
    fn default() -> Self {
        Self {
            name: default_student_name(),
            roll_no: String::new(),
            major: String::new(),
            cgpa: 0.0,
        }
    }
}

/// Partial update for [`Student`]. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub roll_no: Option<String>,
    pub major: Option<String>,
}

impl StudentUpdate {
    /// Merges this update into `student` and returns the result.
    pub fn apply(self, student: Student) -> Student {
        Student {
            name: self.name.unwrap_or(student.name),
            roll_no: self.roll_no.unwrap_or(student.roll_no),
            major: self.major.unwrap_or(student.major),
            cgpa: student.cgpa,
        }
    }
}

/// One graded subject inside a semester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub credits: f64,
    #[serde(default)]
    pub grade_point: f64,
    #[serde(default)]
    pub cie1: Option<f64>,
    #[serde(default)]
    pub cie2: Option<f64>,
    #[serde(default)]
    pub cie3: Option<f64>,
}

impl Subject {
    /// Creates a subject without CIE scores.
    pub fn new(name: impl Into<String>, credits: f64, grade_point: f64) -> Self {
        Self {
            name: name.into(),
            credits,
            grade_point,
            cie1: None,
            cie2: None,
            cie3: None,
        }
    }

    /// Sets the three CIE scores.
    pub fn with_cie(mut self, cie1: Option<f64>, cie2: Option<f64>, cie3: Option<f64>) -> Self {
        self.cie1 = cie1;
        self.cie2 = cie2;
        self.cie3 = cie3;
        self
    }
}

/// One semester with its subjects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Semester {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    /// Derived from `subjects`; overwritten on every add/update.
    #[serde(default)]
    pub sgpa: f64,
}

impl Semester {
    pub fn new(name: impl Into<String>, subjects: Vec<Subject>) -> Self {
        Self {
            name: name.into(),
            subjects,
            sgpa: 0.0,
        }
    }
}

/// Attendance counters for one tracked course.
///
/// Counters are signed: older app versions stored whatever number was typed,
/// negatives included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSubject {
    #[serde(default)]
    pub name: String,
    /// Classes planned for the whole course.
    #[serde(default)]
    pub total_course: i64,
    #[serde(default)]
    pub conducted: i64,
    #[serde(default)]
    pub attended: i64,
}

impl AttendanceSubject {
    pub fn new(name: impl Into<String>, total_course: i64, conducted: i64, attended: i64) -> Self {
        Self {
            name: name.into(),
            total_course,
            conducted,
            attended,
        }
    }

    /// Records one conducted class, counting it as attended when `present`.
    pub fn record_class(&mut self, present: bool) {
        self.conducted = self.conducted.saturating_add(1);
        if present {
            self.attended = self.attended.saturating_add(1);
        }
    }
}

/// Everything stored for one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    #[serde(default)]
    pub student: Student,
    #[serde(default)]
    pub semesters: Vec<Semester>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendance: Option<Vec<AttendanceSubject>>,
}

impl Default for StudentRecord {
    fn default() -> Self {
        Self {
            student: Student::default(),
            semesters: Vec::new(),
            attendance: Some(Vec::new()),
        }
    }
}

impl StudentRecord {
    /// Tracked attendance subjects; empty when attendance was never set up.
    pub fn attendance(&self) -> &[AttendanceSubject] {
        self.attendance.as_deref().unwrap_or(&[])
    }

    /// Mutable attendance list, creating it when missing.
    pub fn attendance_mut(&mut self) -> &mut Vec<AttendanceSubject> {
        self.attendance.get_or_insert_with(Vec::new)
    }

    /// All subjects across all semesters, in semester then subject order.
    pub fn all_subjects(&self) -> impl Iterator<Item = &Subject> {
        self.semesters
            .iter()
            .flat_map(|semester| semester.subjects.iter())
    }
}
