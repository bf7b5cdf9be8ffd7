//! Active-profile data operations of [`TrackerService`].
//!
//! # Responsibility
//! - Read and write the active profile's `StudentRecord`.
//! - Recompute SGPA/CGPA through the scoring collaborator after semester
//!   changes.
//! - Maintain attendance counters.
//!
//! # Invariants
//! - Every mutation is read-modify-write of the whole document.
//! - Index checks run before any scoring call or write; a rejected index
//!   leaves storage untouched.
//! - Saving a record renames the profile after `record.student.name`.

use crate::model::document::Document;
use crate::model::record::{AttendanceSubject, Semester, Student, StudentRecord, StudentUpdate};
use crate::repo::kv_backend::KvBackend;
use crate::scoring::{
    self, AttendanceRequest, AttendanceStatus, Eligibility, EligibilityRequest, ScoringService,
};
use crate::service::planner::{plan_target_cgpa, GoalOutcome};
use crate::service::tracker_service::{
    active_profile, TrackerError, TrackerResult, TrackerService,
};
use log::info;

const SEMESTERS: &str = "semester";
const SUBJECTS: &str = "subject";
const ATTENDANCE: &str = "attendance";

impl<B: KvBackend, S: ScoringService> TrackerService<'_, B, S> {
    /// Returns the active profile's record.
    ///
    /// Records written before attendance tracking existed get an empty
    /// attendance list, persisted immediately.
    pub fn get_data(&self) -> TrackerResult<StudentRecord> {
        let (_, record) = self.load_active()?;
        Ok(record)
    }

    /// Replaces the active profile's record and renames the profile after
    /// `record.student.name`.
    pub fn save_data(&self, record: StudentRecord) -> TrackerResult<()> {
        let doc = self.load()?;
        self.commit(doc, record)
    }

    /// Merges `update` into the student block and returns the result.
    pub fn update_student(&self, update: StudentUpdate) -> TrackerResult<Student> {
        let (doc, mut record) = self.load_active()?;
        record.student = update.apply(record.student);
        let student = record.student.clone();
        self.commit(doc, record)?;
        Ok(student)
    }

    /// Appends `semester` with a freshly computed SGPA and refreshes CGPA.
    pub fn add_semester(&self, semester: Semester) -> TrackerResult<StudentRecord> {
        let (doc, mut record) = self.load_active()?;
        let semester = self.with_sgpa(semester);
        record.semesters.push(semester);
        self.refresh_cgpa(&mut record);
        self.commit(doc, record.clone())?;
        info!(
            "event=semester_add module=service status=ok semesters={}",
            record.semesters.len()
        );
        Ok(record)
    }

    /// Replaces the semester at `index`, recomputing SGPA and CGPA.
    pub fn update_semester(&self, index: usize, semester: Semester) -> TrackerResult<StudentRecord> {
        let (doc, mut record) = self.load_active()?;
        check_index(SEMESTERS, index, record.semesters.len())?;
        record.semesters[index] = self.with_sgpa(semester);
        self.refresh_cgpa(&mut record);
        self.commit(doc, record.clone())?;
        info!("event=semester_update module=service status=ok index={index}");
        Ok(record)
    }

    /// Removes the semester at `index` and recomputes CGPA from the rest.
    pub fn delete_semester(&self, index: usize) -> TrackerResult<StudentRecord> {
        let (doc, mut record) = self.load_active()?;
        check_index(SEMESTERS, index, record.semesters.len())?;
        record.semesters.remove(index);
        self.refresh_cgpa(&mut record);
        self.commit(doc, record.clone())?;
        info!(
            "event=semester_delete module=service status=ok index={index} semesters={}",
            record.semesters.len()
        );
        Ok(record)
    }

    pub fn get_semester(&self, index: usize) -> TrackerResult<Semester> {
        let (_, record) = self.load_active()?;
        check_index(SEMESTERS, index, record.semesters.len())?;
        Ok(record.semesters[index].clone())
    }

    pub fn add_attendance_subject(
        &self,
        subject: AttendanceSubject,
    ) -> TrackerResult<Vec<AttendanceSubject>> {
        self.edit_attendance(None, |attendance| {
            attendance.push(subject);
        })
    }

    pub fn update_attendance_subject(
        &self,
        index: usize,
        subject: AttendanceSubject,
    ) -> TrackerResult<Vec<AttendanceSubject>> {
        self.edit_attendance(Some(index), |attendance| {
            attendance[index] = subject;
        })
    }

    pub fn delete_attendance_subject(&self, index: usize) -> TrackerResult<Vec<AttendanceSubject>> {
        self.edit_attendance(Some(index), |attendance| {
            attendance.remove(index);
        })
    }

    /// Records one conducted class for the subject at `index`.
    pub fn mark_attendance(
        &self,
        index: usize,
        present: bool,
    ) -> TrackerResult<Vec<AttendanceSubject>> {
        self.edit_attendance(Some(index), |attendance| {
            attendance[index].record_class(present);
        })
    }

    /// Asks the collaborator for the attendance standing of one subject.
    ///
    /// `target` defaults to 85%. Collaborator faults yield
    /// [`AttendanceStatus::fallback`].
    pub fn attendance_status(
        &self,
        index: usize,
        target: Option<f64>,
    ) -> TrackerResult<AttendanceStatus> {
        let (_, record) = self.load_active()?;
        let attendance = record.attendance();
        check_index(ATTENDANCE, index, attendance.len())?;
        let request = AttendanceRequest::for_subject(&attendance[index], target);
        Ok(scoring::attendance_or_default(&self.scoring, &request))
    }

    /// Asks the collaborator whether one subject's CIE scores qualify.
    ///
    /// `target_avg` defaults to 13. Collaborator faults yield
    /// [`Eligibility::fallback`].
    pub fn cie_eligibility(
        &self,
        semester_index: usize,
        subject_index: usize,
        target_avg: Option<f64>,
    ) -> TrackerResult<Eligibility> {
        let semester = self.get_semester(semester_index)?;
        check_index(SUBJECTS, subject_index, semester.subjects.len())?;
        let request = EligibilityRequest::for_subject(&semester.subjects[subject_index], target_avg);
        Ok(scoring::eligibility_or_default(&self.scoring, &request))
    }

    /// Plans the average GPA needed to reach `target` from the stored CGPA.
    pub fn plan_target_cgpa(&self, target: f64, remaining: u32) -> TrackerResult<GoalOutcome> {
        let (_, record) = self.load_active()?;
        Ok(plan_target_cgpa(
            record.student.cgpa,
            record.semesters.len(),
            target,
            remaining,
        )?)
    }

    fn load_active(&self) -> TrackerResult<(Document, StudentRecord)> {
        let doc = self.load()?;
        let mut record = active_profile(&doc)?.data.clone();
        if record.attendance.is_none() {
            record.attendance = Some(Vec::new());
            self.commit(doc.clone(), record.clone())?;
            info!("event=record_heal module=service status=ok field=attendance");
        }
        Ok((doc, record))
    }

    fn commit(&self, doc: Document, record: StudentRecord) -> TrackerResult<()> {
        let active_id = doc.active_profile_id().to_string();
        let next = doc
            .with_active_data(record)
            .ok_or(TrackerError::ActiveProfileMissing(active_id))?;
        self.persist(&next)
    }

    fn edit_attendance(
        &self,
        index: Option<usize>,
        edit: impl FnOnce(&mut Vec<AttendanceSubject>),
    ) -> TrackerResult<Vec<AttendanceSubject>> {
        let (doc, mut record) = self.load_active()?;
        if let Some(index) = index {
            check_index(ATTENDANCE, index, record.attendance().len())?;
        }
        edit(record.attendance_mut());
        let attendance = record.attendance().to_vec();
        self.commit(doc, record)?;
        Ok(attendance)
    }

    fn with_sgpa(&self, mut semester: Semester) -> Semester {
        semester.sgpa = scoring::sgpa(&self.scoring, &semester.subjects);
        semester
    }

    fn refresh_cgpa(&self, record: &mut StudentRecord) {
        record.student.cgpa = scoring::cgpa(&self.scoring, &record.semesters);
    }
}

fn check_index(collection: &'static str, index: usize, len: usize) -> TrackerResult<()> {
    if index < len {
        Ok(())
    } else {
        Err(TrackerError::IndexOutOfRange {
            collection,
            index,
            len,
        })
    }
}
