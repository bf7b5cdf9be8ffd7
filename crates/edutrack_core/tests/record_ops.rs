mod common;

use common::{FailingScoring, WeightedScoring};
use edutrack_core::{
    AttendanceSubject, DocumentStore, GoalOutcome, KvBackend, MemoryKvBackend, Semester,
    StudentRecord, StudentUpdate, Subject, TrackerError, TrackerService, DOCUMENT_KEY,
};
use serde_json::json;

fn semester(name: &str, subjects: &[(f64, f64)]) -> Semester {
    Semester::new(
        name,
        subjects
            .iter()
            .enumerate()
            .map(|(i, (credits, gp))| Subject::new(format!("{name}-{i}"), *credits, *gp))
            .collect(),
    )
}

fn raw_document(store: &DocumentStore<MemoryKvBackend>) -> String {
    store.backend().read(DOCUMENT_KEY).unwrap().unwrap()
}

#[test]
fn save_data_syncs_profile_name() {
    let store = DocumentStore::new(MemoryKvBackend::new());
    let tracker = TrackerService::new(&store, WeightedScoring::default());

    let mut record = tracker.get_data().unwrap();
    record.student.name = "New".to_string();
    tracker.save_data(record).unwrap();

    let active = tracker.get_active_profile().unwrap();
    assert_eq!(active.name, "New");
    assert_eq!(tracker.list_profiles().unwrap()[0].name, "New");
}

#[test]
fn update_student_merges_fields_and_keeps_cgpa() {
    let store = DocumentStore::new(MemoryKvBackend::new());
    let tracker = TrackerService::new(&store, WeightedScoring::default());
    tracker
        .add_semester(semester("S1", &[(4.0, 8.0)]))
        .unwrap();

    let student = tracker
        .update_student(StudentUpdate {
            name: Some("Ann".to_string()),
            roll_no: Some("R-1".to_string()),
            ..StudentUpdate::default()
        })
        .unwrap();

    assert_eq!(student.name, "Ann");
    assert_eq!(student.roll_no, "R-1");
    assert_eq!(student.major, "");
    assert_eq!(student.cgpa, 8.0);
    assert_eq!(tracker.get_active_profile().unwrap().name, "Ann");
}

#[test]
fn add_semester_computes_sgpa_and_cgpa() {
    let store = DocumentStore::new(MemoryKvBackend::new());
    let tracker = TrackerService::new(&store, WeightedScoring::default());

    let record = tracker
        .add_semester(semester("S1", &[(4.0, 9.0), (2.0, 6.0)]))
        .unwrap();
    assert_eq!(record.semesters[0].sgpa, 8.0);
    assert_eq!(record.student.cgpa, 8.0);

    let record = tracker
        .add_semester(semester("S2", &[(2.0, 10.0)]))
        .unwrap();
    assert_eq!(record.semesters[1].sgpa, 10.0);
    // (36 + 12 + 20) / 8
    assert_eq!(record.student.cgpa, 8.5);
    assert_eq!(tracker.get_data().unwrap(), record);
}

#[test]
fn delete_semester_recomputes_cgpa_from_remaining() {
    let store = DocumentStore::new(MemoryKvBackend::new());
    let scoring = WeightedScoring::default();
    let tracker = TrackerService::new(&store, &scoring);

    tracker
        .add_semester(semester("S1", &[(4.0, 7.0)]))
        .unwrap();
    let with_two = tracker
        .add_semester(semester("S2", &[(4.0, 9.0)]))
        .unwrap();
    assert_eq!(with_two.student.cgpa, 8.0);
    let calls_before = scoring.gpa_calls.get();

    let record = tracker.delete_semester(1).unwrap();
    assert_eq!(record.semesters.len(), 1);
    assert_eq!(record.student.cgpa, 7.0);
    assert_eq!(scoring.gpa_calls.get(), calls_before + 1);
}

#[test]
fn update_semester_replaces_in_place() {
    let store = DocumentStore::new(MemoryKvBackend::new());
    let tracker = TrackerService::new(&store, WeightedScoring::default());
    tracker.add_semester(semester("S1", &[(3.0, 6.0)])).unwrap();
    tracker.add_semester(semester("S2", &[(3.0, 8.0)])).unwrap();

    let record = tracker
        .update_semester(0, semester("S1-fixed", &[(3.0, 10.0)]))
        .unwrap();

    let names: Vec<&str> = record.semesters.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["S1-fixed", "S2"]);
    assert_eq!(record.semesters[0].sgpa, 10.0);
    assert_eq!(record.student.cgpa, 9.0);
    assert_eq!(tracker.get_semester(0).unwrap().name, "S1-fixed");
}

#[test]
fn out_of_range_index_is_rejected_without_writing() {
    let store = DocumentStore::new(MemoryKvBackend::new());
    let scoring = WeightedScoring::default();
    let tracker = TrackerService::new(&store, &scoring);
    tracker.add_semester(semester("S1", &[(3.0, 6.0)])).unwrap();
    let before = raw_document(&store);
    let calls_before = scoring.gpa_calls.get();

    let err = tracker
        .update_semester(5, semester("S9", &[(1.0, 1.0)]))
        .unwrap_err();
    assert!(matches!(
        err,
        TrackerError::IndexOutOfRange {
            collection: "semester",
            index: 5,
            len: 1
        }
    ));
    assert!(tracker.delete_semester(1).is_err());
    assert!(tracker.get_semester(1).is_err());
    assert!(tracker.delete_attendance_subject(0).is_err());
    assert!(tracker.mark_attendance(0, true).is_err());

    assert_eq!(raw_document(&store), before);
    assert_eq!(scoring.gpa_calls.get(), calls_before);
}

#[test]
fn scoring_faults_fall_back_to_zero_gpa() {
    let store = DocumentStore::new(MemoryKvBackend::new());
    let tracker = TrackerService::new(&store, FailingScoring);

    let record = tracker
        .add_semester(semester("S1", &[(4.0, 9.0)]))
        .unwrap();

    assert_eq!(record.semesters[0].sgpa, 0.0);
    assert_eq!(record.student.cgpa, 0.0);
    assert_eq!(tracker.get_data().unwrap().semesters.len(), 1);
}

#[test]
fn attendance_crud_and_marking() {
    let store = DocumentStore::new(MemoryKvBackend::new());
    let tracker = TrackerService::new(&store, WeightedScoring::default());

    tracker
        .add_attendance_subject(AttendanceSubject::new("Networks", 40, 10, 9))
        .unwrap();
    let list = tracker
        .add_attendance_subject(AttendanceSubject::new("Compilers", 30, 0, 0))
        .unwrap();
    assert_eq!(list.len(), 2);

    tracker.mark_attendance(0, true).unwrap();
    let list = tracker.mark_attendance(0, false).unwrap();
    assert_eq!(list[0], AttendanceSubject::new("Networks", 40, 12, 10));

    let list = tracker
        .update_attendance_subject(1, AttendanceSubject::new("Compilers", 32, 2, 2))
        .unwrap();
    assert_eq!(list[1].total_course, 32);

    let list = tracker.delete_attendance_subject(0).unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].name, "Compilers");
    assert_eq!(tracker.get_data().unwrap().attendance(), &list[..]);
}

#[test]
fn missing_attendance_is_healed_and_persisted_on_read() {
    let doc = json!({
        "activeProfileId": "p1",
        "profiles": [{
            "id": "p1",
            "name": "Old",
            "data": {"student": {"name": "Old", "rollNo": "", "major": "", "cgpa": 0}, "semesters": []}
        }]
    });
    let store = DocumentStore::new(MemoryKvBackend::with_entry(
        DOCUMENT_KEY,
        doc.to_string(),
    ));
    let tracker = TrackerService::new(&store, WeightedScoring::default());

    let record = tracker.get_data().unwrap();
    assert_eq!(record.attendance, Some(Vec::new()));

    let stored: serde_json::Value = serde_json::from_str(&raw_document(&store)).unwrap();
    assert_eq!(stored["profiles"][0]["data"]["attendance"], json!([]));
}

#[test]
fn attendance_status_uses_stored_counters() {
    let store = DocumentStore::new(MemoryKvBackend::new());
    let scoring = WeightedScoring::default();
    let tracker = TrackerService::new(&store, &scoring);
    tracker
        .add_attendance_subject(AttendanceSubject::new("Networks", 40, 20, 18))
        .unwrap();

    let status = tracker.attendance_status(0, None).unwrap();
    assert_eq!(status.percentage, "90.00");
    assert_eq!(status.status, "safe");

    let sent = scoring.last_attendance.borrow().clone().unwrap();
    assert_eq!(sent.total, 40);
    assert_eq!(sent.target, 85.0);
}

#[test]
fn attendance_and_eligibility_fall_back_on_faults() {
    let store = DocumentStore::new(MemoryKvBackend::new());
    let tracker = TrackerService::new(&store, FailingScoring);
    tracker
        .add_attendance_subject(AttendanceSubject::new("Networks", 40, 20, 18))
        .unwrap();
    tracker
        .add_semester(Semester::new(
            "S1",
            vec![Subject::new("Maths", 4.0, 9.0).with_cie(Some(15.0), Some(14.0), Some(12.0))],
        ))
        .unwrap();

    let status = tracker.attendance_status(0, Some(75.0)).unwrap();
    assert_eq!(status.percentage, "0.00");
    assert_eq!(status.status, "normal");

    let eligibility = tracker.cie_eligibility(0, 0, None).unwrap();
    assert_eq!(eligibility.eligible, Some(false));
    assert_eq!(eligibility.message, "Backend Error");
}

#[test]
fn cie_eligibility_sends_subject_scores() {
    let store = DocumentStore::new(MemoryKvBackend::new());
    let scoring = WeightedScoring::default();
    let tracker = TrackerService::new(&store, &scoring);
    tracker
        .add_semester(Semester::new(
            "S1",
            vec![
                Subject::new("Maths", 4.0, 9.0).with_cie(Some(15.0), Some(14.0), Some(13.0)),
                Subject::new("Physics", 3.0, 8.0).with_cie(Some(10.0), None, None),
            ],
        ))
        .unwrap();

    let eligible = tracker.cie_eligibility(0, 0, None).unwrap();
    assert_eq!(eligible.eligible, Some(true));

    let pending = tracker.cie_eligibility(0, 1, Some(12.0)).unwrap();
    assert_eq!(pending.eligible, None);
    let sent = scoring.last_eligibility.borrow().clone().unwrap();
    assert_eq!(sent.cie1, Some(10.0));
    assert_eq!(sent.target_avg, 12.0);

    assert!(matches!(
        tracker.cie_eligibility(0, 2, None).unwrap_err(),
        TrackerError::IndexOutOfRange {
            collection: "subject",
            ..
        }
    ));
}

#[test]
fn plan_target_uses_stored_cgpa() {
    let store = DocumentStore::new(MemoryKvBackend::new());
    let tracker = TrackerService::new(&store, WeightedScoring::default());
    tracker.add_semester(semester("S1", &[(4.0, 8.0)])).unwrap();
    tracker.add_semester(semester("S2", &[(4.0, 8.0)])).unwrap();

    assert_eq!(
        tracker.plan_target_cgpa(8.5, 2).unwrap(),
        GoalOutcome::Required(9.0)
    );
    assert!(matches!(
        tracker.plan_target_cgpa(8.5, 0).unwrap_err(),
        TrackerError::Planner(_)
    ));
}

#[test]
fn saved_record_round_trips() {
    let store = DocumentStore::new(MemoryKvBackend::new());
    let tracker = TrackerService::new(&store, WeightedScoring::default());

    let mut record = StudentRecord::default();
    record.student.name = "Round".to_string();
    record.semesters.push(semester("S1", &[(3.0, 7.0)]));
    tracker.save_data(record.clone()).unwrap();

    assert_eq!(tracker.get_data().unwrap(), record);
    let before = raw_document(&store);
    let doc = store.load().unwrap();
    store.save(&doc).unwrap();
    assert_eq!(raw_document(&store), before);
}
