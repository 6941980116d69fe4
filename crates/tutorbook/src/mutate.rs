//! Pure collection mutators.
//!
//! Each function takes the current [`AppState`] by reference and returns a
//! new one; the input is never modified. Unknown ids are silent no-ops: the
//! returned state equals the input. Persisting the result is the caller's job
//! (see [`crate::store::Store`]).
//!
//! Ordering invariants:
//! - students are re-sorted by name after an insert, but not after an update
//!   (a rename leaves the list where it was until the next insert);
//! - a student's records are re-sorted newest first after every record insert
//!   or update.

use crate::model::record::sort_records;
use crate::model::student::sort_students;
use crate::model::{
    AppState, Record, RecordDraft, RecordId, RecordPatch, SettingsPatch, Student, StudentDraft,
    StudentId, StudentPatch,
};

/// Replacement data accepted by [`import_data`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportPayload {
    /// Students replacing the current collection.
    pub students: Vec<Student>,
    /// Settings merged over the current ones, when present.
    pub settings: Option<SettingsPatch>,
}

/// Insert a new student with a fresh id and no records.
#[must_use]
pub fn add_student(state: &AppState, draft: StudentDraft) -> (AppState, Student) {
    let student = Student {
        id: StudentId::generate(),
        name: draft.name,
        school: draft.school,
        subjects: draft.subjects,
        records: Vec::new(),
    };

    let mut next = state.clone();
    next.students.push(student.clone());
    sort_students(&mut next.students);
    (next, student)
}

/// Merge `patch` into the matching student.
#[must_use]
pub fn update_student(state: &AppState, id: &str, patch: &StudentPatch) -> AppState {
    let mut next = state.clone();
    if let Some(student) = next.students.iter_mut().find(|s| s.id.as_str() == id) {
        patch.apply(student);
    }
    next
}

/// Remove the matching student together with all of its records.
#[must_use]
pub fn delete_student(state: &AppState, id: &str) -> AppState {
    let mut next = state.clone();
    next.students.retain(|s| s.id.as_str() != id);
    next
}

/// Prepend a new record to the student's records and re-sort them.
///
/// Returns `None` for the record when no student has `student_id`.
#[must_use]
pub fn add_record(
    state: &AppState,
    student_id: &str,
    draft: RecordDraft,
) -> (AppState, Option<Record>) {
    let mut next = state.clone();
    let Some(student) = next
        .students
        .iter_mut()
        .find(|s| s.id.as_str() == student_id)
    else {
        return (next, None);
    };

    let record = draft.into_record(RecordId::generate());
    student.records.insert(0, record.clone());
    sort_records(&mut student.records);
    (next, Some(record))
}

/// Merge `patch` into the matching record and re-sort the student's records.
#[must_use]
pub fn update_record(
    state: &AppState,
    student_id: &str,
    record_id: &str,
    patch: &RecordPatch,
) -> AppState {
    let mut next = state.clone();
    if let Some(student) = next
        .students
        .iter_mut()
        .find(|s| s.id.as_str() == student_id)
    {
        if let Some(record) = student
            .records
            .iter_mut()
            .find(|r| r.id.as_str() == record_id)
        {
            patch.apply(record);
        }
        sort_records(&mut student.records);
    }
    next
}

/// Remove the matching record.
#[must_use]
pub fn delete_record(state: &AppState, student_id: &str, record_id: &str) -> AppState {
    let mut next = state.clone();
    if let Some(student) = next
        .students
        .iter_mut()
        .find(|s| s.id.as_str() == student_id)
    {
        student.records.retain(|r| r.id.as_str() != record_id);
    }
    next
}

/// Merge `patch` into the settings.
#[must_use]
pub fn update_settings(state: &AppState, patch: &SettingsPatch) -> AppState {
    let mut next = state.clone();
    patch.apply(&mut next.settings);
    next
}

/// Replace all students and merge imported settings.
///
/// The payload is trusted; shape checks happen in
/// [`crate::backup::parse_import`].
#[must_use]
pub fn import_data(state: &AppState, payload: ImportPayload) -> AppState {
    let mut next = state.clone();
    next.students = payload.students;
    if let Some(settings) = &payload.settings {
        settings.apply(&mut next.settings);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HomeworkStatus;

    fn state_with(names: &[&str]) -> AppState {
        names.iter().fold(AppState::default(), |state, name| {
            add_student(&state, StudentDraft::named(*name)).0
        })
    }

    fn names(state: &AppState) -> Vec<&str> {
        state.students.iter().map(|s| s.name.as_str()).collect()
    }

    fn dates(student: &Student) -> Vec<&str> {
        student.records.iter().map(|r| r.date.as_str()).collect()
    }

    #[test]
    fn test_add_student_keeps_name_order() {
        let state = state_with(&["Chen", "amy", "Bao"]);
        assert_eq!(names(&state), vec!["amy", "Bao", "Chen"]);
    }

    #[test]
    fn test_add_student_returns_created() {
        let (state, created) = add_student(&AppState::default(), StudentDraft {
            name: "林".to_string(),
            school: "中山".to_string(),
            subjects: vec!["數學".to_string()],
        });
        assert!(created.records.is_empty());
        assert_eq!(state.student(created.id.as_str()), Some(&created));
    }

    #[test]
    fn test_add_student_does_not_touch_input() {
        let before = state_with(&["A"]);
        let snapshot = before.clone();
        let _ = add_student(&before, StudentDraft::named("B"));
        assert_eq!(before, snapshot);
    }

    #[test]
    fn test_update_student_rename_does_not_resort() {
        let state = state_with(&["Alice", "Bob"]);
        let alice = state.students[0].id.clone();
        let patch = StudentPatch {
            name: Some("Zoe".to_string()),
            ..StudentPatch::default()
        };
        let state = update_student(&state, alice.as_str(), &patch);
        assert_eq!(names(&state), vec!["Zoe", "Bob"]);

        // The next insert restores the order.
        let (state, _) = add_student(&state, StudentDraft::named("Carl"));
        assert_eq!(names(&state), vec!["Bob", "Carl", "Zoe"]);
    }

    #[test]
    fn test_update_student_unknown_id_is_noop() {
        let state = state_with(&["A"]);
        let patch = StudentPatch {
            name: Some("B".to_string()),
            ..StudentPatch::default()
        };
        assert_eq!(update_student(&state, "missing", &patch), state);
    }

    #[test]
    fn test_delete_student_removes_only_that_student() {
        let state = state_with(&["A", "B", "C"]);
        let b = state.students[1].id.clone();
        let (state, _) = add_record(&state, b.as_str(), RecordDraft::on("2024-03-01"));

        let next = delete_student(&state, b.as_str());
        assert_eq!(names(&next), vec!["A", "C"]);
        assert!(next.student(b.as_str()).is_none());
        assert_eq!(next.record_count(), 0);
    }

    #[test]
    fn test_delete_student_unknown_id_is_noop() {
        let state = state_with(&["A"]);
        assert_eq!(delete_student(&state, "missing"), state);
    }

    #[test]
    fn test_add_record_keeps_newest_first() {
        let state = state_with(&["A"]);
        let id = state.students[0].id.clone();

        let (state, _) = add_record(&state, id.as_str(), RecordDraft::on("2024-03-05"));
        let (state, _) = add_record(&state, id.as_str(), RecordDraft::on("2024-03-10"));
        let (state, _) = add_record(&state, id.as_str(), RecordDraft::on("2024-03-01"));

        let student = state.student(id.as_str()).unwrap();
        assert_eq!(dates(student), vec!["2024-03-10", "2024-03-05", "2024-03-01"]);
    }

    #[test]
    fn test_add_record_same_date_new_one_first() {
        let state = state_with(&["A"]);
        let id = state.students[0].id.clone();

        let (state, first) = add_record(&state, id.as_str(), RecordDraft::on("2024-03-05"));
        let (state, second) = add_record(&state, id.as_str(), RecordDraft::on("2024-03-05"));

        let student = state.student(id.as_str()).unwrap();
        assert_eq!(student.records[0].id, second.unwrap().id);
        assert_eq!(student.records[1].id, first.unwrap().id);
    }

    #[test]
    fn test_add_record_unknown_student() {
        let state = state_with(&["A"]);
        let (next, record) = add_record(&state, "missing", RecordDraft::on("2024-03-05"));
        assert!(record.is_none());
        assert_eq!(next, state);
    }

    #[test]
    fn test_update_record_resorts() {
        let state = state_with(&["A"]);
        let id = state.students[0].id.clone();
        let (state, _) = add_record(&state, id.as_str(), RecordDraft::on("2024-03-05"));
        let (state, old) = add_record(&state, id.as_str(), RecordDraft::on("2024-03-01"));
        let old = old.unwrap();

        let patch = RecordPatch {
            date: Some("2024-03-20".to_string()),
            homework_status: Some(Some(HomeworkStatus::Completed)),
            ..RecordPatch::default()
        };
        let state = update_record(&state, id.as_str(), old.id.as_str(), &patch);

        let student = state.student(id.as_str()).unwrap();
        assert_eq!(dates(student), vec!["2024-03-20", "2024-03-05"]);
        assert_eq!(
            student.records[0].homework_status,
            Some(HomeworkStatus::Completed)
        );
    }

    #[test]
    fn test_update_record_unknown_ids_are_noops() {
        let state = state_with(&["A"]);
        let id = state.students[0].id.clone();
        let (state, _) = add_record(&state, id.as_str(), RecordDraft::on("2024-03-05"));
        let patch = RecordPatch {
            progress: Some("x".to_string()),
            ..RecordPatch::default()
        };

        assert_eq!(update_record(&state, id.as_str(), "missing", &patch), state);
        assert_eq!(update_record(&state, "missing", "missing", &patch), state);
    }

    #[test]
    fn test_delete_record() {
        let state = state_with(&["A"]);
        let id = state.students[0].id.clone();
        let (state, keep) = add_record(&state, id.as_str(), RecordDraft::on("2024-03-05"));
        let (state, drop) = add_record(&state, id.as_str(), RecordDraft::on("2024-03-06"));

        let state = delete_record(&state, id.as_str(), drop.unwrap().id.as_str());
        let student = state.student(id.as_str()).unwrap();
        assert_eq!(student.records.len(), 1);
        assert_eq!(student.records[0].id, keep.unwrap().id);
    }

    #[test]
    fn test_update_settings_merges() {
        let state = AppState::default();
        let patch = SettingsPatch {
            teacher_name: Some("王老師".to_string()),
            ..SettingsPatch::default()
        };
        let next = update_settings(&state, &patch);
        assert_eq!(next.settings.teacher_name.as_deref(), Some("王老師"));
        assert_eq!(next.settings.academy_name, state.settings.academy_name);
    }

    #[test]
    fn test_import_replaces_students_and_merges_settings() {
        let state = state_with(&["Old"]);
        let incoming = state_with(&["New1", "New2"]);
        let payload = ImportPayload {
            students: incoming.students.clone(),
            settings: Some(SettingsPatch {
                academy_name: Some("新名字".to_string()),
                ..SettingsPatch::default()
            }),
        };

        let next = import_data(&state, payload);
        assert_eq!(next.students, incoming.students);
        assert_eq!(next.settings.academy_name, "新名字");
    }

    #[test]
    fn test_import_without_settings_keeps_settings() {
        let mut state = state_with(&["Old"]);
        state.settings.teacher_name = Some("T".to_string());

        let next = import_data(&state, ImportPayload::default());
        assert!(next.students.is_empty());
        assert_eq!(next.settings, state.settings);
    }
}
