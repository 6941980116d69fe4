//! Store service owning the record book.
//!
//! A [`Store`] holds the current [`AppState`] and the [`Storage`] it came
//! from. Every change goes through a pure function of [`crate::mutate`],
//! the result replaces the held state and is saved right away.
//!
//! Input is validated before the mutator runs. Unknown ids are reported as
//! [`Error::StudentNotFound`] / [`Error::RecordNotFound`] here so callers can
//! tell the user; nothing is saved in that case.

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::{
    AppState, Record, RecordDraft, RecordPatch, Settings, SettingsPatch, Student, StudentDraft,
    StudentPatch,
};
use crate::mutate::{self, ImportPayload};
use crate::storage::Storage;

/// The record book and its persistent slot.
#[derive(Debug)]
pub struct Store {
    storage: Storage,
    state: AppState,
}

impl Store {
    /// Load the record book from `storage`.
    #[must_use]
    pub fn open(storage: Storage) -> Self {
        let state = storage.load();
        Self { storage, state }
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// All students, in list order.
    #[must_use]
    pub fn students(&self) -> &[Student] {
        &self.state.students
    }

    /// The academy settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.state.settings
    }

    /// Find a student by id.
    #[must_use]
    pub fn student(&self, id: &str) -> Option<&Student> {
        self.state.student(id)
    }

    /// The storage backing this store.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    fn commit(&mut self, next: AppState) {
        self.state = next;
        self.storage.save(&self.state);
    }

    fn require_student(&self, id: &str) -> Result<&Student> {
        self.state
            .student(id)
            .ok_or_else(|| Error::StudentNotFound(id.to_string()))
    }

    fn require_record(&self, student_id: &str, record_id: &str) -> Result<()> {
        self.require_student(student_id)?
            .record(record_id)
            .map(|_| ())
            .ok_or_else(|| Error::RecordNotFound(record_id.to_string()))
    }

    /// Add a student.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the name is blank.
    pub fn add_student(&mut self, draft: StudentDraft) -> Result<Student> {
        draft.validate()?;
        let (next, student) = mutate::add_student(&self.state, draft);
        self.commit(next);
        info!(id = %student.id, name = %student.name, "Student added");
        Ok(student)
    }

    /// Update a student's fields.
    ///
    /// # Errors
    ///
    /// Returns an error for a blank new name or an unknown student.
    pub fn update_student(&mut self, id: &str, patch: &StudentPatch) -> Result<()> {
        patch.validate()?;
        self.require_student(id)?;
        let next = mutate::update_student(&self.state, id, patch);
        self.commit(next);
        info!(id, "Student updated");
        Ok(())
    }

    /// Delete a student and all of its records.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown student.
    pub fn delete_student(&mut self, id: &str) -> Result<Student> {
        let removed = self.require_student(id)?.clone();
        let next = mutate::delete_student(&self.state, id);
        self.commit(next);
        info!(id, records = removed.records.len(), "Student deleted");
        Ok(removed)
    }

    /// Add a record to a student.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed date or time or an unknown student.
    pub fn add_record(&mut self, student_id: &str, draft: RecordDraft) -> Result<Record> {
        draft.validate()?;
        let (next, record) = mutate::add_record(&self.state, student_id, draft);
        let record = record.ok_or_else(|| Error::StudentNotFound(student_id.to_string()))?;
        self.commit(next);
        info!(student = student_id, id = %record.id, date = %record.date, "Record added");
        Ok(record)
    }

    /// Update a record's fields.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed date or time or unknown ids.
    pub fn update_record(
        &mut self,
        student_id: &str,
        record_id: &str,
        patch: &RecordPatch,
    ) -> Result<()> {
        patch.validate()?;
        self.require_record(student_id, record_id)?;
        let next = mutate::update_record(&self.state, student_id, record_id, patch);
        self.commit(next);
        info!(student = student_id, id = record_id, "Record updated");
        Ok(())
    }

    /// Delete a record.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown ids.
    pub fn delete_record(&mut self, student_id: &str, record_id: &str) -> Result<()> {
        self.require_record(student_id, record_id)?;
        let next = mutate::delete_record(&self.state, student_id, record_id);
        self.commit(next);
        info!(student = student_id, id = record_id, "Record deleted");
        Ok(())
    }

    /// Update the academy settings.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the academy name is blank.
    pub fn update_settings(&mut self, patch: SettingsPatch) -> Result<()> {
        let patch = patch.normalized()?;
        if patch.is_empty() {
            debug!("Empty settings patch, nothing to save");
            return Ok(());
        }
        let next = mutate::update_settings(&self.state, &patch);
        self.commit(next);
        info!("Settings updated");
        Ok(())
    }

    /// Replace every student with the imported ones and merge any imported
    /// settings.
    pub fn import_data(&mut self, payload: ImportPayload) {
        let students = payload.students.len();
        let next = mutate::import_data(&self.state, payload);
        self.commit(next);
        info!(students, records = self.state.record_count(), "Data imported");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HomeworkStatus;

    fn create_test_store() -> Store {
        crate::logging::init_test_logging();
        Store::open(Storage::open_in_memory().expect("failed to create test storage"))
    }

    #[test]
    fn test_open_empty() {
        let store = create_test_store();
        assert!(store.students().is_empty());
        assert_eq!(store.settings(), &Settings::default());
    }

    #[test]
    fn test_add_student_persists() {
        let mut store = create_test_store();
        let student = store.add_student(StudentDraft::named("王小明")).unwrap();

        assert_eq!(store.student(student.id.as_str()), Some(&student));
        assert_eq!(store.storage().load(), *store.state());
    }

    #[test]
    fn test_add_student_rejects_blank_name() {
        let mut store = create_test_store();
        let err = store.add_student(StudentDraft::named("  ")).unwrap_err();
        assert!(matches!(err, Error::Validation { field: "name", .. }));
        assert!(store.students().is_empty());
    }

    #[test]
    fn test_update_unknown_student() {
        let mut store = create_test_store();
        let patch = StudentPatch {
            school: Some("x".to_string()),
            ..StudentPatch::default()
        };
        let err = store.update_student("missing", &patch).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_record_lifecycle() {
        let mut store = create_test_store();
        let student = store.add_student(StudentDraft::named("A")).unwrap();
        let sid = student.id.as_str();

        let record = store.add_record(sid, RecordDraft::on("2024-03-10")).unwrap();
        let rid = record.id.as_str();

        let patch = RecordPatch {
            homework_status: Some(Some(HomeworkStatus::Incomplete)),
            ..RecordPatch::default()
        };
        store.update_record(sid, rid, &patch).unwrap();
        assert_eq!(
            store.student(sid).unwrap().records[0].homework_status,
            Some(HomeworkStatus::Incomplete)
        );

        store.delete_record(sid, rid).unwrap();
        assert!(store.student(sid).unwrap().records.is_empty());
        assert!(store.delete_record(sid, rid).unwrap_err().is_not_found());
    }

    #[test]
    fn test_add_record_rejects_bad_date() {
        let mut store = create_test_store();
        let student = store.add_student(StudentDraft::named("A")).unwrap();
        assert!(store
            .add_record(student.id.as_str(), RecordDraft::on("March 10"))
            .is_err());
    }

    #[test]
    fn test_add_record_unknown_student() {
        let mut store = create_test_store();
        let err = store
            .add_record("missing", RecordDraft::on("2024-03-10"))
            .unwrap_err();
        assert!(matches!(err, Error::StudentNotFound(_)));
    }

    #[test]
    fn test_delete_student_returns_removed() {
        let mut store = create_test_store();
        let student = store.add_student(StudentDraft::named("A")).unwrap();
        let removed = store.delete_student(student.id.as_str()).unwrap();
        assert_eq!(removed.id, student.id);
        assert!(store.storage().load().students.is_empty());
    }

    #[test]
    fn test_update_settings() {
        let mut store = create_test_store();
        store
            .update_settings(SettingsPatch {
                academy_name: Some(" 明日補習班 ".to_string()),
                ..SettingsPatch::default()
            })
            .unwrap();
        assert_eq!(store.settings().academy_name, "明日補習班");

        let err = store
            .update_settings(SettingsPatch {
                academy_name: Some(String::new()),
                ..SettingsPatch::default()
            })
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert_eq!(store.storage().load().settings.academy_name, "明日補習班");
    }

    #[test]
    fn test_import_data_replaces_students() {
        let mut store = create_test_store();
        store.add_student(StudentDraft::named("Old")).unwrap();

        let (incoming, _) = mutate::add_student(&AppState::default(), StudentDraft::named("New"));
        store.import_data(ImportPayload {
            students: incoming.students.clone(),
            settings: None,
        });

        assert_eq!(store.students(), incoming.students.as_slice());
        assert_eq!(store.storage().load().students, incoming.students);
    }
}
