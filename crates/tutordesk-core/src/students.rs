//! Student profile records and their persistent store.
//!
//! Records live as JSON documents in an embedded sled tree keyed by a
//! store-generated id. Plain id-to-record CRUD with no indexes or relations;
//! invoice generation references students loosely by id and display name
//! with no foreign-key enforcement.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{Result, TutordeskError};

const STUDENTS_TREE: &str = "students";

/// A stored student profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": "6f1c1df2-9c39-4df1-a86f-3a1f4a2f9b11",
    "name": "Alice Tan",
    "education_level": "Secondary 3",
    "subjects": ["Mathematics", "Physics"],
    "lesson_days": {"Monday": 1, "Thursday": 2},
    "rate_per_lesson": 50.0
}))]
pub struct StudentRecord {
    /// Store-generated identifier.
    pub id: String,

    /// Display name; also used as the invoice file name stem.
    pub name: String,

    /// Education level, e.g. "Secondary 3".
    pub education_level: String,

    /// Subjects taught, in enrollment order.
    pub subjects: Vec<String>,

    /// Lessons per week keyed by weekday name.
    pub lesson_days: BTreeMap<String, u32>,

    /// Rate charged per lesson.
    pub rate_per_lesson: f64,
}

/// The id-less payload for creating or updating a student.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "name": "Alice Tan",
    "education_level": "Secondary 3",
    "subjects": ["Mathematics", "Physics"],
    "lesson_days": {"Monday": 1, "Thursday": 2},
    "rate_per_lesson": 50.0
}))]
pub struct StudentInput {
    /// Display name.
    pub name: String,

    /// Education level.
    pub education_level: String,

    /// Subjects taught.
    #[serde(default)]
    pub subjects: Vec<String>,

    /// Lessons per week keyed by weekday name.
    #[serde(default)]
    pub lesson_days: BTreeMap<String, u32>,

    /// Rate charged per lesson.
    pub rate_per_lesson: f64,
}

/// CRUD store for student records.
#[derive(Debug, Clone)]
pub struct StudentStore {
    tree: sled::Tree,
}

impl StudentStore {
    /// Open (or create) the store at the given path.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the database cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = sled::open(path)?;
        let tree = db.open_tree(STUDENTS_TREE)?;
        Ok(Self { tree })
    }

    /// List every stored student.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the store cannot be read or a document
    /// fails to decode.
    pub fn list_all(&self) -> Result<Vec<StudentRecord>> {
        let mut records = Vec::new();
        for entry in self.tree.iter() {
            let (_, value) = entry?;
            records.push(serde_json::from_slice(&value)?);
        }
        Ok(records)
    }

    /// Create a new student, generating its id.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the write fails.
    pub fn create(&self, input: StudentInput) -> Result<StudentRecord> {
        let record = StudentRecord {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            education_level: input.education_level,
            subjects: input.subjects,
            lesson_days: input.lesson_days,
            rate_per_lesson: input.rate_per_lesson,
        };
        self.put(&record)?;
        Ok(record)
    }

    /// Fetch a student by id.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the store cannot be read.
    pub fn get(&self, id: &str) -> Result<Option<StudentRecord>> {
        match self.tree.get(id.as_bytes())? {
            Some(value) => Ok(Some(serde_json::from_slice(&value)?)),
            None => Ok(None),
        }
    }

    /// Replace an existing student's profile.
    ///
    /// # Errors
    ///
    /// Returns [`TutordeskError::NotFound`] if no student has this id, and a
    /// persistence error if the write fails.
    pub fn update(&self, id: &str, input: StudentInput) -> Result<StudentRecord> {
        if self.tree.get(id.as_bytes())?.is_none() {
            return Err(TutordeskError::NotFound(format!("student {id}")));
        }
        let record = StudentRecord {
            id: id.to_string(),
            name: input.name,
            education_level: input.education_level,
            subjects: input.subjects,
            lesson_days: input.lesson_days,
            rate_per_lesson: input.rate_per_lesson,
        };
        self.put(&record)?;
        Ok(record)
    }

    /// Delete a student by id. Returns `false` if no such student existed.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the removal fails.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let removed = self.tree.remove(id.as_bytes())?.is_some();
        if removed {
            self.tree.flush()?;
        }
        Ok(removed)
    }

    fn put(&self, record: &StudentRecord) -> Result<()> {
        let bytes = serde_json::to_vec(record)?;
        self.tree.insert(record.id.as_bytes(), bytes)?;
        self.tree.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_input(name: &str) -> StudentInput {
        StudentInput {
            name: name.to_string(),
            education_level: "Secondary 3".to_string(),
            subjects: vec!["Mathematics".to_string(), "Physics".to_string()],
            lesson_days: BTreeMap::from([("Thursday".to_string(), 1)]),
            rate_per_lesson: 50.0,
        }
    }

    #[test]
    fn test_create_assigns_unique_ids() {
        let temp = TempDir::new().unwrap();
        let store = StudentStore::open(temp.path().join("db")).unwrap();

        let a = store.create(sample_input("Alice Tan")).unwrap();
        let b = store.create(sample_input("Bob Lee")).unwrap();

        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_create_then_get_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = StudentStore::open(temp.path().join("db")).unwrap();

        let created = store.create(sample_input("Alice Tan")).unwrap();
        let fetched = store.get(&created.id).unwrap().unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.lesson_days.get("Thursday"), Some(&1));
    }

    #[test]
    fn test_get_missing_is_none() {
        let temp = TempDir::new().unwrap();
        let store = StudentStore::open(temp.path().join("db")).unwrap();
        assert!(store.get("no-such-id").unwrap().is_none());
    }

    #[test]
    fn test_list_all() {
        let temp = TempDir::new().unwrap();
        let store = StudentStore::open(temp.path().join("db")).unwrap();

        store.create(sample_input("Alice Tan")).unwrap();
        store.create(sample_input("Bob Lee")).unwrap();

        assert_eq!(store.list_all().unwrap().len(), 2);
    }

    #[test]
    fn test_update_replaces_profile() {
        let temp = TempDir::new().unwrap();
        let store = StudentStore::open(temp.path().join("db")).unwrap();

        let created = store.create(sample_input("Alice Tan")).unwrap();
        let mut input = sample_input("Alice Tan");
        input.rate_per_lesson = 65.0;

        let updated = store.update(&created.id, input).unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.rate_per_lesson, 65.0);
        assert_eq!(
            store.get(&created.id).unwrap().unwrap().rate_per_lesson,
            65.0
        );
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let temp = TempDir::new().unwrap();
        let store = StudentStore::open(temp.path().join("db")).unwrap();
        let result = store.update("no-such-id", sample_input("Ghost"));
        assert!(matches!(result, Err(TutordeskError::NotFound(_))));
    }

    #[test]
    fn test_delete_semantics() {
        let temp = TempDir::new().unwrap();
        let store = StudentStore::open(temp.path().join("db")).unwrap();

        let created = store.create(sample_input("Alice Tan")).unwrap();
        assert!(store.delete(&created.id).unwrap());
        assert!(store.get(&created.id).unwrap().is_none());
        assert!(!store.delete(&created.id).unwrap());
    }

    #[test]
    fn test_records_survive_reopen() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("db");

        let id = {
            let store = StudentStore::open(&path).unwrap();
            store.create(sample_input("Alice Tan")).unwrap().id
        };

        let store = StudentStore::open(&path).unwrap();
        assert_eq!(store.get(&id).unwrap().unwrap().name, "Alice Tan");
    }
}
