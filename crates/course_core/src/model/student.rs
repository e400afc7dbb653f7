//! Student domain model and read projection.
//!
//! # Invariants
//! - `email` is unique among active students (enforced by the service).
//! - `is_deleted` is the source of truth for tombstone state.

use crate::model::group::GroupId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Storage-assigned student identifier.
pub type StudentId = i64;

/// Canonical persisted student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub full_name: String,
    pub email: String,
    pub birth_date: NaiveDate,
    pub group_id: GroupId,
    /// Soft delete tombstone. Deleted rows stay in storage.
    pub is_deleted: bool,
}

/// Insert shape for a student before storage assigns its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
    pub full_name: String,
    pub email: String,
    pub birth_date: NaiveDate,
    pub group_id: GroupId,
}

/// Read model joining a student with its group's current label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub id: StudentId,
    pub full_name: String,
    pub email: String,
    pub birth_date: NaiveDate,
    pub group_id: GroupId,
    /// Label (`no`) of the group at read time.
    pub group_name: String,
}

impl Student {
    /// Marks this student as softly deleted.
    pub fn soft_delete(&mut self) {
        self.is_deleted = true;
    }

    /// Returns whether this student is visible to read paths.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}

#[cfg(test)]
mod tests {
    use super::Student;
    use chrono::NaiveDate;

    #[test]
    fn soft_delete_hides_student() {
        let mut student = Student {
            id: 7,
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1815, 12, 10).unwrap(),
            group_id: 1,
            is_deleted: false,
        };
        assert!(student.is_active());

        student.soft_delete();
        assert!(!student.is_active());
    }

    #[test]
    fn birth_date_serializes_as_iso_date() {
        let student = Student {
            id: 1,
            full_name: "Alan Turing".to_string(),
            email: "alan@example.com".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1912, 6, 23).unwrap(),
            group_id: 2,
            is_deleted: false,
        };
        let json = serde_json::to_value(&student).unwrap();
        assert_eq!(json["birth_date"], "1912-06-23");
    }
}
