//! Student repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over `students` storage.
//! - Resolve the `StudentRecord` projection by joining `student_groups`.
//!
//! # Invariants
//! - Default read paths never return rows with `is_deleted = 1`.
//! - Soft delete keeps the row; it only flips the flag.
//! - `birth_date` is stored as `YYYY-MM-DD` text.

use crate::model::group::GroupId;
use crate::model::student::{NewStudent, Student, StudentId, StudentRecord};
use crate::model::EntityKind;
use crate::repo::schema::{bool_to_int, ensure_table_ready, parse_flag};
use crate::repo::{RepoError, RepoResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

const STUDENT_SELECT_SQL: &str = "SELECT
    id,
    full_name,
    email,
    birth_date,
    group_id,
    is_deleted
FROM students";

const STUDENT_RECORD_SELECT_SQL: &str = "SELECT
    s.id AS id,
    s.full_name AS full_name,
    s.email AS email,
    s.birth_date AS birth_date,
    s.group_id AS group_id,
    g.group_no AS group_name
FROM students s
INNER JOIN student_groups g ON g.id = s.group_id
WHERE s.is_deleted = 0";

const STUDENT_COLUMNS: &[&str] = &[
    "id",
    "full_name",
    "email",
    "birth_date",
    "group_id",
    "is_deleted",
    "updated_at",
];

/// Repository interface for student persistence.
pub trait StudentRepository {
    fn insert_student(&self, student: &NewStudent) -> RepoResult<StudentId>;
    /// Replaces every mutable column of an existing row.
    fn update_student(&self, student: &Student) -> RepoResult<()>;
    fn get_student(&self, id: StudentId, include_deleted: bool) -> RepoResult<Option<Student>>;
    /// Gets one active student joined with its group label.
    fn get_student_record(&self, id: StudentId) -> RepoResult<Option<StudentRecord>>;
    /// Lists active students joined with their group labels, ordered by id.
    fn list_student_records(&self) -> RepoResult<Vec<StudentRecord>>;
    /// Returns whether an active student already uses `email`.
    fn email_in_use(&self, email: &str) -> RepoResult<bool>;
    fn soft_delete_student(&self, id: StudentId) -> RepoResult<()>;
}

/// SQLite-backed student repository.
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudentRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "students", STUDENT_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn insert_student(&self, student: &NewStudent) -> RepoResult<StudentId> {
        self.conn.execute(
            "INSERT INTO students (
                full_name,
                email,
                birth_date,
                group_id,
                is_deleted
            ) VALUES (?1, ?2, ?3, ?4, 0);",
            params![
                student.full_name.as_str(),
                student.email.as_str(),
                format_birth_date(student.birth_date),
                student.group_id,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_student(&self, student: &Student) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE students
             SET
                full_name = ?1,
                email = ?2,
                birth_date = ?3,
                group_id = ?4,
                is_deleted = ?5,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?6;",
            params![
                student.full_name.as_str(),
                student.email.as_str(),
                format_birth_date(student.birth_date),
                student.group_id,
                bool_to_int(student.is_deleted),
                student.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Student,
                id: student.id,
            });
        }

        Ok(())
    }

    fn get_student(&self, id: StudentId, include_deleted: bool) -> RepoResult<Option<Student>> {
        let mut stmt = self.conn.prepare(&format!(
            "{STUDENT_SELECT_SQL}
             WHERE id = ?1
               AND (?2 = 1 OR is_deleted = 0);"
        ))?;

        let mut rows = stmt.query(params![id, bool_to_int(include_deleted)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_student_row(row)?));
        }

        Ok(None)
    }

    fn get_student_record(&self, id: StudentId) -> RepoResult<Option<StudentRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_RECORD_SELECT_SQL} AND s.id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_record_row(row)?));
        }

        Ok(None)
    }

    fn list_student_records(&self) -> RepoResult<Vec<StudentRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_RECORD_SELECT_SQL} ORDER BY s.id ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }

        Ok(records)
    }

    fn email_in_use(&self, email: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM students
                WHERE email = ?1
                  AND is_deleted = 0
            );",
            [email],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn soft_delete_student(&self, id: StudentId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE students
             SET
                is_deleted = 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1
               AND is_deleted = 0;",
            [id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Student,
                id,
            });
        }

        Ok(())
    }
}

fn parse_student_row(row: &Row<'_>) -> RepoResult<Student> {
    Ok(Student {
        id: row.get("id")?,
        full_name: row.get("full_name")?,
        email: row.get("email")?,
        birth_date: parse_birth_date(row.get("birth_date")?)?,
        group_id: row.get::<_, GroupId>("group_id")?,
        is_deleted: parse_flag(row.get("is_deleted")?, "students.is_deleted")?,
    })
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<StudentRecord> {
    Ok(StudentRecord {
        id: row.get("id")?,
        full_name: row.get("full_name")?,
        email: row.get("email")?,
        birth_date: parse_birth_date(row.get("birth_date")?)?,
        group_id: row.get("group_id")?,
        group_name: row.get("group_name")?,
    })
}

fn format_birth_date(value: NaiveDate) -> String {
    value.format(BIRTH_DATE_FORMAT).to_string()
}

fn parse_birth_date(value: String) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(&value, BIRTH_DATE_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!("invalid date `{value}` in students.birth_date"))
    })
}

#[cfg(test)]
mod tests {
    use super::{format_birth_date, parse_birth_date};
    use crate::repo::RepoError;
    use chrono::NaiveDate;

    #[test]
    fn birth_date_text_is_iso_formatted() {
        let date = NaiveDate::from_ymd_opt(2004, 2, 29).unwrap();
        assert_eq!(format_birth_date(date), "2004-02-29");
        assert_eq!(parse_birth_date("2004-02-29".to_string()).unwrap(), date);
    }

    #[test]
    fn malformed_birth_date_is_invalid_data() {
        let err = parse_birth_date("29/02/2004".to_string()).unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(message) if message.contains("29/02/2004")));
    }
}
