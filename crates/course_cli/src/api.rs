//! Use-case API with JSON response envelopes.
//!
//! # Responsibility
//! - Map CLI commands onto core services opened against one database.
//! - Translate typed core failures into stable `error_code` strings.
//!
//! # Invariants
//! - Functions here never panic; every failure becomes an envelope.

use crate::cli::{Command, GroupCommand, StudentCommand, StudentFields};
use course_core::db::open_db;
use course_core::{
    EnrollmentError, EnrollmentService, GroupService, GroupServiceError, RepoError,
    SqliteGroupRepository, SqliteStudentRepository, StudentCreateRequest, StudentEditRequest,
};
use rusqlite::Connection;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

type Enrollment<'conn> =
    EnrollmentService<SqliteStudentRepository<'conn>, SqliteGroupRepository<'conn>>;
type Groups<'conn> = GroupService<SqliteGroupRepository<'conn>>;

/// Response envelope printed for every command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<&'static str>,
    pub message: String,
}

impl ApiResponse {
    fn success(message: impl Into<String>, data: impl Serialize) -> Self {
        match serde_json::to_value(data) {
            Ok(value) => Self {
                ok: true,
                data: Some(value),
                error_code: None,
                message: message.into(),
            },
            Err(err) => Self::failure("serialization_failed", err.to_string()),
        }
    }

    fn done(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            data: None,
            error_code: None,
            message: message.into(),
        }
    }

    fn failure(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error_code: Some(code),
            message: message.into(),
        }
    }
}

/// Executes one command against the database at `db_path`.
pub fn dispatch(db_path: &Path, command: Command) -> ApiResponse {
    match command {
        Command::Ping => ApiResponse::success("pong", course_core::core_version()),
        Command::Group(command) => with_groups(db_path, |service| group_command(service, command)),
        Command::Student(command) => {
            with_enrollment(db_path, |service| student_command(service, command))
        }
    }
}

fn group_command(service: &Groups<'_>, command: GroupCommand) -> ApiResponse {
    match command {
        GroupCommand::Create { no, limit } => match service.create_group(no, limit) {
            Ok(group) => ApiResponse::success("Group created.", group),
            Err(err) => group_failure(&err),
        },
        GroupCommand::List => match service.list_groups() {
            Ok(groups) => {
                ApiResponse::success(format!("Found {} group(s).", groups.len()), groups)
            }
            Err(err) => group_failure(&err),
        },
        GroupCommand::Get { id } => match service.get_group(id) {
            Ok(group) => ApiResponse::success("Group found.", group),
            Err(err) => group_failure(&err),
        },
        GroupCommand::Delete { id } => match service.delete_group(id) {
            Ok(()) => ApiResponse::done("Group deleted."),
            Err(err) => group_failure(&err),
        },
    }
}

fn student_command(service: &Enrollment<'_>, command: StudentCommand) -> ApiResponse {
    match command {
        StudentCommand::Create(fields) => match service.create(&create_request(fields)) {
            Ok(id) => ApiResponse::success("Student created.", id),
            Err(err) => enrollment_failure(&err),
        },
        StudentCommand::List => match service.get_all() {
            Ok(students) => {
                ApiResponse::success(format!("Found {} student(s).", students.len()), students)
            }
            Err(err) => enrollment_failure(&err),
        },
        StudentCommand::Get { id } => match service.get_by_id(id) {
            Ok(student) => ApiResponse::success("Student found.", student),
            Err(err) => enrollment_failure(&err),
        },
        StudentCommand::Edit { id, fields } => match service.edit(id, &edit_request(fields)) {
            Ok(()) => ApiResponse::done("Student updated."),
            Err(err) => enrollment_failure(&err),
        },
        StudentCommand::Delete { id } => match service.delete(id) {
            Ok(()) => ApiResponse::done("Student deleted."),
            Err(err) => enrollment_failure(&err),
        },
    }
}

fn create_request(fields: StudentFields) -> StudentCreateRequest {
    StudentCreateRequest {
        full_name: fields.full_name,
        email: fields.email,
        birth_date: fields.birth_date,
        group_id: fields.group_id,
    }
}

fn edit_request(fields: StudentFields) -> StudentEditRequest {
    StudentEditRequest {
        full_name: fields.full_name,
        email: fields.email,
        birth_date: fields.birth_date,
        group_id: fields.group_id,
    }
}

fn enrollment_failure(err: &EnrollmentError) -> ApiResponse {
    ApiResponse::failure(err.kind().code(), err.to_string())
}

fn group_failure(err: &GroupServiceError) -> ApiResponse {
    let code = match err {
        GroupServiceError::InvalidLimit => "invalid_limit",
        GroupServiceError::GroupNotFound(_) => "entity_not_found",
        GroupServiceError::Repo(_) => "storage_error",
    };
    ApiResponse::failure(code, err.to_string())
}

fn with_connection(
    db_path: &Path,
    f: impl FnOnce(&Connection) -> Result<ApiResponse, RepoError>,
) -> ApiResponse {
    let conn = match open_db(db_path) {
        Ok(conn) => conn,
        Err(err) => return ApiResponse::failure("db_open_failed", format!("{err}")),
    };
    f(&conn).unwrap_or_else(|err| ApiResponse::failure("repo_init_failed", err.to_string()))
}

fn with_enrollment(
    db_path: &Path,
    f: impl FnOnce(&Enrollment<'_>) -> ApiResponse,
) -> ApiResponse {
    with_connection(db_path, |conn| {
        let service = EnrollmentService::new(
            SqliteStudentRepository::try_new(conn)?,
            SqliteGroupRepository::try_new(conn)?,
        );
        Ok(f(&service))
    })
}

fn with_groups(db_path: &Path, f: impl FnOnce(&Groups<'_>) -> ApiResponse) -> ApiResponse {
    with_connection(db_path, |conn| {
        let service = GroupService::new(SqliteGroupRepository::try_new(conn)?);
        Ok(f(&service))
    })
}

#[cfg(test)]
mod tests {
    use super::dispatch;
    use crate::cli::{Command, GroupCommand, StudentCommand, StudentFields};
    use chrono::NaiveDate;
    use std::path::Path;

    fn fields(email: &str, group_id: i64) -> StudentFields {
        StudentFields {
            full_name: "Ada Lovelace".to_string(),
            email: email.to_string(),
            birth_date: NaiveDate::from_ymd_opt(1815, 12, 10).unwrap(),
            group_id,
        }
    }

    fn create_group(db: &Path, limit: u32) -> i64 {
        let response = dispatch(
            db,
            Command::Group(GroupCommand::Create {
                no: "P-101".to_string(),
                limit,
            }),
        );
        assert!(response.ok, "{}", response.message);
        response.data.unwrap()["id"].as_i64().unwrap()
    }

    #[test]
    fn ping_reports_core_version() {
        let dir = tempfile::tempdir().unwrap();
        let response = dispatch(&dir.path().join("course.db"), Command::Ping);
        assert!(response.ok);
        assert_eq!(response.message, "pong");
    }

    #[test]
    fn student_lifecycle_through_envelopes() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("course.db");
        let group_id = create_group(&db, 2);

        let created = dispatch(
            &db,
            Command::Student(StudentCommand::Create(fields("ada@example.com", group_id))),
        );
        assert!(created.ok, "{}", created.message);
        let id = created.data.unwrap().as_i64().unwrap();

        let fetched = dispatch(&db, Command::Student(StudentCommand::Get { id }));
        let record = fetched.data.unwrap();
        assert_eq!(record["group_name"], "P-101");
        assert_eq!(record["birth_date"], "1815-12-10");

        let deleted = dispatch(&db, Command::Student(StudentCommand::Delete { id }));
        assert!(deleted.ok);

        let missing = dispatch(&db, Command::Student(StudentCommand::Get { id }));
        assert!(!missing.ok);
        assert_eq!(missing.error_code, Some("entity_not_found"));
    }

    #[test]
    fn business_rule_failures_carry_codes() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("course.db");
        let group_id = create_group(&db, 1);

        let first = dispatch(
            &db,
            Command::Student(StudentCommand::Create(fields("a@x.com", group_id))),
        );
        assert!(first.ok);

        let duplicate = dispatch(
            &db,
            Command::Student(StudentCommand::Create(fields("a@x.com", group_id))),
        );
        assert_eq!(duplicate.error_code, Some("duplicate_entity"));

        let full = dispatch(
            &db,
            Command::Student(StudentCommand::Create(fields("b@x.com", group_id))),
        );
        assert_eq!(full.error_code, Some("capacity_exceeded"));

        let invalid = dispatch(
            &db,
            Command::Group(GroupCommand::Create {
                no: "P-000".to_string(),
                limit: 0,
            }),
        );
        assert_eq!(invalid.error_code, Some("invalid_limit"));
    }

    #[test]
    fn unopenable_database_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let response = dispatch(
            &dir.path().join("missing").join("course.db"),
            Command::Student(StudentCommand::List),
        );
        assert!(!response.ok);
        assert_eq!(response.error_code, Some("db_open_failed"));
    }
}
