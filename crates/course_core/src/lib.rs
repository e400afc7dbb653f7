//! Core enrollment logic for course administration.
//! This crate is the single source of truth for student/group invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::group::{Group, GroupId, GroupValidationError, NewGroup};
pub use model::student::{NewStudent, Student, StudentId, StudentRecord};
pub use model::EntityKind;
pub use repo::group_repo::{GroupRepository, SqliteGroupRepository};
pub use repo::student_repo::{SqliteStudentRepository, StudentRepository};
pub use repo::{RepoError, RepoResult};
pub use service::enrollment_service::{
    EnrollmentError, EnrollmentResult, EnrollmentService, ErrorKind, StudentCreateRequest,
    StudentEditRequest,
};
pub use service::group_service::{GroupService, GroupServiceError, GroupSummary};

/// Minimal health-check API for transport wiring checks.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
