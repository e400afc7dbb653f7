//! Student enrollment use-case service.
//!
//! # Responsibility
//! - Validate and persist the student lifecycle: create, list, get, edit,
//!   delete.
//! - Enforce email uniqueness, group existence and group capacity.
//!
//! # Invariants
//! - Every rule is checked before any write, so a rejected call leaves
//!   storage untouched.
//! - Soft-deleted students are invisible to every operation here.
//! - Capacity on edit counts the edited student too, even when it already
//!   belongs to the target group. A full group therefore rejects re-saving
//!   its own members (likely a latent defect, kept as-is).
//!
//! Check and write are separate statements without locking, so concurrent
//! enrollments into one group can both pass the capacity check.

use crate::model::group::GroupId;
use crate::model::student::{NewStudent, StudentId, StudentRecord};
use crate::model::EntityKind;
use crate::repo::group_repo::GroupRepository;
use crate::repo::student_repo::StudentRepository;
use crate::repo::RepoError;
use chrono::NaiveDate;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Request model for enrolling a new student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentCreateRequest {
    pub full_name: String,
    pub email: String,
    pub birth_date: NaiveDate,
    pub group_id: GroupId,
}

/// Request model for a full replacement edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentEditRequest {
    pub full_name: String,
    pub email: String,
    pub birth_date: NaiveDate,
    pub group_id: GroupId,
}

/// Coarse error categories for transports mapping failures to statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    EntityNotFound,
    DuplicateEntity,
    CapacityExceeded,
    Storage,
}

impl ErrorKind {
    /// Stable machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            Self::EntityNotFound => "entity_not_found",
            Self::DuplicateEntity => "duplicate_entity",
            Self::CapacityExceeded => "capacity_exceeded",
            Self::Storage => "storage_error",
        }
    }
}

/// Errors from enrollment operations.
#[derive(Debug)]
pub enum EnrollmentError {
    /// Referenced student or group is missing or soft-deleted.
    EntityNotFound { entity: EntityKind, id: i64 },
    /// Another active student already uses this email.
    DuplicateEntity { email: String },
    /// Target group already holds `limit` active students.
    CapacityExceeded { group_id: GroupId, limit: u32 },
    /// Storage failure, propagated untranslated.
    Repo(RepoError),
}

impl EnrollmentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EntityNotFound { .. } => ErrorKind::EntityNotFound,
            Self::DuplicateEntity { .. } => ErrorKind::DuplicateEntity,
            Self::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            Self::Repo(_) => ErrorKind::Storage,
        }
    }

    fn student_not_found(id: StudentId) -> Self {
        Self::EntityNotFound {
            entity: EntityKind::Student,
            id,
        }
    }

    fn group_not_found(id: GroupId) -> Self {
        Self::EntityNotFound {
            entity: EntityKind::Group,
            id,
        }
    }
}

impl Display for EnrollmentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EntityNotFound {
                entity: EntityKind::Student,
                id,
            } => write!(f, "student with id {id} not found"),
            Self::EntityNotFound {
                entity: EntityKind::Group,
                id,
            } => write!(f, "group with id {id} not found"),
            Self::DuplicateEntity { email } => {
                write!(f, "student with email {email} already exists")
            }
            Self::CapacityExceeded { group_id, limit } => {
                write!(f, "group {group_id} is full (limit {limit})")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EnrollmentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for EnrollmentError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, id } => Self::EntityNotFound { entity, id },
            other => Self::Repo(other),
        }
    }
}

pub type EnrollmentResult<T> = Result<T, EnrollmentError>;

/// Enrollment facade over student and group repositories.
pub struct EnrollmentService<S: StudentRepository, G: GroupRepository> {
    students: S,
    groups: G,
}

impl<S: StudentRepository, G: GroupRepository> EnrollmentService<S, G> {
    /// Creates a service from repository implementations.
    pub fn new(students: S, groups: G) -> Self {
        Self { students, groups }
    }

    /// Enrolls a new student and returns its storage-assigned id.
    ///
    /// # Errors
    /// - `DuplicateEntity` when an active student already has `email`.
    /// - `EntityNotFound` when the group is missing or soft-deleted.
    /// - `CapacityExceeded` when the group is full.
    pub fn create(&self, request: &StudentCreateRequest) -> EnrollmentResult<StudentId> {
        let outcome = self.create_inner(request);
        match &outcome {
            Ok(id) => info!(
                "event=student_create module=enrollment status=ok student_id={id} group_id={}",
                request.group_id
            ),
            Err(err) => log_failure("student_create", None, Some(request.group_id), err),
        }
        outcome
    }

    /// Lists all active students with their group labels.
    pub fn get_all(&self) -> EnrollmentResult<Vec<StudentRecord>> {
        Ok(self.students.list_student_records()?)
    }

    /// Gets one active student with its group label.
    pub fn get_by_id(&self, id: StudentId) -> EnrollmentResult<StudentRecord> {
        self.students
            .get_student_record(id)?
            .ok_or_else(|| EnrollmentError::student_not_found(id))
    }

    /// Replaces name, email, birth date and group of an active student.
    ///
    /// Email uniqueness is not re-checked here.
    pub fn edit(&self, id: StudentId, request: &StudentEditRequest) -> EnrollmentResult<()> {
        let outcome = self.edit_inner(id, request);
        match &outcome {
            Ok(()) => info!(
                "event=student_edit module=enrollment status=ok student_id={id} group_id={}",
                request.group_id
            ),
            Err(err) => log_failure("student_edit", Some(id), Some(request.group_id), err),
        }
        outcome
    }

    /// Soft-deletes an active student.
    pub fn delete(&self, id: StudentId) -> EnrollmentResult<()> {
        let outcome = self
            .students
            .soft_delete_student(id)
            .map_err(EnrollmentError::from);
        match &outcome {
            Ok(()) => info!("event=student_delete module=enrollment status=ok student_id={id}"),
            Err(err) => log_failure("student_delete", Some(id), None, err),
        }
        outcome
    }

    fn create_inner(&self, request: &StudentCreateRequest) -> EnrollmentResult<StudentId> {
        if self.students.email_in_use(&request.email)? {
            return Err(EnrollmentError::DuplicateEntity {
                email: request.email.clone(),
            });
        }

        self.ensure_group_has_room(request.group_id)?;

        let student = NewStudent {
            full_name: request.full_name.clone(),
            email: request.email.clone(),
            birth_date: request.birth_date,
            group_id: request.group_id,
        };
        Ok(self.students.insert_student(&student)?)
    }

    fn edit_inner(&self, id: StudentId, request: &StudentEditRequest) -> EnrollmentResult<()> {
        let mut student = self
            .students
            .get_student(id, false)?
            .ok_or_else(|| EnrollmentError::student_not_found(id))?;

        // No self-exclusion: a current member of a full group is rejected too.
        self.ensure_group_has_room(request.group_id)?;

        student.full_name = request.full_name.clone();
        student.email = request.email.clone();
        student.birth_date = request.birth_date;
        student.group_id = request.group_id;
        Ok(self.students.update_student(&student)?)
    }

    fn ensure_group_has_room(&self, group_id: GroupId) -> EnrollmentResult<()> {
        let group = self
            .groups
            .get_group(group_id, false)?
            .ok_or_else(|| EnrollmentError::group_not_found(group_id))?;

        let members = self.groups.count_active_members(group_id)?;
        if group.is_full(members) {
            return Err(EnrollmentError::CapacityExceeded {
                group_id,
                limit: group.limit,
            });
        }

        Ok(())
    }
}

fn log_failure(
    event: &str,
    student_id: Option<StudentId>,
    group_id: Option<GroupId>,
    err: &EnrollmentError,
) {
    let student_id = student_id.map_or_else(|| "-".to_string(), |id| id.to_string());
    let group_id = group_id.map_or_else(|| "-".to_string(), |id| id.to_string());
    let code = err.kind().code();
    match err {
        EnrollmentError::Repo(repo_err) => error!(
            "event={event} module=enrollment status=error student_id={student_id} group_id={group_id} error_code={code} error={repo_err}"
        ),
        _ => warn!(
            "event={event} module=enrollment status=rejected student_id={student_id} group_id={group_id} error_code={code}"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{EnrollmentError, ErrorKind};
    use crate::model::EntityKind;
    use crate::repo::RepoError;

    #[test]
    fn messages_reference_offending_values() {
        let not_found = EnrollmentError::EntityNotFound {
            entity: EntityKind::Group,
            id: 42,
        };
        assert_eq!(not_found.to_string(), "group with id 42 not found");

        let duplicate = EnrollmentError::DuplicateEntity {
            email: "a@x.com".to_string(),
        };
        assert!(duplicate.to_string().contains("a@x.com"));

        let full = EnrollmentError::CapacityExceeded {
            group_id: 3,
            limit: 1,
        };
        assert!(full.to_string().contains("full"));
    }

    #[test]
    fn repo_not_found_maps_to_entity_not_found() {
        let err = EnrollmentError::from(RepoError::NotFound {
            entity: EntityKind::Student,
            id: 5,
        });
        assert_eq!(err.kind(), ErrorKind::EntityNotFound);
        assert_eq!(err.to_string(), "student with id 5 not found");
    }

    #[test]
    fn storage_errors_keep_their_source() {
        let err = EnrollmentError::from(RepoError::InvalidData("bad row".to_string()));
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert_eq!(err.kind().code(), "storage_error");
        assert!(std::error::Error::source(&err).is_some());
    }
}
