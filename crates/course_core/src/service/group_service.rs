//! Group administration use-case service.
//!
//! # Responsibility
//! - Create, inspect, list and soft-delete enrollment groups.
//!
//! # Invariants
//! - Group limit must be positive.
//! - Deleting a group keeps its students; they simply cannot be
//!   re-assigned into it anymore.

use crate::model::group::{Group, GroupId, GroupValidationError, NewGroup};
use crate::model::EntityKind;
use crate::repo::group_repo::GroupRepository;
use crate::repo::RepoError;
use log::info;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from group administration.
#[derive(Debug)]
pub enum GroupServiceError {
    /// Requested limit is zero.
    InvalidLimit,
    /// Target group does not exist or is soft-deleted.
    GroupNotFound(GroupId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for GroupServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLimit => write!(f, "group limit must be greater than zero"),
            Self::GroupNotFound(id) => write!(f, "group with id {id} not found"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for GroupServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for GroupServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(GroupValidationError::ZeroLimit) => Self::InvalidLimit,
            RepoError::NotFound {
                entity: EntityKind::Group,
                id,
            } => Self::GroupNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Group together with its current active occupancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    #[serde(flatten)]
    pub group: Group,
    pub active_members: u32,
}

/// Group service facade over repository implementations.
pub struct GroupService<G: GroupRepository> {
    repo: G,
}

impl<G: GroupRepository> GroupService<G> {
    pub fn new(repo: G) -> Self {
        Self { repo }
    }

    /// Creates one group and returns it as persisted.
    pub fn create_group(
        &self,
        no: impl Into<String>,
        limit: u32,
    ) -> Result<Group, GroupServiceError> {
        let new_group = NewGroup::new(no, limit);
        let id = self.repo.insert_group(&new_group)?;
        info!("event=group_create module=group status=ok group_id={id} limit={limit}");
        self.get_group(id)
    }

    /// Gets one active group.
    pub fn get_group(&self, id: GroupId) -> Result<Group, GroupServiceError> {
        self.repo
            .get_group(id, false)?
            .ok_or(GroupServiceError::GroupNotFound(id))
    }

    /// Lists active groups with their occupancy, ordered by id.
    pub fn list_groups(&self) -> Result<Vec<GroupSummary>, GroupServiceError> {
        self.repo
            .list_groups(false)?
            .into_iter()
            .map(|group| -> Result<GroupSummary, GroupServiceError> {
                let active_members = self.repo.count_active_members(group.id)?;
                Ok(GroupSummary {
                    group,
                    active_members,
                })
            })
            .collect()
    }

    /// Soft-deletes one active group.
    pub fn delete_group(&self, id: GroupId) -> Result<(), GroupServiceError> {
        self.repo.soft_delete_group(id)?;
        info!("event=group_delete module=group status=ok group_id={id}");
        Ok(())
    }
}
