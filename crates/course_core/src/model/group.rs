//! Group domain model.
//!
//! # Invariants
//! - `limit` is strictly positive.
//! - A group never owns its students; membership is derived from
//!   `students.group_id` at query time.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned group identifier.
pub type GroupId = i64;

/// Capacity-bounded collection that students enroll into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    /// Display label, e.g. `P-101`.
    pub no: String,
    /// Maximum number of active students.
    pub limit: u32,
    pub is_deleted: bool,
}

/// Insert shape for a group before storage assigns its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGroup {
    pub no: String,
    pub limit: u32,
}

/// Validation failures for group records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupValidationError {
    /// Capacity limit must be at least one.
    ZeroLimit,
}

impl Display for GroupValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroLimit => write!(f, "group limit must be greater than zero"),
        }
    }
}

impl Error for GroupValidationError {}

impl NewGroup {
    pub fn new(no: impl Into<String>, limit: u32) -> Self {
        Self {
            no: no.into(),
            limit,
        }
    }

    pub fn validate(&self) -> Result<(), GroupValidationError> {
        validate_limit(self.limit)
    }
}

impl Group {
    pub fn validate(&self) -> Result<(), GroupValidationError> {
        validate_limit(self.limit)
    }

    /// Returns whether the group can accept new members.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }

    /// Returns whether `active_members` already fills the group.
    ///
    /// A group at exactly its limit is full.
    pub fn is_full(&self, active_members: u32) -> bool {
        self.limit <= active_members
    }
}

fn validate_limit(limit: u32) -> Result<(), GroupValidationError> {
    if limit == 0 {
        return Err(GroupValidationError::ZeroLimit);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Group, GroupValidationError, NewGroup};

    fn group(limit: u32) -> Group {
        Group {
            id: 1,
            no: "P-101".to_string(),
            limit,
            is_deleted: false,
        }
    }

    #[test]
    fn zero_limit_is_rejected() {
        assert_eq!(
            NewGroup::new("P-101", 0).validate(),
            Err(GroupValidationError::ZeroLimit)
        );
        assert!(NewGroup::new("P-101", 1).validate().is_ok());
    }

    #[test]
    fn group_at_limit_is_full() {
        let group = group(2);
        assert!(!group.is_full(1));
        assert!(group.is_full(2));
        assert!(group.is_full(3));
    }
}
