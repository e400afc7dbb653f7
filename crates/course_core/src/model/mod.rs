//! Enrollment domain model.
//!
//! # Responsibility
//! - Define the canonical student and group records used by core logic.
//! - Define the denormalized student read model returned to callers.
//!
//! # Invariants
//! - Identifiers are assigned by storage and never reused.
//! - Deletion is represented by soft-delete flags on both records.

pub mod group;
pub mod student;

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Entity collections addressed by id in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Student,
    Group,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Group => "group",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
