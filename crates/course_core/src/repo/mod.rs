//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the query/insert/mutate/remove contracts the services rely on.
//! - Isolate SQLite query details from enrollment orchestration.
//!
//! # Invariants
//! - Default read paths only see rows with `is_deleted = 0`.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

mod error;
pub mod group_repo;
mod schema;
pub mod student_repo;

pub use error::{RepoError, RepoResult};
