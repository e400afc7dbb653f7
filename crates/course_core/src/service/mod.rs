//! Core use-case services.
//!
//! # Responsibility
//! - Enforce enrollment business rules above the repository layer.
//! - Keep transport layers decoupled from storage details.

pub mod enrollment_service;
pub mod group_service;
