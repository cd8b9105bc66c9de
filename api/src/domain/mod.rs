//! Domain layer
//!
//! Contains pure business logic with no external dependencies.
//! - `entities`: Domain models representing core business concepts
//! - `filters`: Predicates accepted by the list operations
//! - `ports`: Trait definitions for external dependencies
//! - `validation`: Field rules applied before anything is written

pub mod entities;
pub mod filters;
pub mod ports;
pub mod validation;
