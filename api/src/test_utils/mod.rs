//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! The in-memory repositories implement the same port traits as the PostgreSQL
//! adapters, so services can be exercised without a database. The order
//! repository stages transactional writes and can inject a storage fault at any
//! step to check rollback behaviour.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
