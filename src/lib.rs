// Library root: exposes the core for the binary and integration tests.
// The binary entry point is src/main.rs.

pub mod config;
pub mod corpus;
pub mod error;
pub mod logger;
pub mod subsystems;
pub mod supervisor;
