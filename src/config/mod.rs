//! Configuration for the feedsweep daemon
//!
//! All configuration comes from the environment and is loaded once at
//! startup into an explicit `Config` value that is passed by reference into
//! the scheduler and its collaborators. A missing required value is a
//! fatal-startup condition: the process exits before the scheduler starts
//! and before the acknowledgment endpoint is bound.

pub mod loader;
pub mod schema;

pub use loader::{ConfigError, load_from_env};
pub use schema::{ApiCredentials, Config};
