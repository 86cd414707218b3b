//! Infrastructure layer: I/O and external integrations.

pub mod agent;
pub mod config;
pub mod logging;
