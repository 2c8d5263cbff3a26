//! Loop Feed Service Library
//!
//! This library wires the loop feed engine to its storage backend and
//! exposes the vote and thread operations over HTTP. It provides
//! configuration management, error handling, and dependency injection for
//! the service binary.
pub mod config;
pub mod errors;
pub mod http;

pub use config::Dependencies;
pub use errors::{AppError, StartupError};
