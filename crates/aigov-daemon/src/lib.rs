//! aigov daemon library
//!
//! This module provides the core components for the governance service:
//! - REST API handlers
//! - Storage backends
//! - Rate limiting
//! - Background expiration scanning
//! - Server lifecycle management

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod rate_limit;
pub mod scheduler;
pub mod server;
pub mod storage;

pub use config::DaemonConfig;
pub use error::{ApiError, DaemonError, StorageError};
pub use scheduler::ExpirationScanner;
pub use server::Server;
pub use storage::{InMemoryStorage, Storage};
