//! Background jobs
//!
//! - Periodic risk exception expiration scan

mod expiration;

pub use expiration::ExpirationScanner;
