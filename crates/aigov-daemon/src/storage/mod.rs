//! Storage layer for aigov-daemon
//!
//! Durable persistence lives in the hosted database; this crate talks to it
//! through the [`Storage`] traits and ships an in-memory backend.

mod memory;
mod traits;

pub use memory::InMemoryStorage;
pub use traits::{
    ExceptionStorage, GateStorage, IntakeStorage, ProjectStorage, RaciStorage, Storage,
    StorageResult, Transition,
};
