//! REST API

pub mod actor;
pub mod handlers;
pub mod router;
pub mod state;

pub use actor::Actor;
pub use router::create_router;
pub use state::AppState;
