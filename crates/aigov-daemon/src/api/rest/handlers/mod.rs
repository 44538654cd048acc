//! API request handlers

mod calculators;
mod exceptions;
mod gates;
mod health;
mod intake;
mod projects;
mod raci;

pub use calculators::*;
pub use exceptions::*;
pub use gates::*;
pub use health::*;
pub use intake::*;
pub use projects::*;
pub use raci::*;
