//! Data models for the events portal.
//!
//! These models match the events service JSON shapes for seamless interoperability.

mod event;
mod field;
mod registration;
mod schema;

pub use event::*;
pub use field::*;
pub use registration::*;
pub use schema::*;
