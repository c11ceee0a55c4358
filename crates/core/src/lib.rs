#![forbid(unsafe_code)]

//! Domain model for the course-progression and assessment engine.
//!
//! The caller owns the Chapter→Lesson→ContentItem tree for the lifetime of
//! a viewing session; everything in [`progress`] is a pure derivation over
//! it. Persistence, transport, and UI live behind collaborators in other
//! crates.

pub mod error;
pub mod model;
pub mod progress;
pub mod time;

pub use error::Error;
pub use time::Clock;
