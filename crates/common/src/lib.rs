//! Shared types used across the strata crates.

mod types;

pub use types::{Color, NodeId, Rect};
