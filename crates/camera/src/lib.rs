//! 2D camera producing the world-to-screen transform applied by world-space layers.
//!
//! # Invariants
//! - `apply_transform` only composes onto the context's current transform, so
//!   its effect is undone by the enclosing save/restore.
//! - Cameras are shared by handle. Layers hold weak handles; the creator of a
//!   camera owns it.

mod camera;

pub use camera::{Camera2D, MAX_ZOOM, MIN_ZOOM, SharedCamera, WeakCamera};
