//! Drawing context: the surface every scene traversal renders into.
//!
//! # Invariants
//! - The context owns a single transform stack. `save` pushes, `restore` pops.
//! - Every `save` issued by a traversal is matched by exactly one `restore`,
//!   enforced by [`TransformScope`] rather than by callers.
//!
//! [`RecordingCanvas`] is the in-memory implementation used by tests and the
//! CLI. A GPU or window-backed context implements the same trait.

mod context;
mod recording;
mod scope;

pub use context::{DrawCmd, DrawContext, DrawError};
pub use recording::{DrawRecord, RecordingCanvas};
pub use scope::TransformScope;

pub fn crate_info() -> &'static str {
    "strata-canvas v0.1.0"
}
