//! Scene graph: nodes, render layers, and the scene that drives a render pass.
//!
//! # Invariants
//! - Every node has exactly one owner. Attaching moves ownership; dropping a
//!   node drops its whole subtree.
//! - Siblings render in ascending `draw_order`; equal keys keep insertion order.
//! - Inactive nodes are skipped together with their subtrees.
//! - A layer's camera transform never outlives the layer's own render call.
//!   The context's transform stack is balanced after every pass, including
//!   passes that fail.

mod config;
mod error;
mod key;
mod layer;
mod node;
mod scene;

pub use config::{ConfigError, SceneConfig};
pub use error::SceneError;
pub use key::SortKey;
pub use layer::{Layer, LayerSpace};
pub use node::{Group, Node, NodeBase, Shape, walk};
pub use scene::{Scene, UI_DRAW_ORDER, WORLD_DRAW_ORDER};

pub use strata_camera::{Camera2D, SharedCamera, WeakCamera};
pub use strata_canvas::{DrawCmd, DrawContext, DrawError};
