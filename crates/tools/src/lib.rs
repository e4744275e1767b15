//! Developer tooling: scene inspection for debugging and the CLI.
//!
//! # Invariants
//! - Tools only read scene state. They never mutate it.

mod inspector;

pub use inspector::{NodeInfo, SceneInspector, SceneSummary};

pub fn crate_info() -> &'static str {
    "strata-tools v0.1.0"
}
