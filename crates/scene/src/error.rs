use strata_common::NodeId;

/// Errors from scene graph operations.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("node {0} not found")]
    NodeNotFound(NodeId),
    #[error("default layer '{0}' cannot be removed or moved")]
    ProtectedLayer(String),
    #[error("cannot move node {node} under {parent}: target is inside its own subtree")]
    InvalidParent { node: NodeId, parent: NodeId },
    #[error("invalid viewport {width}x{height}: dimensions must be finite and positive")]
    InvalidViewport { width: f32, height: f32 },
    #[error("primary camera is already borrowed")]
    CameraBusy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = SceneError::ProtectedLayer("world".into());
        assert_eq!(err.to_string(), "default layer 'world' cannot be removed or moved");
        let err = SceneError::InvalidViewport {
            width: 0.0,
            height: 600.0,
        };
        assert!(err.to_string().contains("0x600"));
    }
}
