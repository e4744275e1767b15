use strata_common::NodeId;
use strata_scene::{Layer, Node, Scene};

/// Read-only queries against a scene for debugging and development UI.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the scene.
    pub fn summary(scene: &Scene) -> SceneSummary {
        let viewport = scene.viewport();
        let mut layers = 0;
        scene.visit_all(|node, _| {
            if node.is::<Layer>() {
                layers += 1;
            }
        });
        let mut active_draws = 0;
        scene.visit_active(|_, _| active_draws += 1);
        SceneSummary {
            name: scene.name().to_string(),
            viewport: [viewport.x, viewport.y],
            layer_count: layers,
            node_count: scene.node_count(),
            active_count: active_draws,
        }
    }

    /// Describe a single node, if it exists.
    pub fn inspect_node(scene: &Scene, id: NodeId) -> Option<NodeInfo> {
        scene.find(id).map(|node| describe(node, 0))
    }

    /// Names of active nodes in the order a render pass visits them.
    pub fn draw_sequence(scene: &Scene) -> Vec<String> {
        let mut names = Vec::new();
        scene.visit_active(|node, _| names.push(node.name().to_string()));
        names
    }

    /// Every node, active or not, in traversal order with its depth.
    pub fn list_nodes(scene: &Scene) -> Vec<NodeInfo> {
        let mut out = Vec::new();
        scene.visit_all(|node, depth| out.push(describe(node, depth)));
        out
    }

    /// Indented text tree of the scene.
    pub fn tree(scene: &Scene) -> String {
        let mut out = format!("{}\n", Self::summary(scene));
        for info in Self::list_nodes(scene) {
            out.push_str(&"  ".repeat(info.depth + 1));
            out.push_str(&info.to_string());
            out.push('\n');
        }
        out
    }
}

fn describe(node: &dyn Node, depth: usize) -> NodeInfo {
    let space = node
        .downcast_ref::<Layer>()
        .map(|layer| layer.space().label());
    NodeInfo {
        id: node.id(),
        name: node.name().to_string(),
        kind: node.kind(),
        space,
        draw_order: node.draw_order(),
        active: node.is_active(),
        children: node.base().children().len(),
        depth,
    }
}

/// Summary of scene state for the inspector.
#[derive(Debug, Clone)]
pub struct SceneSummary {
    pub name: String,
    pub viewport: [f32; 2],
    pub layer_count: usize,
    pub node_count: usize,
    /// Nodes a render pass would visit.
    pub active_count: usize,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene '{}': viewport={}x{} layers={} nodes={} active={}",
            self.name,
            self.viewport[0],
            self.viewport[1],
            self.layer_count,
            self.node_count,
            self.active_count
        )
    }
}

/// Detailed info about a single node.
#[derive(Debug, Clone)]
pub struct NodeInfo {
    pub id: NodeId,
    pub name: String,
    pub kind: &'static str,
    /// `Some("world" | "screen")` for layers.
    pub space: Option<&'static str>,
    pub draw_order: i32,
    pub active: bool,
    pub children: usize,
    pub depth: usize,
}

impl std::fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] {}", self.name, self.id, self.kind)?;
        if let Some(space) = self.space {
            write!(f, " ({space})")?;
        }
        write!(f, " order={}", self.draw_order)?;
        if !self.active {
            write!(f, " inactive")?;
        }
        Ok(())
    }
}
