use glam::Vec2;
use strata_camera::{Camera2D, SharedCamera};
use strata_canvas::{DrawContext, DrawError};
use strata_common::NodeId;

use crate::SceneError;
use crate::config::{SceneConfig, validate_viewport};
use crate::key::SortKey;
use crate::layer::Layer;
use crate::node::{Node, walk};

/// Draw order of the default world layer.
pub const WORLD_DRAW_ORDER: i32 = 0;
/// Draw order of the default UI layer.
pub const UI_DRAW_ORDER: i32 = 1000;

const WORLD: usize = 0;
const UI: usize = 1;

/// A top-level entry plus its insertion sequence number.
#[derive(Debug)]
struct Slot<T> {
    seq: u64,
    item: T,
}

/// The traversal root.
///
/// A scene owns its primary camera, a camera-bound `world` layer (draw order
/// 0) and a screen-space `ui` layer (draw order 1000). Extra layers and plain
/// nodes can be added at the top level; all of them render in one total order
/// by draw order, ties broken by insertion order. The default layers count as
/// inserted first, `world` before `ui`.
#[derive(Debug)]
pub struct Scene {
    name: String,
    camera: SharedCamera,
    /// `layers[WORLD]` and `layers[UI]` are the defaults and are never removed.
    layers: Vec<Slot<Layer>>,
    nodes: Vec<Slot<Box<dyn Node>>>,
    next_seq: u64,
}

impl Scene {
    pub fn new(name: impl Into<String>, width: f32, height: f32) -> Self {
        let name = name.into();
        let camera = Camera2D::new(width, height).shared();
        let world = Layer::world("world", &camera).with_draw_order(WORLD_DRAW_ORDER);
        let ui = Layer::screen("ui").with_draw_order(UI_DRAW_ORDER);
        tracing::debug!(scene = %name, width, height, "scene created");
        Self {
            name,
            camera,
            layers: vec![Slot { seq: 0, item: world }, Slot { seq: 1, item: ui }],
            nodes: Vec::new(),
            next_seq: 2,
        }
    }

    pub fn from_config(config: &SceneConfig) -> Result<Self, SceneError> {
        config.validate()?;
        Ok(Self::new(config.name.clone(), config.width, config.height))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The primary camera, shared by every world-space layer the scene creates.
    pub fn camera(&self) -> &SharedCamera {
        &self.camera
    }

    pub fn viewport(&self) -> Vec2 {
        self.camera.borrow().viewport
    }

    /// Resize the viewport of the primary camera.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), SceneError> {
        validate_viewport(width, height)?;
        self.camera
            .try_borrow_mut()
            .map_err(|_| SceneError::CameraBusy)?
            .resize(width, height);
        Ok(())
    }

    pub fn world(&self) -> &Layer {
        &self.layers[WORLD].item
    }

    pub fn world_mut(&mut self) -> &mut Layer {
        &mut self.layers[WORLD].item
    }

    pub fn ui(&self) -> &Layer {
        &self.layers[UI].item
    }

    pub fn ui_mut(&mut self) -> &mut Layer {
        &mut self.layers[UI].item
    }

    /// Add a layer bound to the primary camera. Draw order defaults to 0.
    pub fn create_world_layer(
        &mut self,
        name: impl Into<String>,
        draw_order: Option<i32>,
    ) -> &mut Layer {
        let layer = Layer::world(name, &self.camera).with_draw_order(draw_order.unwrap_or(0));
        self.add_layer(layer)
    }

    /// Add a screen-space layer. Draw order defaults to 0.
    pub fn create_ui_layer(
        &mut self,
        name: impl Into<String>,
        draw_order: Option<i32>,
    ) -> &mut Layer {
        let layer = Layer::screen(name).with_draw_order(draw_order.unwrap_or(0));
        self.add_layer(layer)
    }

    /// Take ownership of a layer and add it at the top level.
    pub fn add_layer(&mut self, layer: Layer) -> &mut Layer {
        tracing::debug!(
            scene = %self.name,
            layer = %layer.name(),
            space = layer.space().label(),
            draw_order = layer.draw_order(),
            "layer added"
        );
        let seq = self.bump_seq();
        let idx = self.layers.len();
        self.layers.push(Slot { seq, item: layer });
        &mut self.layers[idx].item
    }

    /// Take ownership of a node and add it at the top level.
    pub fn add_child<N: Node>(&mut self, node: N) -> NodeId {
        self.add_boxed(Box::new(node))
    }

    pub fn add_boxed(&mut self, node: Box<dyn Node>) -> NodeId {
        let id = node.id();
        tracing::debug!(scene = %self.name, node = %node.name(), %id, "top-level node added");
        let seq = self.bump_seq();
        self.nodes.push(Slot { seq, item: node });
        id
    }

    /// Attach `node` under `parent`, anywhere in the scene.
    pub fn add_to(&mut self, parent: NodeId, node: Box<dyn Node>) -> Result<NodeId, SceneError> {
        let parent = self.find_mut(parent).ok_or(SceneError::NodeNotFound(parent))?;
        Ok(parent.base_mut().add_child(node))
    }

    pub fn find(&self, id: NodeId) -> Option<&dyn Node> {
        self.top_level()
            .find_map(|n| if n.id() == id { Some(n) } else { n.base().find(id) })
    }

    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut dyn Node> {
        for slot in &mut self.layers {
            if slot.item.id() == id {
                return Some(&mut slot.item as &mut dyn Node);
            }
            if let Some(found) = slot.item.base_mut().find_mut(id) {
                return Some(found);
            }
        }
        for slot in &mut self.nodes {
            if slot.item.id() == id {
                return Some(slot.item.as_mut());
            }
            if let Some(found) = slot.item.base_mut().find_mut(id) {
                return Some(found);
            }
        }
        None
    }

    /// Look up a layer anywhere in the scene.
    pub fn layer(&self, id: NodeId) -> Option<&Layer> {
        self.find(id)?.downcast_ref::<Layer>()
    }

    pub fn layer_mut(&mut self, id: NodeId) -> Option<&mut Layer> {
        self.find_mut(id)?.downcast_mut::<Layer>()
    }

    /// Detach a node (and its subtree) and hand it back to the caller.
    /// The default layers can't be removed.
    pub fn remove(&mut self, id: NodeId) -> Result<Box<dyn Node>, SceneError> {
        self.ensure_not_default(id)?;
        if let Some(pos) = self.layers.iter().position(|s| s.item.id() == id) {
            let slot = self.layers.remove(pos);
            tracing::debug!(scene = %self.name, layer = %slot.item.name(), "layer removed");
            return Ok(Box::new(slot.item));
        }
        if let Some(pos) = self.nodes.iter().position(|s| s.item.id() == id) {
            let slot = self.nodes.remove(pos);
            tracing::debug!(scene = %self.name, node = %slot.item.name(), "top-level node removed");
            return Ok(slot.item);
        }
        self.layers
            .iter_mut()
            .find_map(|s| s.item.base_mut().take_descendant(id))
            .or_else(|| {
                self.nodes
                    .iter_mut()
                    .find_map(|s| s.item.base_mut().take_descendant(id))
            })
            .ok_or(SceneError::NodeNotFound(id))
    }

    /// Remove a node and drop it together with its subtree.
    pub fn destroy(&mut self, id: NodeId) -> Result<(), SceneError> {
        let node = self.remove(id)?;
        tracing::debug!(
            scene = %self.name,
            node = %node.name(),
            descendants = node.base().node_count(),
            "node destroyed"
        );
        Ok(())
    }

    /// Move a node under `parent`, or to the top level for `None`.
    ///
    /// The node is appended, so it sorts after existing siblings with the same
    /// draw order. Moving a node into its own subtree is rejected.
    pub fn reparent(&mut self, id: NodeId, parent: Option<NodeId>) -> Result<(), SceneError> {
        self.ensure_not_default(id)?;
        let node = self.find(id).ok_or(SceneError::NodeNotFound(id))?;
        if let Some(parent) = parent {
            if parent == id || node.base().find(parent).is_some() {
                return Err(SceneError::InvalidParent { node: id, parent });
            }
            if self.find(parent).is_none() {
                return Err(SceneError::NodeNotFound(parent));
            }
        }

        let node = self.remove(id)?;
        match parent {
            Some(parent) => {
                self.add_to(parent, node)?;
            }
            None => {
                self.add_boxed(node);
            }
        }
        Ok(())
    }

    /// Top-level ids in traversal order, including inactive ones.
    pub fn top_level_ids(&self) -> Vec<NodeId> {
        self.top_level_in_draw_order().iter().map(|n| n.id()).collect()
    }

    /// Number of top-level children, default layers included.
    pub fn top_level_count(&self) -> usize {
        self.layers.len() + self.nodes.len()
    }

    /// Total number of nodes in the scene, layers included.
    pub fn node_count(&self) -> usize {
        self.top_level().map(|n| 1 + n.base().node_count()).sum()
    }

    /// Visit active nodes depth-first in traversal order.
    pub fn visit_active(&self, mut f: impl FnMut(&dyn Node, usize)) {
        for node in self.top_level_in_draw_order() {
            walk(node, 0, false, &mut f);
        }
    }

    /// Visit every node, active or not, depth-first in traversal order.
    pub fn visit_all(&self, mut f: impl FnMut(&dyn Node, usize)) {
        for node in self.top_level_in_draw_order() {
            walk(node, 0, true, &mut f);
        }
    }

    /// Render every active top-level child in ascending draw order.
    ///
    /// The first draw failure aborts the pass and is returned. The context's
    /// transform stack is balanced afterwards either way.
    pub fn render(&self, ctx: &mut dyn DrawContext) -> Result<(), DrawError> {
        let _span = tracing::debug_span!("scene_render", scene = %self.name).entered();
        for node in self.top_level_in_draw_order() {
            if node.is_active() {
                node.render(ctx)?;
            }
        }
        Ok(())
    }

    fn top_level(&self) -> impl Iterator<Item = &dyn Node> {
        self.layers
            .iter()
            .map(|s| &s.item as &dyn Node)
            .chain(self.nodes.iter().map(|s| s.item.as_ref()))
    }

    fn top_level_in_draw_order(&self) -> Vec<&dyn Node> {
        let mut entries: Vec<(SortKey, &dyn Node)> = self
            .layers
            .iter()
            .map(|s| (SortKey::new(s.item.draw_order(), s.seq), &s.item as &dyn Node))
            .chain(
                self.nodes
                    .iter()
                    .map(|s| (SortKey::new(s.item.draw_order(), s.seq), s.item.as_ref())),
            )
            .collect();
        entries.sort_by_key(|(key, _)| *key);
        entries.into_iter().map(|(_, node)| node).collect()
    }

    fn ensure_not_default(&self, id: NodeId) -> Result<(), SceneError> {
        for idx in [WORLD, UI] {
            let layer = &self.layers[idx].item;
            if layer.id() == id {
                return Err(SceneError::ProtectedLayer(layer.name().to_string()));
            }
        }
        Ok(())
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}
