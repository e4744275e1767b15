use std::any::Any;
use std::fmt;

use glam::Vec2;
use strata_canvas::{DrawCmd, DrawContext, DrawError};
use strata_common::{Color, NodeId, Rect};

/// State shared by every node: identity, activation, ordering, and owned children.
#[derive(Debug)]
pub struct NodeBase {
    id: NodeId,
    name: String,
    active: bool,
    draw_order: i32,
    /// Insertion order. Attaching always appends.
    children: Vec<Box<dyn Node>>,
}

impl NodeBase {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            active: true,
            draw_order: 0,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn draw_order(&self) -> i32 {
        self.draw_order
    }

    pub fn set_draw_order(&mut self, draw_order: i32) {
        self.draw_order = draw_order;
    }

    /// Take ownership of `child` and append it. Returns its id.
    pub fn add_child(&mut self, child: Box<dyn Node>) -> NodeId {
        let id = child.id();
        tracing::debug!(parent = %self.name, child = %child.name(), %id, "attach");
        self.children.push(child);
        id
    }

    /// Detach a direct child.
    pub fn remove_child(&mut self, id: NodeId) -> Option<Box<dyn Node>> {
        let pos = self.children.iter().position(|c| c.id() == id)?;
        let child = self.children.remove(pos);
        tracing::debug!(parent = %self.name, child = %child.name(), %id, "detach");
        Some(child)
    }

    /// Detach a node anywhere in this subtree.
    pub fn take_descendant(&mut self, id: NodeId) -> Option<Box<dyn Node>> {
        if let Some(child) = self.remove_child(id) {
            return Some(child);
        }
        self.children
            .iter_mut()
            .find_map(|c| c.base_mut().take_descendant(id))
    }

    /// Direct children in insertion order.
    pub fn children(&self) -> &[Box<dyn Node>] {
        &self.children
    }

    /// Direct children in traversal order: ascending draw order, stable for ties.
    pub fn children_in_draw_order(&self) -> Vec<&dyn Node> {
        let mut sorted: Vec<&dyn Node> = self.children.iter().map(|c| c.as_ref()).collect();
        // `sort_by_key` is stable, so equal keys keep insertion order.
        sorted.sort_by_key(|c| c.draw_order());
        sorted
    }

    pub fn child(&self, id: NodeId) -> Option<&dyn Node> {
        self.children
            .iter()
            .find(|c| c.id() == id)
            .map(|c| c.as_ref())
    }

    /// Depth-first search of the subtree below this node.
    pub fn find(&self, id: NodeId) -> Option<&dyn Node> {
        for child in &self.children {
            if child.id() == id {
                return Some(child.as_ref());
            }
            if let Some(found) = child.base().find(id) {
                return Some(found);
            }
        }
        None
    }

    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut dyn Node> {
        for child in &mut self.children {
            if child.id() == id {
                return Some(child.as_mut());
            }
            if let Some(found) = child.base_mut().find_mut(id) {
                return Some(found);
            }
        }
        None
    }

    /// Number of nodes below this one.
    pub fn node_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| 1 + c.base().node_count())
            .sum()
    }

    /// Render every child in traversal order. Stops at the first failure.
    pub fn render_children(&self, ctx: &mut dyn DrawContext) -> Result<(), DrawError> {
        for child in self.children_in_draw_order() {
            if child.is_active() {
                child.render(ctx)?;
            }
        }
        Ok(())
    }
}

/// The scene-graph node contract.
///
/// Implementors hold a [`NodeBase`] and expose it through `base`/`base_mut`;
/// everything else has a default. `draw` is the per-node hook and draws only
/// the node itself. `render` is the traversal: skip if inactive, draw, then
/// render children in order. Override `render` to wrap the traversal (as
/// [`Layer`](crate::Layer) does), override `draw` to paint content.
pub trait Node: fmt::Debug + Any {
    fn base(&self) -> &NodeBase;
    fn base_mut(&mut self) -> &mut NodeBase;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Type tag used by inspection tools.
    fn kind(&self) -> &'static str {
        "node"
    }

    fn draw(&self, _ctx: &mut dyn DrawContext) -> Result<(), DrawError> {
        Ok(())
    }

    fn render(&self, ctx: &mut dyn DrawContext) -> Result<(), DrawError> {
        if !self.is_active() {
            return Ok(());
        }
        self.draw(ctx)?;
        self.base().render_children(ctx)
    }

    fn id(&self) -> NodeId {
        self.base().id()
    }

    fn name(&self) -> &str {
        self.base().name()
    }

    fn is_active(&self) -> bool {
        self.base().is_active()
    }

    fn set_active(&mut self, active: bool) {
        self.base_mut().set_active(active);
    }

    fn draw_order(&self) -> i32 {
        self.base().draw_order()
    }

    fn set_draw_order(&mut self, draw_order: i32) {
        self.base_mut().set_draw_order(draw_order);
    }

    fn add_child<N: Node>(&mut self, child: N) -> NodeId
    where
        Self: Sized,
    {
        self.base_mut().add_child(Box::new(child))
    }
}

impl dyn Node {
    pub fn is<T: Node>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Node>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Node>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// Walk a subtree depth-first in traversal order, calling `f` with each node
/// and its depth relative to `node`. Inactive subtrees are skipped unless
/// `include_inactive` is set.
pub fn walk(
    node: &dyn Node,
    depth: usize,
    include_inactive: bool,
    f: &mut dyn FnMut(&dyn Node, usize),
) {
    if !include_inactive && !node.is_active() {
        return;
    }
    f(node, depth);
    for child in node.base().children_in_draw_order() {
        walk(child, depth + 1, include_inactive, f);
    }
}

/// Plain container node. Draws nothing itself.
#[derive(Debug)]
pub struct Group {
    base: NodeBase,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: NodeBase::new(name),
        }
    }

    pub fn with_draw_order(mut self, draw_order: i32) -> Self {
        self.base.set_draw_order(draw_order);
        self
    }
}

impl Node for Group {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn kind(&self) -> &'static str {
        "group"
    }
}

/// Leaf drawable: issues one draw command under the inherited transform.
#[derive(Debug)]
pub struct Shape {
    base: NodeBase,
    pub cmd: DrawCmd,
}

impl Shape {
    pub fn new(name: impl Into<String>, cmd: DrawCmd) -> Self {
        Self {
            base: NodeBase::new(name),
            cmd,
        }
    }

    pub fn rect(name: impl Into<String>, rect: Rect, color: Color) -> Self {
        Self::new(name, DrawCmd::Rect { rect, color })
    }

    pub fn circle(name: impl Into<String>, center: Vec2, radius: f32, color: Color) -> Self {
        Self::new(
            name,
            DrawCmd::Circle {
                center,
                radius,
                color,
            },
        )
    }

    pub fn text(name: impl Into<String>, text: impl Into<String>, origin: Vec2, size: f32) -> Self {
        Self::new(
            name,
            DrawCmd::Text {
                text: text.into(),
                origin,
                size,
                color: Color::WHITE,
            },
        )
    }

    pub fn with_draw_order(mut self, draw_order: i32) -> Self {
        self.base.set_draw_order(draw_order);
        self
    }
}

impl Node for Shape {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn kind(&self) -> &'static str {
        "shape"
    }

    fn draw(&self, ctx: &mut dyn DrawContext) -> Result<(), DrawError> {
        ctx.draw(&self.cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_canvas::RecordingCanvas;

    fn square(name: &str, x: f32) -> Shape {
        Shape::rect(name, Rect::new(x, 0.0, 1.0, 1.0), Color::WHITE)
    }

    fn drawn_xs(canvas: &RecordingCanvas) -> Vec<f32> {
        canvas
            .records()
            .iter()
            .map(|r| match &r.cmd {
                DrawCmd::Rect { rect, .. } => rect.origin.x,
                other => panic!("unexpected command {other:?}"),
            })
            .collect()
    }

    #[test]
    fn new_node_defaults() {
        let g = Group::new("root");
        assert_eq!(g.name(), "root");
        assert!(g.is_active());
        assert_eq!(g.draw_order(), 0);
        assert!(g.base().children().is_empty());
    }

    #[test]
    fn children_render_by_draw_order() {
        let mut root = Group::new("root");
        root.add_child(square("c", 3.0).with_draw_order(5));
        root.add_child(square("a", 1.0).with_draw_order(-5));
        root.add_child(square("b", 2.0));

        let mut canvas = RecordingCanvas::new();
        root.render(&mut canvas).unwrap();
        assert_eq!(drawn_xs(&canvas), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn equal_draw_orders_keep_insertion_order() {
        let mut root = Group::new("root");
        for i in 0..6 {
            root.add_child(square("s", i as f32).with_draw_order(7));
        }
        let mut canvas = RecordingCanvas::new();
        root.render(&mut canvas).unwrap();
        assert_eq!(drawn_xs(&canvas), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn inactive_subtree_is_skipped() {
        let mut root = Group::new("root");
        let mut hidden = Group::new("hidden");
        hidden.add_child(square("inner", 9.0));
        hidden.set_active(false);
        root.add_child(hidden);
        root.add_child(square("visible", 1.0));

        let mut canvas = RecordingCanvas::new();
        root.render(&mut canvas).unwrap();
        assert_eq!(drawn_xs(&canvas), vec![1.0]);
    }

    #[test]
    fn parent_draws_before_children() {
        let mut parent = square("parent", 0.0);
        parent.add_child(square("child", 1.0));
        let mut canvas = RecordingCanvas::new();
        parent.render(&mut canvas).unwrap();
        assert_eq!(drawn_xs(&canvas), vec![0.0, 1.0]);
    }

    #[test]
    fn find_and_take_descendant() {
        let mut root = Group::new("root");
        let mut mid = Group::new("mid");
        let leaf_id = mid.add_child(square("leaf", 0.0));
        let mid_id = root.add_child(mid);

        assert_eq!(root.base().node_count(), 2);
        assert_eq!(root.base().find(leaf_id).unwrap().name(), "leaf");
        assert!(root.base().child(leaf_id).is_none());
        assert!(root.base().child(mid_id).is_some());

        let leaf = root.base_mut().take_descendant(leaf_id).unwrap();
        assert_eq!(leaf.name(), "leaf");
        assert_eq!(root.base().node_count(), 1);
        assert!(root.base().find(leaf_id).is_none());
    }

    #[test]
    fn find_mut_allows_edits() {
        let mut root = Group::new("root");
        let id = root.add_child(square("leaf", 0.0));
        root.base_mut().find_mut(id).unwrap().set_draw_order(42);
        assert_eq!(root.base().child(id).unwrap().draw_order(), 42);
    }

    #[test]
    fn readding_moves_to_end_of_insertion_order() {
        let mut root = Group::new("root");
        let first = root.add_child(square("first", 0.0));
        root.add_child(square("second", 1.0));

        let node = root.base_mut().remove_child(first).unwrap();
        root.base_mut().add_child(node);

        let mut canvas = RecordingCanvas::new();
        root.render(&mut canvas).unwrap();
        assert_eq!(drawn_xs(&canvas), vec![1.0, 0.0]);
    }

    #[test]
    fn downcast_to_concrete_type() {
        let boxed: Box<dyn Node> = Box::new(Group::new("g"));
        assert!(boxed.is::<Group>());
        assert!(!boxed.is::<Shape>());
        assert_eq!(boxed.downcast_ref::<Group>().unwrap().name(), "g");
    }

    #[test]
    fn walk_visits_in_traversal_order() {
        let mut root = Group::new("root");
        let mut b = Group::new("b").with_draw_order(1);
        b.add_child(square("b1", 0.0));
        root.add_child(b);
        root.add_child(Group::new("a"));
        let mut off = Group::new("off");
        off.set_active(false);
        root.add_child(off);

        let mut seen = Vec::new();
        walk(&root, 0, false, &mut |n, d| seen.push(format!("{}:{d}", n.name())));
        assert_eq!(seen, vec!["root:0", "a:1", "b:1", "b1:2"]);

        let mut all = 0;
        walk(&root, 0, true, &mut |_, _| all += 1);
        assert_eq!(all, 5);
    }
}
