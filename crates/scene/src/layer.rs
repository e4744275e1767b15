use std::any::Any;
use std::rc::Rc;

use strata_camera::{SharedCamera, WeakCamera};
use strata_canvas::{DrawContext, DrawError, TransformScope};

use crate::node::{Node, NodeBase};

/// Coordinate space a layer renders its children in.
#[derive(Debug, Clone)]
pub enum LayerSpace {
    /// Children are drawn through the camera's view transform.
    /// The layer does not keep the camera alive.
    World(WeakCamera),
    /// Children are drawn with the transform the layer was entered with.
    Screen,
}

impl LayerSpace {
    pub fn label(&self) -> &'static str {
        match self {
            Self::World(_) => "world",
            Self::Screen => "screen",
        }
    }
}

/// A node that scopes a transform around its children's traversal.
///
/// World-space layers apply their camera's transform; screen-space layers
/// apply nothing. Either way the context's transform is saved before the
/// children render and restored afterwards, on every exit path, so the
/// transform can't leak into sibling layers or the caller.
///
/// A layer draws nothing of its own.
#[derive(Debug)]
pub struct Layer {
    base: NodeBase,
    space: LayerSpace,
}

impl Layer {
    /// Create a layer bound to `camera`, or a screen-space layer for `None`.
    pub fn new(name: impl Into<String>, camera: Option<&SharedCamera>) -> Self {
        let mut layer = Self {
            base: NodeBase::new(name),
            space: LayerSpace::Screen,
        };
        layer.set_camera(camera);
        layer
    }

    pub fn world(name: impl Into<String>, camera: &SharedCamera) -> Self {
        Self::new(name, Some(camera))
    }

    pub fn screen(name: impl Into<String>) -> Self {
        Self::new(name, None)
    }

    pub fn with_draw_order(mut self, draw_order: i32) -> Self {
        self.base.set_draw_order(draw_order);
        self
    }

    /// The bound camera, if any and still alive.
    pub fn camera(&self) -> Option<SharedCamera> {
        match &self.space {
            LayerSpace::World(camera) => camera.upgrade(),
            LayerSpace::Screen => None,
        }
    }

    /// Swap the bound camera. Takes effect on the next render.
    pub fn set_camera(&mut self, camera: Option<&SharedCamera>) {
        self.space = match camera {
            Some(camera) => LayerSpace::World(Rc::downgrade(camera)),
            None => LayerSpace::Screen,
        };
    }

    pub fn space(&self) -> &LayerSpace {
        &self.space
    }

    pub fn is_world_space(&self) -> bool {
        matches!(self.space, LayerSpace::World(_))
    }

    fn apply_camera(&self, ctx: &mut dyn DrawContext) -> Result<(), DrawError> {
        let LayerSpace::World(camera) = &self.space else {
            return Ok(());
        };
        match camera.upgrade() {
            Some(camera) => {
                let camera = camera.try_borrow().map_err(|_| DrawError::Node {
                    node: self.base.name().to_string(),
                    reason: "camera is mutably borrowed during render".into(),
                })?;
                camera.apply_transform(ctx);
            }
            None => {
                tracing::warn!(
                    layer = %self.base.name(),
                    "camera dropped, rendering layer untransformed"
                );
            }
        }
        Ok(())
    }
}

impl Node for Layer {
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
        "layer"
    }

    fn render(&self, ctx: &mut dyn DrawContext) -> Result<(), DrawError> {
        if !self.is_active() {
            return Ok(());
        }
        let mut scope = TransformScope::enter(ctx);
        self.apply_camera(&mut *scope)?;
        self.base.render_children(&mut *scope)
    }
}
