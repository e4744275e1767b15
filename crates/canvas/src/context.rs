use glam::{Affine2, Vec2};
use strata_common::{Color, Rect};

/// Errors raised while drawing.
#[derive(Debug, thiserror::Error)]
pub enum DrawError {
    #[error("non-finite transform in effect at draw time")]
    NonFiniteTransform,
    #[error("node '{node}' failed to draw: {reason}")]
    Node { node: String, reason: String },
}

/// A single drawing primitive, expressed in the coordinate space of the
/// transform in effect when it is issued.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Rect { rect: Rect, color: Color },
    Circle { center: Vec2, radius: f32, color: Color },
    Text { text: String, origin: Vec2, size: f32, color: Color },
}

impl DrawCmd {
    /// Short human-readable tag used in dumps.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Rect { .. } => "rect",
            Self::Circle { .. } => "circle",
            Self::Text { .. } => "text",
        }
    }
}

/// Immediate-mode 2D drawing context with a save/restore transform stack.
///
/// `transform` composes onto the current matrix (`current = current * m`),
/// the same way a canvas `transform()` call does. Callers that change the
/// transform should do it inside a [`TransformScope`](crate::TransformScope).
pub trait DrawContext {
    /// Push the current transform onto the stack.
    fn save(&mut self);

    /// Pop the most recently saved transform and make it current.
    fn restore(&mut self);

    /// Post-multiply the current transform by `m`.
    fn transform(&mut self, m: Affine2);

    /// Replace the current transform.
    fn set_transform(&mut self, m: Affine2);

    fn current_transform(&self) -> Affine2;

    /// Number of saved states currently on the stack.
    fn depth(&self) -> usize;

    /// Issue a draw command under the current transform.
    fn draw(&mut self, cmd: &DrawCmd) -> Result<(), DrawError>;

    fn translate(&mut self, offset: Vec2) {
        self.transform(Affine2::from_translation(offset));
    }

    fn scale(&mut self, factor: Vec2) {
        self.transform(Affine2::from_scale(factor));
    }

    fn rotate(&mut self, radians: f32) {
        self.transform(Affine2::from_angle(radians));
    }
}
