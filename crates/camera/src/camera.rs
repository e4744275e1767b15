use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::{Affine2, Vec2};
use strata_canvas::DrawContext;

pub const MIN_ZOOM: f32 = 0.01;
pub const MAX_ZOOM: f32 = 100.0;

/// Owning handle to a camera. Scenes keep one of these for their primary camera.
pub type SharedCamera = Rc<RefCell<Camera2D>>;

/// Non-owning handle to a camera, as held by layers.
pub type WeakCamera = Weak<RefCell<Camera2D>>;

/// 2D camera looking at `position` with the given zoom and rotation.
///
/// `position` is the world point shown at the viewport center. A freshly
/// created camera looks at the viewport center with zoom 1, which makes its
/// transform the identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera2D {
    pub position: Vec2,
    pub zoom: f32,
    /// Radians, counter-clockwise.
    pub rotation: f32,
    pub viewport: Vec2,
}

impl Camera2D {
    pub fn new(width: f32, height: f32) -> Self {
        let viewport = Vec2::new(width, height);
        Self {
            position: viewport * 0.5,
            zoom: 1.0,
            rotation: 0.0,
            viewport,
        }
    }

    /// Wrap the camera in a shared handle.
    pub fn shared(self) -> SharedCamera {
        Rc::new(RefCell::new(self))
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Move the camera by `delta` world units.
    pub fn pan(&mut self, delta: Vec2) {
        self.position += delta;
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Multiply the zoom by `factor`, clamped to `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn zoom_by(&mut self, factor: f32) {
        self.set_zoom(self.zoom * factor);
    }

    pub fn rotate(&mut self, radians: f32) {
        self.rotation += radians;
    }

    /// Change the viewport size. The camera keeps looking at the same world point.
    pub fn resize(&mut self, width: f32, height: f32) {
        tracing::debug!(width, height, "camera viewport resized");
        self.viewport = Vec2::new(width, height);
    }

    /// World-to-screen transform.
    pub fn view_transform(&self) -> Affine2 {
        Affine2::from_translation(self.viewport * 0.5)
            * Affine2::from_angle(-self.rotation)
            * Affine2::from_scale(Vec2::splat(self.zoom))
            * Affine2::from_translation(-self.position)
    }

    /// Compose the view transform onto the context's current transform.
    pub fn apply_transform<C: DrawContext + ?Sized>(&self, ctx: &mut C) {
        ctx.transform(self.view_transform());
    }

    pub fn world_to_screen(&self, p: Vec2) -> Vec2 {
        self.view_transform().transform_point2(p)
    }

    pub fn screen_to_world(&self, p: Vec2) -> Vec2 {
        self.view_transform().inverse().transform_point2(p)
    }
}

impl Default for Camera2D {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_canvas::RecordingCanvas;

    #[test]
    fn default_camera_is_identity() {
        let cam = Camera2D::new(800.0, 600.0);
        assert_eq!(cam.position, Vec2::new(400.0, 300.0));
        assert_eq!(cam.view_transform(), Affine2::IDENTITY);
    }

    #[test]
    fn panning_shifts_world() {
        let mut cam = Camera2D::new(800.0, 600.0);
        cam.pan(Vec2::new(100.0, 0.0));
        // The camera moved right, so the world appears shifted left.
        assert_eq!(cam.world_to_screen(Vec2::new(500.0, 300.0)), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn zoom_scales_around_viewport_center() {
        let mut cam = Camera2D::new(800.0, 600.0);
        cam.set_zoom(2.0);
        assert_eq!(cam.world_to_screen(Vec2::new(400.0, 300.0)), Vec2::new(400.0, 300.0));
        assert_eq!(cam.world_to_screen(Vec2::new(410.0, 300.0)), Vec2::new(420.0, 300.0));
    }

    #[test]
    fn zoom_is_clamped() {
        let mut cam = Camera2D::default();
        cam.zoom_by(0.0);
        assert_eq!(cam.zoom, MIN_ZOOM);
        cam.set_zoom(1e6);
        assert_eq!(cam.zoom, MAX_ZOOM);
    }

    #[test]
    fn screen_to_world_inverts() {
        let mut cam = Camera2D::new(640.0, 480.0);
        cam.pan(Vec2::new(-30.0, 12.0));
        cam.set_zoom(1.5);
        cam.rotate(0.3);
        let world = Vec2::new(123.0, -45.0);
        let back = cam.screen_to_world(cam.world_to_screen(world));
        assert!(back.abs_diff_eq(world, 1e-3));
    }

    #[test]
    fn apply_transform_composes_onto_context() {
        let mut cam = Camera2D::new(800.0, 600.0);
        cam.pan(Vec2::new(50.0, 50.0));
        let mut canvas = RecordingCanvas::new();
        canvas.translate(Vec2::new(7.0, 0.0));
        let before = canvas.current_transform();
        cam.apply_transform(&mut canvas);
        assert_eq!(canvas.current_transform(), before * cam.view_transform());
    }

    #[test]
    fn resize_keeps_focus() {
        let mut cam = Camera2D::new(800.0, 600.0);
        let focus = cam.position;
        cam.resize(1024.0, 768.0);
        assert_eq!(cam.position, focus);
        assert_eq!(cam.world_to_screen(focus), Vec2::new(512.0, 384.0));
    }

    #[test]
    fn shared_handle_downgrades() {
        let cam = Camera2D::default().shared();
        let weak = Rc::downgrade(&cam);
        assert!(weak.upgrade().is_some());
        drop(cam);
        assert!(weak.upgrade().is_none());
    }
}
