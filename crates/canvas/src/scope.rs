use std::ops::{Deref, DerefMut};

use glam::Affine2;

use crate::DrawContext;

/// Scoped save/restore of a context's transform state.
///
/// `enter` saves; dropping the scope restores. Because the restore lives in
/// `Drop`, it runs on every exit path: normal return, `?` propagation, and
/// panic unwinding. The scope derefs to the wrapped context so nested draws go
/// through it.
///
/// If code inside the scope leaves extra saved states behind, the drop pops
/// them too, so the stack always returns to the depth it had before `enter`.
/// If code inside pops our own saved state, the drop puts the entry transform
/// back instead of popping further.
pub struct TransformScope<'a, C: DrawContext + ?Sized> {
    ctx: &'a mut C,
    /// Stack depth right after our own save.
    depth: usize,
    /// Transform in effect before `enter`.
    entry: Affine2,
}

impl<'a, C: DrawContext + ?Sized> TransformScope<'a, C> {
    pub fn enter(ctx: &'a mut C) -> Self {
        let entry = ctx.current_transform();
        ctx.save();
        let depth = ctx.depth();
        Self { ctx, depth, entry }
    }
}

impl<C: DrawContext + ?Sized> Deref for TransformScope<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.ctx
    }
}

impl<C: DrawContext + ?Sized> DerefMut for TransformScope<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.ctx
    }
}

impl<C: DrawContext + ?Sized> Drop for TransformScope<'_, C> {
    fn drop(&mut self) {
        let current = self.ctx.depth();
        if current < self.depth {
            tracing::warn!(
                missing = self.depth - current,
                "saved state popped inside transform scope, resetting to entry transform"
            );
            self.ctx.set_transform(self.entry);
            return;
        }
        if current > self.depth {
            tracing::warn!(
                leaked = current - self.depth,
                "unbalanced save inside transform scope, unwinding"
            );
        }
        // Bounded so a context that misreports depth can't spin forever.
        let pops = current.saturating_sub(self.depth) + 1;
        for _ in 0..pops {
            if self.ctx.depth() < self.depth {
                break;
            }
            self.ctx.restore();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DrawError, RecordingCanvas};
    use glam::{Affine2, Vec2};

    #[test]
    fn scope_restores_on_drop() {
        let mut canvas = RecordingCanvas::new();
        {
            let mut scope = TransformScope::enter(&mut canvas);
            scope.translate(Vec2::new(5.0, 0.0));
            assert_eq!(scope.depth(), 1);
        }
        assert_eq!(canvas.depth(), 0);
        assert_eq!(canvas.current_transform(), Affine2::IDENTITY);
    }

    #[test]
    fn scope_restores_on_error_path() {
        fn failing(ctx: &mut dyn DrawContext) -> Result<(), DrawError> {
            let mut scope = TransformScope::enter(ctx);
            scope.scale(Vec2::splat(2.0));
            Err(DrawError::Node {
                node: "probe".into(),
                reason: "boom".into(),
            })
        }

        let mut canvas = RecordingCanvas::new();
        assert!(failing(&mut canvas).is_err());
        assert_eq!(canvas.depth(), 0);
        assert_eq!(canvas.current_transform(), Affine2::IDENTITY);
    }

    #[test]
    fn scope_restores_on_panic() {
        let mut canvas = RecordingCanvas::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut scope = TransformScope::enter(&mut canvas);
            scope.rotate(1.0);
            panic!("draw blew up");
        }));
        assert!(result.is_err());
        assert_eq!(canvas.depth(), 0);
        assert_eq!(canvas.current_transform(), Affine2::IDENTITY);
    }

    #[test]
    fn scope_unwinds_leaked_saves() {
        let mut canvas = RecordingCanvas::new();
        canvas.translate(Vec2::new(1.0, 1.0));
        let before = canvas.current_transform();
        {
            let mut scope = TransformScope::enter(&mut canvas);
            scope.save();
            scope.save();
            scope.scale(Vec2::splat(3.0));
        }
        assert_eq!(canvas.depth(), 0);
        assert_eq!(canvas.current_transform(), before);
    }

    #[test]
    fn scope_recovers_when_inner_code_pops_its_save() {
        let mut canvas = RecordingCanvas::new();
        canvas.translate(Vec2::new(4.0, 2.0));
        let before = canvas.current_transform();
        {
            let mut scope = TransformScope::enter(&mut canvas);
            scope.scale(Vec2::splat(2.0));
            scope.restore();
            scope.translate(Vec2::new(77.0, 0.0));
            assert_eq!(scope.depth(), 0);
        }
        assert_eq!(canvas.depth(), 0);
        assert_eq!(canvas.current_transform(), before);
    }

    #[test]
    fn nested_scopes_stack() {
        let mut canvas = RecordingCanvas::new();
        {
            let mut outer = TransformScope::enter(&mut canvas);
            outer.translate(Vec2::new(10.0, 0.0));
            {
                let mut inner = TransformScope::enter(&mut *outer);
                inner.translate(Vec2::new(0.0, 10.0));
                assert_eq!(inner.depth(), 2);
                assert_eq!(
                    inner.current_transform(),
                    Affine2::from_translation(Vec2::new(10.0, 10.0))
                );
            }
            assert_eq!(
                outer.current_transform(),
                Affine2::from_translation(Vec2::new(10.0, 0.0))
            );
        }
        assert_eq!(canvas.depth(), 0);
    }
}
