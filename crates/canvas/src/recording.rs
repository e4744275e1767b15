use glam::Affine2;

use crate::{DrawCmd, DrawContext, DrawError};

/// A draw command together with the transform that was current when it was issued.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub cmd: DrawCmd,
    pub transform: Affine2,
    /// Stack depth at draw time.
    pub depth: usize,
}

/// In-memory drawing context that records every command instead of rasterizing.
///
/// Useful for tests, logging, and the CLI. Restoring an empty stack is
/// ignored (with a warning), matching how a browser canvas behaves.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    current: Affine2,
    stack: Vec<Affine2>,
    records: Vec<DrawRecord>,
    saves: usize,
    restores: usize,
    transform_ops: usize,
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self {
            current: Affine2::IDENTITY,
            stack: Vec::new(),
            records: Vec::new(),
            saves: 0,
            restores: 0,
            transform_ops: 0,
        }
    }
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded draws in issue order.
    pub fn records(&self) -> &[DrawRecord] {
        &self.records
    }

    /// Drain the recorded draws, keeping the transform state.
    pub fn take_records(&mut self) -> Vec<DrawRecord> {
        std::mem::take(&mut self.records)
    }

    pub fn save_count(&self) -> usize {
        self.saves
    }

    pub fn restore_count(&self) -> usize {
        self.restores
    }

    /// Calls to `transform`/`set_transform`, including the helpers built on them.
    pub fn transform_mutations(&self) -> usize {
        self.transform_ops
    }

    /// True when no saved state is left on the stack.
    pub fn is_balanced(&self) -> bool {
        self.stack.is_empty()
    }

    /// Human-readable listing of everything drawn so far.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Canvas (draws={}, saves={}, restores={}, depth={}) ===\n",
            self.records.len(),
            self.saves,
            self.restores,
            self.stack.len()
        ));
        for (i, rec) in self.records.iter().enumerate() {
            let t = rec.transform.translation;
            let m = rec.transform.matrix2;
            out.push_str(&format!(
                "  #{i:<3} {:<6} depth={} m=[{:.2} {:.2} {:.2} {:.2}] t=({:.1}, {:.1}){}\n",
                rec.cmd.kind(),
                rec.depth,
                m.x_axis.x,
                m.x_axis.y,
                m.y_axis.x,
                m.y_axis.y,
                t.x,
                t.y,
                describe(&rec.cmd),
            ));
        }
        out
    }
}

fn describe(cmd: &DrawCmd) -> String {
    match cmd {
        DrawCmd::Rect { rect, .. } => format!(
            " rect=({:.1}, {:.1}, {:.1}x{:.1})",
            rect.origin.x, rect.origin.y, rect.size.x, rect.size.y
        ),
        DrawCmd::Circle { center, radius, .. } => {
            format!(" center=({:.1}, {:.1}) r={radius:.1}", center.x, center.y)
        }
        DrawCmd::Text { text, origin, .. } => {
            format!(" \"{text}\" at ({:.1}, {:.1})", origin.x, origin.y)
        }
    }
}

impl DrawContext for RecordingCanvas {
    fn save(&mut self) {
        self.stack.push(self.current);
        self.saves += 1;
    }

    fn restore(&mut self) {
        match self.stack.pop() {
            Some(t) => {
                self.current = t;
                self.restores += 1;
            }
            None => tracing::warn!("restore called on an empty transform stack"),
        }
    }

    fn transform(&mut self, m: Affine2) {
        self.current = self.current * m;
        self.transform_ops += 1;
    }

    fn set_transform(&mut self, m: Affine2) {
        self.current = m;
        self.transform_ops += 1;
    }

    fn current_transform(&self) -> Affine2 {
        self.current
    }

    fn depth(&self) -> usize {
        self.stack.len()
    }

    fn draw(&mut self, cmd: &DrawCmd) -> Result<(), DrawError> {
        if !self.current.is_finite() {
            return Err(DrawError::NonFiniteTransform);
        }
        tracing::trace!(kind = cmd.kind(), depth = self.stack.len(), "draw");
        self.records.push(DrawRecord {
            cmd: cmd.clone(),
            transform: self.current,
            depth: self.stack.len(),
        });
        Ok(())
    }
}
