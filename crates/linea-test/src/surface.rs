//! Recording surface for assertions

use std::collections::HashMap;

use linea_core::LineKind;
use linea_visual::{Color, LineStyle, PointMarker, RenderSurface};

/// One applied horizontal indicator
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AppliedLine {
    pub price: f64,
    pub color: Color,
    pub style: LineStyle,
}

/// A `RenderSurface` that records every call for inspection
#[derive(Default)]
pub struct RecordingSurface {
    lines: HashMap<LineKind, AppliedLine>,
    pub apply_calls: u64,
    pub hide_calls: u64,
    marker_batches: Vec<Vec<PointMarker>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        RecordingSurface::default()
    }

    /// Currently visible indicator for a line kind
    pub fn line(&self, kind: LineKind) -> Option<&AppliedLine> {
        self.lines.get(&kind)
    }

    pub fn visible_lines(&self) -> usize {
        self.lines.len()
    }

    /// The marker set after the most recent batch replace
    pub fn markers(&self) -> &[PointMarker] {
        self.marker_batches.last().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn batch_count(&self) -> usize {
        self.marker_batches.len()
    }
}

impl RenderSurface for RecordingSurface {
    fn apply_line(&mut self, kind: LineKind, price: f64, color: Color, style: LineStyle) {
        self.apply_calls += 1;
        self.lines.insert(kind, AppliedLine { price, color, style });
    }

    fn hide_line(&mut self, kind: LineKind) {
        self.hide_calls += 1;
        self.lines.remove(&kind);
    }

    fn set_markers(&mut self, markers: &[PointMarker]) {
        self.marker_batches.push(markers.to_vec());
    }
}
