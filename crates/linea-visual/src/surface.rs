//! The rendering surface seam
//!
//! Chart drawing lives outside this system. Everything visual crosses this
//! trait, which a chart adapter implements; calls are idempotent so the
//! coordinator can re-issue full state at any time.

use linea_core::LineKind;

use crate::{Color, PointMarker};

/// Rendering hints for a horizontal indicator
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LineStyle {
    pub dashed: bool,
    /// Emphasized width while the trailing stop is active
    pub emphasized: bool,
}

/// Outbound interface to the chart
pub trait RenderSurface {
    /// Create or update the persistent indicator for one line kind
    fn apply_line(&mut self, kind: LineKind, price: f64, color: Color, style: LineStyle);

    /// Remove the indicator for one line kind
    fn hide_line(&mut self, kind: LineKind);

    /// Replace the full marker set in one atomic batch, sorted by time
    fn set_markers(&mut self, markers: &[PointMarker]);
}
