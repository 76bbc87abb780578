//! Marker coordination
//!
//! Keeps the rendering surface consistent with the reconciled state and the
//! health snapshot. Line indicators reflect present state (one per non-null
//! line, hidden when null); point markers are history and survive clears.
//! Marker changes always go out as one re-sorted batch replace so the
//! surface never shows a partial set.

use std::collections::HashMap;

use linea_core::{LineKind, LineSet, MarkerId};
use linea_state::HealthSnapshot;

use crate::{base_color, trailing_accent, LineStyle, PointMarker, RenderSurface};

/// Computes renderables from reconciled state + health and commits them
pub struct MarkerCoordinator<S: RenderSurface> {
    surface: S,
    markers: HashMap<MarkerId, PointMarker>,
}

impl<S: RenderSurface> MarkerCoordinator<S> {
    pub fn new(surface: S) -> Self {
        MarkerCoordinator {
            surface,
            markers: HashMap::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Re-issue every line indicator from the given state. Null values hide
    /// their indicator; liveness and trailing activation only change color,
    /// never the prices.
    pub fn sync_lines(&mut self, lines: &LineSet, health: &HealthSnapshot) {
        let orphaned = health.is_orphaned || !health.is_alive;
        for kind in LineKind::ALL {
            match lines.get(kind) {
                Some(price) => {
                    let trailing = lines.trailing_active
                        && matches!(kind, LineKind::StopLoss | LineKind::TrailingActivation);
                    let mut color = if trailing { trailing_accent() } else { base_color(kind) };
                    if orphaned {
                        color = color.muted();
                    }
                    let style = LineStyle {
                        dashed: kind == LineKind::TrailingActivation,
                        emphasized: trailing,
                    };
                    self.surface.apply_line(kind, price, color, style);
                }
                None => self.surface.hide_line(kind),
            }
        }
    }

    /// Hide all four indicators (the explicit-clear directive)
    pub fn clear_lines(&mut self) {
        for kind in LineKind::ALL {
            self.surface.hide_line(kind);
        }
    }

    /// Add or overwrite one point marker. Not visible until `commit_markers`.
    pub fn upsert_marker(&mut self, marker: PointMarker) {
        self.markers.insert(marker.id, marker);
    }

    /// Recombine all markers, re-sort by normalized time, and replace the
    /// surface's marker set in one batch.
    pub fn commit_markers(&mut self) {
        let mut batch: Vec<PointMarker> = self.markers.values().cloned().collect();
        batch.sort_by(|a, b| a.time.cmp(&b.time).then_with(|| a.id.0.cmp(&b.id.0)));
        self.surface.set_markers(&batch);
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Drop everything - strategy switch or deselection
    pub fn clear(&mut self) {
        self.markers.clear();
        self.clear_lines();
        self.surface.set_markers(&[]);
    }
}
