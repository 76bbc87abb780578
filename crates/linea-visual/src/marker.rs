//! Point markers for discrete lifecycle events

use linea_core::{EventDetail, MarkerId, PositionAction, TimePoint, TimeShifted};

use crate::Color;

/// Visual shape of a lifecycle marker
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerShape {
    EntryArrow,
    ExitArrow,
    UpdateDot,
}

impl MarkerShape {
    pub fn for_action(action: PositionAction) -> Self {
        match action {
            PositionAction::Open => MarkerShape::EntryArrow,
            PositionAction::Close => MarkerShape::ExitArrow,
            PositionAction::Update => MarkerShape::UpdateDot,
        }
    }
}

/// One marker on the chart, keyed by a stable synthetic id so reprocessing
/// the same event overwrites rather than duplicates
#[derive(Clone, Debug, PartialEq)]
pub struct PointMarker {
    pub id: MarkerId,
    /// Normalized (display-axis, bucket-aligned) time
    pub time: TimePoint,
    pub price: f64,
    pub shape: MarkerShape,
    pub color: Color,
}

impl PointMarker {
    /// Build a marker from an event at its normalized position
    pub fn from_event(detail: &EventDetail, time: TimePoint, price: f64) -> Self {
        let shape = MarkerShape::for_action(detail.action);
        let color = match detail.action {
            PositionAction::Open => Color::new(0.15, 0.68, 0.38),
            PositionAction::Close => Color::new(0.90, 0.22, 0.21),
            PositionAction::Update => Color::new(0.55, 0.58, 0.64),
        };
        PointMarker {
            id: MarkerId::from_event(&detail.id),
            time,
            price,
            shape,
            color,
        }
    }
}

impl TimeShifted for PointMarker {
    fn time(&self) -> TimePoint {
        self.time
    }

    fn shift_to(&mut self, time: TimePoint) {
        self.time = time;
    }
}
