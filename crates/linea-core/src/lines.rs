//! Strategy price line sets
//!
//! A `LineSet` is the producer's declared present state: which horizontal
//! price levels a strategy currently wants drawn. An entirely empty set is
//! the "no position" signal and forces a cleared display.

use crate::{LineaError, LineaResult};

/// The horizontal indicator kinds a strategy can publish
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LineKind {
    StopLoss,
    Target,
    Entry,
    TrailingActivation,
}

impl LineKind {
    pub const ALL: [LineKind; 4] = [
        LineKind::StopLoss,
        LineKind::Target,
        LineKind::Entry,
        LineKind::TrailingActivation,
    ];

    /// Short wire label, as the producer spells it
    pub fn label(self) -> &'static str {
        match self {
            LineKind::StopLoss => "SL",
            LineKind::Target => "TP",
            LineKind::Entry => "ENTRY",
            LineKind::TrailingActivation => "TSA",
        }
    }
}

/// Current price-line state of one strategy instance
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineSet {
    pub stop_loss: Option<f64>,
    pub target: Option<f64>,
    pub entry: Option<f64>,
    pub trailing_activation: Option<f64>,
    pub trailing_active: bool,
}

impl LineSet {
    pub fn new() -> Self {
        LineSet::default()
    }

    /// Get the price for one line kind
    #[inline]
    pub fn get(&self, kind: LineKind) -> Option<f64> {
        match kind {
            LineKind::StopLoss => self.stop_loss,
            LineKind::Target => self.target,
            LineKind::Entry => self.entry,
            LineKind::TrailingActivation => self.trailing_activation,
        }
    }

    /// Set the price for one line kind
    pub fn set(&mut self, kind: LineKind, price: Option<f64>) {
        match kind {
            LineKind::StopLoss => self.stop_loss = price,
            LineKind::Target => self.target = price,
            LineKind::Entry => self.entry = price,
            LineKind::TrailingActivation => self.trailing_activation = price,
        }
    }

    /// True when no line carries a value - the explicit "no position" shape
    pub fn is_empty(&self) -> bool {
        LineKind::ALL.iter().all(|&kind| self.get(kind).is_none())
    }

    /// True when at least one value (or the trailing flag) differs
    pub fn differs_from(&self, other: &LineSet) -> bool {
        self != other
    }

    /// Reject non-finite prices before they can reach the reconciled state
    pub fn validate(&self) -> LineaResult<()> {
        for kind in LineKind::ALL {
            if let Some(price) = self.get(kind) {
                if !price.is_finite() {
                    return Err(LineaError::MalformedUpdate(format!(
                        "non-finite {} price: {}",
                        kind.label(),
                        price
                    )));
                }
            }
        }
        Ok(())
    }
}
