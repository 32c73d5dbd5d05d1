//! Scalar axis mappers: time-height to Y, lane name to X.

use arbor_core::Vine;

/// Linear map from time-height to a Y coordinate inside a padded viewport.
///
/// The convention throughout this workspace is "later = higher": `min_time` maps
/// to `height - padding` (bottom) and `max_time` to `padding` (top).
///
/// `max_time == min_time` is a precondition violation (division by zero); callers
/// own guaranteeing a non-degenerate range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemporalScale {
    pub min_time: f64,
    pub max_time: f64,
    pub viewport_height: f64,
    pub padding: f64,
}

impl TemporalScale {
    pub fn new(min_time: f64, max_time: f64, viewport_height: f64, padding: f64) -> Self {
        Self {
            min_time,
            max_time,
            viewport_height,
            padding,
        }
    }

    pub fn y(&self, time_height: f64) -> f64 {
        let span = self.max_time - self.min_time;
        let usable = self.viewport_height - 2.0 * self.padding;
        self.viewport_height - self.padding - ((time_height - self.min_time) / span) * usable
    }
}

/// Equal-width lane columns over a fixed ordered lane list.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneScale {
    lanes: Vec<String>,
    viewport_width: f64,
}

impl LaneScale {
    pub fn new(lanes: Vec<String>, viewport_width: f64) -> Self {
        Self {
            lanes,
            viewport_width,
        }
    }

    /// The six vines in their fixed left-to-right order.
    pub fn of_vines(viewport_width: f64) -> Self {
        Self::new(
            Vine::ALL.iter().map(|v| v.name().to_string()).collect(),
            viewport_width,
        )
    }

    pub fn lanes(&self) -> &[String] {
        &self.lanes
    }

    pub fn lane_width(&self) -> f64 {
        self.viewport_width / self.lanes.len().max(1) as f64
    }

    /// Center X of the named lane. Unknown lane names map to the horizontal
    /// center rather than erroring.
    pub fn x(&self, lane: &str) -> f64 {
        match self.lanes.iter().position(|l| l == lane) {
            Some(i) => (i as f64 + 0.5) * self.lane_width(),
            None => self.viewport_width / 2.0,
        }
    }
}
