//! Gesture accumulation: turns bursts of wheel deltas and touch travel into discrete intents.
//!
//! Wheel input is summed inside a rolling idle window; touch input is measured as
//! displacement from the touch start and fires at most once per touch sequence.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::{EdgeThreshold, GestureConfig};
use crate::input::{DeltaMode, WheelInput};
use crate::step::Direction;

/// Convert a wheel delta to signed pixels.
pub fn normalize_delta(input: &WheelInput, viewport_height: f64, cfg: &GestureConfig) -> f64 {
    match input.mode {
        DeltaMode::Pixel => input.delta_y,
        DeltaMode::Line => input.delta_y * cfg.line_height_px,
        DeltaMode::Page => {
            let vh = if viewport_height > 0.0 {
                viewport_height
            } else {
                cfg.page_height_fallback_px
            };
            input.delta_y * vh
        }
    }
}

/// Result of feeding one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    /// Below the jitter floor; state untouched.
    Jitter,
    /// Added to the running sum; threshold not reached yet.
    Accumulating { magnitude: f64, threshold: f64 },
    /// Threshold reached; the running sum has been cleared.
    Triggered { direction: Direction, magnitude: f64 },
}

/// Rolling wheel-magnitude sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AccumulatorState {
    pub magnitude: f64,
    pub window_start: Option<f64>,
    pub last_sample_at: Option<f64>,
    pub direction: Option<Direction>,
}

impl AccumulatorState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.direction.is_none()
    }

    /// Feed a signed pixel delta against the threshold of the edge it points at.
    pub fn feed(
        &mut self,
        px: f64,
        now: f64,
        edge: &EdgeThreshold,
        jitter_floor_px: f64,
    ) -> Sample {
        let abs = px.abs();
        if abs < jitter_floor_px {
            return Sample::Jitter;
        }
        let Some(direction) = Direction::of(px) else {
            return Sample::Jitter;
        };

        if self.direction != Some(direction) {
            self.reset();
        } else if let Some(last) = self.last_sample_at {
            if now - last > edge.window_ms {
                self.reset();
            }
        }

        if self.window_start.is_none() {
            self.window_start = Some(now);
        }
        self.direction = Some(direction);
        self.last_sample_at = Some(now);
        self.magnitude += abs;
        trace!(
            magnitude = self.magnitude,
            threshold = edge.wheel_px,
            ?direction,
            "wheel sample"
        );

        if self.magnitude >= edge.wheel_px {
            let magnitude = self.magnitude;
            self.reset();
            Sample::Triggered {
                direction,
                magnitude,
            }
        } else {
            Sample::Accumulating {
                magnitude: self.magnitude,
                threshold: edge.wheel_px,
            }
        }
    }
}

/// Single-finger touch tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TouchState {
    pub start_y: Option<f64>,
    /// A gesture already fired for this touch sequence.
    pub consumed: bool,
}

impl TouchState {
    pub fn begin(&mut self, y: f64) {
        self.start_y = Some(y);
        self.consumed = false;
    }

    pub fn end(&mut self) {
        *self = Self::default();
    }

    /// Finger travel since the start; positive when the finger moved down.
    pub fn finger_travel(&self, y: f64) -> Option<f64> {
        self.start_y.map(|start| y - start)
    }

    /// Page-direction travel: a finger moving up scrolls the page forward.
    pub fn page_travel(&self, y: f64) -> Option<f64> {
        self.finger_travel(y).map(|dy| -dy)
    }

    /// Evaluate a move against the edge selected for its direction.
    /// Fires once per touch sequence.
    pub fn evaluate<'a>(
        &mut self,
        y: f64,
        edge_for: impl FnOnce(Direction) -> Option<&'a EdgeThreshold>,
    ) -> Option<Direction> {
        if self.consumed {
            return None;
        }
        let travel = self.page_travel(y)?;
        let direction = Direction::of(travel)?;
        let edge = edge_for(direction)?;
        if travel.abs() >= edge.touch_px {
            self.consumed = true;
            Some(direction)
        } else {
            None
        }
    }
}
