//! Pager configuration: gesture thresholds, zone hysteresis, lock technique and timings.
//!
//! Every group deserialises with `#[serde(default)]`, so hosts only pass the
//! values they want to override.

use serde::{Deserialize, Serialize};

use crate::error::{PagerError, Result};
use crate::step::{Direction, Step};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagerConfig {
    pub gesture: GestureConfig,
    pub zone: ZoneConfig,
    pub lock: LockConfig,
    pub timing: TimingConfig,
    pub assets: AssetConfig,
}

/// Magnitude needed to cross one edge of the sequence, per input kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeThreshold {
    /// Accumulated wheel magnitude (px) that triggers the transition.
    pub wheel_px: f64,
    /// Finger displacement (px) from touch start that triggers the transition.
    pub touch_px: f64,
    /// Idle gap (ms) after which accumulated wheel magnitude is discarded.
    pub window_ms: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Wheel deltas below this magnitude are trackpad jitter.
    pub jitter_floor_px: f64,
    /// Pixel size of one "line" wheel unit.
    pub line_height_px: f64,
    /// Size of one "page" wheel unit when the viewport height is unknown.
    pub page_height_fallback_px: f64,
    /// Finger travel that decides between pull-to-refresh and a forward swipe at the hero.
    pub pull_slop_px: f64,
    /// All forward edges. A threshold of 1px fires on the first qualifying event.
    pub forward: EdgeThreshold,
    /// Backward edges out of the vision steps.
    pub reverse: EdgeThreshold,
    /// Backward edge out of the slogan; must be strictly larger than `reverse`.
    pub reverse_from_slogan: EdgeThreshold,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            jitter_floor_px: 6.0,
            line_height_px: 16.0,
            page_height_fallback_px: 800.0,
            pull_slop_px: 6.0,
            forward: EdgeThreshold {
                wheel_px: 1.0,
                touch_px: 12.0,
                window_ms: 260.0,
            },
            reverse: EdgeThreshold {
                wheel_px: 200.0,
                touch_px: 80.0,
                window_ms: 260.0,
            },
            reverse_from_slogan: EdgeThreshold {
                wheel_px: 280.0,
                touch_px: 140.0,
                window_ms: 320.0,
            },
        }
    }
}

impl GestureConfig {
    /// Threshold for leaving `from` in `direction`; `None` when no step lies that way.
    pub fn edge(&self, from: Step, direction: Direction) -> Option<&EdgeThreshold> {
        direction.apply(from)?;
        Some(match (direction, from) {
            (Direction::Forward, _) => &self.forward,
            (Direction::Backward, Step::Slogan) => &self.reverse_from_slogan,
            (Direction::Backward, _) => &self.reverse,
        })
    }

    /// Forward threshold at the slogan, where the next gesture hands off to the body.
    pub fn release(&self) -> &EdgeThreshold {
        &self.forward
    }
}

/// Hysteresis band, as fractions of the viewport height, for the body's top edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneConfig {
    /// Interception disarms once the body top rises to or above this line.
    pub disarm_fraction: f64,
    /// Interception re-arms once the body top falls to or below this line.
    pub rearm_fraction: f64,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            disarm_fraction: 0.20,
            rearm_fraction: 0.55,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// Viewports at or below this width use overflow suppression only.
    pub narrow_breakpoint_px: f64,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            narrow_breakpoint_px: 768.0,
        }
    }
}

impl LockConfig {
    #[inline]
    pub fn is_narrow(&self, viewport_width: f64) -> bool {
        viewport_width <= self.narrow_breakpoint_px
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Eased forward slide duration.
    pub slide_ms: f64,
    /// Eased backward slide duration ("reverse playback").
    pub reverse_slide_ms: f64,
    /// Input quiet period added after every transition to absorb inertial scrolling.
    pub settle_ms: f64,
    /// How long the title mask stays after a menu-triggered entry.
    pub title_mask_ms: f64,
    /// Minimum spacing between two hero text motions.
    pub hero_motion_cooldown_ms: f64,
    /// Frames to wait after a body hand-off before scrolling to the menu target.
    pub body_nav_frames: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            slide_ms: 850.0,
            reverse_slide_ms: 1250.0,
            settle_ms: 520.0,
            title_mask_ms: 900.0,
            hero_motion_cooldown_ms: 900.0,
            body_nav_frames: 3,
        }
    }
}

/// Media pre-loaded ahead of the steps that show them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub video_wide: String,
    pub video_narrow: String,
    pub image_wide: String,
    pub image_narrow: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            video_wide: "img/global_video.mp4".into(),
            video_narrow: "img/global_video_m.mp4".into(),
            image_wide: "img/vision_sjw.jpg".into(),
            image_narrow: "img/vision_sjw_m.jpg".into(),
        }
    }
}

impl AssetConfig {
    pub fn video(&self, narrow: bool) -> &str {
        if narrow {
            &self.video_narrow
        } else {
            &self.video_wide
        }
    }

    pub fn image(&self, narrow: bool) -> &str {
        if narrow {
            &self.image_narrow
        } else {
            &self.image_wide
        }
    }
}

fn non_negative(field: &str, v: f64) -> Result<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(PagerError::config(field, format!("{v} must be finite and >= 0")))
    }
}

fn edge_ok(name: &str, e: &EdgeThreshold) -> Result<()> {
    non_negative(&format!("gesture.{name}.wheel_px"), e.wheel_px)?;
    non_negative(&format!("gesture.{name}.touch_px"), e.touch_px)?;
    non_negative(&format!("gesture.{name}.window_ms"), e.window_ms)
}

impl PagerConfig {
    /// Reject values that would break the pager's invariants.
    pub fn validate(&self) -> Result<()> {
        let g = &self.gesture;
        non_negative("gesture.jitter_floor_px", g.jitter_floor_px)?;
        non_negative("gesture.pull_slop_px", g.pull_slop_px)?;
        for (field, v) in [
            ("gesture.line_height_px", g.line_height_px),
            ("gesture.page_height_fallback_px", g.page_height_fallback_px),
        ] {
            if !(v.is_finite() && v > 0.0) {
                return Err(PagerError::config(field, "must be a positive number"));
            }
        }
        edge_ok("forward", &g.forward)?;
        edge_ok("reverse", &g.reverse)?;
        edge_ok("reverse_from_slogan", &g.reverse_from_slogan)?;
        if g.reverse_from_slogan.wheel_px <= g.reverse.wheel_px {
            return Err(PagerError::config(
                "gesture.reverse_from_slogan.wheel_px",
                "must be strictly larger than gesture.reverse.wheel_px",
            ));
        }
        if g.reverse_from_slogan.touch_px <= g.reverse.touch_px {
            return Err(PagerError::config(
                "gesture.reverse_from_slogan.touch_px",
                "must be strictly larger than gesture.reverse.touch_px",
            ));
        }

        let z = &self.zone;
        if !(0.0..=1.0).contains(&z.disarm_fraction) || !(0.0..=1.0).contains(&z.rearm_fraction)
        {
            return Err(PagerError::config(
                "zone",
                "fractions must lie within [0, 1]",
            ));
        }
        if z.disarm_fraction >= z.rearm_fraction {
            return Err(PagerError::config(
                "zone.disarm_fraction",
                "must be strictly below zone.rearm_fraction",
            ));
        }

        non_negative("lock.narrow_breakpoint_px", self.lock.narrow_breakpoint_px)?;

        let t = &self.timing;
        non_negative("timing.slide_ms", t.slide_ms)?;
        non_negative("timing.reverse_slide_ms", t.reverse_slide_ms)?;
        non_negative("timing.settle_ms", t.settle_ms)?;
        non_negative("timing.title_mask_ms", t.title_mask_ms)?;
        non_negative("timing.hero_motion_cooldown_ms", t.hero_motion_cooldown_ms)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        PagerConfig::default().validate().expect("defaults are valid");
    }

    #[test]
    fn slogan_edge_is_stricter_than_vision_edges() {
        let g = GestureConfig::default();
        let v = g.edge(Step::Vision2, Direction::Backward).unwrap();
        let s = g.edge(Step::Slogan, Direction::Backward).unwrap();
        assert!(s.wheel_px > v.wheel_px);
        assert!(s.touch_px > v.touch_px);
        assert!(s.window_ms > v.window_ms);
    }

    #[test]
    fn no_edge_beyond_the_ends() {
        let g = GestureConfig::default();
        assert!(g.edge(Step::Hero, Direction::Backward).is_none());
        assert!(g.edge(Step::Slogan, Direction::Forward).is_none());
        assert_eq!(g.edge(Step::Hero, Direction::Forward).unwrap().wheel_px, 1.0);
    }

    #[test]
    fn rejects_non_increasing_slogan_threshold() {
        let mut cfg = PagerConfig::default();
        cfg.gesture.reverse_from_slogan.wheel_px = cfg.gesture.reverse.wheel_px;
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, PagerError::InvalidConfig { ref field, .. } if field == "gesture.reverse_from_slogan.wheel_px"));
    }

    #[test]
    fn rejects_collapsed_hysteresis_band() {
        let mut cfg = PagerConfig::default();
        cfg.zone.disarm_fraction = 0.6;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: PagerConfig =
            serde_json::from_str(r#"{ "timing": { "settle_ms": 100 } }"#).unwrap();
        assert_eq!(cfg.timing.settle_ms, 100.0);
        assert_eq!(cfg.timing.slide_ms, 850.0);
        assert_eq!(cfg.gesture, GestureConfig::default());
    }
}
