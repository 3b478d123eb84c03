//! In-memory capability implementations for simulations, replays and tests.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::input::Viewport;
use crate::reconcile::{Flag, MissingTarget, Presentation, Target};
use crate::slide::SlideWidget;
use crate::surface::{ScrollSurface, SurfaceOp};

/// A document that scrolls in memory. Pinning freezes the visible offset at 0.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    pub offset: f64,
    pub viewport: Viewport,
    pub overflow_suppressed: bool,
    pub pinned_at: Option<f64>,
    /// Another subsystem (navigation overlay, dialog) holds the pin.
    pub external_pin: bool,
    pub ops: Vec<SurfaceOp>,
}

impl HeadlessSurface {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// Native scroll by the user. Ignored while the page is locked.
    pub fn user_scroll_to(&mut self, offset: f64) -> bool {
        if self.overflow_suppressed || self.is_pinned() {
            return false;
        }
        self.offset = offset.max(0.0);
        true
    }
}

impl ScrollSurface for HeadlessSurface {
    fn offset(&self) -> f64 {
        self.offset
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn is_pinned(&self) -> bool {
        self.pinned_at.is_some() || self.external_pin
    }

    fn set_overflow_suppressed(&mut self, suppressed: bool) {
        self.overflow_suppressed = suppressed;
        self.ops.push(SurfaceOp::SuppressOverflow { on: suppressed });
    }

    fn pin(&mut self, offset: f64) {
        self.pinned_at = Some(offset);
        self.offset = 0.0;
        self.ops.push(SurfaceOp::Pin { offset });
    }

    fn unpin(&mut self) {
        self.pinned_at = None;
        self.ops.push(SurfaceOp::Unpin);
    }

    fn scroll_instant(&mut self, offset: f64) {
        self.offset = offset;
        self.ops.push(SurfaceOp::ScrollInstant { offset });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpRecord {
    pub index: usize,
    pub duration_ms: f64,
    pub run_side_effects: bool,
}

/// Slide widget stand-in. Jumps land immediately; lifecycle notifications are
/// the caller's job.
#[derive(Debug, Clone)]
pub struct HeadlessWidget {
    pub ready: bool,
    pub index: usize,
    pub speed: f64,
    pub input_enabled: (bool, bool),
    pub input_toggles: usize,
    pub jumps: Vec<JumpRecord>,
}

impl Default for HeadlessWidget {
    fn default() -> Self {
        Self::with_speed(850.0)
    }
}

impl HeadlessWidget {
    pub fn with_speed(speed: f64) -> Self {
        Self {
            ready: true,
            index: 0,
            speed,
            input_enabled: (true, true),
            input_toggles: 0,
            jumps: Vec::new(),
        }
    }

    /// A widget that failed to initialise.
    pub fn missing() -> Self {
        Self {
            ready: false,
            ..Self::default()
        }
    }
}

impl SlideWidget for HeadlessWidget {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn current_index(&self) -> usize {
        self.index
    }

    fn speed_ms(&self) -> f64 {
        self.speed
    }

    fn set_speed_ms(&mut self, ms: f64) {
        self.speed = ms;
    }

    fn jump_to(&mut self, index: usize, duration_ms: f64, run_side_effects: bool) {
        self.index = index;
        self.jumps.push(JumpRecord {
            index,
            duration_ms,
            run_side_effects,
        });
    }

    fn set_input_enabled(&mut self, wheel: bool, touch: bool) {
        self.input_enabled = (wheel, touch);
        self.input_toggles += 1;
    }
}

/// Records flags and attributes instead of rendering them.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresentation {
    pub flags: BTreeSet<(Target, &'static str)>,
    pub attributes: BTreeMap<(Target, String), String>,
    /// Targets that behave as absent from the page.
    pub missing: BTreeSet<Target>,
    pub attribute_writes: usize,
}

impl RecordingPresentation {
    pub fn without(targets: impl IntoIterator<Item = Target>) -> Self {
        Self {
            missing: targets.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn has_flag(&self, target: Target, flag: Flag) -> bool {
        self.flags.contains(&(target, flag.class_name()))
    }

    pub fn attribute(&self, target: Target, name: &str) -> Option<&str> {
        self.attributes
            .get(&(target, name.to_string()))
            .map(String::as_str)
    }

    fn check(&self, target: Target) -> Result<(), MissingTarget> {
        if self.missing.contains(&target) {
            Err(MissingTarget(target.key()))
        } else {
            Ok(())
        }
    }
}

impl Presentation for RecordingPresentation {
    fn toggle_flag(&mut self, target: Target, flag: Flag, on: bool) -> Result<(), MissingTarget> {
        self.check(target)?;
        let key = (target, flag.class_name());
        if on {
            self.flags.insert(key);
        } else {
            self.flags.remove(&key);
        }
        Ok(())
    }

    fn set_attribute(
        &mut self,
        target: Target,
        name: &str,
        value: &str,
    ) -> Result<(), MissingTarget> {
        self.check(target)?;
        self.attributes
            .insert((target, name.to_string()), value.to_string());
        self.attribute_writes += 1;
        Ok(())
    }
}
