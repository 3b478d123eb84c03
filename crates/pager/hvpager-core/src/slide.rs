//! Slide widget capability and the adapter the pager drives it through.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::step::Step;

/// Third-party full-page slide widget, as seen by the pager.
pub trait SlideWidget {
    /// False when the widget is missing or failed to initialise.
    fn is_ready(&self) -> bool;
    fn current_index(&self) -> usize;
    /// Configured default transition speed.
    fn speed_ms(&self) -> f64;
    fn set_speed_ms(&mut self, ms: f64);
    fn jump_to(&mut self, index: usize, duration_ms: f64, run_side_effects: bool);
    /// Toggle the widget's own wheel and touch handling.
    fn set_input_enabled(&mut self, wheel: bool, touch: bool);
}

/// Who handles wheel/touch input on the paged region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputOwner {
    /// The pager intercepts; the widget's handlers are off.
    Pager,
    /// The widget handles input itself (pager detached).
    Widget,
    /// Native scrolling (body hand-off, pull-to-refresh).
    Nobody,
}

impl InputOwner {
    fn widget_flags(self) -> (bool, bool) {
        match self {
            InputOwner::Widget => (true, true),
            InputOwner::Pager | InputOwner::Nobody => (false, false),
        }
    }
}

pub struct SlideAdapter<W: SlideWidget> {
    widget: W,
    owner: Option<InputOwner>,
}

impl<W: SlideWidget> SlideAdapter<W> {
    pub fn new(widget: W) -> Self {
        Self {
            widget,
            owner: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.widget.is_ready()
    }

    /// Step the widget currently shows, if its index maps to one.
    pub fn current(&self) -> Option<Step> {
        Step::from_index(self.widget.current_index())
    }

    /// Zero-duration jump. The configured speed is restored afterwards so eased
    /// gesture slides keep their timing.
    pub fn jump(&mut self, to: Step) {
        let speed = self.widget.speed_ms();
        self.widget.set_speed_ms(0.0);
        self.widget.jump_to(to.index(), 0.0, false);
        self.widget.set_speed_ms(speed);
        debug!(step = to.name(), "slide jump");
    }

    /// Eased slide with the widget's own side effects.
    pub fn slide(&mut self, to: Step, duration_ms: f64) {
        self.widget.jump_to(to.index(), duration_ms, true);
    }

    pub fn claim_input(&mut self, owner: InputOwner) {
        if self.owner == Some(owner) {
            return;
        }
        let (wheel, touch) = owner.widget_flags();
        self.widget.set_input_enabled(wheel, touch);
        self.owner = Some(owner);
    }

    pub fn input_owner(&self) -> Option<InputOwner> {
        self.owner
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }
}
