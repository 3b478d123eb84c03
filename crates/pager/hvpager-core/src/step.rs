//! Discrete positions of the paged intro and the vocabulary used to move between them.

use serde::{Deserialize, Serialize};

/// Position within the hero/vision/slogan sequence.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    Hero = 0,
    Vision1 = 1,
    Vision2 = 2,
    Slogan = 3,
}

impl Step {
    pub const ALL: [Step; 4] = [Step::Hero, Step::Vision1, Step::Vision2, Step::Slogan];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Step> {
        Self::ALL.get(index).copied()
    }

    /// Following step, `None` at the terminal step.
    #[inline]
    pub fn next(self) -> Option<Step> {
        Self::from_index(self.index() + 1)
    }

    /// Preceding step, `None` at the first step.
    #[inline]
    pub fn prev(self) -> Option<Step> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Step::Slogan)
    }

    /// Number of steps between `self` and `other`.
    #[inline]
    pub fn distance(self, other: Step) -> usize {
        self.index().abs_diff(other.index())
    }

    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            Step::Hero => "hero",
            Step::Vision1 => "vision_1",
            Step::Vision2 => "vision_2",
            Step::Slogan => "slogan",
        }
    }
}

/// Direction of intent, expressed in page terms: `Forward` moves down the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Direction of a signed page delta; zero carries no direction.
    pub fn of(delta: f64) -> Option<Direction> {
        if delta > 0.0 {
            Some(Direction::Forward)
        } else if delta < 0.0 {
            Some(Direction::Backward)
        } else {
            None
        }
    }

    /// Step reached from `from` when moving in this direction.
    pub fn apply(self, from: Step) -> Option<Step> {
        match self {
            Direction::Forward => from.next(),
            Direction::Backward => from.prev(),
        }
    }
}

/// What caused a step change. Drives both timing and presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionOrigin {
    /// First reconciliation after the slide widget initialised.
    Initial,
    /// Full reload, logo click or scroll-to-top link.
    Reload,
    /// Wheel or touch gesture accepted by the accumulator.
    Gesture,
    /// Navigation menu intent targeting a paged step.
    Menu,
    /// Navigation menu intent targeting the body; the pager parks on the slogan.
    Handoff,
    /// Slide change started by the widget itself.
    Widget,
}

impl TransitionOrigin {
    /// Instant (zero-duration) jumps bypass gesture thresholds and easing.
    #[inline]
    pub fn is_instant(self) -> bool {
        matches!(
            self,
            TransitionOrigin::Initial
                | TransitionOrigin::Reload
                | TransitionOrigin::Menu
                | TransitionOrigin::Handoff
        )
    }

    /// Only menu-triggered arrivals replay the title entry motion.
    #[inline]
    pub fn plays_entry(self) -> bool {
        matches!(self, TransitionOrigin::Menu)
    }

    /// Arrivals at the hero replay the hero text motion, except the first
    /// reconciliation (the load handler plays it).
    #[inline]
    pub fn plays_hero_motion(self) -> bool {
        !matches!(self, TransitionOrigin::Initial)
    }
}
