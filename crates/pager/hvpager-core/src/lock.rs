//! Scroll lock planning.
//!
//! The controller is pure: it reads a [`LockProbe`] taken from the surface and
//! returns the next [`LockState`] plus the surface operations to run, in order.
//! It never fights a pin it did not place.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::LockConfig;
use crate::surface::SurfaceOp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockTechnique {
    /// Overflow suppression plus fixed-position pinning (wide viewports).
    Pinned,
    /// Overflow suppression only (narrow viewports; keeps toolbar resizing and
    /// pull-to-refresh working).
    OverflowOnly,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LockState {
    pub locked: bool,
    /// Offset recorded when the lock was taken; restored on unlock.
    pub locked_offset: f64,
    pub technique: Option<LockTechnique>,
}

impl LockState {
    #[inline]
    pub fn owns_pin(&self) -> bool {
        self.locked && self.technique == Some(LockTechnique::Pinned)
    }
}

/// Surface facts sampled right before planning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LockProbe {
    pub offset: f64,
    pub viewport_width: f64,
    /// The shared pinned indicator.
    pub pinned: bool,
    /// A pull-to-refresh gesture is active at the top of the hero.
    pub pull_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockOutcome {
    Locked(LockTechnique),
    AlreadyLocked,
    ExternalOwner,
    PullInProgress,
    Unlocked,
    NotLocked,
    Released,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LockPlan {
    pub state: LockState,
    pub ops: Vec<SurfaceOp>,
    pub outcome: LockOutcome,
}

impl LockPlan {
    fn noop(state: &LockState, outcome: LockOutcome) -> Self {
        Self {
            state: *state,
            ops: Vec::new(),
            outcome,
        }
    }
}

#[inline]
fn pinned_externally(state: &LockState, probe: &LockProbe) -> bool {
    probe.pinned && !state.owns_pin()
}

/// Pin the page. Idempotent: a second call keeps the first recorded offset.
pub fn lock(state: &LockState, probe: &LockProbe, cfg: &LockConfig) -> LockPlan {
    if state.locked {
        return LockPlan::noop(state, LockOutcome::AlreadyLocked);
    }
    if pinned_externally(state, probe) {
        warn!("scroll lock owned by another subsystem; leaving it alone");
        return LockPlan::noop(state, LockOutcome::ExternalOwner);
    }
    if probe.pull_active {
        debug!("pull-to-refresh in progress; lock skipped");
        return LockPlan::noop(state, LockOutcome::PullInProgress);
    }

    let offset = probe.offset.max(0.0);
    let (technique, ops) = if cfg.is_narrow(probe.viewport_width) {
        (
            LockTechnique::OverflowOnly,
            vec![SurfaceOp::SuppressOverflow { on: true }],
        )
    } else {
        (
            LockTechnique::Pinned,
            vec![
                SurfaceOp::SuppressOverflow { on: true },
                SurfaceOp::Pin { offset },
            ],
        )
    };
    debug!(?technique, offset, "scroll locked");
    LockPlan {
        state: LockState {
            locked: true,
            locked_offset: offset,
            technique: Some(technique),
        },
        ops,
        outcome: LockOutcome::Locked(technique),
    }
}

/// Undo this controller's lock and jump back to the recorded offset.
/// A no-op when not locked.
pub fn unlock(state: &LockState) -> LockPlan {
    if !state.locked {
        return LockPlan::noop(state, LockOutcome::NotLocked);
    }
    let mut ops = vec![SurfaceOp::SuppressOverflow { on: false }];
    if state.technique == Some(LockTechnique::Pinned) {
        ops.push(SurfaceOp::Unpin);
    }
    ops.push(SurfaceOp::ScrollInstant {
        offset: state.locked_offset,
    });
    debug!(offset = state.locked_offset, "scroll unlocked");
    LockPlan {
        state: LockState::default(),
        ops,
        outcome: LockOutcome::Unlocked,
    }
}

/// Clear any leftover lock styling, whether or not this controller thinks it is
/// locked. Safe at any time; leaves foreign pins alone.
pub fn release_stale(state: &LockState, probe: &LockProbe) -> LockPlan {
    if pinned_externally(state, probe) {
        debug!("stale-lock release skipped: pin owned elsewhere");
        return LockPlan::noop(state, LockOutcome::ExternalOwner);
    }
    let mut ops = vec![SurfaceOp::SuppressOverflow { on: false }];
    if probe.pinned {
        ops.push(SurfaceOp::Unpin);
        ops.push(SurfaceOp::ScrollInstant {
            offset: state.locked_offset,
        });
    }
    LockPlan {
        state: LockState::default(),
        ops,
        outcome: LockOutcome::Released,
    }
}
