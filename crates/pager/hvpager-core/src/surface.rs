//! Document scroll capability.

use serde::{Deserialize, Serialize};

use crate::input::Viewport;

/// The host's scrolling primitive. Implemented over the DOM by the wasm wrapper
/// and in memory by [`crate::headless::HeadlessSurface`].
pub trait ScrollSurface {
    /// Current vertical document offset.
    fn offset(&self) -> f64;
    fn viewport(&self) -> Viewport;
    /// Shared "position pinned" indicator, true whoever pinned the page.
    fn is_pinned(&self) -> bool;
    /// Hide or restore document overflow.
    fn set_overflow_suppressed(&mut self, suppressed: bool);
    /// Pin the page at `offset` so native scrolling cannot move it.
    fn pin(&mut self, offset: f64);
    fn unpin(&mut self);
    /// Jump to `offset` without easing, regardless of any smooth-scroll styling.
    fn scroll_instant(&mut self, offset: f64);
}

/// A single mutation the lock controller asks of the surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SurfaceOp {
    SuppressOverflow { on: bool },
    Pin { offset: f64 },
    Unpin,
    ScrollInstant { offset: f64 },
}

impl SurfaceOp {
    pub fn apply<S: ScrollSurface + ?Sized>(self, surface: &mut S) {
        match self {
            SurfaceOp::SuppressOverflow { on } => surface.set_overflow_suppressed(on),
            SurfaceOp::Pin { offset } => surface.pin(offset),
            SurfaceOp::Unpin => surface.unpin(),
            SurfaceOp::ScrollInstant { offset } => surface.scroll_instant(offset.max(0.0)),
        }
    }
}
