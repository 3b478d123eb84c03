//! Input contracts: raw events the host forwards, and what the pager answers.

use serde::{Deserialize, Serialize};

/// Unit of a wheel delta, mirroring DOM `deltaMode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

impl DeltaMode {
    /// Unknown modes are treated as pixels.
    pub fn from_dom(mode: u32) -> Self {
        match mode {
            1 => DeltaMode::Line,
            2 => DeltaMode::Page,
            _ => DeltaMode::Pixel,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelInput {
    /// Vertical delta; positive scrolls down the page.
    pub delta_y: f64,
    #[serde(default)]
    pub mode: DeltaMode,
}

impl WheelInput {
    pub fn pixels(delta_y: f64) -> Self {
        Self {
            delta_y,
            mode: DeltaMode::Pixel,
        }
    }
}

/// One point of a single-finger touch sequence, in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum TouchInput {
    Start { y: f64 },
    Move { y: f64 },
    End,
    Cancel,
}

/// Document scroll notification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollSample {
    /// Vertical document offset.
    pub offset: f64,
    /// Top edge of the first naturally-scrolling section, relative to the viewport.
    /// `None` when the page has no such section.
    #[serde(default)]
    pub body_top: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

/// Menu intents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum NavTarget {
    /// Logo click or scroll-to-top link: behaves like a reload.
    Top,
    /// First vision step.
    Vision,
    /// A section of the naturally-scrolling body at an absolute document offset.
    Body { offset: f64 },
}

/// Whether the host must suppress the native default action of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    Consumed,
    PassThrough,
}

impl Disposition {
    #[inline]
    pub fn is_consumed(self) -> bool {
        matches!(self, Disposition::Consumed)
    }
}
