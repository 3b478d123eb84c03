//! Hero/vision paged-intro scroll orchestration (engine-agnostic).
//!
//! A pure state machine ([`machine`]) decides; a [`Pager`] driver applies its
//! effects through three capabilities: [`ScrollSurface`], [`SlideWidget`] and
//! [`Presentation`]. In-memory implementations live in [`headless`].

pub mod accumulate;
pub mod config;
pub mod error;
pub mod headless;
pub mod input;
pub mod lock;
pub mod machine;
pub mod pager;
pub mod reconcile;
pub mod scheduler;
pub mod slide;
pub mod step;
pub mod surface;
pub mod trace;
pub mod zone;

// Re-exports for hosts (wasm wrapper, simulations)
pub use accumulate::{normalize_delta, AccumulatorState, Sample, TouchState};
pub use config::{
    AssetConfig, EdgeThreshold, GestureConfig, LockConfig, PagerConfig, TimingConfig, ZoneConfig,
};
pub use error::{PagerError, Result};
pub use headless::{HeadlessSurface, HeadlessWidget, RecordingPresentation};
pub use input::{DeltaMode, Disposition, NavTarget, ScrollSample, TouchInput, Viewport, WheelInput};
pub use lock::{LockOutcome, LockState, LockTechnique};
pub use machine::{Effect, PagerContext, PendingTransition, Refusal, Transition};
pub use pager::{Pager, PagerSnapshot};
pub use reconcile::{Flag, MissingTarget, Presentation, Target, VisualEffect};
pub use scheduler::{Scheduler, Task};
pub use slide::{InputOwner, SlideAdapter, SlideWidget};
pub use step::{Direction, Step, TransitionOrigin};
pub use surface::{ScrollSurface, SurfaceOp};
pub use trace::{replay, ReplayFrame, TraceEvent, TraceInput};
pub use zone::ZoneState;
