//! Recorded input traces and their replay against a pager.

use serde::{Deserialize, Serialize};

use crate::error::{PagerError, Result};
use crate::headless::HeadlessSurface;
use crate::input::{NavTarget, ScrollSample, TouchInput, Viewport, WheelInput};
use crate::pager::{Pager, PagerSnapshot};
use crate::reconcile::Presentation;
use crate::slide::SlideWidget;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceInput {
    Load,
    Wheel(WheelInput),
    Touch { touch: TouchInput },
    Scroll(ScrollSample),
    /// Resize the headless surface, then notify the pager.
    SetViewport(Viewport),
    Navigate { nav: NavTarget },
    SlideStart { index: usize },
    SlideEnd { index: usize },
    Tick,
    /// Move the headless document as a user would; ignored while locked.
    UserScroll { offset: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub at_ms: f64,
    #[serde(flatten)]
    pub input: TraceInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayFrame {
    pub at_ms: f64,
    /// `Some(true)` when the event's native action would be cancelled.
    pub consumed: Option<bool>,
    pub snapshot: PagerSnapshot,
}

/// Feed `events` to `pager` in order and snapshot after each one.
/// Timestamps must not go backwards.
pub fn replay<W, P>(
    pager: &mut Pager<HeadlessSurface, W, P>,
    events: &[TraceEvent],
) -> Result<Vec<ReplayFrame>>
where
    W: SlideWidget,
    P: Presentation,
{
    let mut frames = Vec::with_capacity(events.len());
    let mut last = f64::NEG_INFINITY;
    for (index, ev) in events.iter().enumerate() {
        let now = ev.at_ms;
        if !now.is_finite() || now < last {
            return Err(PagerError::Trace {
                index,
                at_ms: now,
                reason: format!("timestamp goes backwards (previous {last}ms)"),
            });
        }
        last = now;

        let consumed = match &ev.input {
            TraceInput::Load => {
                pager.load(now);
                None
            }
            TraceInput::Wheel(w) => Some(pager.on_wheel(*w, now).is_consumed()),
            TraceInput::Touch { touch } => Some(pager.on_touch(*touch, now).is_consumed()),
            TraceInput::Scroll(s) => {
                pager.on_scroll(*s, now);
                None
            }
            TraceInput::SetViewport(v) => {
                pager.surface_mut().viewport = *v;
                pager.on_viewport_change(now);
                None
            }
            TraceInput::Navigate { nav } => Some(pager.navigate(*nav, now).is_ok()),
            TraceInput::SlideStart { index } => {
                pager.on_slide_change_start(*index, now);
                None
            }
            TraceInput::SlideEnd { index } => {
                pager.on_slide_change_end(*index, now);
                None
            }
            TraceInput::Tick => {
                pager.tick(now);
                None
            }
            TraceInput::UserScroll { offset } => {
                pager.surface_mut().user_scroll_to(*offset);
                None
            }
        };
        frames.push(ReplayFrame {
            at_ms: now,
            consumed,
            snapshot: pager.snapshot(),
        });
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PagerConfig;
    use crate::headless::{HeadlessWidget, RecordingPresentation};

    #[test]
    fn backwards_timestamps_are_rejected() {
        let mut pager = Pager::new(
            PagerConfig::default(),
            HeadlessSurface::default(),
            HeadlessWidget::default(),
            RecordingPresentation::default(),
        )
        .unwrap();
        let events = vec![
            TraceEvent {
                at_ms: 10.0,
                input: TraceInput::Load,
            },
            TraceEvent {
                at_ms: 5.0,
                input: TraceInput::Tick,
            },
        ];
        let err = replay(&mut pager, &events).unwrap_err();
        assert!(matches!(err, PagerError::Trace { index: 1, .. }));
    }

    #[test]
    fn events_parse_from_json() {
        let ev: Vec<TraceEvent> = serde_json::from_str(
            r#"[
                { "at_ms": 0, "kind": "load" },
                { "at_ms": 16, "kind": "wheel", "delta_y": 10, "mode": "pixel" },
                { "at_ms": 20, "kind": "touch", "touch": { "phase": "start", "y": 300 } },
                { "at_ms": 30, "kind": "navigate", "nav": { "target": "body", "offset": 1200 } }
            ]"#,
        )
        .unwrap();
        assert_eq!(ev[1].input, TraceInput::Wheel(WheelInput::pixels(10.0)));
        assert!(matches!(
            ev[3].input,
            TraceInput::Navigate {
                nav: NavTarget::Body { offset }
            } if offset == 1200.0
        ));
    }
}
