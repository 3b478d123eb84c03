//! The pager state machine.
//!
//! Every function here is pure: it takes the current [`PagerContext`] plus the
//! input and an [`Env`] snapshot, and returns the next context together with
//! the [`Effect`]s the driver must apply, in order. Nothing in this module
//! touches a surface, a widget or a presentation.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::accumulate::{normalize_delta, AccumulatorState, Sample, TouchState};
use crate::config::{EdgeThreshold, PagerConfig};
use crate::input::{Disposition, NavTarget, ScrollSample, TouchInput, Viewport, WheelInput};
use crate::lock::LockState;
use crate::reconcile::{self, snap_final, Flag, Target, VisualEffect};
use crate::scheduler::{Scheduled, Task};
use crate::slide::InputOwner;
use crate::step::{Direction, Step, TransitionOrigin};
use crate::zone::{ZoneChange, ZoneState};

/// Surface facts the machine needs, sampled by the driver per input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Env {
    pub offset: f64,
    pub viewport: Viewport,
}

/// The single in-flight move between two steps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingTransition {
    pub from: Step,
    pub to: Step,
    pub start_ms: f64,
    pub duration_ms: f64,
    pub origin: TransitionOrigin,
}

impl PendingTransition {
    #[inline]
    pub fn is_due(&self, now: f64) -> bool {
        now >= self.start_ms + self.duration_ms
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagerContext {
    pub step: Step,
    /// The next forward gesture at the slogan hands off to the body.
    pub armed_for_release: bool,
    /// Native scrolling owns the page below the slogan.
    pub released: bool,
    /// The body has been scrolled past the top since the last release.
    pub body_scrolled: bool,
    pub lock: LockState,
    pub zone: ZoneState,
    pub accumulator: AccumulatorState,
    pub touch: TouchState,
    pub pending: Option<PendingTransition>,
    /// Paged input before this timestamp is dropped (inertial tail).
    pub quiet_until: f64,
    /// A pull-to-refresh gesture is active at the top of the hero.
    pub pulling: bool,
    pub narrow: bool,
    /// Bumped on every step change, release and reset; deferred tasks carry it.
    pub epoch: u64,
    pub enabled: bool,
}

impl Default for PagerContext {
    fn default() -> Self {
        Self {
            step: Step::Hero,
            armed_for_release: false,
            released: false,
            body_scrolled: false,
            lock: LockState::default(),
            zone: ZoneState::default(),
            accumulator: AccumulatorState::default(),
            touch: TouchState::default(),
            pending: None,
            quiet_until: f64::NEG_INFINITY,
            pulling: false,
            narrow: false,
            epoch: 0,
            enabled: true,
        }
    }
}

impl PagerContext {
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[inline]
    fn is_quiet(&self, now: f64) -> bool {
        now < self.quiet_until
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Delay {
    Frames(u64),
    Millis(f64),
}

/// A side effect for the driver to apply.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ReleaseStaleLocks,
    Lock,
    Unlock,
    ScrollInstant(f64),
    SlideJump(Step),
    SlideTo { to: Step, duration_ms: f64 },
    WidgetInput(InputOwner),
    Visual(VisualEffect),
    Schedule { delay: Delay, task: Task },
}

/// Why a step change was refused.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Refusal {
    #[error("a transition is already in flight")]
    Pending,
    #[error("pager is disabled")]
    Disabled,
    #[error("{from:?} -> {to:?} is not a single step")]
    NotAdjacent { from: Step, to: Step },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub ctx: PagerContext,
    pub effects: Vec<Effect>,
}

impl Transition {
    pub fn unchanged(ctx: &PagerContext) -> Self {
        Self {
            ctx: ctx.clone(),
            effects: Vec::new(),
        }
    }

    fn new(ctx: PagerContext, effects: Vec<Effect>) -> Self {
        Self { ctx, effects }
    }

    /// Chain `next`, computed from this transition's context.
    fn then(mut self, next: impl FnOnce(&PagerContext) -> Transition) -> Transition {
        let t = next(&self.ctx);
        self.effects.extend(t.effects);
        self.ctx = t.ctx;
        self
    }
}

/// Translate reconciler output into driver effects.
fn visuals(fx: Vec<VisualEffect>, cfg: &PagerConfig) -> impl Iterator<Item = Effect> + '_ {
    fx.into_iter().map(move |v| match v {
        VisualEffect::FinishEntryNextFrame { target } => Effect::Schedule {
            delay: Delay::Frames(1),
            task: Task::FinishEntry { target },
        },
        VisualEffect::ClearMaskLater => Effect::Schedule {
            delay: Delay::Millis(cfg.timing.title_mask_ms),
            task: Task::ClearTitleMask,
        },
        other => Effect::Visual(other),
    })
}

fn body_visuals(unlocked: bool) -> impl Iterator<Item = Effect> {
    reconcile::body_region(unlocked).into_iter().map(Effect::Visual)
}

/// Threshold for a gesture leaving `step` in `dir`. Forward at the slogan uses
/// the release threshold.
pub fn edge_for(step: Step, dir: Direction, cfg: &PagerConfig) -> Option<&EdgeThreshold> {
    match (step, dir) {
        (Step::Slogan, Direction::Forward) => Some(cfg.gesture.release()),
        _ => cfg.gesture.edge(step, dir),
    }
}

/// Reconcile the widget's initial slide without motion.
pub fn attach(ctx: &PagerContext, widget_step: Step, env: &Env, cfg: &PagerConfig) -> Transition {
    let mut next = ctx.clone();
    next.step = widget_step;
    next.narrow = cfg.lock.is_narrow(env.viewport.width);
    let mut fx: Vec<Effect> = body_visuals(false).collect();
    fx.push(Effect::WidgetInput(InputOwner::Pager));
    fx.extend(visuals(
        reconcile::reconcile(widget_step, TransitionOrigin::Initial, next.narrow, &cfg.assets),
        cfg,
    ));
    Transition::new(next, fx)
}

/// Start a move to `to`. Instant origins complete before returning.
pub fn begin(
    ctx: &PagerContext,
    to: Step,
    origin: TransitionOrigin,
    now: f64,
    env: &Env,
    cfg: &PagerConfig,
) -> Result<Transition, Refusal> {
    if !ctx.enabled {
        return Err(Refusal::Disabled);
    }
    if ctx.is_pending() {
        return Err(Refusal::Pending);
    }
    let from = ctx.step;
    if !origin.is_instant() && from.distance(to) != 1 {
        return Err(Refusal::NotAdjacent { from, to });
    }

    let duration_ms = if origin.is_instant() {
        0.0
    } else if to < from {
        cfg.timing.reverse_slide_ms
    } else {
        cfg.timing.slide_ms
    };

    let mut next = ctx.clone();
    next.step = to;
    next.armed_for_release = false;
    next.released = false;
    next.body_scrolled = false;
    next.pulling = false;
    next.zone = ZoneState::default();
    next.accumulator.reset();
    next.narrow = cfg.lock.is_narrow(env.viewport.width);
    next.epoch += 1;
    next.quiet_until = now + duration_ms + cfg.timing.settle_ms;
    next.pending = Some(PendingTransition {
        from,
        to,
        start_ms: now,
        duration_ms,
        origin,
    });

    let mut fx: Vec<Effect> = body_visuals(false).collect();
    if !ctx.lock.locked {
        fx.push(Effect::ReleaseStaleLocks);
        fx.push(Effect::ScrollInstant(0.0));
    }
    fx.push(Effect::Lock);
    fx.push(Effect::WidgetInput(InputOwner::Pager));
    match origin {
        TransitionOrigin::Widget => {}
        o if o.is_instant() => fx.push(Effect::SlideJump(to)),
        _ => fx.push(Effect::SlideTo { to, duration_ms }),
    }
    fx.extend(visuals(
        reconcile::reconcile(to, origin, next.narrow, &cfg.assets),
        cfg,
    ));
    debug!(
        from = from.name(),
        to = to.name(),
        ?origin,
        duration_ms,
        "transition started"
    );

    let t = Transition::new(next, fx);
    Ok(if duration_ms <= 0.0 {
        t.then(|c| complete(c, now))
    } else {
        t
    })
}

/// Finish the in-flight transition. Arrival at the slogan arms the release.
pub fn complete(ctx: &PagerContext, now: f64) -> Transition {
    let Some(p) = ctx.pending else {
        return Transition::unchanged(ctx);
    };
    let mut next = ctx.clone();
    next.pending = None;
    if next.step == Step::Slogan && !next.released {
        next.armed_for_release = true;
    }
    debug!(
        to = p.to.name(),
        elapsed_ms = now - p.start_ms,
        armed = next.armed_for_release,
        "transition complete"
    );
    Transition::new(next, Vec::new())
}

/// Hand the page to native scrolling below the slogan.
pub fn release(ctx: &PagerContext) -> Transition {
    let mut next = ctx.clone();
    next.released = true;
    next.armed_for_release = false;
    next.body_scrolled = false;
    next.pulling = false;
    next.accumulator.reset();
    next.epoch += 1;
    let mut fx = vec![Effect::Unlock, Effect::WidgetInput(InputOwner::Nobody)];
    fx.extend(body_visuals(true));
    debug!("released to body scroll");
    Transition::new(next, fx)
}

/// Back at the very top after a release: park on the slogan again. The release
/// re-arms once the settle period has passed.
pub fn relock_at_top(ctx: &PagerContext, now: f64, cfg: &PagerConfig) -> Transition {
    let mut next = ctx.clone();
    next.released = false;
    next.armed_for_release = false;
    next.body_scrolled = false;
    next.zone = ZoneState::default();
    next.accumulator.reset();
    next.epoch += 1;
    next.quiet_until = now + cfg.timing.settle_ms;
    let mut fx: Vec<Effect> = body_visuals(false).collect();
    fx.extend([
        Effect::ReleaseStaleLocks,
        Effect::ScrollInstant(0.0),
        Effect::Lock,
        Effect::WidgetInput(InputOwner::Pager),
        Effect::Schedule {
            delay: Delay::Millis(cfg.timing.settle_ms),
            task: Task::RearmRelease,
        },
    ]);
    debug!(step = next.step.name(), "re-locked at top");
    Transition::new(next, fx)
}

/// Reload semantics: drop everything and show the hero at offset 0.
pub fn reset_to_hero(
    ctx: &PagerContext,
    origin: TransitionOrigin,
    env: &Env,
    cfg: &PagerConfig,
) -> Transition {
    let next = PagerContext {
        narrow: cfg.lock.is_narrow(env.viewport.width),
        epoch: ctx.epoch + 1,
        enabled: ctx.enabled,
        lock: ctx.lock,
        ..PagerContext::default()
    };
    let mut fx = vec![Effect::ReleaseStaleLocks, Effect::ScrollInstant(0.0)];
    fx.extend(body_visuals(false));
    fx.extend([
        Effect::SlideJump(Step::Hero),
        Effect::WidgetInput(InputOwner::Pager),
        Effect::Lock,
    ]);
    fx.extend(visuals(
        reconcile::reconcile(Step::Hero, origin, next.narrow, &cfg.assets),
        cfg,
    ));
    debug!(?origin, "reset to hero");
    Transition::new(next, fx)
}

/// An accepted gesture. Forward at the slogan releases when armed.
pub fn on_gesture(
    ctx: &PagerContext,
    dir: Direction,
    now: f64,
    env: &Env,
    cfg: &PagerConfig,
) -> Transition {
    if ctx.step == Step::Slogan && dir == Direction::Forward {
        if ctx.armed_for_release {
            return release(ctx);
        }
        debug!("forward gesture at slogan before arming; ignored");
        return Transition::unchanged(ctx);
    }
    let Some(to) = dir.apply(ctx.step) else {
        return Transition::unchanged(ctx);
    };
    match begin(ctx, to, TransitionOrigin::Gesture, now, env, cfg) {
        Ok(t) => t,
        Err(refusal) => {
            debug!(%refusal, "gesture dropped");
            Transition::unchanged(ctx)
        }
    }
}

/// Below the slogan only backward input is paged, and only while the zone is
/// armed (the body's top edge is back under the re-arm line).
fn released_edge(zone: ZoneState, dir: Direction, cfg: &PagerConfig) -> Option<&EdgeThreshold> {
    if zone.armed && dir == Direction::Backward {
        cfg.gesture.edge(Step::Slogan, dir)
    } else {
        None
    }
}

/// Backward intent while released parks on the slogan again. Everything else
/// keeps scrolling natively.
fn on_released_wheel(
    ctx: &PagerContext,
    input: &WheelInput,
    now: f64,
    env: &Env,
    cfg: &PagerConfig,
) -> (Transition, Disposition) {
    let px = normalize_delta(input, env.viewport.height, &cfg.gesture);
    let Some(edge) = Direction::of(px).and_then(|d| released_edge(ctx.zone, d, cfg)) else {
        return (Transition::unchanged(ctx), Disposition::PassThrough);
    };
    let mut next = ctx.clone();
    match next
        .accumulator
        .feed(px, now, edge, cfg.gesture.jitter_floor_px)
    {
        Sample::Triggered { magnitude, .. } => {
            debug!(magnitude, "backward intent inside the zone; back to the slogan");
            (relock_at_top(&next, now, cfg), Disposition::Consumed)
        }
        Sample::Jitter | Sample::Accumulating { .. } => {
            (Transition::new(next, Vec::new()), Disposition::PassThrough)
        }
    }
}

/// Disposition for an accepted gesture: a release lets the event through.
fn gesture_disposition(t: &Transition) -> Disposition {
    if t.effects.contains(&Effect::Unlock) {
        Disposition::PassThrough
    } else {
        Disposition::Consumed
    }
}

pub fn on_wheel(
    ctx: &PagerContext,
    input: &WheelInput,
    now: f64,
    env: &Env,
    cfg: &PagerConfig,
) -> (Transition, Disposition) {
    if !ctx.enabled {
        return (Transition::unchanged(ctx), Disposition::PassThrough);
    }
    if ctx.released {
        return on_released_wheel(ctx, input, now, env, cfg);
    }
    if ctx.is_pending() || ctx.is_quiet(now) {
        trace!(delta = input.delta_y, "wheel dropped while settling");
        return (Transition::unchanged(ctx), Disposition::Consumed);
    }
    let px = normalize_delta(input, env.viewport.height, &cfg.gesture);
    let Some(dir) = Direction::of(px) else {
        return (Transition::unchanged(ctx), Disposition::Consumed);
    };
    let Some(edge) = edge_for(ctx.step, dir, cfg) else {
        return (Transition::unchanged(ctx), Disposition::PassThrough);
    };

    let mut next = ctx.clone();
    match next
        .accumulator
        .feed(px, now, edge, cfg.gesture.jitter_floor_px)
    {
        Sample::Triggered { direction, .. } => {
            let t = on_gesture(&next, direction, now, env, cfg);
            let d = gesture_disposition(&t);
            (t, d)
        }
        Sample::Jitter | Sample::Accumulating { .. } => {
            (Transition::new(next, Vec::new()), Disposition::Consumed)
        }
    }
}

pub fn on_touch(
    ctx: &PagerContext,
    input: &TouchInput,
    now: f64,
    env: &Env,
    cfg: &PagerConfig,
) -> (Transition, Disposition) {
    let mut next = ctx.clone();
    let pass = Disposition::PassThrough;

    match *input {
        TouchInput::Start { y } => {
            next.touch.begin(y);
            if !ctx.enabled || ctx.released {
                return (Transition::new(next, Vec::new()), pass);
            }
            let mut fx = Vec::new();
            if ctx.step == Step::Hero && env.offset <= 0.0 && !ctx.is_pending() {
                next.pulling = true;
                fx.push(Effect::Unlock);
                fx.push(Effect::WidgetInput(InputOwner::Nobody));
                trace!("touch at hero top: pull-to-refresh allowed");
            }
            (Transition::new(next, fx), pass)
        }
        TouchInput::End | TouchInput::Cancel => {
            next.touch.end();
            let mut fx = Vec::new();
            if next.pulling {
                next.pulling = false;
                if ctx.enabled && !ctx.released && ctx.step == Step::Hero {
                    fx.push(Effect::Lock);
                    fx.push(Effect::WidgetInput(InputOwner::Pager));
                }
            }
            (Transition::new(next, fx), pass)
        }
        TouchInput::Move { y } => {
            if !ctx.enabled {
                return (Transition::unchanged(ctx), pass);
            }
            if ctx.released {
                let zone = ctx.zone;
                return match next.touch.evaluate(y, |d| released_edge(zone, d, cfg)) {
                    Some(_) => {
                        debug!("backward swipe inside the zone; back to the slogan");
                        (relock_at_top(&next, now, cfg), Disposition::Consumed)
                    }
                    None => (Transition::new(next, Vec::new()), pass),
                };
            }
            let mut fx = Vec::new();
            if next.pulling {
                let dy = next.touch.finger_travel(y).unwrap_or(0.0);
                if dy >= -cfg.gesture.pull_slop_px {
                    return (Transition::unchanged(ctx), pass);
                }
                next.pulling = false;
                fx.push(Effect::Lock);
                fx.push(Effect::WidgetInput(InputOwner::Pager));
            }
            if next.is_pending() || next.is_quiet(now) {
                return (Transition::new(next, fx), Disposition::Consumed);
            }
            let step = next.step;
            let has_edge = next
                .touch
                .page_travel(y)
                .and_then(Direction::of)
                .map_or(true, |d| edge_for(step, d, cfg).is_some());
            match next.touch.evaluate(y, |d| edge_for(step, d, cfg)) {
                Some(dir) => {
                    let t = Transition::new(next, fx)
                        .then(|c| on_gesture(c, dir, now, env, cfg));
                    let d = gesture_disposition(&t);
                    (t, d)
                }
                None if has_edge => (Transition::new(next, fx), Disposition::Consumed),
                None => (Transition::new(next, fx), pass),
            }
        }
    }
}

pub fn on_scroll(
    ctx: &PagerContext,
    sample: &ScrollSample,
    now: f64,
    env: &Env,
    cfg: &PagerConfig,
) -> Transition {
    if !ctx.enabled {
        return Transition::unchanged(ctx);
    }
    if ctx.is_pending() {
        trace!(offset = sample.offset, "scroll dropped while transition pending");
        return Transition::unchanged(ctx);
    }
    if !ctx.released {
        // The body is hidden while locked; its geometry means nothing here.
        if ctx.step == Step::Slogan && ctx.armed_for_release && sample.offset > 0.0 {
            return release(ctx);
        }
        return Transition::unchanged(ctx);
    }
    let mut next = ctx.clone();
    match next
        .zone
        .observe(sample.body_top, env.viewport.height, &cfg.zone)
    {
        ZoneChange::Unchanged => {}
        change => debug!(?change, body_top = ?sample.body_top, "zone changed"),
    }
    if sample.offset > 0.0 {
        next.body_scrolled = true;
        return Transition::new(next, Vec::new());
    }
    if next.body_scrolled {
        return relock_at_top(&next, now, cfg);
    }
    Transition::new(next, Vec::new())
}

pub fn on_viewport_change(ctx: &PagerContext, env: &Env, cfg: &PagerConfig) -> Transition {
    let mut next = ctx.clone();
    let narrow = cfg.lock.is_narrow(env.viewport.width);
    next.narrow = narrow;
    if !ctx.enabled {
        return Transition::new(next, Vec::new());
    }
    let mut fx = Vec::new();
    if narrow != ctx.narrow && ctx.lock.locked {
        debug!(narrow, "breakpoint crossed while locked; re-applying lock");
        fx.push(Effect::ReleaseStaleLocks);
        fx.push(Effect::Lock);
    }
    fx.extend(
        reconcile::reconcile_sources(next.step, narrow, &cfg.assets)
            .into_iter()
            .map(Effect::Visual),
    );
    Transition::new(next, fx)
}

/// Menu navigation. Paged targets are refused while a transition is in
/// flight; `Top` always resets.
pub fn navigate(
    ctx: &PagerContext,
    target: NavTarget,
    now: f64,
    env: &Env,
    cfg: &PagerConfig,
) -> Result<Transition, Refusal> {
    if !ctx.enabled {
        return Err(Refusal::Disabled);
    }
    match target {
        NavTarget::Top => Ok(reset_to_hero(ctx, TransitionOrigin::Reload, env, cfg)),
        NavTarget::Vision => begin(ctx, Step::Vision1, TransitionOrigin::Menu, now, env, cfg),
        NavTarget::Body { offset } => {
            if ctx.is_pending() {
                return Err(Refusal::Pending);
            }
            if ctx.released {
                return Ok(Transition::new(
                    ctx.clone(),
                    vec![Effect::ScrollInstant(offset)],
                ));
            }
            let mut t = begin(ctx, Step::Slogan, TransitionOrigin::Handoff, now, env, cfg)?
                .then(release);
            t.effects.push(Effect::Schedule {
                delay: Delay::Frames(cfg.timing.body_nav_frames),
                task: Task::ScrollToBody { offset },
            });
            Ok(t)
        }
    }
}

/// The widget began moving to `index`. Unrequested single-step moves are adopted.
pub fn on_slide_start(
    ctx: &PagerContext,
    index: usize,
    now: f64,
    env: &Env,
    cfg: &PagerConfig,
) -> Transition {
    let Some(to) = Step::from_index(index) else {
        return Transition::unchanged(ctx);
    };
    if !ctx.enabled || to == ctx.step {
        return Transition::unchanged(ctx);
    }
    match begin(ctx, to, TransitionOrigin::Widget, now, env, cfg) {
        Ok(t) => t,
        Err(refusal) => {
            debug!(%refusal, index, "widget slide change not adopted");
            Transition::unchanged(ctx)
        }
    }
}

/// The widget finished moving to `index`.
pub fn on_slide_end(ctx: &PagerContext, index: usize, now: f64) -> Transition {
    match ctx.pending {
        Some(p) if p.to.index() == index => complete(ctx, now),
        _ => Transition::unchanged(ctx),
    }
}

/// Per-frame check for a transition whose duration has elapsed.
pub fn tick(ctx: &PagerContext, now: f64) -> Transition {
    match ctx.pending {
        Some(p) if p.is_due(now) => complete(ctx, now),
        _ => Transition::unchanged(ctx),
    }
}

/// Run a deferred task if it still applies.
pub fn run_task(ctx: &PagerContext, task: &Scheduled) -> Transition {
    if !ctx.enabled || task.epoch != ctx.epoch {
        trace!(task = ?task.task, "stale task dropped");
        return Transition::unchanged(ctx);
    }
    match task.task {
        Task::FinishEntry { target } => Transition::new(
            ctx.clone(),
            snap_final(target).into_iter().map(Effect::Visual).collect(),
        ),
        Task::ClearTitleMask => Transition::new(
            ctx.clone(),
            vec![Effect::Visual(VisualEffect::flag(
                Target::Pager,
                Flag::TitleMask,
                false,
            ))],
        ),
        Task::PlayHeroMotion if ctx.step == Step::Hero => Transition::new(
            ctx.clone(),
            vec![Effect::Visual(VisualEffect::flag(
                Target::HeroText,
                Flag::Animate,
                true,
            ))],
        ),
        Task::RearmRelease
            if ctx.step == Step::Slogan && !ctx.released && !ctx.is_pending() =>
        {
            let mut next = ctx.clone();
            next.armed_for_release = true;
            debug!("slogan release re-armed");
            Transition::new(next, Vec::new())
        }
        Task::ScrollToBody { offset } if ctx.released => {
            Transition::new(ctx.clone(), vec![Effect::ScrollInstant(offset)])
        }
        _ => Transition::unchanged(ctx),
    }
}

/// Stop intercepting: release the lock and give input back to the widget.
pub fn detach(ctx: &PagerContext) -> Transition {
    let mut next = ctx.clone();
    next.enabled = false;
    next.pending = None;
    next.pulling = false;
    next.armed_for_release = false;
    next.epoch += 1;
    let mut fx = vec![Effect::Unlock, Effect::WidgetInput(InputOwner::Widget)];
    fx.extend(body_visuals(true));
    debug!("pager detached");
    Transition::new(next, fx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> Env {
        Env {
            offset: 0.0,
            viewport: Viewport::default(),
        }
    }

    fn at(step: Step) -> PagerContext {
        PagerContext {
            step,
            ..PagerContext::default()
        }
    }

    #[test]
    fn begin_refuses_while_pending() {
        let cfg = PagerConfig::default();
        let t = begin(&at(Step::Hero), Step::Vision1, TransitionOrigin::Gesture, 0.0, &env(), &cfg)
            .unwrap();
        let err = begin(&t.ctx, Step::Vision2, TransitionOrigin::Gesture, 10.0, &env(), &cfg)
            .unwrap_err();
        assert_eq!(err, Refusal::Pending);
    }

    #[test]
    fn gestures_never_skip() {
        let cfg = PagerConfig::default();
        let err = begin(&at(Step::Hero), Step::Vision2, TransitionOrigin::Gesture, 0.0, &env(), &cfg)
            .unwrap_err();
        assert!(matches!(err, Refusal::NotAdjacent { .. }));
    }

    #[test]
    fn backward_slides_use_reverse_duration() {
        let cfg = PagerConfig::default();
        let t = begin(&at(Step::Vision2), Step::Vision1, TransitionOrigin::Gesture, 0.0, &env(), &cfg)
            .unwrap();
        let p = t.ctx.pending.unwrap();
        assert_eq!(p.duration_ms, cfg.timing.reverse_slide_ms);
        assert!(t.effects.contains(&Effect::SlideTo {
            to: Step::Vision1,
            duration_ms: cfg.timing.reverse_slide_ms
        }));
    }

    #[test]
    fn instant_arrival_at_slogan_is_armed() {
        let cfg = PagerConfig::default();
        let t = begin(&at(Step::Hero), Step::Slogan, TransitionOrigin::Handoff, 0.0, &env(), &cfg)
            .unwrap();
        assert!(t.ctx.pending.is_none());
        assert!(t.ctx.armed_for_release);
        assert!(t.effects.contains(&Effect::SlideJump(Step::Slogan)));
    }

    #[test]
    fn unarmed_forward_at_slogan_is_ignored() {
        let cfg = PagerConfig::default();
        let t = on_gesture(&at(Step::Slogan), Direction::Forward, 0.0, &env(), &cfg);
        assert!(t.effects.is_empty());
        assert!(!t.ctx.released);
    }

    #[test]
    fn stale_tasks_do_nothing() {
        let mut ctx = at(Step::Slogan);
        ctx.epoch = 5;
        let task = Scheduled {
            id: 0,
            epoch: 4,
            due: crate::scheduler::Due::Frame(1),
            task: Task::RearmRelease,
        };
        let t = run_task(&ctx, &task);
        assert!(!t.ctx.armed_for_release);
    }

    #[test]
    fn hidden_body_geometry_does_not_disarm_a_locked_step() {
        let cfg = PagerConfig::default();
        let sample = ScrollSample {
            offset: 0.0,
            body_top: Some(0.0),
        };
        let t = on_scroll(&at(Step::Vision1), &sample, 0.0, &env(), &cfg);
        assert!(t.ctx.zone.armed);

        let (t, d) = on_wheel(&t.ctx, &WheelInput::pixels(10.0), 10.0, &env(), &cfg);
        assert_eq!(d, Disposition::Consumed);
        assert_eq!(t.ctx.step, Step::Vision2);
    }

    #[test]
    fn released_backward_input_is_gated_by_the_zone() {
        let cfg = PagerConfig::default();
        let mut ctx = at(Step::Slogan);
        ctx.released = true;
        ctx.zone.armed = false;
        let (t, d) = on_wheel(&ctx, &WheelInput::pixels(-400.0), 0.0, &env(), &cfg);
        assert_eq!(d, Disposition::PassThrough);
        assert!(t.ctx.released);
        assert!(t.ctx.accumulator.is_idle());

        ctx.zone.armed = true;
        let (t, d) = on_wheel(&ctx, &WheelInput::pixels(-150.0), 0.0, &env(), &cfg);
        assert_eq!(d, Disposition::PassThrough);
        let (t, d) = on_wheel(&t.ctx, &WheelInput::pixels(-150.0), 16.0, &env(), &cfg);
        assert_eq!(d, Disposition::Consumed);
        assert!(!t.ctx.released);
        assert!(!t.ctx.armed_for_release);
        assert!(t.effects.contains(&Effect::Lock));

        // Forward input below the slogan always scrolls natively.
        let (t, d) = on_wheel(&ctx, &WheelInput::pixels(400.0), 0.0, &env(), &cfg);
        assert_eq!(d, Disposition::PassThrough);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn leaving_the_hero_ends_a_pull() {
        let cfg = PagerConfig::default();
        let mut ctx = at(Step::Hero);
        ctx.pulling = true;
        let t = begin(&ctx, Step::Vision1, TransitionOrigin::Menu, 0.0, &env(), &cfg).unwrap();
        assert!(!t.ctx.pulling);
        assert!(t.effects.contains(&Effect::Lock));
    }

    #[test]
    fn menu_entry_follow_ups_are_scheduled() {
        let cfg = PagerConfig::default();
        let t = begin(&at(Step::Hero), Step::Vision1, TransitionOrigin::Menu, 0.0, &env(), &cfg)
            .unwrap();
        assert!(t.effects.contains(&Effect::Schedule {
            delay: Delay::Frames(1),
            task: Task::FinishEntry {
                target: Target::VisionTitle(1),
            },
        }));
        assert!(t.effects.contains(&Effect::Schedule {
            delay: Delay::Millis(cfg.timing.title_mask_ms),
            task: Task::ClearTitleMask,
        }));
        assert!(!t.effects.iter().any(|e| matches!(
            e,
            Effect::Visual(VisualEffect::FinishEntryNextFrame { .. } | VisualEffect::ClearMaskLater)
        )));
    }

    #[test]
    fn widget_origin_does_not_command_the_widget() {
        let cfg = PagerConfig::default();
        let t = on_slide_start(&at(Step::Vision1), 2, 0.0, &env(), &cfg);
        assert_eq!(t.ctx.step, Step::Vision2);
        assert!(!t
            .effects
            .iter()
            .any(|e| matches!(e, Effect::SlideTo { .. } | Effect::SlideJump(_))));
    }
}
