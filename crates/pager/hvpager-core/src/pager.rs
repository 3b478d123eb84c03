//! Driver: owns the capabilities and applies what the state machine decides.
//!
//! Methods:
//! - new, load, on_wheel, on_touch, on_scroll, on_viewport_change, navigate,
//!   on_slide_change_start, on_slide_change_end, tick, release_stale_locks, detach

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::config::PagerConfig;
use crate::error::Result;
use crate::input::{Disposition, NavTarget, ScrollSample, TouchInput, WheelInput};
use crate::lock::{self, LockPlan, LockProbe, LockTechnique};
use crate::machine::{self, Delay, Effect, Env, PagerContext, PendingTransition, Refusal, Transition};
use crate::reconcile::{self, Flag, Presentation, Target, VisualEffect};
use crate::scheduler::{Scheduler, Task};
use crate::slide::{InputOwner, SlideAdapter, SlideWidget};
use crate::step::{Step, TransitionOrigin};
use crate::surface::ScrollSurface;

/// Serialisable view of the pager for hosts and tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagerSnapshot {
    pub step: Step,
    pub armed_for_release: bool,
    pub released: bool,
    pub locked: bool,
    pub locked_offset: f64,
    pub lock_technique: Option<LockTechnique>,
    pub zone_armed: bool,
    pub pending: Option<PendingTransition>,
    pub enabled: bool,
    pub input_owner: Option<InputOwner>,
    pub offset: f64,
}

pub struct Pager<S: ScrollSurface, W: SlideWidget, P: Presentation> {
    cfg: PagerConfig,
    ctx: PagerContext,
    surface: S,
    slides: SlideAdapter<W>,
    present: P,
    scheduler: Scheduler,
    /// Last value written per attribute; identical writes are skipped.
    attributes: HashMap<(Target, String), String>,
    last_hero_motion: Option<f64>,
}

impl<S: ScrollSurface, W: SlideWidget, P: Presentation> Pager<S, W, P> {
    /// Validate the config and reconcile the widget's current slide. A widget
    /// that is not ready leaves the pager disabled and the page scrolling natively.
    pub fn new(cfg: PagerConfig, surface: S, widget: W, present: P) -> Result<Self> {
        cfg.validate()?;
        let mut pager = Self {
            cfg,
            ctx: PagerContext::default(),
            surface,
            slides: SlideAdapter::new(widget),
            present,
            scheduler: Scheduler::new(),
            attributes: HashMap::new(),
            last_hero_motion: None,
        };

        if !pager.slides.is_ready() {
            warn!("slide widget unavailable; pager disabled, native scrolling kept");
            pager.ctx.enabled = false;
            for v in reconcile::body_region(true) {
                pager.present_visual(v, 0.0);
            }
            return Ok(pager);
        }

        let step = pager.slides.current().unwrap_or_default();
        let t = machine::attach(&pager.ctx, step, &pager.env(), &pager.cfg);
        pager.apply(t, 0.0);
        Ok(pager)
    }

    /// Page load: top of the page, hero shown, scroll locked.
    pub fn load(&mut self, now: f64) {
        if !self.ctx.enabled {
            return;
        }
        let t = machine::reset_to_hero(&self.ctx, TransitionOrigin::Reload, &self.env(), &self.cfg);
        self.apply(t, now);
    }

    /// Wheel event. The host cancels the native action when `Consumed`.
    pub fn on_wheel(&mut self, input: WheelInput, now: f64) -> Disposition {
        let (t, d) = machine::on_wheel(&self.ctx, &input, now, &self.env(), &self.cfg);
        self.apply(t, now);
        d
    }

    pub fn on_touch(&mut self, input: TouchInput, now: f64) -> Disposition {
        let (t, d) = machine::on_touch(&self.ctx, &input, now, &self.env(), &self.cfg);
        self.apply(t, now);
        d
    }

    pub fn on_scroll(&mut self, sample: ScrollSample, now: f64) {
        let t = machine::on_scroll(&self.ctx, &sample, now, &self.env(), &self.cfg);
        self.apply(t, now);
    }

    /// The surface's viewport changed (resize, orientation).
    pub fn on_viewport_change(&mut self, now: f64) {
        let t = machine::on_viewport_change(&self.ctx, &self.env(), &self.cfg);
        self.apply(t, now);
    }

    pub fn navigate(&mut self, target: NavTarget, now: f64) -> std::result::Result<(), Refusal> {
        match machine::navigate(&self.ctx, target, now, &self.env(), &self.cfg) {
            Ok(t) => {
                debug!(?target, "navigation accepted");
                self.apply(t, now);
                Ok(())
            }
            Err(refusal) => {
                debug!(?target, %refusal, "navigation rejected");
                Err(refusal)
            }
        }
    }

    pub fn on_slide_change_start(&mut self, index: usize, now: f64) {
        let t = machine::on_slide_start(&self.ctx, index, now, &self.env(), &self.cfg);
        self.apply(t, now);
    }

    pub fn on_slide_change_end(&mut self, index: usize, now: f64) {
        let t = machine::on_slide_end(&self.ctx, index, now);
        self.apply(t, now);
    }

    /// Per-frame callback: completes an elapsed transition, then runs due tasks.
    pub fn tick(&mut self, now: f64) {
        let t = machine::tick(&self.ctx, now);
        self.apply(t, now);
        for task in self.scheduler.advance(now) {
            let t = machine::run_task(&self.ctx, &task);
            self.apply(t, now);
        }
    }

    /// Clear leftover lock styling. Safe with or without a live transition.
    pub fn release_stale_locks(&mut self, now: f64) {
        self.apply_effect(Effect::ReleaseStaleLocks, now);
    }

    /// Stop intercepting and hand input back to the widget.
    pub fn detach(&mut self, now: f64) {
        if !self.ctx.enabled {
            return;
        }
        let t = machine::detach(&self.ctx);
        self.apply(t, now);
        self.scheduler.clear();
    }

    pub fn context(&self) -> &PagerContext {
        &self.ctx
    }

    pub fn config(&self) -> &PagerConfig {
        &self.cfg
    }

    pub fn snapshot(&self) -> PagerSnapshot {
        PagerSnapshot {
            step: self.ctx.step,
            armed_for_release: self.ctx.armed_for_release,
            released: self.ctx.released,
            locked: self.ctx.lock.locked,
            locked_offset: self.ctx.lock.locked_offset,
            lock_technique: self.ctx.lock.technique,
            zone_armed: self.ctx.zone.armed,
            pending: self.ctx.pending,
            enabled: self.ctx.enabled,
            input_owner: self.slides.input_owner(),
            offset: self.surface.offset(),
        }
    }

    pub fn scheduled_tasks(&self) -> usize {
        self.scheduler.len()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn widget(&self) -> &W {
        self.slides.widget()
    }

    pub fn widget_mut(&mut self) -> &mut W {
        self.slides.widget_mut()
    }

    pub fn presentation(&self) -> &P {
        &self.present
    }

    pub fn presentation_mut(&mut self) -> &mut P {
        &mut self.present
    }

    fn env(&self) -> Env {
        Env {
            offset: self.surface.offset(),
            viewport: self.surface.viewport(),
        }
    }

    fn probe(&self) -> LockProbe {
        LockProbe {
            offset: self.surface.offset(),
            viewport_width: self.surface.viewport().width,
            pinned: self.surface.is_pinned(),
            pull_active: self.ctx.pulling,
        }
    }

    fn apply(&mut self, t: Transition, now: f64) {
        self.ctx = t.ctx;
        for effect in t.effects {
            self.apply_effect(effect, now);
        }
    }

    fn run_lock_plan(&mut self, plan: LockPlan) {
        trace!(outcome = ?plan.outcome, ops = plan.ops.len(), "lock plan");
        for op in plan.ops {
            op.apply(&mut self.surface);
        }
        self.ctx.lock = plan.state;
    }

    fn apply_effect(&mut self, effect: Effect, now: f64) {
        match effect {
            Effect::ReleaseStaleLocks => {
                let plan = lock::release_stale(&self.ctx.lock, &self.probe());
                self.run_lock_plan(plan);
            }
            Effect::Lock => {
                let plan = lock::lock(&self.ctx.lock, &self.probe(), &self.cfg.lock);
                self.run_lock_plan(plan);
            }
            Effect::Unlock => {
                let plan = lock::unlock(&self.ctx.lock);
                self.run_lock_plan(plan);
            }
            Effect::ScrollInstant(offset) => self.surface.scroll_instant(offset.max(0.0)),
            Effect::SlideJump(step) => self.slides.jump(step),
            Effect::SlideTo { to, duration_ms } => self.slides.slide(to, duration_ms),
            Effect::WidgetInput(owner) => self.slides.claim_input(owner),
            Effect::Visual(v) => self.present_visual(v, now),
            Effect::Schedule { delay, task } => self.schedule(delay, task, now),
        }
    }

    fn schedule(&mut self, delay: Delay, task: Task, now: f64) {
        let epoch = self.ctx.epoch;
        match delay {
            Delay::Frames(n) => self.scheduler.after_frames(n, epoch, task),
            Delay::Millis(ms) => self.scheduler.at(now + ms, epoch, task),
        };
    }

    fn present_visual(&mut self, v: VisualEffect, now: f64) {
        let result = match v {
            VisualEffect::Flag { target, flag, on } => self.present.toggle_flag(target, flag, on),
            VisualEffect::Attribute {
                target,
                name,
                value,
            } => {
                let key = (target, name);
                if self.attributes.get(&key) == Some(&value) {
                    return;
                }
                let r = self.present.set_attribute(target, &key.1, &value);
                if r.is_ok() {
                    self.attributes.insert(key, value);
                }
                r
            }
            // Follow-ups arrive already lowered to `Effect::Schedule`.
            VisualEffect::FinishEntryNextFrame { .. } | VisualEffect::ClearMaskLater => Ok(()),
            VisualEffect::HeroMotion => {
                self.hero_motion(now);
                Ok(())
            }
        };
        if let Err(missing) = result {
            debug!(%missing, "visual effect skipped");
        }
    }

    fn hero_motion(&mut self, now: f64) {
        let cooldown = self.cfg.timing.hero_motion_cooldown_ms;
        if let Some(last) = self.last_hero_motion {
            if now - last < cooldown {
                trace!(since_ms = now - last, "hero motion in cooldown");
                return;
            }
        }
        self.last_hero_motion = Some(now);
        for flag in [Flag::Animate, Flag::Enter, Flag::Exit] {
            if let Err(missing) = self.present.toggle_flag(Target::HeroText, flag, false) {
                debug!(%missing, "hero motion skipped");
                return;
            }
        }
        self.schedule(Delay::Frames(1), Task::PlayHeroMotion, now);
    }
}
