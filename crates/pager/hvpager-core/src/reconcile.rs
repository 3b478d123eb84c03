//! Presentation capability and the pure step-to-visuals reconciler.
//!
//! [`reconcile`] maps a step and the origin of the move that reached it to a
//! list of [`VisualEffect`]s. It touches nothing; the pager applies the list
//! through a [`Presentation`] and skips entries whose target is absent.

use serde::{Deserialize, Serialize};

use crate::config::AssetConfig;
use crate::step::{Step, TransitionOrigin};

/// Elements the reconciler addresses. Hosts map [`Target::key`] to real nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// The paged container.
    Pager,
    /// Document body; carries the scroll-unlocked flag.
    Page,
    /// Wrapper around the naturally-scrolling sections below the slogan.
    BodyRegion,
    /// Text block of vision step 1..=3 (3 is the slogan).
    VisionText(u8),
    /// Title inside a vision text block.
    VisionTitle(u8),
    HeroText,
    VisionVideo,
    SloganImage,
}

impl Target {
    pub fn key(self) -> String {
        match self {
            Target::Pager => "pager".into(),
            Target::Page => "page".into(),
            Target::BodyRegion => "body_region".into(),
            Target::VisionText(n) => format!("vision_text_{n}"),
            Target::VisionTitle(n) => format!("vision_title_{n}"),
            Target::HeroText => "hero_text".into(),
            Target::VisionVideo => "vision_video".into(),
            Target::SloganImage => "slogan_image".into(),
        }
    }

    /// Title shown for `step`, if it has one.
    pub fn title_of(step: Step) -> Option<Target> {
        match step {
            Step::Hero => None,
            other => Some(Target::VisionTitle(other.index() as u8)),
        }
    }
}

/// Boolean presentation flags, rendered as class names by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flag {
    HeroState,
    ShowImage,
    TitleMask,
    ScrollUnlocked,
    Hidden,
    Active,
    Enter,
    Animate,
    Exit,
}

impl Flag {
    pub fn class_name(self) -> &'static str {
        match self {
            Flag::HeroState => "hv-state-hero",
            Flag::ShowImage => "hv-show-image",
            Flag::TitleMask => "hv-title-mask",
            Flag::ScrollUnlocked => "hv-scroll-unlocked",
            Flag::Hidden => "hidden",
            Flag::Active => "active",
            Flag::Enter => "enter",
            Flag::Animate => "animate",
            Flag::Exit => "exit",
        }
    }
}

/// A presentation target the host could not resolve.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("presentation target `{0}` not found")]
pub struct MissingTarget(pub String);

pub trait Presentation {
    fn toggle_flag(&mut self, target: Target, flag: Flag, on: bool) -> Result<(), MissingTarget>;
    fn set_attribute(&mut self, target: Target, name: &str, value: &str)
        -> Result<(), MissingTarget>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VisualEffect {
    Flag {
        target: Target,
        flag: Flag,
        on: bool,
    },
    Attribute {
        target: Target,
        name: String,
        value: String,
    },
    /// Switch a title from its entry pose to its animated pose on the next frame.
    FinishEntryNextFrame { target: Target },
    /// Drop the title mask once the entry motion has played.
    ClearMaskLater,
    /// Replay the hero text motion (subject to the cooldown).
    HeroMotion,
}

impl VisualEffect {
    #[inline]
    pub fn flag(target: Target, flag: Flag, on: bool) -> Self {
        VisualEffect::Flag { target, flag, on }
    }

    fn src(target: Target, value: &str) -> Self {
        VisualEffect::Attribute {
            target,
            name: "src".into(),
            value: value.into(),
        }
    }
}

/// Flags that put a title straight into its final pose.
pub fn snap_final(target: Target) -> Vec<VisualEffect> {
    vec![
        VisualEffect::flag(target, Flag::Enter, false),
        VisualEffect::flag(target, Flag::Exit, false),
        VisualEffect::flag(target, Flag::Animate, true),
    ]
}

/// Reset a title to its entry pose; [`snap_final`] completes it a frame later.
pub fn stage_entry(target: Target) -> Vec<VisualEffect> {
    vec![
        VisualEffect::flag(target, Flag::Animate, false),
        VisualEffect::flag(target, Flag::Exit, false),
        VisualEffect::flag(target, Flag::Enter, true),
        VisualEffect::FinishEntryNextFrame { target },
    ]
}

/// Show or hide the naturally-scrolling body.
pub fn body_region(unlocked: bool) -> Vec<VisualEffect> {
    vec![
        VisualEffect::flag(Target::Page, Flag::ScrollUnlocked, unlocked),
        VisualEffect::flag(Target::BodyRegion, Flag::Hidden, !unlocked),
    ]
}

/// Media sources for `step`, narrow or wide variant. Video is needed from the
/// first vision step on; the slogan image is pre-loaded one step early.
pub fn reconcile_sources(step: Step, narrow: bool, assets: &AssetConfig) -> Vec<VisualEffect> {
    let mut out = Vec::new();
    if step != Step::Hero {
        out.push(VisualEffect::src(Target::VisionVideo, assets.video(narrow)));
    }
    if matches!(step, Step::Vision2 | Step::Slogan) {
        out.push(VisualEffect::src(Target::SloganImage, assets.image(narrow)));
    }
    out
}

pub fn reconcile(
    step: Step,
    origin: TransitionOrigin,
    narrow: bool,
    assets: &AssetConfig,
) -> Vec<VisualEffect> {
    let mut out = vec![
        VisualEffect::flag(Target::Pager, Flag::HeroState, step == Step::Hero),
        VisualEffect::flag(Target::Pager, Flag::ShowImage, step == Step::Slogan),
    ];
    for n in 1..=3u8 {
        out.push(VisualEffect::flag(
            Target::VisionText(n),
            Flag::Active,
            step.index() == n as usize,
        ));
    }
    out.extend(reconcile_sources(step, narrow, assets));

    match Target::title_of(step) {
        Some(title) if origin.plays_entry() => {
            out.push(VisualEffect::flag(Target::Pager, Flag::TitleMask, true));
            out.extend(stage_entry(title));
            out.push(VisualEffect::ClearMaskLater);
        }
        Some(title) => {
            out.extend(snap_final(title));
            out.push(VisualEffect::flag(Target::Pager, Flag::TitleMask, false));
        }
        None => {
            out.push(VisualEffect::flag(Target::Pager, Flag::TitleMask, false));
            if origin.plays_hero_motion() {
                out.push(VisualEffect::HeroMotion);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has(effects: &[VisualEffect], e: &VisualEffect) -> bool {
        effects.iter().any(|x| x == e)
    }

    #[test]
    fn hero_flags_and_no_media() {
        let fx = reconcile(
            Step::Hero,
            TransitionOrigin::Initial,
            false,
            &AssetConfig::default(),
        );
        assert!(has(&fx, &VisualEffect::flag(Target::Pager, Flag::HeroState, true)));
        assert!(!fx.iter().any(|e| matches!(e, VisualEffect::Attribute { .. })));
        assert!(!has(&fx, &VisualEffect::HeroMotion));
    }

    #[test]
    fn gesture_arrival_snaps_title() {
        let fx = reconcile(
            Step::Vision2,
            TransitionOrigin::Gesture,
            false,
            &AssetConfig::default(),
        );
        assert!(has(&fx, &VisualEffect::flag(Target::VisionTitle(2), Flag::Animate, true)));
        assert!(!has(&fx, &VisualEffect::flag(Target::VisionTitle(2), Flag::Enter, true)));
        assert!(!has(&fx, &VisualEffect::ClearMaskLater));
        // slogan image warmed one step early
        assert!(fx.iter().any(|e| matches!(
            e,
            VisualEffect::Attribute { target: Target::SloganImage, .. }
        )));
    }

    #[test]
    fn menu_arrival_stages_entry_under_mask() {
        let fx = reconcile(
            Step::Vision1,
            TransitionOrigin::Menu,
            false,
            &AssetConfig::default(),
        );
        assert!(has(&fx, &VisualEffect::flag(Target::Pager, Flag::TitleMask, true)));
        assert!(has(&fx, &VisualEffect::flag(Target::VisionTitle(1), Flag::Enter, true)));
        assert!(has(
            &fx,
            &VisualEffect::FinishEntryNextFrame {
                target: Target::VisionTitle(1)
            }
        ));
        assert!(has(&fx, &VisualEffect::ClearMaskLater));
    }

    #[test]
    fn narrow_viewport_picks_narrow_media() {
        let assets = AssetConfig::default();
        let fx = reconcile_sources(Step::Slogan, true, &assets);
        assert_eq!(
            fx,
            vec![
                VisualEffect::src(Target::VisionVideo, &assets.video_narrow),
                VisualEffect::src(Target::SloganImage, &assets.image_narrow),
            ]
        );
    }

    #[test]
    fn only_the_current_text_is_active() {
        let fx = reconcile(
            Step::Slogan,
            TransitionOrigin::Gesture,
            false,
            &AssetConfig::default(),
        );
        let active: Vec<_> = fx
            .iter()
            .filter_map(|e| match e {
                VisualEffect::Flag {
                    target: Target::VisionText(n),
                    flag: Flag::Active,
                    on: true,
                } => Some(*n),
                _ => None,
            })
            .collect();
        assert_eq!(active, vec![3]);
    }
}
