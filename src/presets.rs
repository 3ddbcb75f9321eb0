//! The canned scene this engine was built for: a cube that spins and swells
//! while text pillars fade through, then hands itself off to a morphing logo.

use std::f64::consts::PI;

use crate::{
    dsl::{Position, TimelineBuilder},
    ease::Ease,
    error::{ScrollytellError, ScrollytellResult},
    handoff::HandoffSpec,
    region::TriggerRegion,
    sequencer::SequencerConfig,
    timeline::{Prop, PropertyTween},
};

/// Final logo path the hand-off morphs into.
pub const LOGO_PATH: &str = "M81.5,1.5 C37.2,1.5 1.5,37.2 1.5,81.5 C1.5,125.8 37.2,161.5 81.5,161.5 C125.8,161.5 161.5,125.8 161.5,81.5 C161.5,37.2 125.8,1.5 81.5,1.5 Z M81.5,116.5 C81.5,125.1 74.6,132 66,132 C57.4,132 50.5,125.1 50.5,116.5 L50.5,74 C50.5,65.4 57.4,58.5 66,58.5 C74.6,58.5 81.5,65.4 81.5,74 L81.5,116.5 Z M112.5,74 C112.5,65.4 105.6,58.5 97,58.5 C88.4,58.5 81.5,65.4 81.5,74 L81.5,89 C81.5,97.6 88.4,104.5 97,104.5 C105.6,104.5 112.5,97.6 112.5,89 L112.5,74 Z";

pub const CUBE_TARGET: &str = "cube";
pub const TRIGGER_ELEMENT: &str = "scrolly-container";
pub const PLACEHOLDER_ELEMENT: &str = "summary-placeholder";
pub const OVERLAY_ELEMENT: &str = "final-logo";
pub const MORPH_ELEMENT: &str = "morph-path";
pub const ABSORB_LABEL: &str = "absorb";

/// Stage key of the i-th text pillar.
pub fn pillar_key(i: usize) -> String {
    format!("pillar-{i}")
}

// Pillars own the first 80% of the region; the hand-off plays out the rest.
const PILLAR_SPAN: f64 = 0.8;

fn scale_tweens(from: f64, to: f64, ease: Ease) -> Vec<PropertyTween> {
    vec![
        PropertyTween::new(Prop::ScaleX, from, to, ease),
        PropertyTween::new(Prop::ScaleY, from, to, ease),
        PropertyTween::new(Prop::ScaleZ, from, to, ease),
    ]
}

/// Build the full scene configuration for `pillars` text chapters.
///
/// The host registers [`CUBE_TARGET`] as a render surface and one element
/// target per [`pillar_key`], with [`TRIGGER_ELEMENT`], [`PLACEHOLDER_ELEMENT`],
/// [`OVERLAY_ELEMENT`] and [`MORPH_ELEMENT`] present in the layout.
pub fn pillar_scene(pillars: usize) -> ScrollytellResult<SequencerConfig> {
    if pillars == 0 {
        return Err(ScrollytellError::configuration(
            "pillar scene needs at least one pillar",
        ));
    }
    let chapter = PILLAR_SPAN / pillars as f64;

    let mut builder = TimelineBuilder::new()
        .group_named(
            "cube-spin",
            CUBE_TARGET,
            Position::At(0.0),
            PILLAR_SPAN,
            vec![
                PropertyTween::new(Prop::RotationY, 0.0, PI * 2.5, Ease::Linear),
                PropertyTween::new(Prop::RotationX, 0.0, -PI, Ease::Linear),
            ],
        )?
        .group_named(
            "cube-swell",
            CUBE_TARGET,
            Position::At(0.0),
            PILLAR_SPAN / 2.0,
            scale_tweens(1.0, 1.2, Ease::InQuad),
        )?
        .group_named(
            "cube-settle",
            CUBE_TARGET,
            Position::At(PILLAR_SPAN / 2.0),
            PILLAR_SPAN / 2.0,
            scale_tweens(1.2, 1.0, Ease::OutQuad),
        )?;

    for i in 0..pillars {
        let key = pillar_key(i);
        let start = i as f64 * chapter;
        builder = builder.group(
            key.clone(),
            Position::At(start),
            chapter * 0.5,
            vec![
                PropertyTween::new(Prop::Opacity, 0.0, 1.0, Ease::OutCubic),
                PropertyTween::new(Prop::TranslateY, 40.0, 0.0, Ease::OutCubic),
            ],
        )?;
        // Every pillar but the last fades back out into the next chapter.
        if i + 1 != pillars {
            builder = builder.group(
                key,
                Position::At(start + chapter * 0.75),
                chapter * 0.5,
                vec![
                    PropertyTween::new(Prop::Opacity, 1.0, 0.0, Ease::InCubic),
                    PropertyTween::new(Prop::TranslateY, 0.0, -40.0, Ease::InCubic),
                ],
            )?;
        }
    }

    let timeline = builder
        .label(ABSORB_LABEL, Position::At(PILLAR_SPAN))?
        .build()?;
    let boundary = timeline
        .label(ABSORB_LABEL)
        .ok_or_else(|| ScrollytellError::configuration("absorb label missing from timeline"))?;

    Ok(SequencerConfig {
        region: TriggerRegion::top_to_bottom(TRIGGER_ELEMENT),
        timeline,
        scrub: 0.15,
        handoff: Some(HandoffSpec {
            surface: CUBE_TARGET.to_string(),
            placeholder: PLACEHOLDER_ELEMENT.to_string(),
            overlay: OVERLAY_ELEMENT.to_string(),
            morph_target: MORPH_ELEMENT.to_string(),
            final_path: LOGO_PATH.to_string(),
            boundary: boundary.0,
            window: 1.0 - PILLAR_SPAN,
        }),
    })
}
