use crate::{
    context::ViewportContext,
    core::{PixelRange, Progress},
    error::{ScrollytellError, ScrollytellResult},
    handoff::{Handoff, HandoffSpec},
    region::TriggerRegion,
    target::{Stage, TargetHandle},
    telemetry::{AnimationPhase, ScrollTelemetry},
    timeline::Timeline,
};

/// Everything needed to construct a [`Sequencer`]: the trigger region, the
/// timeline, the scrub smoothing rate and an optional hand-off.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SequencerConfig {
    pub region: TriggerRegion,
    pub timeline: Timeline,
    /// Fraction of the raw/applied gap closed per update, in `[0, 1]`.
    /// `0` disables smoothing (applied progress tracks raw exactly).
    pub scrub: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handoff: Option<HandoffSpec>,
}

#[derive(Debug)]
struct GroupBinding {
    group: usize,
    target: TargetHandle,
}

/// Scroll-position-driven animation sequencer.
///
/// One writer per property: every update evaluates the whole timeline at the
/// applied progress and writes each tracked property exactly once, in
/// construction order (last write wins on overlap). Evaluation is a pure
/// function of applied progress, so re-running an update at the same progress
/// reproduces the same target state.
///
/// Errors during an update never escape into the host's frame loop: they are
/// logged and the frame's remaining writes are skipped. A faulty animation
/// must not stop the page.
#[derive(Debug)]
pub struct Sequencer {
    region: TriggerRegion,
    pixels: PixelRange,
    timeline: Timeline,
    bindings: Vec<GroupBinding>,
    scrub: f64,
    applied: Progress,
    handoff: Option<Handoff>,
    stage: Stage,
    telemetry: ScrollTelemetry,
    disposed: bool,
}

impl Sequencer {
    /// Validate the configuration against the stage and resolve everything
    /// that is resolved once: trigger anchors, target bindings, the hand-off.
    pub fn construct(
        config: SequencerConfig,
        stage: Stage,
        viewport: &ViewportContext,
    ) -> ScrollytellResult<Self> {
        config.timeline.validate()?;

        if !config.scrub.is_finite() || !(0.0..=1.0).contains(&config.scrub) {
            return Err(ScrollytellError::configuration(
                "scrub smoothing rate must lie in [0, 1]",
            ));
        }

        let layout = stage.layout().ok_or_else(|| {
            ScrollytellError::configuration("trigger region requires a DOM layout collaborator")
        })?;
        let pixels = config.region.resolve(&*layout.borrow(), viewport.height)?;

        let mut bindings = Vec::with_capacity(config.timeline.groups.len());
        for (i, group) in config.timeline.groups.iter().enumerate() {
            let handle = stage.resolve(&group.target).ok_or_else(|| {
                ScrollytellError::configuration(format!(
                    "keyframe group references unknown target '{}'",
                    group.target
                ))
            })?;
            for tween in &group.tweens {
                if !stage.supports(handle, tween.prop) {
                    return Err(ScrollytellError::configuration(format!(
                        "target '{}' does not support {:?}",
                        group.target, tween.prop
                    )));
                }
            }
            bindings.push(GroupBinding {
                group: i,
                target: handle,
            });
        }

        let handoff = match config.handoff {
            Some(spec) => Some(Handoff::new(spec, &stage)?),
            None => None,
        };

        Ok(Self {
            region: config.region,
            pixels,
            timeline: config.timeline,
            bindings,
            scrub: config.scrub,
            applied: Progress::ZERO,
            handoff,
            stage,
            telemetry: ScrollTelemetry::new(),
            disposed: false,
        })
    }

    /// Advance to the given scroll offset and write all tracked properties.
    ///
    /// Invoked once per animation frame by the frame driver. Never panics and
    /// never returns an error; failures degrade to a logged no-op.
    #[tracing::instrument(skip(self), level = "debug")]
    pub fn update(&mut self, scroll_offset_px: f64) {
        if self.disposed {
            return;
        }
        let raw = self.pixels.raw_progress(scroll_offset_px);
        self.applied = if self.scrub == 0.0 {
            raw
        } else {
            Progress(self.applied.0 + (raw.0 - self.applied.0) * self.scrub)
        };
        if let Err(err) = self.apply_at(self.applied) {
            tracing::warn!(error = %err, "sequencer update skipped");
        }
    }

    fn apply_at(&mut self, p: Progress) -> ScrollytellResult<()> {
        for binding in &self.bindings {
            let group = &self.timeline.groups[binding.group];
            let t = group.range.local_t(p);
            for tween in &group.tweens {
                self.stage.apply(binding.target, tween.prop, tween.sample(t))?;
            }
        }
        if let Some(handoff) = self.handoff.as_mut() {
            handoff.update(p, &self.stage)?;
        }
        let engaged = self.handoff.as_ref().is_some_and(Handoff::engaged);
        self.telemetry.record(p, engaged);
        Ok(())
    }

    /// Recompute the trigger region's pixel anchors after a layout change.
    /// Keyframe groups and labels are untouched. A transiently missing
    /// trigger element keeps the previous anchors.
    pub fn refresh(&mut self, viewport_height: f64) {
        if self.disposed {
            return;
        }
        let Some(layout) = self.stage.layout() else {
            return;
        };
        match self.region.resolve(&*layout.borrow(), viewport_height) {
            Ok(pixels) => self.pixels = pixels,
            Err(err) => {
                tracing::warn!(error = %err, "refresh kept previous trigger anchors");
            }
        }
    }

    /// Release the sequencer. Subsequent `update`/`refresh` calls are no-ops,
    /// not errors; the frame driver drops disposed sequencers on its next
    /// tick.
    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn applied_progress(&self) -> Progress {
        self.applied
    }

    pub fn phase(&self) -> AnimationPhase {
        self.telemetry.phase()
    }

    pub fn handoff_engaged(&self) -> bool {
        self.handoff.as_ref().is_some_and(Handoff::engaged)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{
        core::{ProgressRange, ScreenRect},
        ease::Ease,
        target::fixtures::{RecordingLayout, RecordingSurface},
        target::{SharedLayout, SharedSurface},
        timeline::{KeyframeGroup, Prop, PropertyTween},
    };

    fn rotation_timeline() -> Timeline {
        Timeline {
            groups: vec![KeyframeGroup {
                target: "cube".to_string(),
                range: ProgressRange::new(0.0, 1.0).unwrap(),
                tweens: vec![PropertyTween::new(Prop::RotationY, 0.0, 10.0, Ease::Linear)],
                name: None,
            }],
            labels: Default::default(),
        }
    }

    fn fixture(
        scrub: f64,
    ) -> (
        SequencerConfig,
        Stage,
        Rc<RefCell<RecordingSurface>>,
        ViewportContext,
    ) {
        let surface = Rc::new(RefCell::new(RecordingSurface::new(ScreenRect::new(
            0.0, 0.0, 400.0, 400.0,
        ))));
        let layout = Rc::new(RefCell::new(RecordingLayout::with_boxes(&[(
            "scrolly",
            ScreenRect::new(0.0, 0.0, 1200.0, 1800.0),
        )])));
        let mut stage = Stage::with_layout(layout as SharedLayout);
        stage
            .add_surface("cube", surface.clone() as SharedSurface)
            .unwrap();
        let config = SequencerConfig {
            region: TriggerRegion::top_to_bottom("scrolly"),
            timeline: rotation_timeline(),
            scrub,
            handoff: None,
        };
        // 800px viewport over an 1800px container: region spans 0..1000px.
        (config, stage, surface, ViewportContext::new(1280.0, 800.0))
    }

    #[test]
    fn unsmoothed_update_tracks_raw_progress_exactly() {
        let (config, stage, surface, viewport) = fixture(0.0);
        let mut seq = Sequencer::construct(config, stage, &viewport).unwrap();
        seq.update(250.0);
        assert_eq!(seq.applied_progress(), Progress(0.25));
        assert_eq!(surface.borrow().rotation.y, 2.5);
    }

    #[test]
    fn full_rate_scrub_also_lands_exactly() {
        let (config, stage, _surface, viewport) = fixture(1.0);
        let mut seq = Sequencer::construct(config, stage, &viewport).unwrap();
        seq.update(250.0);
        assert_eq!(seq.applied_progress(), Progress(0.25));
    }

    #[test]
    fn scrub_lags_applied_progress_behind_raw() {
        let (config, stage, _surface, viewport) = fixture(0.5);
        let mut seq = Sequencer::construct(config, stage, &viewport).unwrap();
        seq.update(1000.0);
        assert_eq!(seq.applied_progress(), Progress(0.5));
        seq.update(1000.0);
        assert_eq!(seq.applied_progress(), Progress(0.75));
    }

    #[test]
    fn construct_rejects_unknown_target() {
        let (mut config, stage, _surface, viewport) = fixture(0.0);
        config.timeline.groups[0].target = "ghost".to_string();
        let err = Sequencer::construct(config, stage, &viewport).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn construct_rejects_unsupported_property() {
        let (mut config, stage, _surface, viewport) = fixture(0.0);
        config.timeline.groups[0].tweens[0].prop = Prop::TranslateY;
        let err = Sequencer::construct(config, stage, &viewport).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn construct_rejects_out_of_range_scrub() {
        let (mut config, stage, _surface, viewport) = fixture(0.0);
        config.scrub = 1.5;
        assert!(Sequencer::construct(config, stage, &viewport).is_err());
    }

    #[test]
    fn construct_rejects_missing_trigger_element() {
        let (mut config, stage, _surface, viewport) = fixture(0.0);
        config.region = TriggerRegion::top_to_bottom("gone");
        let err = Sequencer::construct(config, stage, &viewport).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn disposed_sequencer_mutates_nothing() {
        let (config, stage, surface, viewport) = fixture(0.0);
        let mut seq = Sequencer::construct(config, stage, &viewport).unwrap();
        seq.update(250.0);
        let writes_before = surface.borrow().writes;
        seq.dispose();
        seq.update(900.0);
        seq.update(100.0);
        seq.refresh(800.0);
        assert_eq!(surface.borrow().writes, writes_before);
        assert_eq!(seq.applied_progress(), Progress(0.25));
    }

    #[test]
    fn refresh_tracks_layout_growth() {
        let surface = Rc::new(RefCell::new(RecordingSurface::new(ScreenRect::new(
            0.0, 0.0, 400.0, 400.0,
        ))));
        let layout = Rc::new(RefCell::new(RecordingLayout::with_boxes(&[(
            "scrolly",
            ScreenRect::new(0.0, 0.0, 1200.0, 1800.0),
        )])));
        let mut stage = Stage::with_layout(layout.clone() as SharedLayout);
        stage
            .add_surface("cube", surface as SharedSurface)
            .unwrap();
        let config = SequencerConfig {
            region: TriggerRegion::top_to_bottom("scrolly"),
            timeline: rotation_timeline(),
            scrub: 0.0,
            handoff: None,
        };
        let viewport = ViewportContext::new(1280.0, 800.0);
        let mut seq = Sequencer::construct(config, stage, &viewport).unwrap();

        // Container doubles in height; the same offset now maps differently.
        layout.borrow_mut().boxes.insert(
            "scrolly".to_string(),
            ScreenRect::new(0.0, 0.0, 1200.0, 2800.0),
        );
        seq.refresh(800.0);
        seq.update(500.0);
        assert_eq!(seq.applied_progress(), Progress(0.25));
    }
}
