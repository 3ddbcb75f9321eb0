use crate::{
    core::{map_range, Progress, ScreenRect, Vec3, PROGRESS_EPSILON},
    ease::Ease,
    error::{ScrollytellError, ScrollytellResult},
    morph::PathMorph,
    target::{SharedSurface, Stage},
};

/// Configuration of the hand-off transition: at `boundary` the render surface
/// flies to the placeholder's box, shrinks and fades out while the substitute
/// graphic fades in and its path morphs from a point to `final_path`.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct HandoffSpec {
    /// Stage key of the render surface being handed off.
    pub surface: String,
    /// DOM id of the element whose box the surface flies to.
    pub placeholder: String,
    /// DOM id of the substitute graphic that fades in.
    pub overlay: String,
    /// DOM id of the SVG path element that morphs.
    pub morph_target: String,
    /// Final path data of the substitute graphic.
    pub final_path: String,
    /// Chapter boundary as a resolved progress fraction.
    pub boundary: f64,
    /// Progress span past the boundary over which the transition plays.
    pub window: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HandoffState {
    Armed,
    Engaged,
}

#[derive(Clone, Copy, Debug)]
struct SavedPlacement {
    rect: ScreenRect,
    scale: Vec3,
    opacity: f64,
}

// Sub-windows of the transition, as fractions of the hand-off window: the
// fly-to lands just past halfway, the crossfade starts as it lands, and the
// morph tail overlaps the crossfade.
const FLY: (f64, f64) = (0.0, 0.55);
const FADE: (f64, f64) = (0.55, 0.75);
const MORPH: (f64, f64) = (0.7, 1.0);

/// Direction-guarded hand-off state machine.
///
/// Crossing the boundary upward engages the transition exactly once,
/// capturing the surface's placement; crossing back downward disengages it
/// exactly once and restores that placement. Between crossings, evaluation is
/// a pure function of applied progress, so oscillating on one side of the
/// boundary never double-applies either direction.
#[derive(Debug)]
pub struct Handoff {
    spec: HandoffSpec,
    morph: PathMorph,
    state: HandoffState,
    saved: Option<SavedPlacement>,
}

impl Handoff {
    pub fn new(spec: HandoffSpec, stage: &Stage) -> ScrollytellResult<Self> {
        if !(0.0..=1.0).contains(&spec.boundary) {
            return Err(ScrollytellError::configuration(
                "hand-off boundary must lie in [0, 1]",
            ));
        }
        if !(spec.window > PROGRESS_EPSILON) {
            return Err(ScrollytellError::configuration(
                "hand-off window must be positive",
            ));
        }
        if stage.surface(&spec.surface).is_none() {
            return Err(ScrollytellError::configuration(format!(
                "hand-off surface '{}' is not a registered render surface",
                spec.surface
            )));
        }
        let layout = stage.layout().ok_or_else(|| {
            ScrollytellError::configuration("hand-off requires a DOM layout collaborator")
        })?;
        {
            let layout = layout.borrow();
            for id in [&spec.placeholder, &spec.overlay, &spec.morph_target] {
                if !layout.contains(id) {
                    return Err(ScrollytellError::configuration(format!(
                        "hand-off element '{id}' not found in layout"
                    )));
                }
            }
        }

        // The degenerate source point is the destination's own center, so the
        // logo grows out of where it will sit.
        use kurbo::Shape as _;
        let parsed = kurbo::BezPath::from_svg(&spec.final_path)
            .map_err(|e| ScrollytellError::configuration(format!("hand-off final path: {e}")))?;
        if parsed.elements().is_empty() {
            return Err(ScrollytellError::configuration(
                "hand-off final path is empty",
            ));
        }
        let origin = parsed.bounding_box().center();
        let morph = PathMorph::from_point(origin, &spec.final_path)?;

        Ok(Self {
            spec,
            morph,
            state: HandoffState::Armed,
            saved: None,
        })
    }

    pub fn engaged(&self) -> bool {
        self.state == HandoffState::Engaged
    }

    pub fn boundary(&self) -> f64 {
        self.spec.boundary
    }

    /// Advance the state machine and, while engaged, evaluate the compound
    /// transition at `p`.
    pub fn update(&mut self, p: Progress, stage: &Stage) -> ScrollytellResult<()> {
        let past = p.0 >= self.spec.boundary;
        match (self.state, past) {
            (HandoffState::Armed, true) => self.engage(stage)?,
            (HandoffState::Engaged, false) => self.disengage(stage)?,
            _ => {}
        }
        if self.state == HandoffState::Engaged {
            self.evaluate(p, stage)?;
        }
        Ok(())
    }

    fn surface(&self, stage: &Stage) -> ScrollytellResult<SharedSurface> {
        stage.surface(&self.spec.surface).ok_or_else(|| {
            ScrollytellError::target_unavailable(format!("render surface '{}'", self.spec.surface))
        })
    }

    fn engage(&mut self, stage: &Stage) -> ScrollytellResult<()> {
        let surface = self.surface(stage)?;
        let s = surface.borrow();
        self.saved = Some(SavedPlacement {
            rect: s.screen_rect(),
            scale: s.scale(),
            opacity: s.opacity(),
        });
        drop(s);
        self.state = HandoffState::Engaged;
        tracing::debug!(boundary = self.spec.boundary, "hand-off engaged");
        Ok(())
    }

    fn disengage(&mut self, stage: &Stage) -> ScrollytellResult<()> {
        let surface = self.surface(stage)?;
        if let Some(saved) = self.saved.take() {
            let mut s = surface.borrow_mut();
            s.set_screen_rect(saved.rect);
            s.set_scale(saved.scale);
            s.set_opacity(saved.opacity);
        }
        self.write_overlay(stage, 0.0, 0.0)?;
        self.state = HandoffState::Armed;
        tracing::debug!(boundary = self.spec.boundary, "hand-off reversed");
        Ok(())
    }

    fn evaluate(&self, p: Progress, stage: &Stage) -> ScrollytellResult<()> {
        let Some(saved) = self.saved else {
            return Ok(());
        };
        let t = ((p.0 - self.spec.boundary) / self.spec.window).clamp(0.0, 1.0);

        let layout = stage.layout().ok_or_else(|| {
            ScrollytellError::configuration("hand-off requires a DOM layout collaborator")
        })?;
        let dest = layout
            .borrow()
            .bounding_box(&self.spec.placeholder)
            .ok_or_else(|| {
                ScrollytellError::target_unavailable(format!(
                    "hand-off placeholder '{}'",
                    self.spec.placeholder
                ))
            })?;

        let fly_t = Ease::InOutCubic.apply(map_range(FLY.0, FLY.1, 0.0, 1.0, t));
        let fade_t = map_range(FADE.0, FADE.1, 0.0, 1.0, t);
        let shrink_t = Ease::InOutQuad.apply(t);

        let surface = self.surface(stage)?;
        {
            let mut s = surface.borrow_mut();
            s.set_screen_rect(ScreenRect::lerp(saved.rect, dest, fly_t));
            s.set_scale(Vec3::lerp(saved.scale, Vec3::ZERO, shrink_t));
            s.set_opacity(saved.opacity * (1.0 - fade_t));
        }

        let morph_t = Ease::OutExpo.apply(map_range(MORPH.0, MORPH.1, 0.0, 1.0, t));
        self.write_overlay(stage, fade_t, morph_t)
    }

    fn write_overlay(&self, stage: &Stage, opacity: f64, morph_t: f64) -> ScrollytellResult<()> {
        let layout = stage.layout().ok_or_else(|| {
            ScrollytellError::configuration("hand-off requires a DOM layout collaborator")
        })?;
        let mut layout = layout.borrow_mut();
        if !layout.set_opacity(&self.spec.overlay, opacity) {
            return Err(ScrollytellError::target_unavailable(format!(
                "hand-off overlay '{}'",
                self.spec.overlay
            )));
        }
        if !layout.set_path(&self.spec.morph_target, &self.morph.sample_svg(morph_t)) {
            return Err(ScrollytellError::target_unavailable(format!(
                "hand-off morph target '{}'",
                self.spec.morph_target
            )));
        }
        Ok(())
    }
}
