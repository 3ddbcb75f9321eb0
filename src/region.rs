use crate::{
    core::PixelRange,
    error::{ScrollytellError, ScrollytellResult},
    target::DomLayout,
};

/// Edge of an element or of the viewport, as a fraction of its height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Edge {
    Top,
    Center,
    Bottom,
}

impl Edge {
    fn fraction(self) -> f64 {
        match self {
            Self::Top => 0.0,
            Self::Center => 0.5,
            Self::Bottom => 1.0,
        }
    }
}

/// One end of a trigger region: the scroll offset at which `element_edge`
/// meets `viewport_edge` ("top top", "bottom bottom", "top center").
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Anchor {
    pub element_edge: Edge,
    pub viewport_edge: Edge,
}

impl Anchor {
    pub const TOP_TOP: Self = Self {
        element_edge: Edge::Top,
        viewport_edge: Edge::Top,
    };
    pub const BOTTOM_BOTTOM: Self = Self {
        element_edge: Edge::Bottom,
        viewport_edge: Edge::Bottom,
    };
    pub const TOP_CENTER: Self = Self {
        element_edge: Edge::Top,
        viewport_edge: Edge::Center,
    };

    /// Scroll offset (px from document top) at which the two edges meet.
    ///
    /// `element_top` / `element_height` are document coordinates of the
    /// trigger element.
    pub fn resolve(self, element_top: f64, element_height: f64, viewport_height: f64) -> f64 {
        element_top + element_height * self.element_edge.fraction()
            - viewport_height * self.viewport_edge.fraction()
    }
}

/// Descriptor of the scrollable region that drives a sequencer, expressed
/// against a trigger element so it survives layout changes via `refresh`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TriggerRegion {
    pub element: String,
    pub start: Anchor,
    pub end: Anchor,
}

impl TriggerRegion {
    /// The common scrollytelling shape: progress 0 when the element's top
    /// hits the viewport top, 1 when its bottom hits the viewport bottom.
    pub fn top_to_bottom(element: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            start: Anchor::TOP_TOP,
            end: Anchor::BOTTOM_BOTTOM,
        }
    }

    /// Resolve both anchors to pixel offsets against the current layout.
    pub fn resolve(
        &self,
        layout: &dyn DomLayout,
        viewport_height: f64,
    ) -> ScrollytellResult<PixelRange> {
        let rect = layout.bounding_box(&self.element).ok_or_else(|| {
            ScrollytellError::configuration(format!(
                "trigger element '{}' not found in layout",
                self.element
            ))
        })?;
        let start_px = self.start.resolve(rect.y, rect.height, viewport_height);
        let end_px = self.end.resolve(rect.y, rect.height, viewport_height);
        PixelRange::new(start_px, end_px)
    }
}
