use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use crate::{
    core::{ScreenRect, Vec3},
    error::{ScrollytellError, ScrollytellResult},
    timeline::Prop,
};

/// Mutable handle onto a 3D render object (mesh + canvas) owned by the host.
///
/// The sequencer only reads and writes the exposed numeric properties; it
/// never learns anything about the renderer behind them.
pub trait RenderSurface {
    fn rotation(&self) -> Vec3;
    fn set_rotation(&mut self, v: Vec3);
    fn scale(&self) -> Vec3;
    fn set_scale(&mut self, v: Vec3);
    fn opacity(&self) -> f64;
    fn set_opacity(&mut self, v: f64);
    /// Current on-screen placement in document coordinates, used for the
    /// hand-off fly-to.
    fn screen_rect(&self) -> ScreenRect;
    fn set_screen_rect(&mut self, rect: ScreenRect);
}

/// Mutable handle onto the page layout owned by the host.
///
/// Elements are addressed by identifier. Setters return `false` when the
/// element has disappeared since construction; callers surface that as a
/// `TargetUnavailable` diagnostic rather than an abort.
pub trait DomLayout {
    fn contains(&self, id: &str) -> bool;
    /// Bounding box in document coordinates (y measured from document top).
    fn bounding_box(&self, id: &str) -> Option<ScreenRect>;
    fn set_opacity(&mut self, id: &str, value: f64) -> bool;
    fn set_translate_x(&mut self, id: &str, px: f64) -> bool;
    fn set_translate_y(&mut self, id: &str, px: f64) -> bool;
    fn set_visibility(&mut self, id: &str, visible: bool) -> bool;
    /// Replace the `d` attribute of an SVG path element.
    fn set_path(&mut self, id: &str, svg_d: &str) -> bool;
    fn set_text(&mut self, id: &str, text: &str) -> bool;
    fn set_title(&mut self, title: &str);
    fn set_meta(&mut self, name: &str, content: &str);
}

pub type SharedSurface = Rc<RefCell<dyn RenderSurface>>;
pub type SharedLayout = Rc<RefCell<dyn DomLayout>>;

/// Index of a registered target, resolved once at sequencer construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetHandle(usize);

enum TargetKind {
    Surface(SharedSurface),
    Element(String),
}

struct Entry {
    key: String,
    kind: TargetKind,
}

/// Registry of animation targets, keyed the way keyframe groups reference
/// them. The stage borrows the host's collaborators; it owns nothing that
/// outlives the page view.
#[derive(Default)]
pub struct Stage {
    layout: Option<SharedLayout>,
    entries: Vec<Entry>,
    index: BTreeMap<String, usize>,
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("layout", &self.layout.as_ref().map(|_| "<dyn DomLayout>"))
            .field("entries", &self.entries)
            .field("index", &self.index)
            .finish()
    }
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .finish()
    }
}

impl std::fmt::Debug for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetKind::Surface(_) => f.debug_tuple("Surface").field(&"<dyn RenderSurface>").finish(),
            TargetKind::Element(id) => f.debug_tuple("Element").field(id).finish(),
        }
    }
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A stage whose element targets resolve through `layout`.
    pub fn with_layout(layout: SharedLayout) -> Self {
        Self {
            layout: Some(layout),
            entries: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    pub fn layout(&self) -> Option<&SharedLayout> {
        self.layout.as_ref()
    }

    pub fn add_surface(
        &mut self,
        key: impl Into<String>,
        surface: SharedSurface,
    ) -> ScrollytellResult<()> {
        self.add_entry(key.into(), TargetKind::Surface(surface))
    }

    /// Register a DOM element target. Requires a layout collaborator.
    pub fn add_element(
        &mut self,
        key: impl Into<String>,
        element_id: impl Into<String>,
    ) -> ScrollytellResult<()> {
        if self.layout.is_none() {
            return Err(ScrollytellError::configuration(
                "element targets require a DOM layout collaborator",
            ));
        }
        self.add_entry(key.into(), TargetKind::Element(element_id.into()))
    }

    fn add_entry(&mut self, key: String, kind: TargetKind) -> ScrollytellResult<()> {
        if self.index.contains_key(&key) {
            return Err(ScrollytellError::configuration(format!(
                "duplicate target key '{key}'"
            )));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push(Entry { key, kind });
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn resolve(&self, key: &str) -> Option<TargetHandle> {
        self.index.get(key).copied().map(TargetHandle)
    }

    /// The render surface registered under `key`, if any.
    pub fn surface(&self, key: &str) -> Option<SharedSurface> {
        let idx = self.index.get(key)?;
        match &self.entries[*idx].kind {
            TargetKind::Surface(s) => Some(Rc::clone(s)),
            TargetKind::Element(_) => None,
        }
    }

    /// Whether `prop` can be written to the target behind `handle`.
    pub fn supports(&self, handle: TargetHandle, prop: Prop) -> bool {
        match &self.entries[handle.0].kind {
            TargetKind::Surface(_) => matches!(
                prop,
                Prop::RotationX
                    | Prop::RotationY
                    | Prop::RotationZ
                    | Prop::ScaleX
                    | Prop::ScaleY
                    | Prop::ScaleZ
                    | Prop::Opacity
            ),
            TargetKind::Element(_) => {
                matches!(prop, Prop::Opacity | Prop::TranslateX | Prop::TranslateY)
            }
        }
    }

    /// Write one property value. Element writes against a vanished node fail
    /// with `TargetUnavailable`.
    pub fn apply(&self, handle: TargetHandle, prop: Prop, value: f64) -> ScrollytellResult<()> {
        let entry = &self.entries[handle.0];
        match &entry.kind {
            TargetKind::Surface(surface) => {
                let mut surface = surface.borrow_mut();
                match prop {
                    Prop::RotationX | Prop::RotationY | Prop::RotationZ => {
                        let mut r = surface.rotation();
                        match prop {
                            Prop::RotationX => r.x = value,
                            Prop::RotationY => r.y = value,
                            _ => r.z = value,
                        }
                        surface.set_rotation(r);
                    }
                    Prop::ScaleX | Prop::ScaleY | Prop::ScaleZ => {
                        let mut s = surface.scale();
                        match prop {
                            Prop::ScaleX => s.x = value,
                            Prop::ScaleY => s.y = value,
                            _ => s.z = value,
                        }
                        surface.set_scale(s);
                    }
                    Prop::Opacity => surface.set_opacity(value),
                    Prop::TranslateX | Prop::TranslateY => {
                        return Err(ScrollytellError::configuration(format!(
                            "render surface '{}' does not support {prop:?}",
                            entry.key
                        )));
                    }
                }
                Ok(())
            }
            TargetKind::Element(id) => {
                let layout = self.layout.as_ref().ok_or_else(|| {
                    ScrollytellError::configuration("stage has no DOM layout collaborator")
                })?;
                let mut layout = layout.borrow_mut();
                let ok = match prop {
                    Prop::Opacity => layout.set_opacity(id, value),
                    Prop::TranslateX => layout.set_translate_x(id, value),
                    Prop::TranslateY => layout.set_translate_y(id, value),
                    _ => {
                        return Err(ScrollytellError::configuration(format!(
                            "element '{id}' does not support {prop:?}"
                        )));
                    }
                };
                if !ok {
                    return Err(ScrollytellError::target_unavailable(format!(
                        "element '{id}' (target '{}')",
                        entry.key
                    )));
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    #[derive(Debug)]
    pub struct RecordingSurface {
        pub rotation: Vec3,
        pub scale: Vec3,
        pub opacity: f64,
        pub rect: ScreenRect,
        pub writes: usize,
    }

    impl RecordingSurface {
        pub fn new(rect: ScreenRect) -> Self {
            Self {
                rotation: Vec3::ZERO,
                scale: Vec3::ONE,
                opacity: 1.0,
                rect,
                writes: 0,
            }
        }
    }

    impl RenderSurface for RecordingSurface {
        fn rotation(&self) -> Vec3 {
            self.rotation
        }
        fn set_rotation(&mut self, v: Vec3) {
            self.rotation = v;
            self.writes += 1;
        }
        fn scale(&self) -> Vec3 {
            self.scale
        }
        fn set_scale(&mut self, v: Vec3) {
            self.scale = v;
            self.writes += 1;
        }
        fn opacity(&self) -> f64 {
            self.opacity
        }
        fn set_opacity(&mut self, v: f64) {
            self.opacity = v;
            self.writes += 1;
        }
        fn screen_rect(&self) -> ScreenRect {
            self.rect
        }
        fn set_screen_rect(&mut self, rect: ScreenRect) {
            self.rect = rect;
            self.writes += 1;
        }
    }

    #[derive(Default, Debug)]
    pub struct RecordingLayout {
        pub boxes: BTreeMap<String, ScreenRect>,
        pub opacity: BTreeMap<String, f64>,
        pub translate_x: BTreeMap<String, f64>,
        pub translate_y: BTreeMap<String, f64>,
        pub visible: BTreeMap<String, bool>,
        pub paths: BTreeMap<String, String>,
        pub text: BTreeMap<String, String>,
        pub title: Option<String>,
        pub meta: BTreeMap<String, String>,
    }

    impl RecordingLayout {
        pub fn with_boxes(boxes: &[(&str, ScreenRect)]) -> Self {
            Self {
                boxes: boxes
                    .iter()
                    .map(|(id, r)| (id.to_string(), *r))
                    .collect(),
                ..Self::default()
            }
        }
    }

    impl DomLayout for RecordingLayout {
        fn contains(&self, id: &str) -> bool {
            self.boxes.contains_key(id)
        }
        fn bounding_box(&self, id: &str) -> Option<ScreenRect> {
            self.boxes.get(id).copied()
        }
        fn set_opacity(&mut self, id: &str, value: f64) -> bool {
            if !self.boxes.contains_key(id) {
                return false;
            }
            self.opacity.insert(id.to_string(), value);
            true
        }
        fn set_translate_x(&mut self, id: &str, px: f64) -> bool {
            if !self.boxes.contains_key(id) {
                return false;
            }
            self.translate_x.insert(id.to_string(), px);
            true
        }
        fn set_translate_y(&mut self, id: &str, px: f64) -> bool {
            if !self.boxes.contains_key(id) {
                return false;
            }
            self.translate_y.insert(id.to_string(), px);
            true
        }
        fn set_visibility(&mut self, id: &str, visible: bool) -> bool {
            if !self.boxes.contains_key(id) {
                return false;
            }
            self.visible.insert(id.to_string(), visible);
            true
        }
        fn set_path(&mut self, id: &str, svg_d: &str) -> bool {
            if !self.boxes.contains_key(id) {
                return false;
            }
            self.paths.insert(id.to_string(), svg_d.to_string());
            true
        }
        fn set_text(&mut self, id: &str, text: &str) -> bool {
            if !self.boxes.contains_key(id) {
                return false;
            }
            self.text.insert(id.to_string(), text.to_string());
            true
        }
        fn set_title(&mut self, title: &str) {
            self.title = Some(title.to_string());
        }
        fn set_meta(&mut self, name: &str, content: &str) {
            self.meta.insert(name.to_string(), content.to_string());
        }
    }
}
