//! Shared collaborator fakes for the integration suites.
#![allow(dead_code)]

use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use scrollytell::{DomLayout, RenderSurface, ScreenRect, SharedLayout, SharedSurface, Vec3};

#[derive(Debug)]
pub struct TestSurface {
    pub rotation: Vec3,
    pub scale: Vec3,
    pub opacity: f64,
    pub rect: ScreenRect,
    pub writes: usize,
}

impl TestSurface {
    pub fn new(rect: ScreenRect) -> Self {
        Self {
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            opacity: 1.0,
            rect,
            writes: 0,
        }
    }

    pub fn shared(rect: ScreenRect) -> (Rc<RefCell<TestSurface>>, SharedSurface) {
        let inner = Rc::new(RefCell::new(TestSurface::new(rect)));
        (inner.clone(), inner as SharedSurface)
    }
}

impl RenderSurface for TestSurface {
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
pub struct TestLayout {
    pub boxes: BTreeMap<String, ScreenRect>,
    pub opacity: BTreeMap<String, f64>,
    pub translate_x: BTreeMap<String, f64>,
    pub translate_y: BTreeMap<String, f64>,
    pub visible: BTreeMap<String, bool>,
    pub paths: BTreeMap<String, String>,
    pub text: BTreeMap<String, String>,
    pub title: Option<String>,
    pub meta: BTreeMap<String, String>,
    pub writes: usize,
}

impl TestLayout {
    pub fn shared(boxes: &[(&str, ScreenRect)]) -> (Rc<RefCell<TestLayout>>, SharedLayout) {
        let layout = TestLayout {
            boxes: boxes.iter().map(|(id, r)| (id.to_string(), *r)).collect(),
            ..TestLayout::default()
        };
        let inner = Rc::new(RefCell::new(layout));
        (inner.clone(), inner as SharedLayout)
    }
}

impl DomLayout for TestLayout {
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
        self.writes += 1;
        true
    }
    fn set_translate_x(&mut self, id: &str, px: f64) -> bool {
        if !self.boxes.contains_key(id) {
            return false;
        }
        self.translate_x.insert(id.to_string(), px);
        self.writes += 1;
        true
    }
    fn set_translate_y(&mut self, id: &str, px: f64) -> bool {
        if !self.boxes.contains_key(id) {
            return false;
        }
        self.translate_y.insert(id.to_string(), px);
        self.writes += 1;
        true
    }
    fn set_visibility(&mut self, id: &str, visible: bool) -> bool {
        if !self.boxes.contains_key(id) {
            return false;
        }
        self.visible.insert(id.to_string(), visible);
        self.writes += 1;
        true
    }
    fn set_path(&mut self, id: &str, svg_d: &str) -> bool {
        if !self.boxes.contains_key(id) {
            return false;
        }
        self.paths.insert(id.to_string(), svg_d.to_string());
        self.writes += 1;
        true
    }
    fn set_text(&mut self, id: &str, text: &str) -> bool {
        if !self.boxes.contains_key(id) {
            return false;
        }
        self.text.insert(id.to_string(), text.to_string());
        self.writes += 1;
        true
    }
    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }
    fn set_meta(&mut self, name: &str, content: &str) {
        self.meta.insert(name.to_string(), content.to_string());
    }
}
