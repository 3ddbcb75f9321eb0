/// Viewport width (px) at and above which the full scrollytelling experience
/// is enabled; below it the page falls back to static content.
pub const DESKTOP_MIN_WIDTH: f64 = 1025.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DeviceClass {
    Desktop,
    Compact,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MotionPrefs {
    /// The user asked for reduced motion; skip the scroll choreography.
    pub reduced: bool,
}

/// Explicitly constructed device/viewport snapshot, passed to whichever
/// component needs it. Lifecycle is tied to the page view: rebuild it on
/// resize, drop it at teardown. There is deliberately no global instance.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewportContext {
    pub width: f64,
    pub height: f64,
    pub touch: bool,
    pub motion: MotionPrefs,
}

impl ViewportContext {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            touch: false,
            motion: MotionPrefs::default(),
        }
    }

    pub fn with_touch(mut self, touch: bool) -> Self {
        self.touch = touch;
        self
    }

    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.motion.reduced = reduced;
        self
    }

    pub fn device_class(&self) -> DeviceClass {
        if self.width >= DESKTOP_MIN_WIDTH {
            DeviceClass::Desktop
        } else {
            DeviceClass::Compact
        }
    }

    /// Whether the scroll-driven experience should be constructed at all.
    pub fn scrollytelling_enabled(&self) -> bool {
        self.device_class() == DeviceClass::Desktop && !self.motion.reduced
    }
}
