use crate::error::{ScrollytellError, ScrollytellResult};

pub use kurbo::{Point, Rect};

/// Smallest interval span that still divides cleanly; shorter intervals are
/// treated as instantaneous.
pub const PROGRESS_EPSILON: f64 = 1e-9;

/// Normalized scroll progress in `[0, 1]` within a trigger region.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct Progress(pub f64);

impl Progress {
    pub const ZERO: Self = Self(0.0);
    pub const ONE: Self = Self(1.0);

    /// Clamp an arbitrary scalar into progress space.
    pub fn clamped(v: f64) -> Self {
        Self(v.clamp(0.0, 1.0))
    }
}

/// Sub-range `[start, end]` of progress a keyframe group is anchored to.
///
/// `end == start` denotes an instantaneous set.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProgressRange {
    pub start: Progress,
    pub end: Progress,
}

impl ProgressRange {
    /// Create a validated range with `start <= end`, both within `[0, 1]`.
    pub fn new(start: f64, end: f64) -> ScrollytellResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(ScrollytellError::configuration(
                "ProgressRange bounds must be finite",
            ));
        }
        if !(0.0..=1.0).contains(&start) || !(0.0..=1.0).contains(&end) {
            return Err(ScrollytellError::configuration(
                "ProgressRange bounds must lie in [0, 1]",
            ));
        }
        if start > end {
            return Err(ScrollytellError::configuration(
                "ProgressRange start must be <= end",
            ));
        }
        Ok(Self {
            start: Progress(start),
            end: Progress(end),
        })
    }

    pub fn is_instantaneous(self) -> bool {
        (self.end.0 - self.start.0) < PROGRESS_EPSILON
    }

    pub fn contains(self, p: Progress) -> bool {
        self.start.0 <= p.0 && p.0 <= self.end.0
    }

    /// Normalized position of `p` inside the range, clamped to `[0, 1]`.
    ///
    /// Before the range this is 0, past it 1; an instantaneous range snaps to
    /// 1 the moment progress reaches `start`.
    pub fn local_t(self, p: Progress) -> f64 {
        if self.is_instantaneous() {
            return if p.0 >= self.start.0 { 1.0 } else { 0.0 };
        }
        ((p.0 - self.start.0) / (self.end.0 - self.start.0)).clamp(0.0, 1.0)
    }
}

/// Resolved trigger region in page-scroll pixel space.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PixelRange {
    pub start_px: f64,
    pub end_px: f64,
}

impl PixelRange {
    /// Create a validated range with `start_px < end_px`.
    pub fn new(start_px: f64, end_px: f64) -> ScrollytellResult<Self> {
        if !start_px.is_finite() || !end_px.is_finite() {
            return Err(ScrollytellError::configuration(
                "PixelRange bounds must be finite",
            ));
        }
        if end_px <= start_px {
            return Err(ScrollytellError::configuration(
                "PixelRange must span at least one pixel (start < end)",
            ));
        }
        Ok(Self { start_px, end_px })
    }

    /// Raw progress of a scroll offset inside the region, clamped to `[0, 1]`.
    pub fn raw_progress(self, offset_px: f64) -> Progress {
        Progress::clamped((offset_px - self.start_px) / (self.end_px - self.start_px))
    }
}

/// Three-component vector for rotation/scale of a render surface.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const ONE: Self = Self {
        x: 1.0,
        y: 1.0,
        z: 1.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn splat(v: f64) -> Self {
        Self { x: v, y: v, z: v }
    }

    pub fn lerp(a: Self, b: Self, t: f64) -> Self {
        Self {
            x: a.x + (b.x - a.x) * t,
            y: a.y + (b.y - a.y) * t,
            z: a.z + (b.z - a.z) * t,
        }
    }
}

/// Axis-aligned screen-space rectangle (document coordinates, y-down).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub fn lerp(a: Self, b: Self, t: f64) -> Self {
        Self {
            x: a.x + (b.x - a.x) * t,
            y: a.y + (b.y - a.y) * t,
            width: a.width + (b.width - a.width) * t,
            height: a.height + (b.height - a.height) * t,
        }
    }
}

/// Remap `v` from `[in_start, in_end]` to `[out_start, out_end]`, clamped to
/// the output interval.
pub fn map_range(in_start: f64, in_end: f64, out_start: f64, out_end: f64, v: f64) -> f64 {
    let span = in_end - in_start;
    if span.abs() < PROGRESS_EPSILON {
        return out_start;
    }
    let t = ((v - in_start) / span).clamp(0.0, 1.0);
    out_start + (out_end - out_start) * t
}
