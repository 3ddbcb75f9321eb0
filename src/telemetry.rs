use std::collections::VecDeque;

use crate::core::Progress;

/// Coarse phase of the scrollytelling experience, derived from applied
/// progress and the hand-off state on every update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum AnimationPhase {
    Idle,
    PillarsScroll,
    HandoffAwait,
    HandoffEngaged,
    HandoffReversed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum ScrollDirection {
    None,
    Down,
    Up,
}

const HANDOFF_AWAIT_AT: f64 = 0.99;

/// Per-sequencer scroll state reporter. Replaces a page-global debug object:
/// constructed with the sequencer, released with it, reports via `tracing`.
#[derive(Debug)]
pub struct ScrollTelemetry {
    phase: AnimationPhase,
    last_progress: f64,
    direction: ScrollDirection,
    velocity: f64,
}

impl ScrollTelemetry {
    pub fn new() -> Self {
        Self {
            phase: AnimationPhase::Idle,
            last_progress: 0.0,
            direction: ScrollDirection::None,
            velocity: 0.0,
        }
    }

    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    pub fn direction(&self) -> ScrollDirection {
        self.direction
    }

    /// Progress delta of the most recent update.
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn record(&mut self, p: Progress, handoff_engaged: bool) {
        self.velocity = p.0 - self.last_progress;
        self.direction = if self.velocity > 0.0 {
            ScrollDirection::Down
        } else if self.velocity < 0.0 {
            ScrollDirection::Up
        } else {
            self.direction
        };
        self.last_progress = p.0;

        self.phase = if handoff_engaged {
            AnimationPhase::HandoffEngaged
        } else if self.phase == AnimationPhase::HandoffEngaged {
            AnimationPhase::HandoffReversed
        } else if p.0 >= HANDOFF_AWAIT_AT {
            AnimationPhase::HandoffAwait
        } else if p.0 > 0.0 {
            AnimationPhase::PillarsScroll
        } else {
            AnimationPhase::Idle
        };

        tracing::debug!(
            progress = p.0,
            velocity = self.velocity,
            direction = ?self.direction,
            phase = ?self.phase,
            "scroll state"
        );
    }
}

impl Default for ScrollTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

/// Sliding-window frame-time monitor. The host feeds it timestamps (seconds);
/// it estimates FPS and warns once each time the estimate drops below the
/// threshold.
#[derive(Debug)]
pub struct FrameStats {
    times: VecDeque<f64>,
    window: usize,
    low_fps_threshold: f64,
    below: bool,
}

impl FrameStats {
    pub fn new(window: usize, low_fps_threshold: f64) -> Self {
        Self {
            times: VecDeque::with_capacity(window.max(2)),
            window: window.max(2),
            low_fps_threshold,
            below: false,
        }
    }

    pub fn record(&mut self, now_secs: f64) {
        self.times.push_back(now_secs);
        if self.times.len() > self.window {
            self.times.pop_front();
        }
        if let Some(fps) = self.estimated_fps() {
            if fps < self.low_fps_threshold {
                if !self.below {
                    tracing::warn!(fps, threshold = self.low_fps_threshold, "frame rate low");
                    self.below = true;
                }
            } else {
                self.below = false;
            }
        }
    }

    pub fn estimated_fps(&self) -> Option<f64> {
        if self.times.len() < 2 {
            return None;
        }
        let span = self.times.back()? - self.times.front()?;
        if span <= 0.0 {
            return None;
        }
        Some((self.times.len() - 1) as f64 / span)
    }
}
