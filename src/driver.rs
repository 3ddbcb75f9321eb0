use crate::{error::ScrollytellResult, sequencer::Sequencer, telemetry::FrameStats};

/// Scroll state delivered once per frame by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollSample {
    /// Page scroll offset in pixels from the document top.
    pub offset_px: f64,
    pub viewport_height: f64,
}

/// Source of the per-frame scroll sample. Hosts wrap their scroll container;
/// tests use a settable fake.
pub trait ScrollSource {
    fn sample(&self) -> ScrollSample;
}

/// The single update entry point for a page view.
///
/// All scroll and resize signals funnel into `tick`/`resize`, so sequencer
/// updates are strictly serialized in frame order regardless of how many
/// listeners the host wires up. Disposed sequencers are dropped at the start
/// of the next tick, which releases their scroll subscription.
pub struct FrameDriver<S: ScrollSource> {
    source: S,
    sequencers: Vec<Sequencer>,
    stats: FrameStats,
}

impl<S: ScrollSource> FrameDriver<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            sequencers: Vec::new(),
            stats: FrameStats::new(120, 30.0),
        }
    }

    /// Install a constructed sequencer, or log why construction failed and
    /// carry on. A faulty animation never takes the page down.
    pub fn adopt(&mut self, sequencer: ScrollytellResult<Sequencer>) {
        match sequencer {
            Ok(seq) => self.sequencers.push(seq),
            Err(err) => {
                tracing::warn!(error = %err, "sequencer not installed");
            }
        }
    }

    /// One animation frame: sample the scroll source once and update every
    /// live sequencer with the same value.
    pub fn tick(&mut self) {
        self.sequencers.retain(|s| !s.is_disposed());
        let sample = self.source.sample();
        for seq in &mut self.sequencers {
            seq.update(sample.offset_px);
        }
    }

    /// `tick` plus frame-time accounting; `now_secs` is the host's frame
    /// timestamp.
    pub fn tick_timed(&mut self, now_secs: f64) {
        self.stats.record(now_secs);
        self.tick();
    }

    /// Layout changed: recompute every sequencer's trigger anchors.
    pub fn resize(&mut self) {
        let sample = self.source.sample();
        for seq in &mut self.sequencers {
            seq.refresh(sample.viewport_height);
        }
    }

    pub fn estimated_fps(&self) -> Option<f64> {
        self.stats.estimated_fps()
    }

    pub fn len(&self) -> usize {
        self.sequencers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequencers.is_empty()
    }

    pub fn sequencers_mut(&mut self) -> &mut [Sequencer] {
        &mut self.sequencers
    }
}
