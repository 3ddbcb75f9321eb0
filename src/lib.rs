//! Deterministic scroll-driven animation sequencing.
//!
//! scrollytell maps a normalized scroll progress onto keyframed property
//! writes across host-supplied targets (a 3D render surface, DOM elements,
//! and the hand-off between the two), so a scrollytelling page's choreography
//! becomes a pure, replayable function of scroll position.
#![forbid(unsafe_code)]

pub mod content;
pub mod context;
pub mod core;
pub mod driver;
pub mod dsl;
pub mod ease;
pub mod error;
pub mod handoff;
pub mod morph;
pub mod presets;
pub mod region;
pub mod sequencer;
pub mod target;
pub mod telemetry;
pub mod timeline;

pub use content::ContentLibrary;
pub use context::{DeviceClass, MotionPrefs, ViewportContext};
pub use core::{map_range, PixelRange, Progress, ProgressRange, ScreenRect, Vec3};
pub use driver::{FrameDriver, ScrollSample, ScrollSource};
pub use dsl::{Position, TimelineBuilder};
pub use ease::Ease;
pub use error::{ScrollytellError, ScrollytellResult};
pub use handoff::{Handoff, HandoffSpec};
pub use morph::PathMorph;
pub use region::{Anchor, Edge, TriggerRegion};
pub use sequencer::{Sequencer, SequencerConfig};
pub use target::{DomLayout, RenderSurface, SharedLayout, SharedSurface, Stage};
pub use telemetry::{AnimationPhase, FrameStats, ScrollDirection, ScrollTelemetry};
pub use timeline::{KeyframeGroup, Prop, PropertyTween, PropertyWrite, Timeline};
