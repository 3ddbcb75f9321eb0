use std::collections::BTreeMap;

use crate::{
    core::{Progress, ProgressRange},
    error::{ScrollytellError, ScrollytellResult},
    timeline::{KeyframeGroup, PropertyTween, Timeline},
};

/// Where a keyframe group or label is anchored on the timeline.
#[derive(Clone, Debug, PartialEq)]
pub enum Position {
    /// Absolute progress fraction.
    At(f64),
    /// A previously defined label.
    Label(String),
    /// A previously defined label shifted by a signed fraction.
    LabelOffset(String, f64),
    /// The running end of everything placed so far.
    Head,
}

/// Builds a [`Timeline`] in insertion order, resolving labels as it goes.
///
/// Labels are resolved immediately, by scanning what has been placed so far,
/// so a position referencing a label that has not been defined yet is a
/// configuration error rather than a silent zero.
#[derive(Debug)]
pub struct TimelineBuilder {
    groups: Vec<KeyframeGroup>,
    labels: BTreeMap<String, Progress>,
    head: f64,
}

impl TimelineBuilder {
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            labels: BTreeMap::new(),
            head: 0.0,
        }
    }

    fn resolve(&self, at: &Position) -> ScrollytellResult<f64> {
        let pos = match at {
            Position::At(f) => *f,
            Position::Label(name) => self.lookup(name)?,
            Position::LabelOffset(name, delta) => self.lookup(name)? + delta,
            Position::Head => self.head,
        };
        if !pos.is_finite() || !(0.0..=1.0).contains(&pos) {
            return Err(ScrollytellError::configuration(format!(
                "position {pos} lies outside [0, 1]"
            )));
        }
        Ok(pos)
    }

    fn lookup(&self, name: &str) -> ScrollytellResult<f64> {
        self.labels
            .get(name)
            .map(|p| p.0)
            .ok_or_else(|| ScrollytellError::configuration(format!("unresolved label '{name}'")))
    }

    /// Define a chapter boundary. Boundaries are immutable once defined.
    pub fn label(mut self, name: impl Into<String>, at: Position) -> ScrollytellResult<Self> {
        let name = name.into();
        let pos = self.resolve(&at)?;
        if self.labels.contains_key(&name) {
            return Err(ScrollytellError::configuration(format!(
                "duplicate label '{name}'"
            )));
        }
        self.labels.insert(name, Progress(pos));
        Ok(self)
    }

    /// Place a keyframe group of the given duration.
    pub fn group(
        self,
        target: impl Into<String>,
        at: Position,
        duration: f64,
        tweens: Vec<PropertyTween>,
    ) -> ScrollytellResult<Self> {
        self.push_group(None, target.into(), at, duration, tweens)
    }

    /// Place a named keyframe group; the name only shows up in diagnostics.
    pub fn group_named(
        self,
        name: impl Into<String>,
        target: impl Into<String>,
        at: Position,
        duration: f64,
        tweens: Vec<PropertyTween>,
    ) -> ScrollytellResult<Self> {
        self.push_group(Some(name.into()), target.into(), at, duration, tweens)
    }

    /// Instantaneous set: the tweens snap to their to-values the moment
    /// progress reaches the position.
    pub fn set(
        self,
        target: impl Into<String>,
        at: Position,
        tweens: Vec<PropertyTween>,
    ) -> ScrollytellResult<Self> {
        self.push_group(None, target.into(), at, 0.0, tweens)
    }

    fn push_group(
        mut self,
        name: Option<String>,
        target: String,
        at: Position,
        duration: f64,
        tweens: Vec<PropertyTween>,
    ) -> ScrollytellResult<Self> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(ScrollytellError::configuration(
                "group duration must be finite and >= 0",
            ));
        }
        let start = self.resolve(&at)?;
        let range = ProgressRange::new(start, start + duration)?;
        self.head = self.head.max(range.end.0);
        self.groups.push(KeyframeGroup {
            target,
            range,
            tweens,
            name,
        });
        Ok(self)
    }

    pub fn build(self) -> ScrollytellResult<Timeline> {
        let timeline = Timeline {
            groups: self.groups,
            labels: self.labels,
        };
        timeline.validate()?;
        Ok(timeline)
    }
}

impl Default for TimelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
