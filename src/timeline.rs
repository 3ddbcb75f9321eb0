use std::collections::BTreeMap;

use crate::{
    core::{Progress, ProgressRange},
    ease::Ease,
    error::{ScrollytellError, ScrollytellResult},
};

/// Addressable scalar property of a stage target.
///
/// Rotation and scale components apply to render surfaces; opacity applies to
/// both surfaces and layout elements; translation applies to layout elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Prop {
    RotationX,
    RotationY,
    RotationZ,
    ScaleX,
    ScaleY,
    ScaleZ,
    Opacity,
    TranslateX,
    TranslateY,
}

/// One interpolated property: `from` at the group's start, `to` at its end.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct PropertyTween {
    pub prop: Prop,
    pub from: f64,
    pub to: f64,
    pub ease: Ease,
}

impl PropertyTween {
    pub fn new(prop: Prop, from: f64, to: f64, ease: Ease) -> Self {
        Self {
            prop,
            from,
            to,
            ease,
        }
    }

    /// Interpolated value at a group-local `t` in `[0, 1]`.
    pub fn sample(&self, local_t: f64) -> f64 {
        let te = self.ease.apply(local_t);
        self.from + (self.to - self.from) * te
    }

    pub fn validate(&self) -> ScrollytellResult<()> {
        if !self.from.is_finite() || !self.to.is_finite() {
            return Err(ScrollytellError::configuration(
                "tween endpoints must be finite",
            ));
        }
        Ok(())
    }
}

/// A bundle of property tweens anchored to a sub-range of scroll progress,
/// targeting one stage entry by key.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct KeyframeGroup {
    pub target: String, // key into the stage
    pub range: ProgressRange,
    pub tweens: Vec<PropertyTween>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl KeyframeGroup {
    pub fn validate(&self) -> ScrollytellResult<()> {
        if self.target.trim().is_empty() {
            return Err(ScrollytellError::configuration(
                "keyframe group target key must be non-empty",
            ));
        }
        if self.range.start.0 > self.range.end.0 {
            return Err(ScrollytellError::configuration(format!(
                "keyframe group '{}' has start > end",
                self.display_name()
            )));
        }
        if self.tweens.is_empty() {
            return Err(ScrollytellError::configuration(format!(
                "keyframe group '{}' has no tweens",
                self.display_name()
            )));
        }
        for tween in &self.tweens {
            tween.validate()?;
        }
        Ok(())
    }

    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.target.as_str())
    }
}

/// One resolved write against a target property.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PropertyWrite {
    pub target: String,
    pub prop: Prop,
    pub value: f64,
}

/// Insertion-ordered keyframe groups plus the chapter labels resolved while
/// the timeline was built.
///
/// Playback is a direct progress lookup: every group is evaluated at every
/// sample, holding its from-value before its interval and its to-value past
/// it. When two groups tween the same property of the same target, the group
/// constructed later wins, because writes are emitted (and must be applied)
/// in construction order.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Timeline {
    pub groups: Vec<KeyframeGroup>,
    #[serde(default)]
    pub labels: BTreeMap<String, Progress>,
}

impl Timeline {
    pub fn validate(&self) -> ScrollytellResult<()> {
        if self.groups.is_empty() {
            return Err(ScrollytellError::configuration(
                "timeline must contain at least one keyframe group",
            ));
        }
        for group in &self.groups {
            group.validate()?;
        }
        for (name, at) in &self.labels {
            if !(0.0..=1.0).contains(&at.0) {
                return Err(ScrollytellError::configuration(format!(
                    "label '{name}' resolved outside [0, 1]"
                )));
            }
        }
        Ok(())
    }

    pub fn label(&self, name: &str) -> Option<Progress> {
        self.labels.get(name).copied()
    }

    /// Evaluate every group at `p`, in construction order.
    #[tracing::instrument(skip(self), level = "trace")]
    pub fn sample(&self, p: Progress) -> Vec<PropertyWrite> {
        let mut writes = Vec::with_capacity(self.groups.len());
        for group in &self.groups {
            let t = group.range.local_t(p);
            for tween in &group.tweens {
                writes.push(PropertyWrite {
                    target: group.target.clone(),
                    prop: tween.prop,
                    value: tween.sample(t),
                });
            }
        }
        writes
    }
}
