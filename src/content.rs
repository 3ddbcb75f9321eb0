use std::collections::BTreeMap;

use serde_json::Value;

use crate::{
    error::{ScrollytellError, ScrollytellResult},
    target::DomLayout,
};

/// Parse-and-cache store for JSON content documents used for text and meta
/// substitution. The host hands over raw JSON (fetching is its business);
/// lookups that miss degrade to `None` plus a debug log, never an error,
/// since missing copy must not break the page.
#[derive(Default, Debug)]
pub struct ContentLibrary {
    docs: BTreeMap<String, Value>,
}

impl ContentLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and cache a document under `name`. Re-inserting replaces the
    /// cached copy.
    pub fn insert_json(&mut self, name: impl Into<String>, json: &str) -> ScrollytellResult<()> {
        let name = name.into();
        let value: Value = serde_json::from_str(json).map_err(|e| {
            ScrollytellError::configuration(format!("content document '{name}': {e}"))
        })?;
        self.docs.insert(name, value);
        Ok(())
    }

    pub fn is_cached(&self, name: &str) -> bool {
        self.docs.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.docs.get(name)
    }

    /// Walk a dot path ("hero.title", "pillars.1.body") into a document.
    pub fn lookup(&self, name: &str, path: &str) -> Option<&Value> {
        let mut current = self.docs.get(name)?;
        for segment in path.split('.') {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn text(&self, name: &str, path: &str) -> Option<&str> {
        self.lookup(name, path)?.as_str()
    }

    /// Write text bindings `(element id, dot path)` into the layout.
    /// Returns how many bindings were applied; misses are logged and skipped.
    pub fn apply_text_bindings(
        &self,
        layout: &mut dyn DomLayout,
        doc: &str,
        bindings: &[(&str, &str)],
    ) -> usize {
        let mut applied = 0;
        for (element, path) in bindings {
            let Some(text) = self.text(doc, path) else {
                tracing::debug!(doc, path, "content binding missing");
                continue;
            };
            if layout.set_text(element, text) {
                applied += 1;
            } else {
                tracing::debug!(doc, element, "content target element missing");
            }
        }
        applied
    }

    /// Apply the conventional `meta.title` / `meta.description` entries.
    pub fn apply_meta(&self, layout: &mut dyn DomLayout, doc: &str) -> bool {
        let mut any = false;
        if let Some(title) = self.text(doc, "meta.title") {
            layout.set_title(title);
            any = true;
        }
        if let Some(description) = self.text(doc, "meta.description") {
            layout.set_meta("description", description);
            any = true;
        }
        any
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ScreenRect;
    use crate::target::fixtures::RecordingLayout;

    const DOC: &str = r#"{
        "meta": { "title": "Speak Up", "description": "Connection, not perfection." },
        "hero": { "title": "Find your voice" },
        "pillars": [ { "body": "first" }, { "body": "second" } ]
    }"#;

    #[test]
    fn lookup_walks_objects_and_arrays() {
        let mut lib = ContentLibrary::new();
        lib.insert_json("home", DOC).unwrap();
        assert_eq!(lib.text("home", "hero.title"), Some("Find your voice"));
        assert_eq!(lib.text("home", "pillars.1.body"), Some("second"));
        assert_eq!(lib.text("home", "pillars.7.body"), None);
        assert_eq!(lib.text("home", "hero.missing"), None);
        assert_eq!(lib.text("gone", "hero.title"), None);
    }

    #[test]
    fn invalid_json_is_a_configuration_error() {
        let mut lib = ContentLibrary::new();
        let err = lib.insert_json("broken", "{not json").unwrap_err();
        assert!(err.is_configuration());
        assert!(!lib.is_cached("broken"));
    }

    #[test]
    fn bindings_apply_what_they_can() {
        let mut lib = ContentLibrary::new();
        lib.insert_json("home", DOC).unwrap();
        let mut layout = RecordingLayout::with_boxes(&[(
            "hero-title",
            ScreenRect::new(0.0, 0.0, 100.0, 40.0),
        )]);
        let applied = lib.apply_text_bindings(
            &mut layout,
            "home",
            &[
                ("hero-title", "hero.title"),
                ("hero-title", "hero.missing"),
                ("gone-element", "hero.title"),
            ],
        );
        assert_eq!(applied, 1);
        assert_eq!(layout.text["hero-title"], "Find your voice");
    }

    #[test]
    fn meta_is_applied_when_present() {
        let mut lib = ContentLibrary::new();
        lib.insert_json("home", DOC).unwrap();
        let mut layout = RecordingLayout::default();
        assert!(lib.apply_meta(&mut layout, "home"));
        assert_eq!(layout.title.as_deref(), Some("Speak Up"));
        assert_eq!(layout.meta["description"], "Connection, not perfection.");
    }
}
