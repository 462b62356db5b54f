//! Marker tokens and the build-wide sequence that hands them out.
//!
//! A marker is a synthetic identifier (`PREPPY_JSX_ID_<n>`) that replaces a JSX tag
//! name while the unit travels through the optimizing stage. The sequence never resets
//! for the lifetime of one build, so two distinct tags never share a marker.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

pub const MARKER_PREFIX: &str = "PREPPY_JSX_ID_";

/// Name of the inert call that carries marker/binding pairs across the optimizer.
pub const SENTINEL_NAME: &str = "__PREPPY_JSX_NAMES__";

lazy_static! {
    pub static ref MARKER_RE: Regex = Regex::new(r"\bPREPPY_JSX_ID_(\d+)\b").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Marker(u32);

impl Marker {
    pub fn id(self) -> u32 {
        self.0
    }

    /// Parses `PREPPY_JSX_ID_<n>`; anything else (including trailing text) is rejected.
    pub fn parse(text: &str) -> Option<Self> {
        let digits = text.strip_prefix(MARKER_PREFIX)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().map(Marker)
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", MARKER_PREFIX, self.0)
    }
}

/// One `(tag name, marker)` pair assigned inside a source unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "napi", napi_derive::napi(object))]
#[serde(rename_all = "camelCase")]
pub struct TagBinding {
    pub name: String,
    pub marker: String,
}

/// Monotonic marker generator shared by every unit of a build.
///
/// Safe to share across threads: ids come from an atomic counter, and the origin
/// table (used only for diagnostics) sits behind a mutex.
#[derive(Debug, Default)]
pub struct MarkerSequence {
    last: AtomicU32,
    origins: Mutex<HashMap<u32, String>>,
}

impl MarkerSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_marker(&self, tag: &str) -> Marker {
        let id = self.last.fetch_add(1, Ordering::Relaxed) + 1;
        if let Ok(mut origins) = self.origins.lock() {
            origins.insert(id, tag.to_string());
        }
        Marker(id)
    }

    /// Original tag name a marker was issued for, if it came from this sequence.
    pub fn origin(&self, marker: Marker) -> Option<String> {
        self.origins
            .lock()
            .ok()
            .and_then(|origins| origins.get(&marker.0).cloned())
    }

    pub fn issued(&self) -> u32 {
        self.last.load(Ordering::Relaxed)
    }
}

/// Per-unit NameToMarker table. Keeps first-seen order so the sentinel call is
/// deterministic.
#[derive(Debug, Default)]
pub(crate) struct UnitMarkers {
    bindings: Vec<(String, Marker)>,
    by_name: HashMap<String, usize>,
}

impl UnitMarkers {
    pub fn marker_for(&mut self, name: &str, sequence: &MarkerSequence) -> Marker {
        if let Some(&index) = self.by_name.get(name) {
            return self.bindings[index].1;
        }
        let marker = sequence.next_marker(name);
        tracing::debug!("assigned {} to <{}>", marker, name);
        self.by_name.insert(name.to_string(), self.bindings.len());
        self.bindings.push((name.to_string(), marker));
        marker
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// `__PREPPY_JSX_NAMES__(/*M1*/a,/*M2*/b)` without the surrounding `;`.
    pub fn sentinel_call(&self) -> String {
        let args = self
            .bindings
            .iter()
            .map(|(name, marker)| format!("/*{}*/{}", marker, name))
            .collect::<Vec<_>>()
            .join(",");
        format!("{}({})", SENTINEL_NAME, args)
    }

    pub fn into_bindings(self) -> Vec<TagBinding> {
        self.bindings
            .into_iter()
            .map(|(name, marker)| TagBinding {
                name,
                marker: marker.to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_display_and_parse() {
        let sequence = MarkerSequence::new();
        let marker = sequence.next_marker("Foo");
        assert_eq!(marker.to_string(), "PREPPY_JSX_ID_1");
        assert_eq!(Marker::parse("PREPPY_JSX_ID_1"), Some(marker));
        assert_eq!(Marker::parse("PREPPY_JSX_ID_"), None);
        assert_eq!(Marker::parse("PREPPY_JSX_ID_1a"), None);
        assert_eq!(Marker::parse("Foo"), None);
    }

    #[test]
    fn test_sequence_is_monotonic_and_tracks_origin() {
        let sequence = MarkerSequence::new();
        let a = sequence.next_marker("A");
        let b = sequence.next_marker("B");
        assert!(b.id() > a.id());
        assert_eq!(sequence.origin(b).as_deref(), Some("B"));
        assert_eq!(sequence.issued(), 2);
    }

    #[test]
    fn test_unit_markers_reuse_and_sentinel_order() {
        let sequence = MarkerSequence::new();
        let mut unit = UnitMarkers::default();
        let first = unit.marker_for("Foo.Bar", &sequence);
        let second = unit.marker_for("div", &sequence);
        assert_eq!(unit.marker_for("Foo.Bar", &sequence), first);
        assert_ne!(first, second);
        assert_eq!(
            unit.sentinel_call(),
            "__PREPPY_JSX_NAMES__(/*PREPPY_JSX_ID_1*/Foo.Bar,/*PREPPY_JSX_ID_2*/div)"
        );
    }
}
