//! Tag Stabilizer
//!
//! Rewrites every JSX tag name of a source unit to a marker token and appends one
//! inert sentinel call that keeps the original bindings alive:
//!
//! ```text
//! <Foo.Bar/>;            =>   <PREPPY_JSX_ID_1/>;
//!                             ;__PREPPY_JSX_NAMES__(/*PREPPY_JSX_ID_1*/Foo.Bar);
//! ```
//!
//! The optimizer renames `Foo` inside the sentinel consistently with every other live
//! reference, which is what lets the resolver recover the final name afterwards.

use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_span::SourceType;
use serde::{Deserialize, Serialize};

use crate::error::{PreppyError, Result};
use crate::marker::{MarkerSequence, TagBinding, UnitMarkers};
use crate::splice::SpliceEditor;
use crate::visitor::{tag_name, walk_program, MarkupNode, MarkupVisitor, WalkControl};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "napi", napi_derive::napi(object))]
#[serde(rename_all = "camelCase")]
pub struct StabilizedUnit {
    pub code: String,
    /// Source map JSON (v3) with `sourcesContent` embedded.
    pub map: String,
    pub tags: Vec<TagBinding>,
}

/// Owns the marker sequence for one build. Every unit of the build must go through
/// the same `Stabilizer` so markers never collide.
#[derive(Debug, Default)]
pub struct Stabilizer {
    sequence: MarkerSequence,
}

impl Stabilizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sequence(&self) -> &MarkerSequence {
        &self.sequence
    }

    /// Returns `Ok(None)` when the unit contains no tags; it passes through unchanged.
    pub fn stabilize(&self, source: &str, unit_path: &str) -> Result<Option<StabilizedUnit>> {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, source_type_for(unit_path)).parse();
        if ret.panicked || !ret.errors.is_empty() {
            let message = ret
                .errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(PreppyError::parse(unit_path, message));
        }

        let mut rewriter = TagRewriter {
            sequence: &self.sequence,
            markers: UnitMarkers::default(),
            editor: SpliceEditor::new(source),
        };
        walk_program(&mut rewriter, &ret.program);

        let TagRewriter {
            markers,
            mut editor,
            ..
        } = rewriter;

        if markers.is_empty() {
            tracing::debug!("{}: no JSX tags, passing through", unit_path);
            return Ok(None);
        }

        // A fresh line keeps the call out of any trailing `//` comment.
        editor.append(&format!("\n;{};", markers.sentinel_call()));
        let code = editor.render();
        let map = editor.generate_map(unit_path, true).to_json_string();

        Ok(Some(StabilizedUnit {
            code,
            map,
            tags: markers.into_bindings(),
        }))
    }
}

struct TagRewriter<'s, 'src> {
    sequence: &'s MarkerSequence,
    markers: UnitMarkers,
    editor: SpliceEditor<'src>,
}

impl<'a> MarkupVisitor<'a> for TagRewriter<'_, '_> {
    fn enter(&mut self, node: MarkupNode<'_, 'a>) -> WalkControl {
        let name = match node {
            MarkupNode::OpeningTag(el) => &el.name,
            MarkupNode::ClosingTag(el) => &el.name,
            // The member path was already resolved as a whole at its tag.
            MarkupNode::MemberPath(_) => return WalkControl::SkipChildren,
        };

        if let Some((text, span)) = tag_name(name) {
            let marker = self.markers.marker_for(&text, self.sequence);
            self.editor
                .overwrite(span.start, span.end, marker.to_string());
        }
        WalkControl::Continue
    }
}

/// JSX is always on except for plain `.ts` units, where `<T>` is a type assertion.
fn source_type_for(unit_path: &str) -> SourceType {
    let source_type = SourceType::from_path(unit_path)
        .unwrap_or_default()
        .with_module(true);
    if source_type.is_typescript() && !unit_path.ends_with(".tsx") {
        source_type
    } else {
        source_type.with_jsx(true)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
lazy_static::lazy_static! {
    /// Process-wide stabilizer for the Node plugin; the host runs one build per process.
    pub(crate) static ref NATIVE_STABILIZER: Stabilizer = Stabilizer::new();
}

#[cfg(feature = "napi")]
#[napi_derive::napi]
pub fn stabilize_native(code: String, id: String) -> napi::Result<Option<StabilizedUnit>> {
    Ok(NATIVE_STABILIZER.stabilize(&code, &id)?)
}
