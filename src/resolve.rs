//! Marker Resolver
//!
//! Runs on an emitted chunk after the optimizing stage. Reads every sentinel call,
//! learns the final identifier for each marker, strips the calls and substitutes the
//! markers. Any marker that cannot be resolved is a hard error: a literal marker must
//! never reach shipped output.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

use crate::error::{PreppyError, Result};
use crate::marker::{Marker, MarkerSequence, MARKER_RE};

/// One identifier segment of a binding path, per the ECMAScript `IdentifierName` grammar.
const IDENT: &str = r"[\p{ID_Start}_$][\p{ID_Continue}$\x{200C}\x{200D}]*";

lazy_static! {
    static ref SENTINEL_RE: Regex = Regex::new(r"__PREPPY_JSX_NAMES__\(([^)]*)\);?").unwrap();
    static ref ARGUMENT_RE: Regex =
        Regex::new(r"^\s*/\*\s*(PREPPY_JSX_ID_\d+)\s*\*/\s*(\S*)\s*$").unwrap();
    static ref BINDING_RE: Regex =
        Regex::new(&format!(r"^{IDENT}(?:\.{IDENT})*$")).unwrap();
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Resolver<'s> {
    sequence: Option<&'s MarkerSequence>,
}

impl<'s> Resolver<'s> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses the build's sequence to name the original tag in unresolved-marker errors.
    pub fn with_origins(sequence: &'s MarkerSequence) -> Self {
        Self {
            sequence: Some(sequence),
        }
    }

    /// Returns `Ok(None)` when the chunk has no sentinel calls and no markers.
    pub fn resolve(&self, chunk: &str, chunk_name: &str) -> Result<Option<String>> {
        if !SENTINEL_RE.is_match(chunk) {
            if let Some(found) = MARKER_RE.find(chunk) {
                return Err(self.unresolved(chunk_name, found.as_str()));
            }
            return Ok(None);
        }

        let mut final_names: HashMap<Marker, String> = HashMap::new();
        for call in SENTINEL_RE.captures_iter(chunk) {
            for (marker, name) in self.parse_arguments(&call[1], chunk_name)? {
                if let Some(previous) = final_names.insert(marker, name) {
                    tracing::debug!("{}: {} was already bound to {}", chunk_name, marker, previous);
                }
            }
        }

        let stripped = SENTINEL_RE.replace_all(chunk, "");

        let mut out = String::with_capacity(stripped.len());
        let mut cursor = 0;
        for found in MARKER_RE.find_iter(&stripped) {
            let Some(name) = Marker::parse(found.as_str()).and_then(|m| final_names.get(&m))
            else {
                return Err(self.unresolved(chunk_name, found.as_str()));
            };
            out.push_str(&stripped[cursor..found.start()]);
            out.push_str(name);
            cursor = found.end();
        }
        out.push_str(&stripped[cursor..]);

        Ok(Some(out))
    }

    fn unresolved(&self, chunk_name: &str, marker: &str) -> PreppyError {
        let tag = self
            .sequence
            .zip(Marker::parse(marker))
            .and_then(|(sequence, m)| sequence.origin(m));
        PreppyError::UnresolvedMarker {
            chunk: chunk_name.to_string(),
            marker: marker.to_string(),
            tag,
        }
    }

    /// Splits `/*M1*/a,/*M2*/b.c` into marker/name pairs.
    ///
    /// Arguments are plain identifier references, so a top-level split on `,` is exact.
    fn parse_arguments(&self, list: &str, chunk_name: &str) -> Result<Vec<(Marker, String)>> {
        let mut pairs = Vec::new();
        for argument in list.split(',') {
            if argument.trim().is_empty() {
                continue;
            }
            let malformed = || PreppyError::MalformedSentinel {
                chunk: chunk_name.to_string(),
                argument: argument.trim().to_string(),
            };
            let caps = ARGUMENT_RE.captures(argument).ok_or_else(malformed)?;
            let marker = Marker::parse(&caps[1]).ok_or_else(malformed)?;
            let name = &caps[2];

            if name.is_empty() {
                return Err(self.unresolved(chunk_name, &marker.to_string()));
            }
            if !BINDING_RE.is_match(name) {
                return Err(PreppyError::NonIdentifierBinding {
                    chunk: chunk_name.to_string(),
                    marker: marker.to_string(),
                    found: name.to_string(),
                });
            }
            pairs.push((marker, name.to_string()));
        }
        Ok(pairs)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
#[napi_derive::napi]
pub fn resolve_native(code: String, chunk_name: String) -> napi::Result<Option<String>> {
    let resolver = Resolver::with_origins(crate::stabilize::NATIVE_STABILIZER.sequence());
    Ok(resolver.resolve(&code, &chunk_name)?)
}
