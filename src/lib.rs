//! # Solid Preset Native
//!
//! Build option resolution for Solid component libraries, plus the JSX tag stabilizer
//! that keeps tag names correct across a minifying bundler.
//!
//! ## Tag Stabilizer Invariants
//!
//! 1. **One marker per name**: inside one source unit every occurrence of a tag name
//!    (`Foo`, `Foo.Bar.Baz`, `div`) is rewritten to the same `PREPPY_JSX_ID_<n>` marker.
//!
//! 2. **No collisions**: markers come from a single `MarkerSequence` owned by the
//!    build's `Stabilizer`. The sequence is atomic and never resets, so units stabilized
//!    in parallel never share a marker.
//!
//! 3. **Sentinel is the only channel**: each stabilized unit ends with a fresh line
//!    `;__PREPPY_JSX_NAMES__(/*PREPPY_JSX_ID_1*/Foo,...);`. Nothing else about the
//!    markers is threaded through the optimizing stage.
//!
//! 4. **Resolve after optimize**: the resolver reads the renamed arguments back out of
//!    the sentinel, deletes the call and substitutes the markers. It must only see
//!    chunks the optimizing stage has finished with.
//!
//! 5. **Fatal on missing**: a marker without a resolvable binding is an error
//!    (`PREPPY-ERR-RESOLVE-002`). A literal marker never reaches the output.

pub mod config;
pub mod discovery;
pub mod error;
pub mod instructions;
pub mod marker;
pub mod pipeline;
pub mod renamer;
pub mod resolve;
pub mod splice;
pub mod stabilize;
pub mod visitor;

#[cfg(test)]
mod pipeline_tests;
#[cfg(test)]
mod resolve_tests;

pub use config::{
    clean_dist, find_closest_package_json, process_options, with_solid, BuildOptions,
    DeclarationOptions, GenerateMode, ModuleFormat, OutputOptions, PackageManifest,
    PresetOptions, ResolvedBuild, SolidOptions, TranspileOptions,
};
pub use error::{PreppyError, Result};
pub use marker::{Marker, MarkerSequence, TagBinding, MARKER_PREFIX, SENTINEL_NAME};
pub use pipeline::{IdentityStage, InputModule, OptimizingStage, OutputChunk, Pipeline, SourceUnit};
pub use renamer::RenameStage;
pub use resolve::Resolver;
pub use stabilize::{StabilizedUnit, Stabilizer};

#[cfg(feature = "napi")]
pub use config::process_options_native;
#[cfg(feature = "napi")]
pub use resolve::resolve_native;
#[cfg(feature = "napi")]
pub use stabilize::stabilize_native;
