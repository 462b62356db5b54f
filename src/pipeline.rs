//! Two-phase build pipeline: Stabilizer → optimizing stage → Resolver.
//!
//! The optimizing stage is opaque. The sentinel call embedded in each module is the
//! only thing that carries marker correlation through it.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::resolve::Resolver;
use crate::stabilize::Stabilizer;

/// One file of source text fed to the stabilizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceUnit {
    pub path: String,
    pub code: String,
}

impl SourceUnit {
    pub fn new(path: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            code: code.into(),
        }
    }
}

/// A stabilized (or passed-through) module handed to the optimizing stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputModule {
    pub id: String,
    pub code: String,
    pub map: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputChunk {
    pub file_name: String,
    pub code: String,
    pub map: Option<String>,
}

/// The bundler/minifier sitting between the two passes. It may rename, inline or
/// drop bindings.
pub trait OptimizingStage {
    fn optimize(&self, modules: Vec<InputModule>) -> Result<Vec<OutputChunk>>;
}

impl<F> OptimizingStage for F
where
    F: Fn(Vec<InputModule>) -> Result<Vec<OutputChunk>>,
{
    fn optimize(&self, modules: Vec<InputModule>) -> Result<Vec<OutputChunk>> {
        self(modules)
    }
}

/// Emits every module as its own chunk, untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityStage;

impl OptimizingStage for IdentityStage {
    fn optimize(&self, modules: Vec<InputModule>) -> Result<Vec<OutputChunk>> {
        Ok(modules
            .into_iter()
            .map(|module| OutputChunk {
                file_name: module.id,
                code: module.code,
                map: module.map,
            })
            .collect())
    }
}

/// One build invocation. The owned stabilizer's marker sequence lives exactly as
/// long as the pipeline, so markers are unique across every unit it processes.
#[derive(Debug, Default)]
pub struct Pipeline {
    stabilizer: Stabilizer,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stabilizer(&self) -> &Stabilizer {
        &self.stabilizer
    }

    /// Stabilizes units in parallel; output order matches input order.
    pub fn stabilize_units(&self, units: &[SourceUnit]) -> Result<Vec<InputModule>> {
        units
            .par_iter()
            .map(|unit| -> Result<InputModule> {
                let module = match self.stabilizer.stabilize(&unit.code, &unit.path)? {
                    Some(stabilized) => InputModule {
                        id: unit.path.clone(),
                        code: stabilized.code,
                        map: Some(stabilized.map),
                    },
                    None => InputModule {
                        id: unit.path.clone(),
                        code: unit.code.clone(),
                        map: None,
                    },
                };
                Ok(module)
            })
            .collect()
    }

    /// Must only run once the optimizing stage has finished with `chunks`.
    /// Chunk maps are kept as emitted by the stage; the marker substitution itself is
    /// not mapped.
    pub fn resolve_chunks(&self, chunks: Vec<OutputChunk>) -> Result<Vec<OutputChunk>> {
        let resolver = Resolver::with_origins(self.stabilizer.sequence());
        chunks
            .into_iter()
            .map(|chunk| -> Result<OutputChunk> {
                match resolver.resolve(&chunk.code, &chunk.file_name)? {
                    Some(code) => Ok(OutputChunk { code, ..chunk }),
                    None => Ok(chunk),
                }
            })
            .collect()
    }

    pub fn run<S>(&self, units: &[SourceUnit], stage: &S) -> Result<Vec<OutputChunk>>
    where
        S: OptimizingStage + ?Sized,
    {
        let modules = self.stabilize_units(units)?;
        tracing::debug!("stabilized {} units", modules.len());
        let chunks = stage.optimize(modules)?;
        self.resolve_chunks(chunks)
    }
}
