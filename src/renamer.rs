//! Deterministic renaming stage.
//!
//! Renames bindings and references by name, the way a mangler would, and nothing else.
//! It is the stand-in optimizer for exercising the resolver against renamed output.

use oxc_allocator::Allocator;
use oxc_ast::ast::{BindingIdentifier, IdentifierReference, ImportSpecifier, ModuleExportName};
use oxc_ast_visit::{walk, Visit};
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType};
use std::collections::HashMap;

use crate::error::{PreppyError, Result};
use crate::pipeline::{InputModule, OptimizingStage, OutputChunk};
use crate::splice::SpliceEditor;

#[derive(Debug, Clone, Default)]
pub struct RenameStage {
    renames: HashMap<String, String>,
}

impl RenameStage {
    pub fn new(renames: HashMap<String, String>) -> Self {
        Self { renames }
    }

    pub fn rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.renames.insert(from.into(), to.into());
        self
    }

    pub fn rename_module(&self, code: &str, id: &str) -> Result<(String, Option<String>)> {
        if self.renames.is_empty() {
            return Ok((code.to_string(), None));
        }

        let allocator = Allocator::default();
        let source_type = SourceType::default().with_module(true).with_jsx(true);
        let ret = Parser::new(&allocator, code, source_type).parse();
        if ret.panicked || !ret.errors.is_empty() {
            let message = ret
                .errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(PreppyError::parse(id, message));
        }

        let mut collector = RenameCollector {
            renames: &self.renames,
            replacements: Vec::new(),
        };
        collector.visit_program(&ret.program);

        let mut editor = SpliceEditor::new(code);
        for (start, end, replacement) in collector.replacements {
            editor.overwrite(start, end, replacement);
        }
        if !editor.has_changes() {
            return Ok((code.to_string(), None));
        }
        let map = editor.generate_map(id, false).to_json_string();
        Ok((editor.render(), Some(map)))
    }
}

impl OptimizingStage for RenameStage {
    fn optimize(&self, modules: Vec<InputModule>) -> Result<Vec<OutputChunk>> {
        modules
            .into_iter()
            .map(|module| -> Result<OutputChunk> {
                let (code, map) = self.rename_module(&module.code, &module.id)?;
                Ok(OutputChunk {
                    file_name: module.id,
                    code,
                    map: map.or(module.map),
                })
            })
            .collect()
    }
}

struct RenameCollector<'r> {
    renames: &'r HashMap<String, String>,
    replacements: Vec<(u32, u32, String)>,
}

impl<'a> Visit<'a> for RenameCollector<'_> {
    fn visit_identifier_reference(&mut self, ident: &IdentifierReference<'a>) {
        if let Some(new_name) = self.renames.get(ident.name.as_str()) {
            self.replacements
                .push((ident.span.start, ident.span.end, new_name.clone()));
        }
    }

    fn visit_binding_identifier(&mut self, ident: &BindingIdentifier<'a>) {
        if let Some(new_name) = self.renames.get(ident.name.as_str()) {
            self.replacements
                .push((ident.span.start, ident.span.end, new_name.clone()));
        }
    }

    fn visit_import_specifier(&mut self, specifier: &ImportSpecifier<'a>) {
        let local_name = specifier.local.name.as_str();
        if let Some(new_name) = self.renames.get(local_name) {
            let imported_name = match &specifier.imported {
                ModuleExportName::IdentifierName(id) => id.name.as_str(),
                ModuleExportName::StringLiteral(s) => s.value.as_str(),
                _ => "",
            };

            if imported_name == local_name && specifier.imported.span() == specifier.local.span {
                // Shorthand import { Foo } -> { Foo as R0 }
                self.replacements.push((
                    specifier.span.start,
                    specifier.span.end,
                    format!("{} as {}", imported_name, new_name),
                ));
                return;
            }
        }
        walk::walk_import_specifier(self, specifier);
    }
}
