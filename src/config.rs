//! Build option resolution for the Solid preset.
//!
//! Turns user options plus the closest `package.json` into the concrete entry,
//! externals and output targets a bundler needs.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PreppyError, Result};

/// How many parent directories `find_closest_package_json` climbs before giving up.
pub const MANIFEST_SEARCH_DEPTH: usize = 10;

pub const DEFAULT_BROWSERSLIST: &str = "last 2 years";

pub const SOLID_EXTERNALS: [&str; 3] = ["solid-js", "solid-js/web", "solid-js/store"];

/// Extensions the transpiler and node resolution accept.
pub const SOURCE_EXTENSIONS: [&str; 4] = [".js", ".ts", ".jsx", ".tsx"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleFormat {
    #[serde(alias = "commonjs")]
    Cjs,
    #[serde(alias = "es")]
    Esm,
    Umd,
}

impl ModuleFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ModuleFormat::Cjs => "cjs",
            ModuleFormat::Esm => "esm",
            ModuleFormat::Umd => "umd",
        }
    }

    /// File name inside `dist/<name>/` for sub-package builds.
    pub fn sub_package_file(self) -> &'static str {
        match self {
            ModuleFormat::Cjs => "index.common.js",
            ModuleFormat::Esm => "index.module.js",
            ModuleFormat::Umd => "index.umd.js",
        }
    }
}

impl std::str::FromStr for ModuleFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "cjs" | "commonjs" => Ok(ModuleFormat::Cjs),
            "esm" | "es" => Ok(ModuleFormat::Esm),
            "umd" => Ok(ModuleFormat::Umd),
            other => Err(format!("unknown module format `{}`", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputOptions {
    pub format: ModuleFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// Global name for UMD bundles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub sourcemap: bool,
    #[serde(default)]
    pub minify: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerateMode {
    Dom,
    Ssr,
}

/// Options for the Solid JSX transform. Unset fields keep the transform's own defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SolidOptions {
    /// Runtime module the helpers are imported from (`solid-js/web`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generate: Option<GenerateMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hydratable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delegate_events: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrap_conditionals: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_to_custom_elements: Option<bool>,
    /// Components auto-imported when they appear in JSX.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub built_ins: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildOptions {
    pub input: Option<String>,
    /// Defaults to `["esm"]`.
    pub targets: Option<Vec<ModuleFormat>>,
    pub write_package_json: bool,
    pub print_instructions: bool,
    pub mapping_name: Option<String>,
    /// Replaces the generated outputs entirely when present.
    pub output: Option<Vec<OutputOptions>>,
    pub solid_options: Option<SolidOptions>,
    /// Merged over the default transpile options at the top level only.
    pub babel_options: Map<String, Value>,
    /// Merged over the default declaration compiler options.
    pub ts_compiler_options: Map<String, Value>,
    /// Prepended to the Solid and dependency externals.
    pub external: Vec<String>,
    pub plugins: Vec<Value>,
    /// Any other bundler option, carried through untouched.
    #[serde(flatten)]
    pub bundler_options: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PackageManifest {
    pub source: Option<String>,
    pub dependencies: BTreeMap<String, String>,
    pub peer_dependencies: BTreeMap<String, String>,
    /// String or list of queries, passed through to the transpiler targets.
    pub browserslist: Option<Value>,
}

impl PackageManifest {
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| PreppyError::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Closest readable `package.json` at or above `start`. Missing or unparsable
/// manifests fall through to the parent; after `MANIFEST_SEARCH_DEPTH` levels an
/// empty manifest is returned.
pub fn find_closest_package_json(start: &Path) -> PackageManifest {
    let mut dir = Some(start);
    for _ in 0..=MANIFEST_SEARCH_DEPTH {
        let Some(current) = dir else { break };
        let candidate = current.join("package.json");
        if candidate.is_file() {
            match PackageManifest::read(&candidate) {
                Ok(manifest) => return manifest,
                Err(e) => tracing::warn!("skipping {}: {}", candidate.display(), e),
            }
        }
        dir = current.parent();
    }
    PackageManifest::default()
}

/// Babel-style transpile step: Solid JSX, TypeScript stripping and env lowering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranspileOptions {
    pub extensions: Vec<String>,
    pub babel_helpers: String,
    pub presets: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Declaration and preserved-JSX source emit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationOptions {
    /// Where the preserved `.jsx` sources go.
    pub out_dir: PathBuf,
    pub declaration_dir: PathBuf,
    pub compiler_options: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedBuild {
    pub input: PathBuf,
    pub name: String,
    pub external: Vec<String>,
    pub output: Vec<OutputOptions>,
    pub browserslist: Value,
    pub transpile: TranspileOptions,
    pub declarations: DeclarationOptions,
    pub plugins: Vec<Value>,
    pub as_sub_package: bool,
    pub write_package_json: bool,
    pub print_instructions: bool,
    #[serde(flatten)]
    pub bundler_options: Map<String, Value>,
}

impl ResolvedBuild {
    pub fn has_format(&self, format: ModuleFormat) -> bool {
        self.output.iter().any(|o| o.format == format)
    }
}

pub fn process_options(
    options: &BuildOptions,
    cwd: &Path,
    as_sub_package: bool,
) -> Result<ResolvedBuild> {
    let manifest = find_closest_package_json(cwd);
    resolve_with_manifest(options, &manifest, cwd, as_sub_package)
}

pub fn resolve_with_manifest(
    options: &BuildOptions,
    manifest: &PackageManifest,
    cwd: &Path,
    as_sub_package: bool,
) -> Result<ResolvedBuild> {
    let src = options
        .input
        .as_deref()
        .or(manifest.source.as_deref())
        .ok_or(PreppyError::MissingInput)?;

    let input = cwd.join(src);
    let name = match &options.mapping_name {
        Some(name) => name.clone(),
        None => input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .ok_or(PreppyError::MissingInput)?,
    };

    let mut external = options.external.clone();
    external.extend(SOLID_EXTERNALS.iter().map(|s| s.to_string()));
    external.extend(manifest.dependencies.keys().cloned());
    external.extend(manifest.peer_dependencies.keys().cloned());

    let browserslist = manifest
        .browserslist
        .clone()
        .unwrap_or_else(|| Value::String(DEFAULT_BROWSERSLIST.to_string()));

    let output = match &options.output {
        Some(output) => output.clone(),
        None => {
            let targets = options
                .targets
                .clone()
                .unwrap_or_else(|| vec![ModuleFormat::Esm]);
            [ModuleFormat::Cjs, ModuleFormat::Esm, ModuleFormat::Umd]
                .into_iter()
                .filter(|format| targets.contains(format))
                .map(|format| default_output(format, &name, cwd, as_sub_package))
                .collect()
        }
    };

    let transpile = transpile_options(options, &browserslist)?;
    let declarations = declaration_options(options, &name, cwd, as_sub_package);

    Ok(ResolvedBuild {
        input,
        name,
        external,
        output,
        browserslist,
        transpile,
        declarations,
        plugins: options.plugins.clone(),
        as_sub_package,
        write_package_json: options.write_package_json,
        print_instructions: options.print_instructions,
        bundler_options: options.bundler_options.clone(),
    })
}

fn transpile_options(options: &BuildOptions, browserslist: &Value) -> Result<TranspileOptions> {
    let solid = serde_json::to_value(options.solid_options.clone().unwrap_or_default())?;
    let mut merged = json!({
        "extensions": SOURCE_EXTENSIONS,
        "babelHelpers": "bundled",
        "presets": [
            ["babel-preset-solid", solid],
            "@babel/preset-typescript",
            ["@babel/preset-env", { "bugfixes": true, "targets": browserslist }],
        ],
    });
    if let Value::Object(map) = &mut merged {
        for (key, value) in &options.babel_options {
            map.insert(key.clone(), value.clone());
        }
    }
    Ok(serde_json::from_value(merged)?)
}

fn declaration_options(
    options: &BuildOptions,
    name: &str,
    cwd: &Path,
    as_sub_package: bool,
) -> DeclarationOptions {
    let dist = cwd.join("dist");
    let (mut out_dir, mut declaration_dir) = if as_sub_package {
        (dist.join(name), dist.join(name))
    } else {
        (dist.join("source"), dist.join("types"))
    };

    let mut compiler_options = Map::new();
    for (key, value) in [
        ("target", json!("ESNext")),
        ("module", json!("ESNext")),
        ("moduleResolution", json!("NodeJs")),
        ("jsx", json!("preserve")),
        ("jsxImportSource", json!("solid-js")),
        ("allowSyntheticDefaultImports", json!(true)),
        ("esModuleInterop", json!(true)),
        ("declaration", json!(true)),
        ("allowJs", json!(true)),
    ] {
        compiler_options.insert(key.to_string(), value);
    }
    for (key, value) in &options.ts_compiler_options {
        match (key.as_str(), value.as_str()) {
            ("outDir", Some(dir)) => out_dir = cwd.join(dir),
            ("declarationDir", Some(dir)) => declaration_dir = cwd.join(dir),
            _ => {
                compiler_options.insert(key.clone(), value.clone());
            }
        }
    }

    DeclarationOptions {
        out_dir,
        declaration_dir,
        compiler_options,
    }
}

fn default_output(
    format: ModuleFormat,
    name: &str,
    cwd: &Path,
    as_sub_package: bool,
) -> OutputOptions {
    let dist = cwd.join("dist");
    let (file, dir) = if as_sub_package {
        (Some(dist.join(name).join(format.sub_package_file())), None)
    } else {
        (None, Some(dist.join(format.as_str())))
    };
    let is_umd = format == ModuleFormat::Umd;
    OutputOptions {
        format,
        file,
        dir,
        name: is_umd.then(|| name.to_string()),
        sourcemap: true,
        minify: is_umd,
    }
}

/// Preset input: a list builds each entry as a sub-package under `dist/<name>/`,
/// a single object builds the package root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PresetOptions {
    Many(Vec<BuildOptions>),
    Single(BuildOptions),
}

impl Default for PresetOptions {
    fn default() -> Self {
        PresetOptions::Single(BuildOptions::default())
    }
}

pub fn with_solid(options: &PresetOptions, cwd: &Path) -> Result<Vec<ResolvedBuild>> {
    match options {
        PresetOptions::Single(single) => Ok(vec![process_options(single, cwd, false)?]),
        PresetOptions::Many(many) => many
            .iter()
            .map(|option| process_options(option, cwd, true))
            .collect(),
    }
}

/// Removes `dist/` under `cwd`; a missing directory is not an error.
pub fn clean_dist(cwd: &Path) -> Result<()> {
    let dist = cwd.join("dist");
    match fs::remove_dir_all(&dist) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
#[napi_derive::napi]
pub fn process_options_native(options_json: String, cwd: String) -> napi::Result<Value> {
    let options: PresetOptions =
        serde_json::from_str(&options_json).map_err(PreppyError::from)?;
    let builds = with_solid(&options, Path::new(&cwd))?;
    Ok(serde_json::to_value(builds).map_err(PreppyError::from)?)
}
