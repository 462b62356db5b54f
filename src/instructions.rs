//! Integration instructions and sub-package manifests.
//!
//! After a build the preset can print the `package.json` fields a consumer should
//! add, and write a `package.json` into each sub-package directory.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{ModuleFormat, ResolvedBuild};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConditions {
    pub solid: String,
    pub import: String,
    pub browser: String,
    pub require: String,
    pub node: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportMap {
    #[serde(rename = ".")]
    pub root: ExportConditions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageJsonExample {
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub files: Vec<String>,
    pub main: String,
    pub module: String,
    pub types: String,
    pub exports: ExportMap,
}

/// Entry points a consumer `package.json` should declare for `build`.
///
/// Builds without a cjs output point `main`, `require` and `node` at the esm bundle;
/// builds without umd point `browser` at it too.
pub fn example_package_json(build: &ResolvedBuild) -> PackageJsonExample {
    let name = &build.name;
    let (cjs, esm, umd, types, solid) = if build.as_sub_package {
        (
            format!("dist/{name}/index.common.js"),
            format!("dist/{name}/index.module.js"),
            format!("dist/{name}/index.umd.js"),
            format!("dist/{name}/{name}.d.ts"),
            format!("dist/{name}/{name}.jsx"),
        )
    } else {
        (
            format!("dist/cjs/{name}.js"),
            format!("dist/esm/{name}.js"),
            format!("dist/umd/{name}.js"),
            format!("dist/types/{name}.d.ts"),
            format!("dist/source/{name}.jsx"),
        )
    };

    let mut example = PackageJsonExample {
        files: vec!["dist".to_string()],
        main: cjs.clone(),
        module: esm.clone(),
        types,
        exports: ExportMap {
            root: ExportConditions {
                solid: format!("./{solid}"),
                import: format!("./{esm}"),
                browser: format!("./{umd}"),
                require: format!("./{cjs}"),
                node: format!("./{cjs}"),
            },
        },
    };

    if !build.has_format(ModuleFormat::Cjs) {
        example.main = example.module.clone();
        example.exports.root.require = example.exports.root.import.clone();
        example.exports.root.node = example.exports.root.import.clone();
    }
    if !build.has_format(ModuleFormat::Umd) {
        example.exports.root.browser = example.exports.root.import.clone();
    }
    example
}

pub fn render_instructions(build: &ResolvedBuild) -> Result<String> {
    let json = serde_json::to_string_pretty(&example_package_json(build))?;
    Ok(format!(
        "\nExample config for your `package.json`:\n\n{}\n",
        json
    ))
}

/// The `package.json` placed inside `dist/<name>/`, relative to that directory.
pub fn sub_package_json(name: &str) -> PackageJsonExample {
    PackageJsonExample {
        files: Vec::new(),
        main: "index.common.js".to_string(),
        module: "index.module.js".to_string(),
        types: format!("{name}.d.ts"),
        exports: ExportMap {
            root: ExportConditions {
                solid: format!("./{name}.jsx"),
                import: "./index.module.js".to_string(),
                browser: "./index.umd.js".to_string(),
                require: "./index.common.js".to_string(),
                node: "./index.common.js".to_string(),
            },
        },
    }
}

pub fn write_sub_package_json(cwd: &Path, build: &ResolvedBuild) -> Result<PathBuf> {
    let dir = cwd.join("dist").join(&build.name);
    fs::create_dir_all(&dir)?;
    let path = dir.join("package.json");
    let json = serde_json::to_string_pretty(&sub_package_json(&build.name))?;
    fs::write(&path, json)?;
    tracing::info!("wrote {}", path.display());
    Ok(path)
}
