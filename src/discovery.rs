//! Source unit discovery.
//!
//! Recursively scans a directory for JS/TS sources to feed the stabilizer.

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::error::Result;
use crate::pipeline::SourceUnit;

pub const SOURCE_EXTENSIONS: [&str; 4] = ["js", "jsx", "ts", "tsx"];

const SKIPPED_DIRS: [&str; 2] = ["node_modules", "dist"];

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.') || SKIPPED_DIRS.contains(&name))
            .unwrap_or(false)
}

pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SOURCE_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Source files under `dir`, sorted by path.
pub fn find_source_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e))
    {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if path.is_file() && is_source_file(path) {
                    files.push(path.to_path_buf());
                }
            }
            Err(e) => tracing::warn!("skipping unreadable entry under {}: {}", dir.display(), e),
        }
    }

    files.sort();
    files
}

/// Reads a single file, or every source file below a directory.
pub fn find_source_units(path: &Path) -> Result<Vec<SourceUnit>> {
    let files = if path.is_dir() {
        find_source_files(path)
    } else {
        vec![path.to_path_buf()]
    };

    files
        .into_iter()
        .map(|file| -> Result<SourceUnit> {
            let code = fs::read_to_string(&file)?;
            Ok(SourceUnit::new(file.to_string_lossy(), code))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovers_sources_and_skips_vendor_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/components")).unwrap();
        fs::create_dir_all(root.join("node_modules/lib")).unwrap();
        fs::create_dir_all(root.join("dist")).unwrap();
        fs::write(root.join("src/index.tsx"), "export {};").unwrap();
        fs::write(root.join("src/components/Button.jsx"), "export {};").unwrap();
        fs::write(root.join("src/styles.css"), "a {}").unwrap();
        fs::write(root.join("node_modules/lib/index.js"), "").unwrap();
        fs::write(root.join("dist/index.js"), "").unwrap();

        let files = find_source_files(root);
        let relative: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(relative, vec!["src/components/Button.jsx", "src/index.tsx"]);
    }

    #[test]
    fn test_single_file_unit() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("App.jsx");
        fs::write(&file, "<App/>;").unwrap();
        let units = find_source_units(&file).unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].code, "<App/>;");
    }
}
