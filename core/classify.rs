use crate::category::{Category, Discovery};
use crate::error::{AppError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Enumerate a category's candidate paths, relative to the project root.
/// No existence check happens here; fixed lists come back verbatim and a
/// missing scan root simply yields an empty sequence.
pub fn enumerate(project_root: &Path, category: &Category) -> Result<Vec<PathBuf>> {
    match &category.discovery {
        Discovery::Fixed { paths } => {
            log::trace!(
                "Category \"{}\": {} fixed candidate(s)",
                category.name,
                paths.len()
            );
            Ok(paths.clone())
        }
        Discovery::Scan {
            root,
            extensions,
            exclude_dirs,
            max_depth,
        } => scan(project_root, root, extensions, exclude_dirs, *max_depth),
    }
}

fn extension_set(extensions: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for ext in extensions {
        let pattern = format!("*.{}", ext);
        let glob = Glob::new(&pattern).map_err(|e| {
            log::error!("Invalid extension pattern \"{}\": {}", pattern, e);
            AppError::Glob(format!("Invalid extension pattern \"{}\": {}", pattern, e))
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| AppError::Glob(e.to_string()))
}

fn scan(
    project_root: &Path,
    root: &Path,
    extensions: &[String],
    exclude_dirs: &[String],
    max_depth: Option<usize>,
) -> Result<Vec<PathBuf>> {
    let scan_root = if root == Path::new(".") {
        project_root.to_path_buf()
    } else {
        project_root.join(root)
    };
    if !scan_root.is_dir() {
        log::debug!(
            "Scan root {} not present, yielding no candidates.",
            scan_root.display()
        );
        return Ok(Vec::new());
    }

    let matcher = extension_set(extensions)?;
    let mut walker = WalkDir::new(&scan_root).follow_links(false);
    if let Some(depth) = max_depth {
        walker = walker.max_depth(depth);
    }

    let mut found = Vec::new();
    let excluded = |entry: &walkdir::DirEntry| {
        entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| exclude_dirs.iter().any(|d| d == name))
    };
    for entry_result in walker.into_iter().filter_entry(|e| !excluded(e)) {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Error walking {}: {}", scan_root.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if !matcher.is_match(entry.file_name()) {
            continue;
        }
        let relative = pathdiff::diff_paths(entry.path(), project_root)
            .unwrap_or_else(|| entry.path().to_path_buf());
        log::trace!("Scan candidate: {}", relative.display());
        found.push(relative);
    }

    // Filesystem enumeration order is platform-dependent; sort so output
    // is reproducible across runs and machines.
    found.sort();
    Ok(found)
}
