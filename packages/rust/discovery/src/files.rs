//! Recursive file enumeration.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, instrument};
use walkdir::WalkDir;

use component_relations_shared::{RelationsError, Result};

/// Pattern matching files with the given extension (`vue` → `\.vue$`).
pub fn component_pattern(extension: &str) -> Result<Regex> {
    let source = format!(r"\.{}$", regex::escape(extension.trim_start_matches('.')));
    Regex::new(&source).map_err(|e| RelationsError::pattern(source, &e))
}

/// List every file under `root` whose absolute path matches `pattern`.
///
/// Walks depth-first in name order, descending into every subdirectory.
/// Symlinks are tested as files and never followed. A missing (or
/// non-directory) root yields an empty list.
#[instrument(skip_all, fields(root = %root.display(), pattern = %pattern))]
pub async fn enumerate(root: &Path, pattern: &Regex) -> Result<Vec<PathBuf>> {
    let root = std::path::absolute(root).map_err(|e| RelationsError::io(root, e))?;

    match tokio::fs::metadata(&root).await {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            debug!("root is not a directory, nothing to enumerate");
            return Ok(Vec::new());
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("root does not exist, nothing to enumerate");
            return Ok(Vec::new());
        }
        Err(e) => return Err(RelationsError::io(&root, e)),
    }

    let walk_root = root.clone();
    let pattern = pattern.clone();
    let files = tokio::task::spawn_blocking(move || walk(&walk_root, &pattern))
        .await
        .map_err(|e| RelationsError::io(&root, std::io::Error::other(e)))??;

    debug!(count = files.len(), "enumeration complete");
    Ok(files)
}

fn walk(root: &Path, pattern: &Regex) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(walk_error)?;
        if entry.file_type().is_dir() {
            continue;
        }
        let path = entry.into_path();
        if pattern.is_match(&path.to_string_lossy()) {
            files.push(path);
        }
    }

    Ok(files)
}

fn walk_error(err: walkdir::Error) -> RelationsError {
    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
    RelationsError::io(path, std::io::Error::from(err))
}
