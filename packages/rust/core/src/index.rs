//! Usage index builder.
//!
//! Scans every candidate file under the search path once and checks it
//! against every known component, recording hits as normalized paths
//! relative to the base directory.

use std::path::{Component as PathComponent, Path, PathBuf};

use tracing::{debug, info, instrument};

use component_relations_discovery::{ComponentPattern, FileScan, component_pattern, enumerate};
use component_relations_shared::{Component, RelationsConfig, RelationsError, Result, UsageIndex};

use crate::pipeline::ProgressReporter;

/// Build the usage index for `components`.
///
/// Components without any usage are absent from the result. A candidate file
/// that cannot be read aborts the build.
#[instrument(skip_all, fields(search_path = %config.search_path, components = components.len()))]
pub async fn build_index(
    components: &[Component],
    config: &RelationsConfig,
    progress: &dyn ProgressReporter,
) -> Result<UsageIndex> {
    let pattern = component_pattern(&config.component_extension)?;
    let candidates = enumerate(Path::new(&config.search_path), &pattern).await?;
    let base_dir = std::path::absolute(&config.base_dir)
        .map_err(|e| RelationsError::io(&config.base_dir, e))?;

    let patterns = components
        .iter()
        .map(|c| ComponentPattern::new(&c.name))
        .collect::<Result<Vec<_>>>()?;

    let mut index = UsageIndex::new();
    let total = candidates.len();

    for (i, file) in candidates.iter().enumerate() {
        let bytes = tokio::fs::read(file)
            .await
            .map_err(|e| RelationsError::io(file, e))?;
        let content = String::from_utf8_lossy(&bytes);
        let scan = FileScan::new(&content);

        for pattern in &patterns {
            if scan.uses(pattern, config.show_hidden_components) {
                let path = relative_usage_path(file, &base_dir);
                debug!(component = pattern.name(), %path, "usage found");
                index.record(pattern.name(), path);
            }
        }

        progress.file_scanned(file, i + 1, total);
    }

    info!(
        files = total,
        used_components = index.len(),
        "usage index built"
    );

    Ok(index)
}

/// Path of `file` relative to `base_dir` in the index's normalized form.
///
/// Separators become `/`, the result always starts with `./`, and any leading
/// `../` segments collapse into that single `./`.
pub fn relative_usage_path(file: &Path, base_dir: &Path) -> String {
    let relative = relative_path(file, base_dir).to_string_lossy().replace('\\', "/");

    let mut rest = relative.as_str();
    loop {
        if let Some(stripped) = rest.strip_prefix("../") {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix("./") {
            rest = stripped;
        } else {
            break;
        }
    }
    if rest == ".." || rest == "." {
        rest = "";
    }

    format!("./{rest}")
}

/// Lexical relative path between two paths, without touching the filesystem.
fn relative_path(path: &Path, base: &Path) -> PathBuf {
    let path = normalize(path);
    let base = normalize(base);

    let common = path
        .components()
        .zip(base.components())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in base.components().skip(common) {
        relative.push("..");
    }
    for part in path.components().skip(common) {
        relative.push(part);
    }
    relative
}

/// Resolve `.` and `..` lexically.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for part in path.components() {
        match part {
            PathComponent::CurDir => {}
            PathComponent::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}
