//! JSON usage map persistence and atomic file writes.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info, instrument};

use component_relations_shared::{OutputConfig, RelationsError, Result, UsageIndex};

/// Write the full index as pretty JSON to `output.path/output.fileName`.
///
/// Best effort: any failure is logged and swallowed so the run can finish.
/// Returns the written path on success.
#[instrument(skip_all, fields(path = %output.path, file = %output.file_name))]
pub async fn persist_index(index: &UsageIndex, output: &OutputConfig) -> Option<PathBuf> {
    let target = output.file_path();
    let target = std::path::absolute(&target).unwrap_or(target);

    match write_index(index, output, &target).await {
        Ok(()) => {
            info!(path = %target.display(), "usage map saved");
            Some(target)
        }
        Err(e) => {
            error!(path = %target.display(), error = %e, "failed to write usage map");
            None
        }
    }
}

async fn write_index(index: &UsageIndex, output: &OutputConfig, target: &Path) -> Result<()> {
    let dir = Path::new(&output.path);
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| RelationsError::io(dir, e))?;

    let json = index
        .to_json_pretty()
        .map_err(|e| RelationsError::Serialization(e.to_string()))?;

    write_atomic(target, &json).await
}

/// Write to a sibling temp file, then rename over `path`.
///
/// A symlinked `path` is resolved first so the link survives and its target
/// receives the content.
pub(crate) async fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let path = match tokio::fs::canonicalize(path).await {
        Ok(resolved) => resolved,
        Err(_) => path.to_path_buf(),
    };
    let path = path.as_path();

    let file_name = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp = path.with_file_name(format!(".{file_name}.tmp"));

    tokio::fs::write(&temp, content)
        .await
        .map_err(|e| RelationsError::io(&temp, e))?;

    if let Err(e) = tokio::fs::rename(&temp, path).await {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(RelationsError::io(path, e));
    }

    debug!(path = %path.display(), bytes = content.len(), "wrote file");
    Ok(())
}
