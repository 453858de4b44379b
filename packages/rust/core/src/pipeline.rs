//! End-to-end run: components → usage index → story annotations → JSON map.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, instrument};

use component_relations_discovery::{component_pattern, enumerate};
use component_relations_shared::{Component, RelationsConfig, Result, UsageIndex};

use crate::annotate::{self, AnnotateReport, StoryOutcome};
use crate::index;
use crate::output;

/// Result of a full run.
#[derive(Debug)]
pub struct RunReport {
    /// Components discovered under the component roots.
    pub components: usize,
    /// The computed usage index.
    pub index: UsageIndex,
    /// Story file totals.
    pub stories: AnnotateReport,
    /// Where the JSON map was written, if it was.
    pub json_path: Option<PathBuf>,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each candidate file is scanned for usages.
    fn file_scanned(&self, path: &Path, current: usize, total: usize);
    /// Called after each story file is processed.
    fn story_annotated(&self, path: &Path, outcome: StoryOutcome);
    /// Called when the pipeline completes.
    fn done(&self, report: &RunReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn file_scanned(&self, _path: &Path, _current: usize, _total: usize) {}
    fn story_annotated(&self, _path: &Path, _outcome: StoryOutcome) {}
    fn done(&self, _report: &RunReport) {}
}

/// Enumerate component definitions across every component root.
///
/// Names are unique: when two roots define the same name, the first wins.
#[instrument(skip_all, fields(roots = config.components_paths.len()))]
pub async fn discover_components(config: &RelationsConfig) -> Result<Vec<Component>> {
    let pattern = component_pattern(&config.component_extension)?;
    let mut components: Vec<Component> = Vec::new();

    for root in &config.components_paths {
        for file in enumerate(Path::new(root), &pattern).await? {
            let Some(component) = Component::from_definition(&file) else {
                continue;
            };
            if components.iter().any(|c| c.name == component.name) {
                debug!(
                    name = %component.name,
                    path = %file.display(),
                    "duplicate component name, keeping first definition"
                );
                continue;
            }
            components.push(component);
        }
    }

    info!(count = components.len(), "components discovered");
    Ok(components)
}

/// Discover components and build their usage index without writing anything.
pub async fn build_usage_index(
    config: &RelationsConfig,
    progress: &dyn ProgressReporter,
) -> Result<(Vec<Component>, UsageIndex)> {
    config.validate()?;

    progress.phase("Discovering components");
    let components = discover_components(config).await?;

    progress.phase("Scanning for usages");
    let index = index::build_index(&components, config, progress).await?;

    Ok((components, index))
}

/// Run the full pipeline.
///
/// 1. Validate config
/// 2. Discover components
/// 3. Build the usage index
/// 4. Upsert/remove story file blocks
/// 5. Persist the JSON map (if enabled)
#[instrument(skip_all, fields(search_path = %config.search_path))]
pub async fn run(config: &RelationsConfig, progress: &dyn ProgressReporter) -> Result<RunReport> {
    let start = Instant::now();

    let (components, index) = build_usage_index(config, progress).await?;

    progress.phase("Annotating story files");
    let stories = annotate::update_story_files(&components, &index, config, progress).await?;
    info!("component relations updated in story files");

    let json_path = if config.output.enabled {
        progress.phase("Writing usage map");
        output::persist_index(&index, &config.output).await
    } else {
        None
    };

    let report = RunReport {
        components: components.len(),
        index,
        stories,
        json_path,
        elapsed: start.elapsed(),
    };
    progress.done(&report);

    Ok(report)
}
