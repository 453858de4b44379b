//! Story file annotation.
//!
//! Each component's story file carries at most one generated block listing
//! the files that use the component. The block is wrapped in sentinel
//! comments so later runs can replace or remove it without parsing the
//! surrounding TypeScript:
//!
//! ```text
//! // <component-relations>
//! meta.parameters = {
//!   docs: {
//!     description: {
//!       component: `Usages of component UiButton:
//! - ./src/App.vue`
//!     }
//!   }
//! }
//! // </component-relations>
//! ```
//!
//! Files annotated before sentinels existed hold a bare
//! `meta.parameters = { ... }` assignment; it is located with a brace-depth
//! scan and migrated on the next write.

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, error, info, instrument, warn};

use component_relations_discovery::enumerate;
use component_relations_shared::{Component, RelationsConfig, RelationsError, Result, UsageIndex};

use crate::output::write_atomic;
use crate::pipeline::ProgressReporter;

/// First line of a generated block.
pub const BLOCK_START: &str = "// <component-relations>";
/// Last line of a generated block.
pub const BLOCK_END: &str = "// </component-relations>";

static LEGACY_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"meta\.parameters\s*=\s*\{").expect("valid regex"));

// ---------------------------------------------------------------------------
// Block text operations
// ---------------------------------------------------------------------------

/// Render the generated block for `component` and its consumers.
pub fn render_block(component: &str, usages: &[String]) -> String {
    let list = usages
        .iter()
        .map(|path| format!("- {}", escape_template(path)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{BLOCK_START}\n\
         meta.parameters = {{\n  \
           docs: {{\n    \
             description: {{\n      \
               component: `Usages of component {}:\n{list}`\n    \
             }}\n  \
           }}\n\
         }}\n\
         {BLOCK_END}",
        escape_template(component)
    )
}

/// Escape text for a JavaScript template literal.
fn escape_template(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

/// Byte range of the existing block, sentinel form first, then legacy form.
pub fn find_block(content: &str) -> Option<Range<usize>> {
    find_sentinel_block(content).or_else(|| find_legacy_block(content))
}

/// A start line without its end line claims the assignment after it, or the
/// rest of the file when there is none.
fn find_sentinel_block(content: &str) -> Option<Range<usize>> {
    let start = content.find(BLOCK_START)?;
    let after = start + BLOCK_START.len();
    let end = match content[after..].find(BLOCK_END) {
        Some(offset) => after + offset + BLOCK_END.len(),
        None => find_legacy_block(&content[after..]).map_or(content.len(), |r| after + r.end),
    };
    Some(start..end)
}

/// `meta.parameters = { ... }` with balanced braces, plus an optional `;`.
fn find_legacy_block(content: &str) -> Option<Range<usize>> {
    let found = LEGACY_BLOCK_RE.find(content)?;
    let open = found.end() - 1;
    let close = matching_brace(content, open)?;

    let mut end = close + 1;
    if content[end..].starts_with(';') {
        end += 1;
    }
    Some(found.start()..end)
}

/// Index of the `}` closing the `{` at `open`. String literals and comments
/// are skipped; nesting depth is unbounded.
fn matching_brace(content: &str, open: usize) -> Option<usize> {
    let bytes = content.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = open;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 1;
            } else if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }

        match (b, bytes.get(i + 1).copied()) {
            (b'/', Some(b'/')) => {
                i = content[i..].find('\n').map_or(bytes.len(), |n| i + n);
                continue;
            }
            (b'/', Some(b'*')) => {
                i = content[i + 2..]
                    .find("*/")
                    .map_or(bytes.len(), |n| i + 2 + n + 2);
                continue;
            }
            (b'\'' | b'"' | b'`', _) => quote = Some(b),
            (b'{', _) => depth += 1,
            (b'}', _) => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Replace the existing block with `block`, or append it after the content.
pub fn upsert_block(content: &str, block: &str) -> String {
    match find_block(content) {
        Some(range) => {
            let mut out = String::with_capacity(content.len() + block.len());
            out.push_str(&content[..range.start]);
            out.push_str(block);
            out.push_str(&content[range.end..]);
            out
        }
        None => {
            let mut out = content.to_string();
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push('\n');
            out.push_str(block);
            out.push('\n');
            out
        }
    }
}

/// Remove the existing block, if any, along with the line break ending it.
pub fn remove_block(content: &str) -> String {
    let Some(range) = find_block(content) else {
        return content.to_string();
    };

    let before = &content[..range.start];
    let after = &content[range.end..];
    let after = after
        .strip_prefix("\r\n")
        .or_else(|| after.strip_prefix('\n'))
        .unwrap_or(after);

    if after.trim().is_empty() {
        // Trailing block: drop the separator written on append too.
        let before = before.trim_end();
        if before.is_empty() {
            String::new()
        } else {
            format!("{before}\n")
        }
    } else {
        format!("{before}{after}")
    }
}

// ---------------------------------------------------------------------------
// Story file updates
// ---------------------------------------------------------------------------

/// What happened to a single story file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryOutcome {
    /// A block was written or replaced.
    Updated,
    /// A block was removed because the component has no usages.
    Removed,
    /// The file already had the right content and was not rewritten.
    Unchanged,
}

/// Totals for one annotation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotateReport {
    pub updated: usize,
    pub removed: usize,
    pub unchanged: usize,
    /// Components without any story file.
    pub missing: usize,
    /// Story files that could not be read or written.
    pub failed: usize,
}

impl AnnotateReport {
    fn count(&mut self, outcome: StoryOutcome) {
        match outcome {
            StoryOutcome::Updated => self.updated += 1,
            StoryOutcome::Removed => self.removed += 1,
            StoryOutcome::Unchanged => self.unchanged += 1,
        }
    }
}

/// Upsert or remove the usage block in every component's story files.
///
/// A component without a story file is skipped. A story file that cannot be
/// read or written is logged and counted, and the pass continues.
#[instrument(skip_all, fields(components = components.len()))]
pub async fn update_story_files(
    components: &[Component],
    index: &UsageIndex,
    config: &RelationsConfig,
    progress: &dyn ProgressReporter,
) -> Result<AnnotateReport> {
    let story_pattern = config.story_pattern()?;
    let mut report = AnnotateReport::default();

    for component in components {
        let stories = find_story_files(&component.name, &config.components_paths, &story_pattern)
            .await;

        if stories.is_empty() {
            info!(component = %component.name, "no story file found, skipping");
            report.missing += 1;
            continue;
        }

        let usages = index.usages(&component.name);
        for story in &stories {
            debug!(path = %story.display(), "checking story file");
            match annotate_story(story, &component.name, usages).await {
                Ok(outcome) => {
                    report.count(outcome);
                    progress.story_annotated(story, outcome);
                }
                Err(e) => {
                    error!(path = %story.display(), error = %e, "failed to update story file");
                    report.failed += 1;
                }
            }
        }
    }

    info!(
        updated = report.updated,
        removed = report.removed,
        unchanged = report.unchanged,
        missing = report.missing,
        failed = report.failed,
        "story files annotated"
    );

    Ok(report)
}

/// Story files for `name` under `<root>/<name>/`, across every root.
async fn find_story_files(name: &str, roots: &[String], pattern: &Regex) -> Vec<PathBuf> {
    let prefix = format!("{name}.");
    let mut stories = Vec::new();

    for root in roots {
        let dir = Path::new(root).join(name);
        match enumerate(&dir, pattern).await {
            Ok(found) => stories.extend(found.into_iter().filter(|path| {
                path.file_name()
                    .and_then(|f| f.to_str())
                    .is_some_and(|f| f.starts_with(&prefix))
            })),
            Err(e) => warn!(dir = %dir.display(), error = %e, "cannot list component directory"),
        }
    }

    stories
}

/// Apply the block for one story file.
pub async fn annotate_story(path: &Path, component: &str, usages: &[String]) -> Result<StoryOutcome> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| RelationsError::io(path, e))?;

    let (updated, outcome) = if usages.is_empty() {
        (remove_block(&content), StoryOutcome::Removed)
    } else {
        (
            upsert_block(&content, &render_block(component, usages)),
            StoryOutcome::Updated,
        )
    };

    if updated == content {
        return Ok(StoryOutcome::Unchanged);
    }

    write_atomic(path, &updated).await?;
    match outcome {
        StoryOutcome::Removed => info!(path = %path.display(), "removed usage block"),
        _ => info!(path = %path.display(), "updated story file"),
    }
    Ok(outcome)
}
