//! Textual usage detection.
//!
//! A component counts as referenced by a file when the file contains an
//! opening tag in either spelling (`<UiButton ...>` / `<ui-button ...>`) or
//! loads it through `defineAsyncComponent({ loader: () => import('...') })`.
//! With hidden components disabled, any occurrence of the tag opening inside
//! a comment suppresses the match for the whole file.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use component_relations_shared::{RelationsError, Result};

use crate::comments::combined_comments;
use crate::naming::{to_kebab_case, to_pascal_case};

static ASYNC_LOADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"defineAsyncComponent\(\s*\{\s*loader:\s*\(\)\s*=>\s*import\(['"](.+?)['"]\)"#)
        .expect("valid regex")
});

// ---------------------------------------------------------------------------
// ComponentPattern
// ---------------------------------------------------------------------------

/// Precompiled tag patterns for one component name.
#[derive(Debug, Clone)]
pub struct ComponentPattern {
    name: String,
    kebab: String,
    pascal_tag: Regex,
    kebab_tag: Regex,
}

impl ComponentPattern {
    pub fn new(name: &str) -> Result<Self> {
        let kebab = to_kebab_case(name);
        let pascal_tag = tag_regex(name)?;
        let kebab_tag = tag_regex(&kebab)?;
        Ok(Self {
            name: name.to_string(),
            kebab,
            pascal_tag,
            kebab_tag,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// `<name` followed by anything up to the closing `>`.
fn tag_regex(name: &str) -> Result<Regex> {
    let source = format!("<{}[^>]*>", regex::escape(name));
    Regex::new(&source).map_err(|e| RelationsError::pattern(source, &e))
}

// ---------------------------------------------------------------------------
// FileScan
// ---------------------------------------------------------------------------

/// Per-file data shared by every component checked against the same text.
#[derive(Debug)]
pub struct FileScan<'a> {
    content: &'a str,
    comments: String,
    async_components: Vec<String>,
}

impl<'a> FileScan<'a> {
    pub fn new(content: &'a str) -> Self {
        let async_components = ASYNC_LOADER_RE
            .captures_iter(content)
            .filter_map(|caps| {
                let stem = Path::new(&caps[1]).file_stem()?.to_str()?;
                Some(to_pascal_case(stem))
            })
            .collect();

        Self {
            content,
            comments: combined_comments(content),
            async_components,
        }
    }

    /// Components loaded through `defineAsyncComponent`, as PascalCase names.
    pub fn async_components(&self) -> &[String] {
        &self.async_components
    }

    /// Whether the file mentions `pattern` at all, comments included.
    pub fn references(&self, pattern: &ComponentPattern) -> bool {
        pattern.pascal_tag.is_match(self.content)
            || pattern.kebab_tag.is_match(self.content)
            || self.async_components.iter().any(|c| *c == pattern.name)
    }

    /// Whether a tag opening for `pattern` appears anywhere in a comment.
    pub fn mentioned_in_comments(&self, pattern: &ComponentPattern) -> bool {
        self.comments.contains(&format!("<{}", pattern.name))
            || self.comments.contains(&format!("<{}", pattern.kebab))
    }

    /// Apply the visibility policy on top of [`FileScan::references`].
    pub fn uses(&self, pattern: &ComponentPattern, show_hidden: bool) -> bool {
        if pattern.name.is_empty() || !self.references(pattern) {
            return false;
        }
        show_hidden || !self.mentioned_in_comments(pattern)
    }
}

/// Decide whether `name` is used in `content`.
///
/// Convenience wrapper over [`FileScan`] for single checks; empty inputs
/// never match.
pub fn is_used(name: &str, content: &str, show_hidden: bool) -> bool {
    if name.is_empty() || content.is_empty() {
        return false;
    }
    match ComponentPattern::new(name) {
        Ok(pattern) => FileScan::new(content).uses(&pattern, show_hidden),
        Err(_) => false,
    }
}
