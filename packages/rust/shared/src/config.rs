//! Configuration for component-relations.
//!
//! Project config lives at `./component-relations.toml`. Every key is optional.
//! CLI flags override config file values, which override defaults. The merge
//! is shallow: a supplied field replaces the default wholesale.

use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{RelationsError, Result};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "component-relations.toml";

// ---------------------------------------------------------------------------
// Config structs (matching component-relations.toml schema)
// ---------------------------------------------------------------------------

/// Top-level configuration, deserialized from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelationsConfig {
    /// Directories holding component definitions (`<Name>/<Name>.vue`).
    #[serde(alias = "componentsPath", deserialize_with = "one_or_many")]
    pub components_paths: Vec<String>,

    /// Root scanned for component usages.
    pub search_path: String,

    /// Directory usage paths are reported relative to.
    pub base_dir: String,

    /// Regex source identifying story files.
    pub story_files_pattern: String,

    /// Count references that only appear inside comments.
    pub show_hidden_components: bool,

    /// Extension of single-file components, without the dot.
    pub component_extension: String,

    /// JSON usage map destination.
    pub output: OutputConfig,
}

impl Default for RelationsConfig {
    fn default() -> Self {
        Self {
            components_paths: vec!["src/components".into()],
            search_path: "src".into(),
            base_dir: "app".into(),
            story_files_pattern: r"\.stories\.ts$".into(),
            show_hidden_components: true,
            component_extension: "vue".into(),
            output: OutputConfig::default(),
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputConfig {
    /// Write the JSON usage map at all.
    pub enabled: bool,
    /// Destination directory (created if missing).
    pub path: String,
    /// Destination file name.
    pub file_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "./".into(),
            file_name: "component-usage.json".into(),
        }
    }
}

impl OutputConfig {
    /// Full destination path of the JSON file.
    pub fn file_path(&self) -> PathBuf {
        Path::new(&self.path).join(&self.file_name)
    }
}

/// Older configs used a single `componentsPath` string.
fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(path) => vec![path],
        OneOrMany::Many(paths) => paths,
    })
}

impl RelationsConfig {
    /// Compile the story file pattern.
    pub fn story_pattern(&self) -> Result<Regex> {
        Regex::new(&self.story_files_pattern)
            .map_err(|e| RelationsError::pattern(&self.story_files_pattern, &e))
    }

    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.components_paths.is_empty() {
            return Err(RelationsError::config("componentsPaths must not be empty"));
        }
        if self.component_extension.trim_start_matches('.').is_empty() {
            return Err(RelationsError::config("componentExtension must not be empty"));
        }
        if self.output.enabled && self.output.file_name.is_empty() {
            return Err(RelationsError::config("output.fileName must not be empty"));
        }
        self.story_pattern()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Runtime overrides (CLI flags)
// ---------------------------------------------------------------------------

/// Field-by-field overrides applied on top of a loaded config.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub components_paths: Option<Vec<String>>,
    pub search_path: Option<String>,
    pub base_dir: Option<String>,
    pub story_files_pattern: Option<String>,
    pub show_hidden_components: Option<bool>,
    pub output_path: Option<String>,
    pub output_file_name: Option<String>,
    pub output_enabled: Option<bool>,
}

impl ConfigOverrides {
    /// Apply every supplied field, leaving the rest untouched.
    pub fn apply(self, mut config: RelationsConfig) -> RelationsConfig {
        if let Some(paths) = self.components_paths.filter(|p| !p.is_empty()) {
            config.components_paths = paths;
        }
        if let Some(search_path) = self.search_path {
            config.search_path = search_path;
        }
        if let Some(base_dir) = self.base_dir {
            config.base_dir = base_dir;
        }
        if let Some(pattern) = self.story_files_pattern {
            config.story_files_pattern = pattern;
        }
        if let Some(show) = self.show_hidden_components {
            config.show_hidden_components = show;
        }
        if let Some(path) = self.output_path {
            config.output.path = path;
        }
        if let Some(file_name) = self.output_file_name {
            config.output.file_name = file_name;
        }
        if let Some(enabled) = self.output_enabled {
            config.output.enabled = enabled;
        }
        config
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load `component-relations.toml` from `dir`. Returns defaults if the file does not exist.
pub fn load_config(dir: &Path) -> Result<RelationsConfig> {
    let path = dir.join(CONFIG_FILE_NAME);

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(RelationsConfig::default());
    }

    load_config_from(&path)
}

/// Load the config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<RelationsConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| RelationsError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        RelationsError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Write a default config file into `dir`.
/// Returns the path to the created file. Never overwrites an existing config.
pub fn init_config(dir: &Path) -> Result<PathBuf> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        return Err(RelationsError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    let content = toml::to_string_pretty(&RelationsConfig::default())
        .map_err(|e| RelationsError::Serialization(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| RelationsError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
