//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use component_relations_core::annotate::StoryOutcome;
use component_relations_core::pipeline::{self, ProgressReporter, RunReport};
use component_relations_shared::{
    ConfigOverrides, RelationsConfig, init_config, load_config, load_config_from,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// component-relations: annotate component stories with where they are used.
#[derive(Parser)]
#[command(
    name = "component-relations",
    version,
    about = "Find where each Vue component is used and record it in its Storybook story.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Run as if started in this directory.
    #[arg(short = 'C', long, global = true)]
    pub root: Option<PathBuf>,

    /// Config file (defaults to ./component-relations.toml when present).
    #[arg(long, global = true, env = "COMPONENT_RELATIONS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Defaults to `run`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Rebuild the usage index, annotate story files, and write the JSON map.
    Run {
        #[command(flatten)]
        overrides: OverrideArgs,

        /// Skip writing the JSON usage map.
        #[arg(long)]
        no_output: bool,
    },

    /// Print the usage index as JSON without modifying any file.
    Index {
        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a component-relations.toml with defaults.
    Init,
    /// Show the resolved configuration.
    Show {
        #[command(flatten)]
        overrides: OverrideArgs,
    },
}

/// Flags overriding config file values.
#[derive(Args, Default)]
pub(crate) struct OverrideArgs {
    /// Component root (repeatable); replaces componentsPaths.
    #[arg(long = "components-path")]
    pub components_paths: Vec<String>,

    /// Root scanned for usages.
    #[arg(long)]
    pub search_path: Option<String>,

    /// Directory usage paths are reported relative to.
    #[arg(long)]
    pub base_dir: Option<String>,

    /// Regex identifying story files.
    #[arg(long)]
    pub story_pattern: Option<String>,

    /// Ignore references that also appear inside comments.
    #[arg(long)]
    pub hide_commented: bool,

    /// Directory for the JSON usage map.
    #[arg(long)]
    pub output_dir: Option<String>,

    /// File name of the JSON usage map.
    #[arg(long)]
    pub output_file: Option<String>,
}

impl OverrideArgs {
    fn into_overrides(self) -> ConfigOverrides {
        ConfigOverrides {
            components_paths: Some(self.components_paths),
            search_path: self.search_path,
            base_dir: self.base_dir,
            story_files_pattern: self.story_pattern,
            show_hidden_components: self.hide_commented.then_some(false),
            output_path: self.output_dir,
            output_file_name: self.output_file,
            output_enabled: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "component_relations=info",
        1 => "component_relations=debug",
        _ => "component_relations=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    if let Some(root) = &cli.root {
        std::env::set_current_dir(root)
            .wrap_err_with(|| format!("cannot enter '{}'", root.display()))?;
    }

    let config_path = cli.config.as_deref();
    match cli.command {
        None => cmd_run(config_path, OverrideArgs::default(), false).await,
        Some(Command::Run {
            overrides,
            no_output,
        }) => cmd_run(config_path, overrides, no_output).await,
        Some(Command::Index { overrides }) => cmd_index(config_path, overrides).await,
        Some(Command::Config { action }) => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show { overrides } => cmd_config_show(config_path, overrides).await,
        },
    }
}

/// Config file (explicit or `./component-relations.toml`) with CLI overrides on top.
fn resolve_config(config_path: Option<&Path>, overrides: OverrideArgs) -> Result<RelationsConfig> {
    let config = match config_path {
        Some(path) => load_config_from(path)?,
        None => load_config(Path::new("."))?,
    };
    Ok(overrides.into_overrides().apply(config))
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_run(config_path: Option<&Path>, overrides: OverrideArgs, no_output: bool) -> Result<()> {
    let mut config = resolve_config(config_path, overrides)?;
    if no_output {
        config.output.enabled = false;
    }

    info!(
        components = ?config.components_paths,
        search_path = %config.search_path,
        "updating component relations"
    );

    let reporter = CliProgress::new();
    let report = pipeline::run(&config, &reporter).await?;

    println!();
    println!("  Component relations updated!");
    println!("  Components: {}", report.components);
    println!("  Used:       {}", report.index.len());
    println!("  Updated:    {}", report.stories.updated);
    println!("  Removed:    {}", report.stories.removed);
    println!("  Unchanged:  {}", report.stories.unchanged);
    println!("  No story:   {}", report.stories.missing);
    if report.stories.failed > 0 {
        println!("  Failed:     {}", report.stories.failed);
    }
    if let Some(path) = &report.json_path {
        println!("  Usage map:  {}", path.display());
    }
    println!("  Time:       {:.1}s", report.elapsed.as_secs_f64());
    println!();

    Ok(())
}

async fn cmd_index(config_path: Option<&Path>, overrides: OverrideArgs) -> Result<()> {
    let config = resolve_config(config_path, overrides)?;

    let reporter = CliProgress::new();
    let (_components, index) = pipeline::build_usage_index(&config, &reporter).await?;
    reporter.finish();

    let json = index
        .to_json_pretty()
        .map_err(|e| eyre!("cannot serialize usage index: {e}"))?;
    println!("{json}");
    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config(Path::new("."))?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show(config_path: Option<&Path>, overrides: OverrideArgs) -> Result<()> {
    let config = resolve_config(config_path, overrides)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn file_scanned(&self, path: &Path, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Scanning [{current}/{total}] {}", path.display()));
    }

    fn story_annotated(&self, path: &Path, outcome: StoryOutcome) {
        let verb = match outcome {
            StoryOutcome::Updated => "Updated",
            StoryOutcome::Removed => "Cleared",
            StoryOutcome::Unchanged => "Checked",
        };
        self.spinner.set_message(format!("{verb} {}", path.display()));
    }

    fn done(&self, _report: &RunReport) {
        self.finish();
    }
}
