//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use catalogsync_core::{ImportEvent, ImportObserver, ImportReport, ImportStage};
use catalogsync_shared::{
    AppConfig, ImportConfig, init_config, init_config_at, load_config, load_config_from,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// catalogsync: import a product catalog into a content store.
#[derive(Parser)]
#[command(
    name = "catalogsync",
    version,
    about = "Import a product catalog, its categories, and product images into a content store.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.catalogsync/catalogsync.toml
    /// (read by every command, written by `config init`).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Import options given before any subcommand. They also apply to
    /// `import` and `categories`, filling whatever those leave unset.
    #[command(flatten)]
    pub import: ImportArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Overrides for an import run.
#[derive(Args, Clone, Debug, Default)]
pub(crate) struct ImportArgs {
    /// Catalog endpoint returning a JSON array of products.
    #[arg(long, env = "CATALOGSYNC_SOURCE_URL")]
    pub source_url: Option<String>,

    /// Base URL of the target store.
    #[arg(long, env = "CATALOGSYNC_STORE_URL")]
    pub store_url: Option<String>,

    /// Send a slug with each category.
    #[arg(long)]
    pub slugs: bool,

    /// Print the final report as JSON instead of a text summary.
    #[arg(long)]
    pub json: bool,
}

impl ImportArgs {
    /// Fill unset values from `outer`, the args given before the subcommand.
    fn or_from(self, outer: &ImportArgs) -> ImportArgs {
        ImportArgs {
            source_url: self.source_url.or_else(|| outer.source_url.clone()),
            store_url: self.store_url.or_else(|| outer.store_url.clone()),
            slugs: self.slugs || outer.slugs,
            json: self.json || outer.json,
        }
    }
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run the import (same as running with no subcommand).
    Import(ImportArgs),

    /// Fetch the catalog and list its categories without touching the store.
    Categories {
        /// Catalog endpoint returning a JSON array of products.
        #[arg(long, env = "CATALOGSYNC_SOURCE_URL")]
        source_url: Option<String>,
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
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "catalogsync=info",
        1 => "catalogsync=debug",
        _ => "catalogsync=trace",
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
    // `config init` must work before any config file exists.
    if let Some(Command::Config {
        action: ConfigAction::Init,
    }) = &cli.command
    {
        return cmd_config_init(cli.config.as_deref()).await;
    }

    let app_config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    match cli.command {
        None => cmd_import(app_config, &cli.import).await,
        Some(Command::Import(args)) => {
            cmd_import(app_config, &args.or_from(&cli.import)).await
        }
        Some(Command::Categories { source_url }) => {
            let source_url = source_url.or_else(|| cli.import.source_url.clone());
            cmd_categories(app_config, source_url.as_deref()).await
        }
        Some(Command::Config { action }) => match action {
            ConfigAction::Init => cmd_config_init(cli.config.as_deref()).await,
            ConfigAction::Show => cmd_config_show(&app_config, &cli.import).await,
        },
    }
}

/// Apply CLI/env overrides on top of the file config.
fn apply_overrides(mut config: AppConfig, args: &ImportArgs) -> AppConfig {
    if let Some(url) = &args.source_url {
        config.source.url = url.clone();
    }
    if let Some(url) = &args.store_url {
        config.store.base_url = url.clone();
    }
    if args.slugs {
        config.store.category_slugs = true;
    }
    config
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_import(app_config: AppConfig, args: &ImportArgs) -> Result<()> {
    let config = ImportConfig::try_from(&apply_overrides(app_config, args))?;

    info!(
        source = %config.source_url,
        store = %config.store_url,
        slugs = config.category_slugs,
        "importing catalog"
    );

    let reporter = CliProgress::new();
    let result = catalogsync_core::run_import(&config, &reporter).await;
    reporter.finish();

    let report = result?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &ImportReport) {
    println!();
    if report.has_failures() {
        println!("  Import finished with errors.");
    } else {
        println!("  Import finished successfully!");
    }
    println!("  Run:        {}", report.run_id);
    println!("  Catalog:    {} products", report.catalog_size);
    println!(
        "  Categories: {} created, {} failed (of {})",
        report.categories_created, report.categories_failed, report.categories_derived
    );
    println!(
        "  Products:   {} created, {} skipped, {} rejected, {} failed",
        report.products_created,
        report.products_skipped,
        report.products_rejected,
        report.products_failed
    );
    println!(
        "  Images:     {} attached, {} failed",
        report.images_attached, report.images_failed
    );
    println!(
        "  Time:       {:.1}s",
        report.elapsed_ms as f64 / 1000.0
    );
    println!();
}

async fn cmd_categories(app_config: AppConfig, source_url: Option<&str>) -> Result<()> {
    let args = ImportArgs {
        source_url: source_url.map(String::from),
        ..Default::default()
    };
    let config = ImportConfig::try_from(&apply_overrides(app_config, &args))?;

    let (count, names) = catalogsync_core::preview_categories(&config).await?;

    println!("{} categories across {count} products:", names.len());
    for name in names {
        println!("  {name}");
    }

    Ok(())
}

async fn cmd_config_init(target: Option<&Path>) -> Result<()> {
    let path = match target {
        Some(path) => {
            init_config_at(path)?;
            path.to_path_buf()
        }
        None => init_config()?,
    };
    println!("Config written to {}", path.display());
    Ok(())
}

async fn cmd_config_show(app_config: &AppConfig, args: &ImportArgs) -> Result<()> {
    let resolved = apply_overrides(app_config.clone(), args);
    let rendered = toml::to_string_pretty(&resolved)
        .map_err(|e| eyre!("failed to render config: {e}"))?;
    println!("{rendered}");
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

impl ImportObserver for CliProgress {
    fn on_event(&self, event: &ImportEvent) {
        match event {
            ImportEvent::StageEntered(ImportStage::Done | ImportStage::Failed) => {}
            ImportEvent::StageEntered(stage) => {
                self.spinner.set_message(format!("{stage}..."));
            }
            ImportEvent::CategoryCreated { name, .. } => {
                self.spinner.set_message(format!("Category {name}"));
            }
            ImportEvent::ProductCreated { title, .. } => {
                self.spinner.set_message(format!("Product {title}"));
            }
            ImportEvent::ImageAttached { title, filename } => {
                self.spinner
                    .set_message(format!("Image {filename} → {title}"));
            }
            _ => {}
        }
    }
}
