//! cani CLI
//!
//! Browser support tables for web platform features, from a local copy of
//! the caniuse dataset.

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use cani::config::{ColorMode, Config};
use cani::context::AppContext;
use cani::error::{Error, Result};
use cani::logging;
use cani::report::{
    browser_rows, era_rows, feature_rows, feature_support_rows, format_table, status_rows,
    support_legend,
};
use cani::tui::console::colors_available;
use cani::tui::run::run_terminal;
use cani::tui::view::render_to_string;

/// Width used for headless output when the terminal size is unknown.
const FALLBACK_COLUMNS: u16 = 80;

#[derive(Parser)]
#[command(name = "cani")]
#[command(about = "Browser support tables for web platform features")]
#[command(version)]
struct Cli {
    /// caniuse data.json to read (default: config `data_file`, then the data directory)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Config file (default: <config dir>/cani/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// When to use colors (overrides the config)
    #[arg(long, value_enum, global = true)]
    color: Option<ColorArg>,

    /// Append diagnostics to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the support table of a feature (any key exits)
    Use {
        /// Feature identifier, or part of its title
        feature: String,
    },

    /// List features with their current support per browser
    Features,

    /// List browsers and their usage, one browser's eras, or every
    /// feature's support in one era
    Browsers {
        /// Browser key, e.g. ios_saf
        browser: Option<String>,

        /// Version of that browser, e.g. 17.4
        #[arg(requires = "browser")]
        era: Option<String>,
    },

    /// List standards statuses and the support legend
    Statuses,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ColorArg {
    Auto,
    Always,
    Never,
}

impl From<ColorArg> for ColorMode {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => ColorMode::Auto,
            ColorArg::Always => ColorMode::Always,
            ColorArg::Never => ColorMode::Never,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let interactive = matches!(cli.command, Commands::Use { .. }) && io::stdout().is_terminal();
    if let Err(e) = logging::init(cli.log_file.as_deref(), interactive) {
        eprintln!("Error: {}", Error::from(e));
        return ExitCode::FAILURE;
    }

    match dispatch(&cli, interactive) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn dispatch(cli: &Cli, interactive: bool) -> Result<()> {
    match &cli.command {
        Commands::Use { feature } => cmd_use(&load_context(cli)?, feature, interactive),
        Commands::Features => cmd_features(&load_context(cli)?),
        Commands::Browsers { browser, era } => {
            cmd_browsers(&load_context(cli)?, browser.as_deref(), era.as_deref())
        }
        Commands::Statuses => cmd_statuses(),
    }
}

// ============================================================================
// CONTEXT
// ============================================================================

/// Config file, then command-line overrides, then the dataset.
fn load_context(cli: &Cli) -> Result<AppContext> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };
    if let Some(data) = &cli.data {
        config.data_file = Some(data.clone());
    }
    if let Some(color) = cli.color {
        config.color = color.into();
    }
    AppContext::load(config)
}

// ============================================================================
// COMMAND HANDLERS
// ============================================================================

fn cmd_use(ctx: &AppContext, query: &str, interactive: bool) -> Result<()> {
    let feature = ctx.feature(query)?;
    let browsers = ctx.shown_browsers()?;

    if interactive {
        let palette = ctx.config.palette(colors_available());
        return run_terminal(feature, &browsers, palette);
    }

    // Piped: plain text, so glyphs stand in for colors.
    let cols = crossterm::terminal::size().map_or(FALLBACK_COLUMNS, |(cols, _)| cols);
    print!("{}", render_to_string(feature, &browsers, cols, true)?);
    Ok(())
}

fn cmd_features(ctx: &AppContext) -> Result<()> {
    let browsers = ctx.shown_browsers()?;
    print!("{}", format_table(&feature_rows(ctx.dataset.features(), &browsers)));
    Ok(())
}

fn cmd_browsers(ctx: &AppContext, key: Option<&str>, era: Option<&str>) -> Result<()> {
    let rows = match (key, era) {
        (None, _) => browser_rows(ctx.dataset.browsers()),
        (Some(key), None) => era_rows(ctx.browser(key)?),
        (Some(key), Some(era)) => {
            let (browser, era) = ctx.browser_era(key, era)?;
            feature_support_rows(ctx.dataset.features(), browser, era)
        }
    };
    print!("{}", format_table(&rows));
    Ok(())
}

fn cmd_statuses() -> Result<()> {
    print!("{}", format_table(&status_rows()));
    println!();
    println!("legend: {}", support_legend());
    Ok(())
}
