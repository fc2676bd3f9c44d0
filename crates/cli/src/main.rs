// TallyGrid CLI - headless counter grids with proximity highlighting

mod exit_codes;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, reload, Registry};

use tallygrid_cli::{render, script};
use tallygrid_config::{IdScheme, LogLevel, Settings};
use tallygrid_core::limits::clamp_highlight_count;
use tallygrid_core::{view, Limits, Session, SessionOptions};
use tallygrid_engine::search::{search_detailed, Ranked};
use tallygrid_engine::{Grid, GridError, IdGenerator, RandomIds, SequentialIds, ShortGridPolicy};
use tallygrid_protocol::PROTOCOL_VERSION;

use exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "tgrid")]
#[command(about = "Counter grids with proximity highlighting (headless)")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Log more to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use deterministic cell ids (c0, c1, ...) instead of UUIDs
    #[arg(long, global = true)]
    sequential_ids: bool,

    /// Settings file (default: ~/.config/tallygrid/settings.json)
    #[arg(long, value_name = "PATH", global = true, env = "TALLYGRID_SETTINGS")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply JSONL commands and print one JSON response per line
    #[command(after_help = "\
Examples:
  tgrid run script.jsonl
  echo '{\"cmd\":\"generate\",\"rows\":2,\"columns\":3}' | tgrid run
  tgrid run --fail-fast --sequential-ids script.jsonl")]
    Run {
        /// Script file (omit or '-' to read stdin)
        script: Option<PathBuf>,

        /// Stop at the first rejected command (exit 1)
        #[arg(long)]
        fail_fast: bool,
    },

    /// Apply JSONL commands and print the resulting table
    #[command(after_help = "\
Examples:
  tgrid show script.jsonl
  cat script.jsonl | tgrid show")]
    Show {
        /// Script file (omit or '-' to read stdin)
        script: Option<PathBuf>,
    },

    /// Rank an ad-hoc grid by distance to a target amount
    #[command(after_help = "\
Examples:
  tgrid search --columns 5 --amounts 0,1,2,3,4 --target 2 --count 1
  tgrid search --columns 2 --amounts 4,7,1,1 --target 3 --json
  tgrid search --columns 3 --amounts 1,2,3 --target 2 --pad-short")]
    Search {
        /// Cells per row
        #[arg(long)]
        columns: usize,

        /// Cell amounts, row-major, comma-separated
        #[arg(long, value_delimiter = ',', required = true)]
        amounts: Vec<u64>,

        /// Target amount
        #[arg(long, allow_negative_numbers = true)]
        target: f64,

        /// Requested highlight size (default: search.highlightCount)
        #[arg(long)]
        count: Option<usize>,

        /// Allow grids with fewer than 4 cells
        #[arg(long)]
        pad_short: bool,

        /// Print a JSON object instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Inspect or create the settings file
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the settings file location
    Path,
    /// Write a commented default settings file
    Init,
    /// Print the effective settings as JSON
    Show,
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            "\nengine:  tallygrid-engine ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            "\nengine:  tallygrid-engine ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
        )
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let verbosity = verbosity_filter(cli.verbose);
    let log_handle = match init_logging(verbosity.unwrap_or(LevelFilter::WARN)) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("warning: logging disabled: {}", e);
            None
        }
    };

    // Settings warnings go out at the startup level; log.level applies after
    let settings_path = cli.settings.clone().unwrap_or_else(Settings::config_path);
    let settings = Settings::load_from(&settings_path);
    if let (None, Some(handle)) = (verbosity, &log_handle) {
        if let Err(e) = handle.reload(settings_filter(settings.log_level)) {
            log::warn!("cannot apply log.level: {}", e);
        }
    }

    let ctx = Context {
        settings,
        settings_path,
        sequential_ids: cli.sequential_ids,
    };

    let result = match cli.command {
        Commands::Run { script, fail_fast } => cmd_run(&ctx, script, fail_fast),
        Commands::Show { script } => cmd_show(&ctx, script),
        Commands::Search {
            columns,
            amounts,
            target,
            count,
            pad_short,
            json,
        } => cmd_search(&ctx, columns, amounts, target, count, pad_short, json),
        Commands::Config(command) => cmd_config(&ctx, command),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

// ============================================================================
// Logging
// ============================================================================

type LevelHandle = reload::Handle<LevelFilter, Registry>;

/// Install the stderr subscriber. The returned handle changes the level once
/// settings are loaded.
fn init_logging(level: LevelFilter) -> Result<LevelHandle, TryInitError> {
    let (filter, handle) = reload::Layer::new(level);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).without_time())
        .try_init()?;
    Ok(handle)
}

/// Level for `-v` repeated `count` times. `None` defers to `log.level`.
fn verbosity_filter(count: u8) -> Option<LevelFilter> {
    match count {
        0 => None,
        1 => Some(LevelFilter::INFO),
        2 => Some(LevelFilter::DEBUG),
        _ => Some(LevelFilter::TRACE),
    }
}

fn settings_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Off => LevelFilter::OFF,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn failed(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn io(err: io::Error) -> Self {
        Self::failed(err.to_string())
    }

    /// Search rejected by the engine.
    pub fn search(err: GridError) -> Self {
        let hint = match err {
            GridError::UnderflowWindow { .. } => {
                Some("pass --pad-short to search grids with fewer than 4 cells".to_string())
            }
            _ => None,
        };
        Self { code: EXIT_ERROR, message: err.to_string(), hint }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Settings and global flags shared by every command.
struct Context {
    settings: Settings,
    settings_path: PathBuf,
    sequential_ids: bool,
}

impl Context {
    fn id_generator(&self) -> Box<dyn IdGenerator> {
        if self.sequential_ids || self.settings.id_scheme == IdScheme::Sequential {
            Box::new(SequentialIds::new())
        } else {
            Box::new(RandomIds)
        }
    }

    fn session(&self) -> Session {
        Session::new(SessionOptions {
            limits: Limits {
                max_rows: self.settings.max_rows,
                max_columns: self.settings.max_columns,
            },
            short_grid_policy: self.settings.short_grid_policy,
            highlight_count: self.settings.highlight_count,
            ids: self.id_generator(),
        })
    }
}

/// Script source: a file, or stdin for `None` and `-`.
fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>, CliError> {
    match path {
        None => Ok(Box::new(io::stdin().lock())),
        Some(p) if p.as_os_str() == "-" => Ok(Box::new(io::stdin().lock())),
        Some(p) => {
            let file = File::open(p)
                .map_err(|e| CliError::usage(format!("cannot read {}: {}", p.display(), e)))?;
            Ok(Box::new(BufReader::new(file)))
        }
    }
}

// ============================================================================
// run / show
// ============================================================================

fn cmd_run(ctx: &Context, script: Option<PathBuf>, fail_fast: bool) -> Result<(), CliError> {
    let input = open_input(script.as_deref())?;
    let mut session = ctx.session();
    log::info!("protocol v{}", PROTOCOL_VERSION);

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let summary = script::run(&mut session, input, &mut out, fail_fast).map_err(CliError::io)?;

    log::info!(
        "applied {} commands, {} failed, revision {}",
        summary.applied,
        summary.failed,
        session.revision()
    );

    if summary.stopped {
        return Err(CliError::failed("stopped at the first rejected command"));
    }
    Ok(())
}

fn cmd_show(ctx: &Context, script: Option<PathBuf>) -> Result<(), CliError> {
    let input = open_input(script.as_deref())?;
    let mut session = ctx.session();

    let summary =
        script::run(&mut session, input, &mut io::sink(), false).map_err(CliError::io)?;
    if summary.failed > 0 {
        log::info!("{} commands were rejected", summary.failed);
    }

    let table = render::table(&view::snapshot(&session));
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle.write_all(table.as_bytes()).map_err(CliError::io)?;
    Ok(())
}

// ============================================================================
// search
// ============================================================================

#[derive(Serialize)]
struct SearchReport {
    target: f64,
    requested: usize,
    extra: usize,
    selected: Vec<RankedView>,
    ranking: Vec<RankedView>,
}

#[derive(Serialize)]
struct RankedView {
    id: String,
    row: usize,
    col: usize,
    amount: u64,
    distance: f64,
}

impl From<&Ranked> for RankedView {
    fn from(r: &Ranked) -> Self {
        Self {
            id: r.id.to_string(),
            row: r.row,
            col: r.col,
            amount: r.amount,
            distance: r.distance,
        }
    }
}

fn cmd_search(
    ctx: &Context,
    columns: usize,
    amounts: Vec<u64>,
    target: f64,
    count: Option<usize>,
    pad_short: bool,
    json: bool,
) -> Result<(), CliError> {
    if columns == 0 {
        return Err(CliError::usage("--columns must be at least 1"));
    }
    if amounts.len() % columns != 0 {
        return Err(CliError::usage(format!(
            "{} amounts do not fill rows of {} columns",
            amounts.len(),
            columns
        ))
        .with_hint("give rows x columns amounts, row by row"));
    }

    let mut ids = ctx.id_generator();
    let grid = Grid::from_amounts(columns, &amounts, &mut ids);

    let policy = if pad_short {
        ShortGridPolicy::TreatMissingAsDifferent
    } else {
        ctx.settings.short_grid_policy
    };

    let asked = count.unwrap_or(ctx.settings.highlight_count);
    let requested = clamp_highlight_count(asked, grid.len());
    if requested != asked {
        log::info!("count {} clamped to {}", asked, requested);
    }

    let outcome = search_detailed(&grid, target, requested, policy).map_err(CliError::search)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if json {
        let report = SearchReport {
            target,
            requested,
            extra: outcome.extra,
            selected: outcome.selected().iter().map(RankedView::from).collect(),
            ranking: outcome.ranked.iter().map(RankedView::from).collect(),
        };
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::failed(e.to_string()))?;
        writeln!(handle, "{}", text).map_err(CliError::io)?;
    } else {
        handle
            .write_all(render::ranking(&outcome, requested).as_bytes())
            .map_err(CliError::io)?;
    }
    Ok(())
}

// ============================================================================
// config
// ============================================================================

fn cmd_config(ctx: &Context, command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => {
            println!("{}", ctx.settings_path.display());
        }
        ConfigCommands::Init => {
            Settings::write_default_file(&ctx.settings_path).map_err(CliError::failed)?;
            println!("wrote {}", ctx.settings_path.display());
        }
        ConfigCommands::Show => {
            let text = serde_json::to_string_pretty(&ctx.settings)
                .map_err(|e| CliError::failed(e.to_string()))?;
            println!("{}", text);
        }
    }
    Ok(())
}
