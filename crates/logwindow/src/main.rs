use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use logwindow_core::{ListOptions, LocatorOptions, LogLocator, ReadOptions, SortOrder};
use logwindow_logging::LogFormat;

mod config;
mod output;

use config::ProjectConfig;

#[derive(Parser, Debug)]
#[command(
    name = "logwindow",
    about = "Find rotated log files by time window",
    version,
    author
)]
struct Cli {
    /// Directory holding the logs (default: from logwindow.toml, else current directory)
    #[arg(short = 'd', long, global = true)]
    logs_dir: Option<PathBuf>,

    /// Date format used in file names, e.g. YYYY-MM-DD or DD-MM-YY
    #[arg(long, global = true)]
    date_format: Option<String>,

    /// Explicit config file (default: ./logwindow.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log output format
    #[arg(long, global = true, default_value = "pretty")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List matching log files
    List {
        #[command(flatten)]
        window: WindowArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Stream lines from matching log files
    Read {
        #[command(flatten)]
        window: WindowArgs,

        /// Lines per batch
        #[arg(short = 'n', long)]
        lines: Option<usize>,

        /// Stop after this many batches
        #[arg(long)]
        max_batches: Option<usize>,

        /// Emit each batch as a JSON line
        #[arg(long)]
        json: bool,
    },
    /// Print the glob pattern for a window
    Pattern {
        #[command(flatten)]
        window: WindowArgs,
    },
}

#[derive(Args, Debug, Clone)]
struct WindowArgs {
    /// Look-back window, e.g. 12H, 3D, 2WEEKS, 1M, 1Y
    #[arg(short = 't', long)]
    duration: Option<String>,

    /// File name template containing {date}
    #[arg(short = 'f', long)]
    name_format: Option<String>,

    /// Result order
    #[arg(short, long, value_enum)]
    sort: Option<SortChoice>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortChoice {
    Asc,
    Desc,
}

impl From<SortChoice> for SortOrder {
    fn from(choice: SortChoice) -> Self {
        match choice {
            SortChoice::Asc => SortOrder::Asc,
            SortChoice::Desc => SortOrder::Desc,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logwindow_logging::init_tracing(&cli.log_level, cli.log_format);

    let working_dir = std::env::current_dir().context("Failed to get current directory")?;
    let config = load_config(&cli, &working_dir)?;

    match &cli.command {
        Command::Pattern { window } => {
            let locator = open_locator(&cli, &config, &working_dir)?;
            let options = list_options(window, &config)?;
            let pattern = locator.pattern(&options, chrono::Local::now().naive_local())?;
            println!("{}", pattern);
        }
        Command::List { window, json } => {
            let locator = open_locator(&cli, &config, &working_dir)?;
            let options = list_options(window, &config)?;
            let files = locator.list(&options).await?;
            output::print_files(&files, *json)?;
        }
        Command::Read {
            window,
            lines,
            max_batches,
            json,
        } => {
            let locator = open_locator(&cli, &config, &working_dir)?;
            let mut options = ReadOptions::new(list_options(window, &config)?);
            if let Some(lines) = lines.or(config.lines) {
                options = options.with_lines(lines);
            }
            let mut session = locator.read(options).await?;
            output::drain_session(&mut session, *max_batches, *json).await?;
        }
    }

    Ok(())
}

fn load_config(cli: &Cli, working_dir: &Path) -> Result<ProjectConfig> {
    let config = match &cli.config {
        Some(path) => ProjectConfig::load_file(path)?
            .with_context(|| format!("Config file not found: {}", path.display()))?,
        None => ProjectConfig::discover(working_dir)?.unwrap_or_default(),
    };
    Ok(config)
}

fn open_locator(cli: &Cli, config: &ProjectConfig, working_dir: &Path) -> Result<LogLocator> {
    let logs_dir = cli
        .logs_dir
        .clone()
        .or_else(|| config.logs_dir_from(working_dir))
        .unwrap_or_else(|| working_dir.to_path_buf());

    let mut options = LocatorOptions::new(logs_dir);
    if let Some(format) = cli.date_format.clone().or_else(|| config.date_format.clone()) {
        options = options.with_date_format(format);
    }

    LogLocator::new(options).context("Failed to open log directory")
}

/// CLI flag > config file > built-in default.
fn list_options(window: &WindowArgs, config: &ProjectConfig) -> Result<ListOptions> {
    let mut options = ListOptions::default();
    if let Some(duration) = window.duration.clone().or_else(|| config.duration.clone()) {
        options = options.with_duration(duration);
    }
    if let Some(name_format) = window
        .name_format
        .clone()
        .or_else(|| config.name_format.clone())
    {
        options = options.with_name_format(name_format);
    }
    let sort = match (window.sort, config.sort.as_deref()) {
        (Some(choice), _) => choice.into(),
        (None, Some(configured)) => configured.parse::<SortOrder>()?,
        (None, None) => SortOrder::default(),
    };
    Ok(options.with_sort(sort))
}
