mod commands;
mod ui;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{debug, error, info};
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser)]
#[command(
    name = "locmerge",
    version,
    about = "Merge translated strings.xml files into Android resource trees"
)]
struct Cli {
    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Discover res directories in a project and list their locale tables
    Scan {
        #[arg(short, long)]
        root: PathBuf,
        /// Module to inspect; defaults to `app`, then the first found
        #[arg(long)]
        module: Option<String>,
        #[arg(long)]
        max_depth: Option<usize>,
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Scan a directory of translated XML files and suggest locale mappings
    Sources {
        #[arg(short, long)]
        dir: PathBuf,
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Show the line-level diff a merge would apply, without writing
    Preview {
        #[arg(short, long)]
        root: PathBuf,
        #[arg(long)]
        module: Option<String>,
        #[arg(long)]
        sources: PathBuf,
        /// Mapping configuration JSON; defaults to scanner suggestions
        #[arg(long)]
        mappings: Option<PathBuf>,
        /// Keep existing values instead of overwriting them
        #[arg(long, default_value_t = false)]
        keep_existing: bool,
        /// Restrict output to one locale folder (e.g. values-fr)
        #[arg(long)]
        folder: Option<String>,
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Merge translated entries into the project's strings.xml files
    Merge {
        #[arg(short, long)]
        root: PathBuf,
        #[arg(long)]
        module: Option<String>,
        #[arg(long)]
        sources: PathBuf,
        #[arg(long)]
        mappings: Option<PathBuf>,
        #[arg(long, default_value_t = false)]
        keep_existing: bool,
        #[arg(long, default_value_t = false)]
        dry_run: bool,
        /// Copy each touched file to strings.xml.bak first
        #[arg(long, default_value_t = false)]
        backup: bool,
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Derive mappings from a source directory and write them as JSON
    ExportMappings {
        #[arg(short, long)]
        dir: PathBuf,
        /// Output path; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Validate a mapping configuration file
    ImportMappings {
        #[arg(short, long)]
        file: PathBuf,
    },
}

trait Runnable {
    fn run(self, use_color: bool) -> Result<()>;
}

impl Runnable for Commands {
    fn run(self, use_color: bool) -> Result<()> {
        let cmd_name = match &self {
            Commands::Scan { .. } => "scan",
            Commands::Sources { .. } => "sources",
            Commands::Preview { .. } => "preview",
            Commands::Merge { .. } => "merge",
            Commands::ExportMappings { .. } => "export-mappings",
            Commands::ImportMappings { .. } => "import-mappings",
        };
        info!(event = "command_start", command = cmd_name);

        let result = match self {
            Commands::Scan {
                root,
                module,
                max_depth,
                format,
            } => {
                debug!(event = "scan_args", root = ?root, module = ?module, max_depth = ?max_depth);
                commands::scan::run_scan(root, module, max_depth, &format, use_color)
            }
            Commands::Sources { dir, format } => {
                debug!(event = "sources_args", dir = ?dir);
                commands::sources::run_sources(dir, &format, use_color)
            }
            Commands::Preview {
                root,
                module,
                sources,
                mappings,
                keep_existing,
                folder,
                format,
            } => {
                debug!(event = "preview_args", root = ?root, sources = ?sources, keep_existing);
                commands::preview::run_preview(
                    root,
                    module,
                    sources,
                    mappings,
                    !keep_existing,
                    folder,
                    &format,
                    use_color,
                )
            }
            Commands::Merge {
                root,
                module,
                sources,
                mappings,
                keep_existing,
                dry_run,
                backup,
                format,
            } => {
                debug!(event = "merge_args", root = ?root, sources = ?sources, dry_run, backup);
                commands::merge::run_merge(
                    root,
                    module,
                    sources,
                    mappings,
                    !keep_existing,
                    dry_run,
                    backup,
                    &format,
                    use_color,
                )
            }
            Commands::ExportMappings { dir, out } => {
                commands::mappings::run_export(dir, out)
            }
            Commands::ImportMappings { file } => commands::mappings::run_import(file),
        };

        match &result {
            Ok(_) => info!(event = "command_done", command = cmd_name),
            Err(e) => error!(event = "command_failed", command = cmd_name, error = ?e),
        }
        result
    }
}

fn init_tracing() {
    let file_appender = rolling::daily("logs", "locmerge.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    // keep the writer alive for the process lifetime
    Box::leak(Box::new(guard));

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")));

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_writer)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = Cli::parse();

    let use_color = !cli.no_color
        && std::io::stdout().is_terminal()
        && std::env::var_os("NO_COLOR").is_none();

    cli.cmd.run(use_color)
}
