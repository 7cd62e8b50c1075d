use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming};
use lumen_edit::{EditHistory, EditorSettings, ImageStore};
use lumen_engine::Operation;

#[derive(Parser)]
#[command(version, about = "Replays lumen edit logs and macros on images.")]
pub struct Cli {
    #[arg(help = "Log to stderr only, don't write a log file.", long, default_value_t = false)]
    no_log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Replays the operation log saved next to an image and exports the result")]
    Replay {
        image: PathBuf,
        #[arg(short, long, help = "Output image, the format follows the extension.")]
        output: PathBuf,
    },

    #[command(about = "Applies a macro file on top of an image (and its log) and exports the result")]
    Apply {
        image: PathBuf,
        #[arg(short, long = "macro", help = "Macro file to apply.")]
        macro_file: PathBuf,
        #[arg(short, long, help = "Output image, the format follows the extension.")]
        output: PathBuf,
        #[arg(long, help = "Also save the original and the extended log next to the output.", default_value_t = false)]
        keep_log: bool,
    },

    #[command(about = "Prints the operations of a macro file")]
    Describe { macro_file: PathBuf },
}

fn init_logging(settings: &EditorSettings, log_file: bool) -> Option<LoggerHandle> {
    let logger = match Logger::try_with_env_or_str(&settings.log_spec) {
        Ok(logger) => logger,
        Err(err) => {
            eprintln!("Invalid log spec '{}': {err}", settings.log_spec);
            return None;
        }
    };
    let logger = match EditorSettings::log_dir() {
        Some(log_dir) if log_file => {
            if let Err(err) = std::fs::create_dir_all(&log_dir) {
                eprintln!("Failed to create log directory {}: {err}", log_dir.display());
                logger.log_to_stderr()
            } else {
                logger
                    .log_to_file(FileSpec::default().directory(&log_dir).basename("lumen_replay").suffix("log").suppress_timestamp())
                    .rotate(Criterion::Size(64 * 1024), Naming::Numbers, Cleanup::KeepLogFiles(3))
                    .duplicate_to_stderr(Duplicate::Warn)
            }
        }
        _ => logger.log_to_stderr(),
    };
    match logger.start() {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("Failed to start logger: {err}");
            None
        }
    }
}

fn open_history(store: &ImageStore, image: &Path) -> anyhow::Result<EditHistory> {
    let mut history = EditHistory::new();
    store
        .load_into(&mut history, image)
        .with_context(|| format!("can't open {}", image.display()))?;
    Ok(history)
}

fn replay(store: &ImageStore, image: &Path, output: &Path) -> anyhow::Result<()> {
    let history = open_history(store, image)?;
    for op in history.ops() {
        println!("{op}");
    }
    store
        .export_history(&history, output)
        .with_context(|| format!("can't export {}", output.display()))?;
    println!("{} operations replayed -> {}", history.ops().len(), output.display());
    Ok(())
}

fn apply(store: &ImageStore, image: &Path, macro_file: &Path, output: &Path, keep_log: bool) -> anyhow::Result<()> {
    let m = store
        .load_macro(macro_file)
        .with_context(|| format!("can't read macro {}", macro_file.display()))?;
    let mut history = open_history(store, image)?;
    let name = m.name().to_string();
    history
        .apply(Operation::from_macro(m))
        .with_context(|| format!("macro '{name}' doesn't apply to {}", image.display()))?;

    if keep_log {
        store.save_history(&mut history, output)?;
    } else {
        store.export_history(&history, output)?;
    }
    println!("{name} -> {}", output.display());
    Ok(())
}

fn describe(store: &ImageStore, macro_file: &Path) -> anyhow::Result<()> {
    let m = store
        .load_macro(macro_file)
        .with_context(|| format!("can't read macro {}", macro_file.display()))?;
    println!("{}", m.name());
    for (i, op) in m.operations().iter().enumerate() {
        let geometry = if op.affects_geometry() { " [resizes canvas]" } else { "" };
        println!("{:>3}. {op}{geometry}", i + 1);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let settings = EditorSettings::load();
    let _logger = init_logging(&settings, !args.no_log_file);
    log::info!("Starting lumen_replay {}", env!("CARGO_PKG_VERSION"));

    let store = ImageStore::from_settings(&settings);
    match &args.command {
        Commands::Replay { image, output } => replay(&store, image, output),
        Commands::Apply {
            image,
            macro_file,
            output,
            keep_log,
        } => apply(&store, image, macro_file, output, *keep_log),
        Commands::Describe { macro_file } => describe(&store, macro_file),
    }
}
