use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use presetdesk::panel::{OthersPanel, Status};
use presetdesk::{Folder, LoraEntry, PathConfig, PathResolver, SettingsRecord};

const APP_NAME: &str = "presetdesk";

#[derive(Parser)]
#[command(name = "presetdesk")]
#[command(about = "Model file management and settings backup", long_about = None)]
struct Cli {
    /// Folder configuration (defaults to paths.toml in the OS config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the directory behind each folder name
    Folders,

    /// Download a URL or copy a local file into a folder
    Download {
        /// http(s) URL or local file path
        source: String,
        /// checkpoints, loras, embeddings, vae or outputs
        #[arg(long, default_value = "checkpoints")]
        to: Folder,
    },

    /// List files in a folder
    List { folder: Folder },

    /// Delete files from a folder
    Delete {
        folder: Folder,
        names: Vec<String>,
    },

    /// Back up generation settings as JSON into the outputs folder
    Backup {
        /// Backup filename (no extension)
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        prompt: String,
        #[arg(long, default_value = "")]
        negative_prompt: String,
        /// e.g. "1024×1024" or "1024*1024"
        #[arg(long, default_value = "")]
        aspect_ratio: String,
        #[arg(long, default_value = "")]
        performance: String,
        /// Repeat for several styles; order is kept
        #[arg(long = "style")]
        styles: Vec<String>,
        #[arg(long, default_value = "")]
        base_model: String,
        #[arg(long, default_value = "")]
        refiner_model: String,
        #[arg(long)]
        refiner_switch: Option<f64>,
        #[arg(long)]
        image_number: Option<u32>,
        /// enabled,model,weight (repeatable)
        #[arg(long = "lora")]
        loras: Vec<LoraEntry>,
    },

    /// Copy a settings JSON file into the presets folder
    Restore { file: Option<PathBuf> },
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;
    // Logs go to stderr; stdout carries status lines only.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_resolver(config: Option<&PathBuf>) -> Result<PathResolver> {
    let cfg = match config {
        Some(path) => PathConfig::load(path)
            .with_context(|| format!("load folder config {}", path.display()))?,
        None => PathConfig::load_default().context("load folder config")?,
    };
    PathResolver::new(cfg).context("folder config")
}

fn render_progress(downloaded: u64, total: u64) {
    let downloaded_mb = downloaded as f64 / 1_000_000.0;
    if total == 0 {
        eprint!("\r{:.1} MB", downloaded_mb);
    } else {
        let percent = (downloaded as f64 / total as f64 * 100.0).min(100.0);
        let total_mb = total as f64 / 1_000_000.0;
        // Render a simple progress bar
        let bar_width = 40;
        let filled = (bar_width as f64 * percent / 100.0) as usize;
        let bar: String = "█".repeat(filled) + &"░".repeat(bar_width - filled);
        eprint!(
            "\r[{}] {:.1}% ({:.1}/{:.1} MB)",
            bar, percent, downloaded_mb, total_mb
        );
    }
    std::io::stderr().flush().ok();
}

fn report(status: &Status) -> ExitCode {
    println!("{}", status);
    if status.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn main() -> Result<ExitCode> {
    init_logging();
    let cli = Cli::parse();
    tracing::debug!("{} version {}", APP_NAME, env!("CARGO_PKG_VERSION"));

    let paths = load_resolver(cli.config.as_ref())?;
    let panel = OthersPanel::new(&paths);

    let code = match cli.command {
        Commands::Folders => {
            for folder in Folder::ALL {
                println!("{:<12} {}", folder, paths.resolve(folder).display());
            }
            ExitCode::SUCCESS
        }
        Commands::Download { source, to } => {
            if !Folder::DOWNLOAD_TARGETS.contains(&to) {
                anyhow::bail!("{} is not a download target", to);
            }
            let mut reported = false;
            let result = panel.download(&source, to, |done, total| {
                reported = true;
                render_progress(done, total);
            });
            if reported {
                eprintln!();
            }
            report(&result.status)
        }
        Commands::List { folder } => {
            for name in panel.list(folder) {
                println!("{}", name);
            }
            ExitCode::SUCCESS
        }
        Commands::Delete { folder, names } => {
            if !Folder::DELETE_TARGETS.contains(&folder) {
                anyhow::bail!("{} is not a delete target", folder);
            }
            let result = panel.delete(folder, &names);
            report(&result.status)
        }
        Commands::Backup {
            name,
            prompt,
            negative_prompt,
            aspect_ratio,
            performance,
            styles,
            base_model,
            refiner_model,
            refiner_switch,
            image_number,
            loras,
        } => {
            let record = SettingsRecord {
                prompt,
                negative_prompt,
                aspect_ratio,
                performance,
                styles,
                base_model,
                refiner_model,
                refiner_switch,
                image_number,
                loras,
            };
            report(&panel.backup(&name, &record).status)
        }
        Commands::Restore { file } => report(&panel.restore(file.as_deref())),
    };
    Ok(code)
}
