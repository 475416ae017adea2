use chatgpt_chat_export::{ExportConfig, sequential, utils};
use clap::Parser;
use eyre::{Context, Result, eyre};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Export each conversation of a ChatGPT data export to its own Markdown file.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the downloaded export archive (.zip).
    #[arg(value_name = "ARCHIVE")]
    archive: PathBuf,

    /// Directory to write markdown files to.
    /// Defaults to chat-export-by-conversation/ next to the archive.
    #[arg(long, value_name = "PATH")]
    out_dir: Option<PathBuf>,

    /// Path to a specific configuration file.
    /// Defaults to $XDG_CONFIG_HOME/chatgpt-chat-export/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Continue with the next conversation when one fails.
    #[arg(short, long)]
    keep_going: bool,

    /// Print each file written and every error.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress progress and summary output.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Deserialize, Default)]
struct FileConfig {
    out_dir: Option<PathBuf>,
    keep_going: Option<bool>,
}

fn load_file_config(explicit_path: Option<&Path>) -> Result<FileConfig> {
    let path = if let Some(p) = explicit_path {
        if !p.exists() {
            return Err(eyre!("Config file not found: {}", p.display()));
        }
        Some(p.to_path_buf())
    } else {
        dirs::config_dir()
            .map(|d| d.join("chatgpt-chat-export/config.toml"))
            .filter(|p| p.exists())
    };

    match path {
        None => Ok(FileConfig::default()),
        Some(p) => {
            let content = fs::read_to_string(&p)
                .wrap_err_with(|| format!("Failed to read config: {}", p.display()))?;
            toml::from_str(&content)
                .wrap_err_with(|| format!("Failed to parse config: {}", p.display()))
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    utils::init_logging(cli.verbose, cli.quiet);

    // CLI > config file > defaults
    let file_cfg = load_file_config(cli.config.as_deref())?;

    let config = ExportConfig {
        archive: cli.archive,
        out_dir: cli.out_dir.or(file_cfg.out_dir),
        keep_going: cli.keep_going || file_cfg.keep_going.unwrap_or(false),
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    let summary = sequential::execute(&config)?;
    if summary.failed > 0 {
        return Err(eyre!("{} conversation(s) failed to export", summary.failed));
    }
    Ok(())
}
