use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;

/// Directory created next to the archive for the Markdown files.
pub const OUTPUT_DIR_NAME: &str = "chat-export-by-conversation";

/// Configuration required to run the export process.
/// This decouples the logic from how the arguments were parsed (CLI/Config file).
#[derive(Clone, Debug)]
pub struct ExportConfig {
    pub archive: PathBuf,
    /// Overrides `<archive-dir>/chat-export-by-conversation`.
    pub out_dir: Option<PathBuf>,
    pub keep_going: bool,
    pub verbose: bool,
    pub quiet: bool,
}

impl ExportConfig {
    /// Defaults for library callers: abort on first failure, no progress output.
    pub fn new(archive: impl Into<PathBuf>) -> Self {
        Self {
            archive: archive.into(),
            out_dir: None,
            keep_going: false,
            verbose: false,
            quiet: true,
        }
    }

    pub fn resolve_out_dir(&self, archive: &Path) -> PathBuf {
        match &self.out_dir {
            Some(dir) => dir.clone(),
            None => archive
                .parent()
                .map(|p| p.join(OUTPUT_DIR_NAME))
                .unwrap_or_else(|| PathBuf::from(OUTPUT_DIR_NAME)),
        }
    }
}

/// Counts reported at the end of a batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub written: usize,
    pub failed: usize,
}

/// Install the stdout log subscriber. `RUST_LOG` wins over the flags.
pub fn init_logging(verbose: bool, quiet: bool) {
    let default = if verbose {
        "warn,chatgpt_chat_export=debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .with_target(false)
        .without_time()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_dir_defaults_next_to_archive() {
        let cfg = ExportConfig::new("/data/export.zip");
        assert_eq!(
            cfg.resolve_out_dir(Path::new("/data/export.zip")),
            PathBuf::from("/data/chat-export-by-conversation")
        );

        let cfg = ExportConfig {
            out_dir: Some(PathBuf::from("/notes")),
            ..cfg
        };
        assert_eq!(cfg.resolve_out_dir(Path::new("/data/export.zip")), PathBuf::from("/notes"));
    }
}
