use crate::archive::{stage_archive, validate_archive_path};
use crate::exporter::export_conversation;
use crate::importer::load_conversations;
use crate::utils::{ExportConfig, ExportSummary};
use eyre::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use tracing::error;

/// The main entry point for the export logic.
/// Validates and stages the archive, then exports conversations in input order.
pub fn execute(config: &ExportConfig) -> Result<ExportSummary> {
    let archive = validate_archive_path(&config.archive)?;
    let extract_dir = stage_archive(&archive)
        .wrap_err_with(|| format!("Failed to extract {}", archive.display()))?;
    let conversations = load_conversations(&extract_dir)?;

    let out_dir = config.resolve_out_dir(&archive);
    fs::create_dir_all(&out_dir).wrap_err_with(|| {
        format!("Failed to create output directory: {}", out_dir.display())
    })?;

    let total = conversations.len() as u64;
    let pb = if config.quiet || config.verbose {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)",
            )
            .wrap_err("Invalid progress template")?
            .progress_chars("=>-"),
        );
        bar.println(format!("Found {} conversations.", total));
        bar
    };

    let mut summary = ExportSummary::default();
    for (index, conversation) in conversations.iter().enumerate() {
        match export_conversation(conversation, &out_dir) {
            Ok(_) => summary.written += 1,
            Err(e) if config.keep_going => {
                summary.failed += 1;
                let report = eyre::Report::from(e);
                pb.suspend(|| error!("Conversation #{}: {:#}", index, report));
            }
            Err(e) => {
                pb.finish_and_clear();
                return Err(e).wrap_err_with(|| format!("Failed to export conversation #{}", index));
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();

    if !config.quiet {
        let mut line = format!(
            "Done. {} written to {}.",
            summary.written,
            out_dir.display()
        );
        if summary.failed > 0 {
            line.push_str(&format!(" Completed with {} error(s).", summary.failed));
        }
        eprintln!("{}", line);
    }

    Ok(summary)
}
