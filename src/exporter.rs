use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::error::ExportError;
use crate::filename::allocate_filename;
use crate::importer::Conversation;
use crate::walker::{VisibleMessage, visible_messages};

/// Export one conversation record to a fresh Markdown file in `out_dir`.
///
/// Returns the path written. The message tree is walked before the file is
/// created, so a conversation with a broken tree leaves no heading-only file
/// behind. Errors are logged at debug level and returned unchanged; the
/// caller decides whether the batch goes on.
pub fn export_conversation(conversation: &Value, out_dir: &Path) -> Result<PathBuf, ExportError> {
    if !conversation.is_object() {
        return Err(ExportError::NotAMapping);
    }
    if !out_dir.is_dir() {
        return Err(ExportError::OutDirMissing(out_dir.to_path_buf()));
    }
    let title = conversation
        .get("title")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(ExportError::MissingTitle)?;

    match write_conversation(conversation, title, out_dir) {
        Ok(path) => {
            debug!("Conversation processed and saved to {}", path.display());
            Ok(path)
        }
        Err(e) => {
            debug!("Error processing conversation {title:?}: {e}");
            Err(e)
        }
    }
}

fn write_conversation(conversation: &Value, title: &str, out_dir: &Path) -> Result<PathBuf, ExportError> {
    // Walk before touching the disk so a broken tree leaves no stub file.
    let parsed = Conversation::from_value(conversation)?;
    let messages = visible_messages(&parsed)?;

    let path = allocate_filename(title, out_dir)?;
    let mut writer = BufWriter::new(File::create(&path)?);
    write_markdown(&mut writer, title, &messages)?;
    writer.flush()?;

    Ok(path)
}

pub fn write_markdown<W: Write>(
    writer: &mut W,
    title: &str,
    messages: &[VisibleMessage],
) -> std::io::Result<()> {
    writeln!(writer, "# {}", title)?;
    for msg in messages {
        let block = format!("## {}:\n{}\n\n", msg.author, msg.text);
        writer.write_all(collapse_leading_newlines(&block).as_bytes())?;
    }
    Ok(())
}

/// Reduce a run of three or more newlines at the start of `block` to two.
fn collapse_leading_newlines(block: &str) -> std::borrow::Cow<'_, str> {
    let rest = block.trim_start_matches('\n');
    if block.len() - rest.len() >= 3 {
        format!("\n\n{rest}").into()
    } else {
        block.into()
    }
}
