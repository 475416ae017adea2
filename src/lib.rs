//! # chatgpt-chat-export
//!
//! A CLI tool that turns a ChatGPT data export (the `.zip` you get from
//! *Settings → Data controls → Export data*) into one Markdown file per
//! conversation.
//!
//! ## What it does
//!
//! The export stores every conversation in `conversations.json` as a tree of
//! message nodes, each pointing at its parent. Edits and regenerations leave
//! abandoned branches in that tree. For every conversation this tool walks
//! from the active tip back to the root, keeps the user and assistant turns
//! (dropping system prompts, tool calls and browsing logs) and writes them in
//! chronological order:
//!
//! ```markdown
//! # Hello World
//! ## User:
//! Hi
//!
//! ## ChatGPT:
//! Hello!
//! ```
//!
//! The archive is extracted once into `unzipped_data/` next to it; later runs
//! reuse that directory. Output goes to `chat-export-by-conversation/` next to
//! the archive. Existing Markdown files are never overwritten: a second export
//! of the same title lands in `chat-<slug>-1.md`.
//!
//! ## Usage
//!
//! ```sh
//! chatgpt-chat-export ~/Downloads/chatgpt-export.zip --verbose
//!
//! # Keep going past broken conversations, write somewhere else
//! chatgpt-chat-export export.zip --keep-going --out-dir ~/notes/chatgpt
//! ```
//!
//! Preferences can be persisted in `~/.config/chatgpt-chat-export/config.toml`.
pub mod archive;
pub mod error;
pub mod exporter;
pub mod filename;
pub mod importer;
pub mod sequential;
pub mod utils;
pub mod walker;

pub use error::ExportError;
pub use utils::{ExportConfig, ExportSummary};
