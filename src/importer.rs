//! Type definitions for the ChatGPT data export (`conversations.json`).
//!
//! The export is a JSON array of conversation records. Each record stores its
//! messages as a tree: `mapping` maps node ids to nodes, every node points at
//! its parent, and `current_node` names the tip of the branch the user last
//! saw. Edits and regenerations leave sibling branches behind in `mapping`.
//!
//! ```json
//! {
//!   "title": "Hello World",
//!   "current_node": "b",
//!   "mapping": {
//!     "root": { "id": "root", "parent": null, "message": null },
//!     "a": { "id": "a", "parent": "root", "message": {
//!       "author": { "role": "user" },
//!       "content": { "content_type": "text", "parts": ["Hi"] } } },
//!     "b": { "id": "b", "parent": "a", "message": { ... } }
//!   }
//! }
//! ```
//!
//! Only the fields needed to rebuild a transcript are modelled. Everything
//! else in the export (timestamps, metadata, plugin ids) is ignored.
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use eyre::{Context, Result, eyre};
use serde::Deserialize;
use serde_json::Value;

/// Name of the JSON document inside the extracted archive.
pub const CONVERSATIONS_FILE: &str = "conversations.json";

// ---------------------------------------------------------------------------
// Conversation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Conversation {
    #[serde(default)]
    pub title: Option<String>,
    /// Tip of the active branch. `null` in the export means an empty thread.
    #[serde(default)]
    pub current_node: Option<String>,
    #[serde(default)]
    pub mapping: HashMap<String, Node>,
}

impl Conversation {
    /// Decode a conversation from an already-parsed JSON value.
    pub fn from_value(value: &Value) -> serde_json::Result<Self> {
        Self::deserialize(value)
    }
}

/// One entry of `mapping`. The id is the map key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub parent: Option<String>,
    /// Kept raw: system and tool nodes carry shapes we never render, and a
    /// node whose message does not decode is treated as having none.
    #[serde(default)]
    pub message: Option<Value>,
}

impl Node {
    pub fn message(&self) -> Option<Message> {
        let raw = self.message.as_ref()?;
        Message::deserialize(raw).ok()
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub content: Value,
}

impl Message {
    /// Structured content, or `None` when `content` is not a JSON object.
    pub fn content(&self) -> Option<Content> {
        if !self.content.is_object() {
            return None;
        }
        Content::deserialize(&self.content).ok()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
    #[serde(other)]
    Other,
}

/// `content` of a message.
///
/// `text` and `code` messages keep their body in `parts`; other types
/// (`tether_quote`, `execution_output`, ...) use `text`. Non-string parts
/// appear for images and are kept as raw values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub parts: Option<Vec<Value>>,
    #[serde(default)]
    pub text: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Read `conversations.json` from an extraction directory.
///
/// Records are returned undecoded so each one can be validated (and fail)
/// on its own.
pub fn load_conversations(extract_dir: &Path) -> Result<Vec<Value>> {
    let path = extract_dir.join(CONVERSATIONS_FILE);
    if !path.is_file() {
        return Err(eyre!(
            "{} not found in {}",
            CONVERSATIONS_FILE,
            extract_dir.display()
        ));
    }
    let bytes = fs::read(&path).wrap_err_with(|| format!("Failed to read: {}", path.display()))?;
    serde_json::from_slice::<Vec<Value>>(&bytes)
        .wrap_err_with(|| format!("Failed to parse: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_sparse_nodes() {
        let value = json!({
            "title": "T",
            "current_node": "b",
            "mapping": {
                "root": { "id": "root", "parent": null, "children": ["b"] },
                "b": {
                    "id": "b",
                    "parent": "root",
                    "message": {
                        "author": { "role": "assistant", "name": null, "metadata": {} },
                        "content": { "content_type": "text", "parts": ["hi"] },
                        "status": "finished_successfully"
                    }
                }
            }
        });
        let conv = Conversation::from_value(&value).unwrap();
        assert_eq!(conv.current_node.as_deref(), Some("b"));
        assert!(conv.mapping["root"].message().is_none());

        let msg = conv.mapping["b"].message().unwrap();
        assert_eq!(msg.author.as_ref().unwrap().role, Some(Role::Assistant));
        let content = msg.content().unwrap();
        assert_eq!(content.content_type.as_deref(), Some("text"));
        assert_eq!(content.parts.unwrap()[0], json!("hi"));
    }

    #[test]
    fn unknown_roles_and_unstructured_content() {
        let node: Node = serde_json::from_value(json!({
            "parent": "x",
            "message": { "author": { "role": "critic" }, "content": "plain string" }
        }))
        .unwrap();
        let msg = node.message().unwrap();
        assert_eq!(msg.author.as_ref().unwrap().role, Some(Role::Other));
        assert!(msg.content().is_none());
    }

    #[test]
    fn undecodable_message_is_absent() {
        let node: Node = serde_json::from_value(json!({
            "parent": null,
            "message": { "author": "not-an-object" }
        }))
        .unwrap();
        assert!(node.message().is_none());
    }

    #[test]
    fn load_requires_an_array() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_conversations(dir.path()).is_err());

        fs::write(dir.path().join(CONVERSATIONS_FILE), r#"{"title": "x"}"#).unwrap();
        assert!(load_conversations(dir.path()).is_err());

        fs::write(dir.path().join(CONVERSATIONS_FILE), r#"[{"title": "x"}, 3]"#).unwrap();
        let loaded = load_conversations(dir.path()).unwrap();
        assert_eq!(loaded.len(), 2);
    }
}
