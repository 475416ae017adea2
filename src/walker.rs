use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use crate::error::ExportError;
use crate::importer::{Conversation, Node, Role};

/// Marker the browsing tool leaves in assistant text when it clicks a result.
const BROWSER_CLICK_MARKER: &str = "mclick([";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Speaker {
    User,
    ChatGpt,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speaker::User => f.write_str("User"),
            Speaker::ChatGpt => f.write_str("ChatGPT"),
        }
    }
}

/// A message that survives the author and content filters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibleMessage {
    pub author: Speaker,
    pub text: String,
}

/// Rebuild the transcript of the active branch, oldest message first.
///
/// The walk starts at `current_node` and follows `parent` links to the root,
/// so alternatives abandoned by edits or regenerations are never visited.
/// Nodes without a renderable message are skipped, not reported.
pub fn visible_messages(conversation: &Conversation) -> Result<Vec<VisibleMessage>, ExportError> {
    let mut messages = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut current = conversation
        .current_node
        .as_deref()
        .filter(|id| !id.is_empty());

    // The tip has to exist; anything further up that is missing ends the walk.
    if let Some(tip) = current
        && !conversation.mapping.contains_key(tip)
    {
        return Err(ExportError::MissingNode(tip.to_string()));
    }

    while let Some(id) = current {
        if !seen.insert(id) {
            return Err(ExportError::Cycle(id.to_string()));
        }
        let Some(node) = conversation.mapping.get(id) else {
            debug!(node = id, "Parent missing from mapping, stopping walk");
            break;
        };
        current = node.parent.as_deref();

        if let Some(message) = visible_message(node) {
            messages.push(message);
        }
    }

    messages.reverse();
    Ok(messages)
}

fn visible_message(node: &Node) -> Option<VisibleMessage> {
    let message = node.message()?;
    let content = message.content()?;
    let author_info = message.author?;

    if author_info.name.as_deref() == Some("browser") {
        return None;
    }
    let author = match author_info.role? {
        Role::User => Speaker::User,
        Role::Assistant => Speaker::ChatGpt,
        _ => return None,
    };

    let text = match content.content_type.as_deref() {
        Some("text" | "code") => match content.parts.as_deref() {
            // Non-string parts (image pointers) have no text to render.
            Some([first, ..]) => first.as_str().unwrap_or_default(),
            _ => content.text.as_deref().unwrap_or_default(),
        },
        _ => content.text.as_deref().unwrap_or_default(),
    };

    if text.is_empty() || (author == Speaker::ChatGpt && is_browsing_log(text)) {
        return None;
    }

    Some(VisibleMessage {
        author,
        text: text.to_string(),
    })
}

/// Heuristic for output of the browsing tool. It also matches genuine replies
/// that happen to end in `)]`.
fn is_browsing_log(text: &str) -> bool {
    text.contains(BROWSER_CLICK_MARKER) || text.ends_with(")]")
}
