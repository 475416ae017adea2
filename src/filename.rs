use std::io;
use std::path::{Path, PathBuf};

/// Titles at or above this many characters are replaced by the placeholder.
const MAX_TITLE_CHARS: usize = 60;
const PLACEHOLDER_TITLE: &str = "Conversation";

/// Slug used in the file name for a conversation title.
///
/// Templated titles (containing `{`) and long titles fall back to the
/// placeholder before slugging.
pub fn title_slug(title: &str) -> String {
    let source = if title.contains('{') || title.chars().count() >= MAX_TITLE_CHARS {
        PLACEHOLDER_TITLE
    } else {
        title
    };
    let slug = slug::slugify(source);
    if slug.is_empty() {
        // Titles made only of punctuation would otherwise give `chat-.md`.
        slug::slugify(PLACEHOLDER_TITLE)
    } else {
        slug
    }
}

/// Pick `chat-<slug>.md`, or the first free `chat-<slug>-N.md`, in `dir`.
///
/// The filesystem is consulted on every call, so repeated runs against the
/// same directory never clobber earlier output.
pub fn allocate_filename(title: &str, dir: &Path) -> io::Result<PathBuf> {
    allocate_with(title, dir, |path| path.try_exists())
}

/// Allocation against an arbitrary notion of "taken".
pub fn allocate_with<F>(title: &str, dir: &Path, mut is_taken: F) -> io::Result<PathBuf>
where
    F: FnMut(&Path) -> io::Result<bool>,
{
    let stem = format!("chat-{}", title_slug(title));
    let first = dir.join(format!("{stem}.md"));
    if !is_taken(&first)? {
        return Ok(first);
    }

    let mut counter = 1usize;
    loop {
        let candidate = dir.join(format!("{stem}-{counter}.md"));
        if !is_taken(&candidate)? {
            return Ok(candidate);
        }
        counter += 1;
    }
}
