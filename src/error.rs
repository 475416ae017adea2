use std::path::PathBuf;
use thiserror::Error;

/// Failures the library reports with a distinct signal per cause.
///
/// Setup errors (the archive variants) are fatal to a run. Everything from
/// `NotAMapping` down is raised for a single conversation; the batch driver
/// decides whether to continue.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("The provided path does not exist: {0}")]
    ArchiveNotFound(PathBuf),

    #[error("The path is not a file: {0}")]
    NotAFile(PathBuf),

    #[error("The path is not a zip file: {0}")]
    NotAZip(PathBuf),

    #[error("Invalid zip file {path}")]
    Extraction {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Conversation must be a JSON object")]
    NotAMapping,

    #[error("Output directory does not exist or is not a directory: {0}")]
    OutDirMissing(PathBuf),

    #[error("Title missing, blank, or not a string in conversation")]
    MissingTitle,

    #[error("Malformed conversation record")]
    Malformed(#[from] serde_json::Error),

    #[error("Node {0:?} is not present in the conversation mapping")]
    MissingNode(String),

    #[error("Parent chain revisits node {0:?}")]
    Cycle(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
