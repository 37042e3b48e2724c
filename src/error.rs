use std::path::PathBuf;
use thiserror::Error;

/// The main error type for labelkit operations.
///
/// The geometry kernel, codec and store never return this: malformed input
/// there is skipped or clamped. Errors come from file I/O at the CLI edge and
/// from host-provided tag capabilities.
#[derive(Debug, Error)]
pub enum LabelkitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse project JSON from {path}: {source}")]
    ProjectJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write project JSON to {path}: {source}")]
    ProjectJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write export payload: {0}")]
    ExportJsonWrite(#[source] serde_json::Error),

    #[error("Failed to parse shortcut config {path}: {source}")]
    ShortcutConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid shortcut config {path}: {message}")]
    ShortcutConfigInvalid { path: PathBuf, message: String },

    #[error("Failed to read image dimensions from {path}: {source}")]
    ImageDimensionRead {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Image {path} is too large ({width}x{height})")]
    ImageTooLarge {
        path: PathBuf,
        width: usize,
        height: usize,
    },

    #[error("Invalid label directory {path}: {message}")]
    LabelDirInvalid { path: PathBuf, message: String },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Tag service '{operation}' failed: {message}")]
    TagService {
        operation: &'static str,
        message: String,
    },
}
