//! Error types for bld-core

use thiserror::Error;

/// Errors that can occur in core operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("given source \"{path}\" which is not an existing directory")]
    InvalidScope { path: String },

    #[error(
        "the given source directory \"{path}\" is not a subdirectory of \"{parent}\"; \
         out-of-tree directories require an explicit binary directory, which is not supported"
    )]
    OutOfTreeScope { path: String, parent: String },

    #[error("failed to read directory manifest '{path}': {message}")]
    Manifest { path: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
