//! Error types for `cargo-smithygen`.

use camino::Utf8PathBuf;
use smithy_codegen::CodegenError;
use thiserror::Error;

/// Errors surfaced by the `cargo-smithygen` pipeline.
#[derive(Debug, Error)]
pub enum SmithygenError {
    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("path '{0}' has no file name")]
    NotAFile(Utf8PathBuf),

    #[error("model at {0} declares no services")]
    NoServices(Utf8PathBuf),

    #[error("service '{0}' was not found in the model")]
    UnknownService(String),

    #[error("generation failed for {} service(s): {}", .failed.len(), .failed.join(", "))]
    ServicesFailed { failed: Vec<String> },

    #[error("failed to install the log subscriber: {0}")]
    Logging(String),
}

impl SmithygenError {
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
