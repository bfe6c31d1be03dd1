//! Error types for the code generation core.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Broad classification of a [`CodegenError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The user supplied an unsupported model or invalid settings, or the
    /// generator's bundled resources are malformed.
    Configuration,
    /// A generator component was wired incorrectly.
    Internal,
}

/// Errors surfaced while generating code for a service.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodegenError {
    /// None of the protocols declared by the service has a registered factory.
    #[error(
        "unsupported protocol for service '{service}': service offers [{}], supported protocols are [{}]",
        .declared.join(", "),
        .supported.join(", ")
    )]
    UnsupportedProtocol {
        /// Service whose protocols were inspected.
        service: String,
        /// Protocol identifiers declared on the service.
        declared: Vec<String>,
        /// Protocol identifiers known to the loader.
        supported: Vec<String>,
    },

    /// A development-only feature was requested outside development scope.
    #[error("the `{feature}` feature of '{dependency}' cannot be used outside of the dev scope")]
    DevOnlyFeature {
        /// Dependency carrying the feature.
        dependency: String,
        /// Offending feature flag.
        feature: String,
    },

    /// A bundled template resource could not be found.
    #[error("resource '{path}' was missing from the bundled resources")]
    MissingResource {
        /// Resource path that was requested.
        path: String,
    },

    /// A shape identifier could not be parsed.
    #[error("invalid shape id '{value}': {reason}")]
    InvalidShapeId {
        /// Raw identifier text.
        value: String,
        /// Explanation of the parse failure.
        reason: &'static str,
    },

    /// A shape referenced by the generator is absent from the model.
    #[error("shape '{0}' was not found in the model")]
    UnknownShape(String),

    /// Settings JSON could not be decoded.
    #[error("failed to decode settings: {0}")]
    Settings(#[from] serde_json::Error),

    /// Model JSON could not be decoded.
    #[error("failed to decode model: {0}")]
    Model(#[source] serde_json::Error),

    /// Manifest tables could not be encoded.
    #[error("failed to render manifest: {0}")]
    Manifest(#[from] toml::ser::Error),

    /// Reading a settings or model file failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path that triggered the failure.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A config parameter stored in the layered bag has no newtype wrapper.
    #[error("config parameter '{param}' requires a newtype wrapper in layered-bag mode")]
    MissingNewtype {
        /// Parameter name.
        param: String,
    },

    /// Two dependency descriptors with different merge keys were merged.
    #[error("cannot merge dependency '{left}' with '{right}': merge keys differ")]
    MergeKeyMismatch {
        /// Left-hand descriptor.
        left: String,
        /// Right-hand descriptor.
        right: String,
    },

    /// A template referenced a placeholder that was not bound.
    #[error("template placeholder `#{{{placeholder}}}` was not bound")]
    Template {
        /// Name of the unbound placeholder.
        placeholder: String,
    },
}

impl CodegenError {
    /// Classifies the error as user-facing configuration or internal.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingNewtype { .. } | Self::MergeKeyMismatch { .. } | Self::Template { .. } => {
                ErrorKind::Internal
            }
            Self::UnsupportedProtocol { .. }
            | Self::DevOnlyFeature { .. }
            | Self::MissingResource { .. }
            | Self::InvalidShapeId { .. }
            | Self::UnknownShape(_)
            | Self::Settings(_)
            | Self::Model(_)
            | Self::Manifest(_)
            | Self::Io { .. } => ErrorKind::Configuration,
        }
    }
}

/// Result alias used across the crate.
pub type CodegenResult<T> = Result<T, CodegenError>;

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests panic to surface decoding mistakes")]
mod tests {
    use super::*;
    use crate::model::Model;
    use crate::settings::CodegenSettings;
    use rstest::rstest;

    #[rstest]
    fn unsupported_protocol_lists_known_identifiers() {
        let err = CodegenError::UnsupportedProtocol {
            service: "example#Weather".to_owned(),
            declared: vec!["unknownProtocol#1".to_owned()],
            supported: vec![
                "aws.protocols#restJson1".to_owned(),
                "aws.protocols#restXml".to_owned(),
            ],
        };
        let message = err.to_string();
        assert!(message.contains("unknownProtocol#1"));
        assert!(message.contains("aws.protocols#restJson1, aws.protocols#restXml"));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[rstest]
    fn template_error_names_placeholder() {
        let err = CodegenError::Template {
            placeholder: "Layer".to_owned(),
        };
        assert_eq!(err.to_string(), "template placeholder `#{Layer}` was not bound");
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[rstest]
    fn malformed_model_is_reported_as_a_model_error() {
        let err = Model::from_json("{ not json").expect_err("model is malformed");
        assert!(matches!(err, CodegenError::Model(_)), "{err:?}");
        assert!(err.to_string().starts_with("failed to decode model: "), "{err}");
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[rstest]
    fn malformed_settings_are_reported_as_a_settings_error() {
        let err = CodegenSettings::from_json("{ not json").expect_err("settings are malformed");
        assert!(matches!(err, CodegenError::Settings(_)), "{err:?}");
        assert!(err.to_string().starts_with("failed to decode settings: "), "{err}");
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
