//! Factories for the default protocol families.

use serde_json::Value;

use super::{ErrorFormat, Protocol, ProtocolCustomization, ProtocolGeneratorFactory, ProtocolSupport, aws_protocol};
use crate::context::CodegenContext;

/// `aws.protocols#restJson1`.
pub struct RestJsonFactory {
    additional: Vec<ProtocolCustomization>,
}

impl RestJsonFactory {
    /// Factory appending `additional` after the base customizations.
    #[must_use]
    pub const fn new(additional: Vec<ProtocolCustomization>) -> Self {
        Self { additional }
    }
}

impl ProtocolGeneratorFactory for RestJsonFactory {
    fn protocol(&self) -> Protocol {
        Protocol {
            id: aws_protocol("restJson1"),
            content_type: "application/json",
            error_format: ErrorFormat::Json,
        }
    }

    fn support(&self) -> ProtocolSupport {
        ProtocolSupport::all()
    }

    fn additional_customizations(&self) -> &[ProtocolCustomization] {
        &self.additional
    }
}

/// `aws.protocols#restXml`.
pub struct RestXmlFactory {
    additional: Vec<ProtocolCustomization>,
}

impl RestXmlFactory {
    /// Factory appending `additional` after the base customizations.
    #[must_use]
    pub const fn new(additional: Vec<ProtocolCustomization>) -> Self {
        Self { additional }
    }
}

impl ProtocolGeneratorFactory for RestXmlFactory {
    fn protocol(&self) -> Protocol {
        Protocol {
            id: aws_protocol("restXml"),
            content_type: "application/xml",
            error_format: ErrorFormat::XmlWrapped,
        }
    }

    fn support(&self) -> ProtocolSupport {
        ProtocolSupport {
            error_serialization: false,
            ..ProtocolSupport::all()
        }
    }

    fn additional_customizations(&self) -> &[ProtocolCustomization] {
        &self.additional
    }

    /// `{"noErrorWrapping": true}` on the protocol trait selects errors at
    /// the document root.
    fn error_format(&self, ctx: &CodegenContext<'_>) -> ErrorFormat {
        let unwrapped = ctx
            .model()
            .trait_value(ctx.service(), &aws_protocol("restXml"))
            .and_then(|value| value.get("noErrorWrapping"))
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if unwrapped {
            ErrorFormat::XmlUnwrapped
        } else {
            ErrorFormat::XmlWrapped
        }
    }
}

/// Version of the awsJson protocol.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AwsJsonVersion {
    /// `awsJson1_0`.
    Json10,
    /// `awsJson1_1`.
    Json11,
}

impl AwsJsonVersion {
    /// Protocol trait name.
    #[must_use]
    pub const fn trait_name(self) -> &'static str {
        match self {
            Self::Json10 => "awsJson1_0",
            Self::Json11 => "awsJson1_1",
        }
    }

    /// Body content type.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Json10 => "application/x-amz-json-1.0",
            Self::Json11 => "application/x-amz-json-1.1",
        }
    }
}

/// `aws.protocols#awsJson1_0` and `aws.protocols#awsJson1_1`.
pub struct AwsJsonFactory {
    version: AwsJsonVersion,
    additional: Vec<ProtocolCustomization>,
}

impl AwsJsonFactory {
    /// Factory for `version` appending `additional` after the base
    /// customizations.
    #[must_use]
    pub const fn new(version: AwsJsonVersion, additional: Vec<ProtocolCustomization>) -> Self {
        Self { version, additional }
    }

    /// Protocol version.
    #[must_use]
    pub const fn version(&self) -> AwsJsonVersion {
        self.version
    }
}

impl ProtocolGeneratorFactory for AwsJsonFactory {
    fn protocol(&self) -> Protocol {
        Protocol {
            id: aws_protocol(self.version.trait_name()),
            content_type: self.version.content_type(),
            error_format: ErrorFormat::Json,
        }
    }

    fn support(&self) -> ProtocolSupport {
        ProtocolSupport::all()
    }

    fn additional_customizations(&self) -> &[ProtocolCustomization] {
        &self.additional
    }
}
