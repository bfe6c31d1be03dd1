//! Wire protocol families and the loader that picks one per service.
//!
//! A [`ProtocolLoader`] maps protocol trait ids to factories. The first
//! protocol a service declares that the loader supports wins; the factory
//! then builds a [`ProtocolGenerator`] wired with the base customizations
//! plus whatever extras the loader was configured with. Server loaders
//! append stream payload wrapping; client loaders do not.

mod customizations;
mod factories;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

pub use customizations::{
    ContentTypeCustomization, ErrorFormat, ErrorMetadataCustomization, StreamPayloadSerializerCustomization,
};
pub use factories::{AwsJsonFactory, AwsJsonVersion, RestJsonFactory, RestXmlFactory};

use crate::context::CodegenContext;
use crate::customize::{Section, SharedCustomization, compose_section, customization_names};
use crate::error::{CodegenError, CodegenResult};
use crate::model::{AWS_PROTOCOLS_NAMESPACE, ModelQuery, ShapeId, aws_query_compatible_trait, service_protocols};
use crate::rustlang::{RuntimeType, RustWriter, Writable, writable};
use crate::settings::{CodegenTarget, RuntimeConfig};

/// Hook points of the HTTP-bound protocol support module.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum HttpBoundProtocolSection {
    /// Expression for the body content type.
    ContentType,
    /// Body of the error metadata parser.
    ParseErrorMetadata {
        /// Name of the response binding.
        response: String,
    },
    /// Type streaming payloads are serialized into.
    TypeOfSerializedStreamPayload {
        /// Runtime crate resolution.
        runtime_config: RuntimeConfig,
    },
    /// Expression wrapping a streaming payload.
    WrapStreamPayload {
        /// Name of the payload binding.
        payload: String,
        /// Runtime crate resolution.
        runtime_config: RuntimeConfig,
    },
}

impl Section for HttpBoundProtocolSection {
    fn name(&self) -> &'static str {
        match self {
            Self::ContentType => "ContentType",
            Self::ParseErrorMetadata { .. } => "ParseErrorMetadata",
            Self::TypeOfSerializedStreamPayload { .. } => "TypeOfSerializedStreamPayload",
            Self::WrapStreamPayload { .. } => "WrapStreamPayload",
        }
    }
}

/// Customization of the HTTP-bound protocol sections.
pub type ProtocolCustomization = SharedCustomization<HttpBoundProtocolSection>;

/// Which directions of a protocol the generated code supports.
///
/// The protocol module only carries the error metadata parser when errors
/// are deserialized, and the stream payload items when any body is
/// serialized.
#[expect(
    clippy::struct_excessive_bools,
    reason = "each flag is an independent capability reported to callers"
)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ProtocolSupport {
    /// Serializing requests.
    pub request_serialization: bool,
    /// Deserializing requests.
    pub request_deserialization: bool,
    /// Serializing responses.
    pub response_serialization: bool,
    /// Deserializing responses.
    pub response_deserialization: bool,
    /// Serializing modelled errors.
    pub error_serialization: bool,
    /// Deserializing modelled errors.
    pub error_deserialization: bool,
}

impl ProtocolSupport {
    /// Every direction supported.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            request_serialization: true,
            request_deserialization: true,
            response_serialization: true,
            response_deserialization: true,
            error_serialization: true,
            error_deserialization: true,
        }
    }
}

/// Static facts about a wire protocol.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Protocol {
    /// Protocol trait id.
    pub id: ShapeId,
    /// Content type of request and response bodies.
    pub content_type: &'static str,
    /// Error document shape.
    pub error_format: ErrorFormat,
}

/// Builds protocol generators for one protocol family.
pub trait ProtocolGeneratorFactory: Send + Sync {
    /// Protocol facts.
    fn protocol(&self) -> Protocol;

    /// Supported directions.
    fn support(&self) -> ProtocolSupport;

    /// Customizations appended after the base ones.
    fn additional_customizations(&self) -> &[ProtocolCustomization];

    /// Error document shape for the service in `ctx`.
    fn error_format(&self, _ctx: &CodegenContext<'_>) -> ErrorFormat {
        self.protocol().error_format
    }

    /// Builds a generator for the service in `ctx`.
    ///
    /// JSON error parsing honours `aws.protocols#awsQueryCompatible` on the
    /// service.
    ///
    /// # Errors
    ///
    /// Fails if a bundled fragment the protocol needs is missing.
    fn build(&self, ctx: &CodegenContext<'_>) -> CodegenResult<ProtocolGenerator> {
        let mut protocol = self.protocol();
        protocol.error_format = self.error_format(ctx);
        let config = ctx.runtime_config();
        let mut error_metadata = ErrorMetadataCustomization::new(protocol.error_format, config)?;
        if protocol.error_format == ErrorFormat::Json
            && ctx.model().has_trait(ctx.service(), &aws_query_compatible_trait())
        {
            error_metadata = error_metadata.with_query_compatible_errors(config)?;
        }
        debug!(
            protocol = %protocol.id,
            error_format = ?protocol.error_format,
            query_compatible = error_metadata.is_query_compatible(),
            "building protocol generator"
        );
        let mut customizations: Vec<ProtocolCustomization> = vec![
            Arc::new(ContentTypeCustomization::new(protocol.content_type)),
            Arc::new(error_metadata),
        ];
        customizations.extend(self.additional_customizations().iter().cloned());
        Ok(ProtocolGenerator {
            protocol,
            support: self.support(),
            runtime_config: config.clone(),
            customizations,
        })
    }
}

/// Renders the protocol support module for one service.
pub struct ProtocolGenerator {
    protocol: Protocol,
    support: ProtocolSupport,
    runtime_config: RuntimeConfig,
    customizations: Vec<ProtocolCustomization>,
}

impl fmt::Debug for ProtocolGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProtocolGenerator")
            .field("protocol", &self.protocol.id.to_string())
            .field("support", &self.support)
            .field("customizations", &self.customization_names())
            .finish_non_exhaustive()
    }
}

impl ProtocolGenerator {
    /// Protocol facts.
    #[must_use]
    pub const fn protocol(&self) -> &Protocol {
        &self.protocol
    }

    /// Supported directions.
    #[must_use]
    pub const fn support(&self) -> ProtocolSupport {
        self.support
    }

    /// Customization names, in order.
    #[must_use]
    pub fn customization_names(&self) -> Vec<&str> {
        customization_names(&self.customizations)
    }

    fn section_or<'a>(&'a self, section: &HttpBoundProtocolSection, fallback: Writable<'a>) -> Writable<'a> {
        let composed = compose_section(&self.customizations, section);
        if composed.is_empty() { fallback } else { composed }
    }

    /// Writes the protocol support items.
    pub fn render(&self, writer: &mut RustWriter) {
        let content_type = self.section_or(
            &HttpBoundProtocolSection::ContentType,
            writable(|w| {
                w.rust_template(
                    "#{literal}",
                    &[("literal", format!("{:?}", self.protocol.content_type).into())],
                );
            }),
        );
        writer.rust_template(
            r##"
            /// Protocol trait the service is generated for.
            pub(crate) const PROTOCOL: &str = "#{protocol}";

            /// Content type of serialized bodies.
            pub(crate) const CONTENT_TYPE: &str = #{content_type};
            "##,
            &[
                ("protocol", self.protocol.id.to_string().into()),
                ("content_type", content_type.into()),
            ],
        );
        if self.support.error_deserialization {
            writer.blank_line();
            self.render_error_parser(writer);
        }
        if self.support.request_serialization || self.support.response_serialization {
            writer.blank_line();
            self.render_stream_payload(writer);
        }
    }

    fn render_error_parser(&self, writer: &mut RustWriter) {
        let metadata = RuntimeType::smithy_types(&self.runtime_config).resolve("error::metadata");
        let parse = self.section_or(
            &HttpBoundProtocolSection::ParseErrorMetadata {
                response: "response".to_owned(),
            },
            writable(|w| {
                w.rust_template(
                    "Ok(#{ErrorMetadata}::builder())",
                    &[("ErrorMetadata", metadata.resolve("ErrorMetadata").into())],
                );
            }),
        );
        writer.rust_template(
            r#"
            /// Parses error metadata out of an error response.
            pub(crate) fn parse_error_metadata(
                response: &#{http}::Response<#{Bytes}>,
            ) -> Result<#{ErrorMetadataBuilder}, Box<dyn ::std::error::Error + Send + Sync>> {
                #{parse}
            }
            "#,
            &[
                ("http", RuntimeType::http().into()),
                ("Bytes", RuntimeType::bytes().resolve("Bytes").into()),
                ("ErrorMetadataBuilder", metadata.resolve("Builder").into()),
                ("parse", parse.into()),
            ],
        );
    }

    fn render_stream_payload(&self, writer: &mut RustWriter) {
        let config = &self.runtime_config;
        let byte_stream = RuntimeType::smithy_types(config).resolve("byte_stream::ByteStream");
        let stream_type = self.section_or(
            &HttpBoundProtocolSection::TypeOfSerializedStreamPayload {
                runtime_config: config.clone(),
            },
            writable(|w| {
                w.rust_template("#{ByteStream}", &[("ByteStream", (&byte_stream).into())]);
            }),
        );
        let wrap = self.section_or(
            &HttpBoundProtocolSection::WrapStreamPayload {
                payload: "payload".to_owned(),
                runtime_config: config.clone(),
            },
            writable(|w| {
                w.rust("payload");
            }),
        );
        writer.rust_template(
            r#"
            /// Body type streaming payloads are serialized into.
            pub(crate) type SerializedStreamPayload = #{stream_type};

            /// Wraps a streaming payload for use as an HTTP body.
            pub(crate) fn wrap_stream_payload(payload: #{ByteStream}) -> SerializedStreamPayload {
                #{wrap}
            }
            "#,
            &[
                ("stream_type", stream_type.into()),
                ("ByteStream", (&byte_stream).into()),
                ("wrap", wrap.into()),
            ],
        );
    }
}

/// Protocol factories keyed by protocol trait id.
pub type ProtocolMap = BTreeMap<ShapeId, Box<dyn ProtocolGeneratorFactory>>;

/// Picks the protocol family for a service.
pub struct ProtocolLoader {
    protocols: ProtocolMap,
}

impl fmt::Debug for ProtocolLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProtocolLoader")
            .field("protocols", &self.supported_protocols())
            .finish()
    }
}

fn aws_protocol(name: &str) -> ShapeId {
    ShapeId::new(AWS_PROTOCOLS_NAMESPACE, name)
}

impl ProtocolLoader {
    /// Loader over exactly `protocols`.
    #[must_use]
    pub const fn new(protocols: ProtocolMap) -> Self {
        Self { protocols }
    }

    /// The default protocol families for `target`.
    ///
    /// Server families get stream payload wrapping appended identically;
    /// client families carry only the base customizations.
    #[must_use]
    pub fn default_protocols(target: CodegenTarget) -> ProtocolMap {
        let extras = || -> Vec<ProtocolCustomization> {
            match target {
                CodegenTarget::Server => vec![Arc::new(StreamPayloadSerializerCustomization::new())],
                CodegenTarget::Client => Vec::new(),
            }
        };
        let mut protocols: ProtocolMap = BTreeMap::new();
        protocols.insert(aws_protocol("restJson1"), Box::new(RestJsonFactory::new(extras())));
        protocols.insert(aws_protocol("restXml"), Box::new(RestXmlFactory::new(extras())));
        protocols.insert(
            aws_protocol("awsJson1_0"),
            Box::new(AwsJsonFactory::new(AwsJsonVersion::Json10, extras())),
        );
        protocols.insert(
            aws_protocol("awsJson1_1"),
            Box::new(AwsJsonFactory::new(AwsJsonVersion::Json11, extras())),
        );
        protocols
    }

    /// Loader over [`Self::default_protocols`] for `target`.
    #[must_use]
    pub fn for_target(target: CodegenTarget) -> Self {
        Self::new(Self::default_protocols(target))
    }

    /// Supported protocol ids, in identifier order.
    #[must_use]
    pub fn supported_protocols(&self) -> Vec<&ShapeId> {
        self.protocols.keys().collect()
    }

    /// The first protocol declared on `service` that this loader supports.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::UnsupportedProtocol`] when none of the
    /// declared protocols is supported, and
    /// [`CodegenError::UnknownShape`] when the service is absent.
    pub fn protocol_for(
        &self,
        model: &dyn ModelQuery,
        service: &ShapeId,
    ) -> CodegenResult<(ShapeId, &dyn ProtocolGeneratorFactory)> {
        let declared = service_protocols(model, service)?;
        for id in &declared {
            if let Some(factory) = self.protocols.get(id) {
                debug!(%service, protocol = %id, "selected protocol");
                return Ok((id.clone(), factory.as_ref()));
            }
        }
        Err(CodegenError::UnsupportedProtocol {
            service: service.to_string(),
            declared: declared.iter().map(ToString::to_string).collect(),
            supported: self.protocols.keys().map(ToString::to_string).collect(),
        })
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests panic to surface protocol wiring mistakes")]
mod tests;
