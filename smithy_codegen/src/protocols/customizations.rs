//! Customizations shared by the HTTP-bound protocol families.

use super::HttpBoundProtocolSection;
use crate::customize::Customization;
use crate::error::CodegenResult;
use crate::rustlang::{InlineDependency, RuntimeType, TemplateArg, Writable, writable};
use crate::settings::RuntimeConfig;

/// Emits the protocol's body content type as a string literal.
#[derive(Debug)]
pub struct ContentTypeCustomization {
    content_type: &'static str,
}

impl ContentTypeCustomization {
    /// Customization for `content_type`.
    #[must_use]
    pub const fn new(content_type: &'static str) -> Self {
        Self { content_type }
    }
}

impl Customization<HttpBoundProtocolSection> for ContentTypeCustomization {
    fn name(&self) -> &str {
        "content_type"
    }

    fn section(&self, section: &HttpBoundProtocolSection) -> Writable<'_> {
        match section {
            HttpBoundProtocolSection::ContentType => writable(move |w| {
                w.rust_template("#{literal}", &[("literal", format!("{:?}", self.content_type).into())]);
            }),
            _ => Writable::empty(),
        }
    }
}

/// Shape of the error documents a protocol returns.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorFormat {
    /// `{"__type": ..., "message": ...}` with an optional `x-amzn-errortype` header.
    Json,
    /// `<ErrorResponse><Error>...</Error></ErrorResponse>`.
    XmlWrapped,
    /// `<Error>...</Error>` at the document root.
    XmlUnwrapped,
}

/// Parses error metadata out of an error response with the protocol's
/// bundled error parser.
///
/// Services compatible with awsQuery also take the error code from the
/// `x-amzn-query-error` header when it is present.
#[derive(Debug)]
pub struct ErrorMetadataCustomization {
    format: ErrorFormat,
    parser: RuntimeType,
    query_compatible: Option<RuntimeType>,
}

impl ErrorMetadataCustomization {
    /// Customization for `format`.
    ///
    /// # Errors
    ///
    /// Fails if the bundled error parser is missing.
    pub fn new(format: ErrorFormat, config: &RuntimeConfig) -> CodegenResult<Self> {
        let parser = match format {
            ErrorFormat::Json => InlineDependency::json_errors(config)?,
            ErrorFormat::XmlWrapped => InlineDependency::rest_xml_wrapped_errors(config)?,
            ErrorFormat::XmlUnwrapped => InlineDependency::rest_xml_unwrapped_errors(config)?,
        };
        Ok(Self {
            format,
            parser: parser.to_type(),
            query_compatible: None,
        })
    }

    /// Adds the awsQuery error code override.
    ///
    /// # Errors
    ///
    /// Fails if the bundled header parser is missing.
    pub fn with_query_compatible_errors(self, config: &RuntimeConfig) -> CodegenResult<Self> {
        Ok(Self {
            query_compatible: Some(InlineDependency::aws_query_compatible_errors(config)?.to_type()),
            ..self
        })
    }

    /// Error document shape.
    #[must_use]
    pub const fn format(&self) -> ErrorFormat {
        self.format
    }

    /// Whether the awsQuery error code override is applied.
    #[must_use]
    pub const fn is_query_compatible(&self) -> bool {
        self.query_compatible.is_some()
    }
}

impl Customization<HttpBoundProtocolSection> for ErrorMetadataCustomization {
    fn name(&self) -> &str {
        "error_metadata"
    }

    fn section(&self, section: &HttpBoundProtocolSection) -> Writable<'_> {
        match section {
            HttpBoundProtocolSection::ParseErrorMetadata { response } => {
                let response_name = response.clone();
                writable(move |w| {
                    let args: [(&str, TemplateArg<'_>); 2] = [
                        ("parser", (&self.parser).into()),
                        ("response", response_name.as_str().into()),
                    ];
                    match (self.format, &self.query_compatible) {
                        (ErrorFormat::Json, Some(headers)) => {
                            w.rust_template(
                                r#"
                                let mut builder = #{parser}::parse_error_metadata(#{response}.body(), #{response}.headers())?;
                                if let Some((error_code, error_type)) =
                                    #{headers}::parse_aws_query_compatible_error(#{response}.headers())
                                {
                                    builder = builder.code(error_code);
                                    builder = builder.custom("type", error_type);
                                }
                                Ok(builder)
                                "#,
                                &[
                                    ("parser", (&self.parser).into()),
                                    ("response", response_name.as_str().into()),
                                    ("headers", headers.into()),
                                ],
                            );
                        }
                        (ErrorFormat::Json, None) => {
                            w.rust_template(
                                "Ok(#{parser}::parse_error_metadata(#{response}.body(), #{response}.headers())?)",
                                &args,
                            );
                        }
                        (ErrorFormat::XmlWrapped | ErrorFormat::XmlUnwrapped, _) => {
                            w.rust_template("Ok(#{parser}::parse_error_metadata(#{response}.body().as_ref())?)", &args);
                        }
                    }
                })
            }
            _ => Writable::empty(),
        }
    }
}

/// Wraps streaming payloads so they can back a streaming HTTP body.
///
/// The byte stream no longer implements `Stream` itself, so serializers
/// wrap it in `HyperBodyWrapByteStream`.
#[derive(Debug, Default)]
pub struct StreamPayloadSerializerCustomization;

impl StreamPayloadSerializerCustomization {
    /// Creates the customization.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn wrapper(config: &RuntimeConfig) -> CodegenResult<RuntimeType> {
    Ok(InlineDependency::hyper_body_wrap_stream(config)?
        .to_type()
        .resolve("HyperBodyWrapByteStream"))
}

impl Customization<HttpBoundProtocolSection> for StreamPayloadSerializerCustomization {
    fn name(&self) -> &str {
        "stream_payload_serializer"
    }

    fn section(&self, section: &HttpBoundProtocolSection) -> Writable<'_> {
        match section {
            HttpBoundProtocolSection::TypeOfSerializedStreamPayload { runtime_config } => {
                let config = runtime_config.clone();
                writable(move |w| match wrapper(&config) {
                    Ok(ty) => {
                        w.rust_template("#{HyperBodyWrapByteStream}", &[("HyperBodyWrapByteStream", ty.into())]);
                    }
                    Err(err) => w.fail(err),
                })
            }
            HttpBoundProtocolSection::WrapStreamPayload {
                payload,
                runtime_config,
            } => {
                let config = runtime_config.clone();
                let payload_name = payload.clone();
                writable(move |w| match wrapper(&config) {
                    Ok(ty) => {
                        w.rust_template(
                            "#{HyperBodyWrapByteStream}::new(#{payload})",
                            &[
                                ("HyperBodyWrapByteStream", ty.into()),
                                ("payload", payload_name.as_str().into()),
                            ],
                        );
                    }
                    Err(err) => w.fail(err),
                })
            }
            _ => Writable::empty(),
        }
    }
}
