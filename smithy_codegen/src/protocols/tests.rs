//! Tests for protocol selection and the protocol support module.

use super::*;
use crate::model::Model;
use crate::rustlang::RustDependency;
use crate::settings::{CodegenSettings, CodegenTarget};
use rstest::{fixture, rstest};

fn model(traits: &str) -> Model {
    let json = format!(
        r#"{{
            "smithy": "2.0",
            "shapes": {{
                "example.notes#Notes": {{ "type": "service", "traits": {{ {traits} }} }},
                "example.custom#fastProto": {{
                    "type": "structure",
                    "traits": {{ "smithy.api#protocolDefinition": {{}}, "smithy.api#trait": {{}} }}
                }}
            }}
        }}"#
    );
    Model::from_json(&json).expect("valid model")
}

#[fixture]
fn service() -> ShapeId {
    "example.notes#Notes".parse().expect("valid id")
}

#[fixture]
fn loader() -> ProtocolLoader {
    ProtocolLoader::for_target(CodegenTarget::Server)
}

fn render(factory: &dyn ProtocolGeneratorFactory, model: &Model, service: &ShapeId) -> (ProtocolGenerator, String) {
    let settings = CodegenSettings::new("notes-sdk");
    let ctx = CodegenContext::new(model, service, &settings);
    let generator = factory.build(&ctx).expect("generator builds");
    let mut writer = RustWriter::new();
    generator.render(&mut writer);
    let contents = writer.finish().expect("protocol renders").contents;
    (generator, contents)
}

#[rstest]
fn default_protocols_are_registered(loader: ProtocolLoader) {
    let supported: Vec<String> = loader.supported_protocols().iter().map(ToString::to_string).collect();
    assert_eq!(
        supported,
        [
            "aws.protocols#awsJson1_0",
            "aws.protocols#awsJson1_1",
            "aws.protocols#restJson1",
            "aws.protocols#restXml",
        ]
    );
}

#[rstest]
#[case::rest_json(r#""aws.protocols#restJson1": {}"#, "aws.protocols#restJson1", "application/json")]
#[case::rest_xml(r#""aws.protocols#restXml": {}"#, "aws.protocols#restXml", "application/xml")]
#[case::aws_json_10(r#""aws.protocols#awsJson1_0": {}"#, "aws.protocols#awsJson1_0", "application/x-amz-json-1.0")]
#[case::aws_json_11(r#""aws.protocols#awsJson1_1": {}"#, "aws.protocols#awsJson1_1", "application/x-amz-json-1.1")]
fn selects_declared_protocol(
    loader: ProtocolLoader,
    service: ShapeId,
    #[case] traits: &str,
    #[case] expected: &str,
    #[case] content_type: &str,
) {
    let model = model(traits);

    let (id, factory) = loader.protocol_for(&model, &service).expect("protocol supported");

    assert_eq!(id.to_string(), expected);
    assert_eq!(factory.protocol().content_type, content_type);
    assert_eq!(
        factory.additional_customizations().iter().map(|c| c.name()).collect::<Vec<_>>(),
        ["stream_payload_serializer"]
    );
}

#[rstest]
fn client_loader_adds_no_extras(service: ShapeId) {
    let loader = ProtocolLoader::for_target(CodegenTarget::Client);
    let model = model(r#""aws.protocols#awsJson1_1": {}"#);

    let (_, factory) = loader.protocol_for(&model, &service).expect("protocol supported");
    let (generator, contents) = render(factory, &model, &service);

    assert!(factory.additional_customizations().is_empty());
    assert_eq!(generator.customization_names(), ["content_type", "error_metadata"]);
    assert!(contents.contains("pub(crate) type SerializedStreamPayload = ::aws_smithy_types::byte_stream::ByteStream;"));
    assert!(!contents.contains("hyper_body_wrap_stream"));
}

#[rstest]
fn skips_unsupported_protocols(loader: ProtocolLoader, service: ShapeId) {
    let model = model(r#""example.custom#fastProto": {}, "aws.protocols#restXml": {}"#);

    let (id, _) = loader.protocol_for(&model, &service).expect("restXml supported");

    assert_eq!(id.name(), "restXml");
}

#[rstest]
fn unknown_protocol_lists_supported(loader: ProtocolLoader, service: ShapeId) {
    let model = model(r#""example.custom#fastProto": {}"#);

    let Err(err) = loader.protocol_for(&model, &service) else {
        panic!("custom protocol should be unsupported");
    };

    let CodegenError::UnsupportedProtocol { declared, supported, .. } = &err else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(declared, &["example.custom#fastProto"]);
    assert_eq!(supported.len(), 4);
    assert!(err.to_string().contains("aws.protocols#restJson1"));
}

#[rstest]
fn empty_loader_rejects_everything(service: ShapeId) {
    let loader = ProtocolLoader::new(ProtocolMap::new());
    let model = model(r#""aws.protocols#restJson1": {}"#);

    assert!(matches!(
        loader.protocol_for(&model, &service),
        Err(CodegenError::UnsupportedProtocol { .. })
    ));
}

#[rstest]
fn rest_json_generator_wraps_stream_payloads(loader: ProtocolLoader, service: ShapeId) {
    let model = model(r#""aws.protocols#restJson1": {}"#);
    let settings = CodegenSettings::new("notes-sdk");
    let ctx = CodegenContext::new(&model, &service, &settings);
    let (_, factory) = loader.protocol_for(&model, &service).expect("supported");
    let generator = factory.build(&ctx).expect("generator builds");

    let mut writer = RustWriter::new();
    generator.render(&mut writer);
    let output = writer.finish().expect("protocol renders");

    assert_eq!(
        generator.customization_names(),
        ["content_type", "error_metadata", "stream_payload_serializer"]
    );
    assert!(output.contents.contains("pub(crate) const PROTOCOL: &str = \"aws.protocols#restJson1\";"));
    assert!(output.contents.contains("pub(crate) const CONTENT_TYPE: &str = \"application/json\";"));
    assert!(output.contents.contains(
        "pub(crate) type SerializedStreamPayload = crate::hyper_body_wrap_stream::HyperBodyWrapByteStream;"
    ));
    assert!(output.contents.contains("crate::hyper_body_wrap_stream::HyperBodyWrapByteStream::new(payload)"));
    assert!(output.contents.contains("crate::json_errors::parse_error_metadata(response.body(), response.headers())"));
    let inline: Vec<&str> = output
        .dependencies
        .iter()
        .filter_map(|dep| match dep {
            RustDependency::Inline(fragment) => Some(fragment.name()),
            RustDependency::Cargo(_) => None,
        })
        .collect();
    assert!(inline.contains(&"hyper_body_wrap_stream"));
    assert!(inline.contains(&"json_errors"));
}

#[rstest]
fn bare_factory_falls_back_to_byte_stream(service: ShapeId) {
    let model = model(r#""aws.protocols#restXml": {}"#);

    let (generator, contents) = render(&RestXmlFactory::new(Vec::new()), &model, &service);

    assert!(contents.contains("pub(crate) type SerializedStreamPayload = ::aws_smithy_types::byte_stream::ByteStream;"));
    assert!(contents.contains("crate::rest_xml_wrapped_errors::parse_error_metadata(response.body().as_ref())"));
    assert_eq!(generator.protocol().error_format, ErrorFormat::XmlWrapped);
    assert!(!generator.support().error_serialization);
}

#[rstest]
#[case::wrapped(r#""aws.protocols#restXml": { "noErrorWrapping": false }"#, ErrorFormat::XmlWrapped, "rest_xml_wrapped_errors")]
#[case::unwrapped(r#""aws.protocols#restXml": { "noErrorWrapping": true }"#, ErrorFormat::XmlUnwrapped, "rest_xml_unwrapped_errors")]
fn rest_xml_error_wrapping_follows_trait(
    service: ShapeId,
    #[case] traits: &str,
    #[case] format: ErrorFormat,
    #[case] parser: &str,
) {
    let model = model(traits);

    let (generator, contents) = render(&RestXmlFactory::new(Vec::new()), &model, &service);

    assert_eq!(generator.protocol().error_format, format);
    assert!(
        contents.contains(&format!("crate::{parser}::parse_error_metadata(response.body().as_ref())")),
        "{contents}"
    );
}

#[rstest]
fn query_compatible_services_read_the_query_error_header(service: ShapeId) {
    let model = model(r#""aws.protocols#awsJson1_0": {}, "aws.protocols#awsQueryCompatible": {}"#);

    let (_, contents) = render(&AwsJsonFactory::new(AwsJsonVersion::Json10, Vec::new()), &model, &service);

    assert!(contents.contains(
        "let mut builder = crate::json_errors::parse_error_metadata(response.body(), response.headers())?;"
    ));
    assert!(contents.contains("crate::aws_query_compatible_errors::parse_aws_query_compatible_error(response.headers())"));
    assert!(contents.contains("builder = builder.code(error_code);"));
    assert!(contents.contains("Ok(builder)"));
}

#[rstest]
fn plain_json_services_skip_the_query_error_header(service: ShapeId) {
    let model = model(r#""aws.protocols#awsJson1_0": {}"#);

    let (_, contents) = render(&AwsJsonFactory::new(AwsJsonVersion::Json10, Vec::new()), &model, &service);

    assert!(!contents.contains("aws_query_compatible_errors"));
    assert!(contents.contains("Ok(crate::json_errors::parse_error_metadata(response.body(), response.headers())?)"));
}

struct ResponseOnlyFactory;

impl ProtocolGeneratorFactory for ResponseOnlyFactory {
    fn protocol(&self) -> Protocol {
        RestJsonFactory::new(Vec::new()).protocol()
    }

    fn support(&self) -> ProtocolSupport {
        ProtocolSupport {
            request_serialization: false,
            response_serialization: false,
            error_deserialization: false,
            ..ProtocolSupport::all()
        }
    }

    fn additional_customizations(&self) -> &[ProtocolCustomization] {
        &[]
    }
}

#[rstest]
fn unsupported_directions_are_not_rendered(service: ShapeId) {
    let model = model(r#""aws.protocols#restJson1": {}"#);

    let (generator, contents) = render(&ResponseOnlyFactory, &model, &service);

    assert!(!generator.support().error_deserialization);
    assert!(contents.contains("pub(crate) const CONTENT_TYPE: &str = \"application/json\";"));
    assert!(!contents.contains("parse_error_metadata"));
    assert!(!contents.contains("SerializedStreamPayload"));
}
