//! Tests for protocol selection against models built from scratch.
#![allow(
    unfulfilled_lint_expectations,
    reason = "clippy::expect_used is denied globally; tests may not hit those branches"
)]
#![expect(
    clippy::expect_used,
    reason = "tests panic to surface protocol wiring mistakes"
)]

use anyhow::{Result, bail, ensure};
use rstest::{fixture, rstest};
use smithy_codegen::protocols::{ProtocolGeneratorFactory, ProtocolMap, RestJsonFactory};
use smithy_codegen::settings::CodegenTarget;
use smithy_codegen::{CodegenError, ErrorKind, Model, ProtocolLoader, ShapeId};
use test_helpers::models::ModelBuilder;

const SERVICE: &str = "example.notes#Notes";

#[fixture]
fn service() -> ShapeId {
    SERVICE.parse().expect("valid service id")
}

fn model_with(protocols: &[&str]) -> Model {
    let json = ModelBuilder::new()
        .protocol_definition("unknownProtocol#1")
        .service(SERVICE, protocols)
        .to_json();
    Model::from_json(&json).expect("valid model")
}

#[rstest]
#[case::client(CodegenTarget::Client, &[])]
#[case::server(CodegenTarget::Server, &["stream_payload_serializer"])]
fn stream_payload_wrapper_follows_target(
    service: ShapeId,
    #[case] target: CodegenTarget,
    #[case] expected: &[&str],
) -> Result<()> {
    let loader = ProtocolLoader::for_target(target);
    let model = model_with(&["aws.protocols#restJson1"]);

    let (id, factory) = loader.protocol_for(&model, &service)?;

    ensure!(id.to_string() == "aws.protocols#restJson1");
    let names: Vec<&str> = factory.additional_customizations().iter().map(|c| c.name()).collect();
    ensure!(names == expected, "{names:?}");
    Ok(())
}

#[rstest]
fn unknown_protocol_is_a_configuration_error(service: ShapeId) -> Result<()> {
    let loader = ProtocolLoader::for_target(CodegenTarget::Client);
    let model = model_with(&["unknownProtocol#1"]);

    let err = match loader.protocol_for(&model, &service) {
        Ok((id, _)) => bail!("unexpectedly selected {id}"),
        Err(err) => err,
    };

    ensure!(err.kind() == ErrorKind::Configuration);
    let CodegenError::UnsupportedProtocol { declared, supported, .. } = &err else {
        bail!("unexpected error: {err}");
    };
    ensure!(declared == &["unknownProtocol#1"]);
    for known in ["awsJson1_0", "awsJson1_1", "restJson1", "restXml"] {
        let expected = format!("aws.protocols#{known}");
        ensure!(supported.contains(&expected), "missing {expected}");
    }
    Ok(())
}

#[rstest]
fn custom_map_only_knows_its_entries(service: ShapeId) -> Result<()> {
    let mut protocols = ProtocolMap::new();
    protocols.insert(
        "aws.protocols#restJson1".parse()?,
        Box::new(RestJsonFactory::new(Vec::new())) as Box<dyn ProtocolGeneratorFactory>,
    );
    let loader = ProtocolLoader::new(protocols);

    let (_, factory) = loader.protocol_for(&model_with(&["aws.protocols#restJson1"]), &service)?;
    ensure!(factory.additional_customizations().is_empty());

    let rejected = loader.protocol_for(&model_with(&["aws.protocols#restXml"]), &service);
    ensure!(matches!(rejected, Err(CodegenError::UnsupportedProtocol { .. })));
    Ok(())
}

#[rstest]
fn missing_service_is_reported(service: ShapeId) {
    let loader = ProtocolLoader::for_target(CodegenTarget::Client);
    let model = Model::default();

    let result = loader.protocol_for(&model, &service);

    assert!(matches!(result, Err(CodegenError::UnknownShape(ref id)) if id == SERVICE));
}
