//! Tests for model decoding and queries.

use super::*;
use rstest::{fixture, rstest};

const WEATHER: &str = r#"{
    "smithy": "2.0",
    "shapes": {
        "example.weather#Weather": {
            "type": "service",
            "version": "2006-03-01",
            "operations": [{ "target": "example.weather#GetCurrentTime" }],
            "resources": [{ "target": "example.weather#City" }],
            "traits": {
                "aws.protocols#restJson1": {},
                "smithy.api#documentation": "Provides weather forecasts."
            }
        },
        "example.weather#City": {
            "type": "resource",
            "read": { "target": "example.weather#GetCity" },
            "resources": [{ "target": "example.weather#Forecast" }]
        },
        "example.weather#Forecast": {
            "type": "resource",
            "operations": [{ "target": "example.weather#PutForecast" }]
        },
        "example.weather#GetCurrentTime": { "type": "operation" },
        "example.weather#GetCity": {
            "type": "operation",
            "input": { "target": "example.weather#GetCityInput" }
        },
        "example.weather#PutForecast": {
            "type": "operation",
            "input": { "target": "example.weather#PutForecastInput" }
        },
        "example.weather#GetCityInput": {
            "type": "structure",
            "members": { "cityId": { "target": "smithy.api#String" } }
        },
        "example.weather#PutForecastInput": {
            "type": "structure",
            "members": {
                "clientToken": {
                    "target": "smithy.api#String",
                    "traits": { "smithy.api#idempotencyToken": {} }
                }
            }
        },
        "example.weather#CityId": { "type": "string" }
    }
}"#;

#[fixture]
fn weather() -> Model {
    Model::from_json(WEATHER).expect("valid model")
}

fn id(raw: &str) -> ShapeId {
    raw.parse().expect("valid id")
}

#[rstest]
fn decodes_json_ast(weather: Model) {
    assert_eq!(weather.service_ids(), vec![id("example.weather#Weather")]);
    assert_eq!(
        weather.shape(&id("example.weather#CityId")).expect("present"),
        &Shape::Other
    );
}

#[rstest]
fn operations_include_nested_resources(weather: Model) {
    let operations = weather
        .operations(&id("example.weather#Weather"))
        .expect("service exists");
    assert_eq!(
        operations,
        vec![
            id("example.weather#GetCity"),
            id("example.weather#GetCurrentTime"),
            id("example.weather#PutForecast"),
        ]
    );
}

#[rstest]
fn detects_idempotency_token_through_resources(weather: Model) {
    assert!(needs_idempotency_token(&weather, &id("example.weather#Weather")).expect("service exists"));
}

#[rstest]
fn no_token_without_marked_members(mut weather: Model) {
    weather.insert(
        id("example.weather#PutForecastInput"),
        Shape::Structure(StructureShape::default()),
    );
    assert!(!needs_idempotency_token(&weather, &id("example.weather#Weather")).expect("service exists"));
}

#[rstest]
fn input_members_carry_member_ids(weather: Model) {
    let members = weather
        .input_members(&id("example.weather#PutForecast"))
        .expect("operation exists");
    assert_eq!(members.len(), 1);
    let token = members.first().expect("one member");
    assert_eq!(token.id.to_string(), "example.weather#PutForecastInput$clientToken");
    assert!(token.has_trait(&idempotency_token_trait()));
}

#[rstest]
fn known_protocol_traits_are_recognised(weather: Model) {
    let protocols = service_protocols(&weather, &id("example.weather#Weather")).expect("service exists");
    assert_eq!(protocols, vec![id("aws.protocols#restJson1")]);
}

#[rstest]
fn protocol_definition_marks_custom_protocols(mut weather: Model) {
    let custom = id("example.protocols#binaryRpc");
    let mut definition = StructureShape::default();
    definition
        .traits
        .insert(protocol_definition_trait(), Value::Object(serde_json::Map::new()));
    weather.insert(custom.clone(), Shape::Structure(definition));
    if let Some(Shape::Service(service)) = weather.shapes.get_mut(&id("example.weather#Weather")) {
        service.traits.insert(custom.clone(), Value::Null);
    }

    let protocols = service_protocols(&weather, &id("example.weather#Weather")).expect("service exists");
    assert_eq!(protocols, vec![id("aws.protocols#restJson1"), custom]);
}

#[rstest]
fn unknown_service_is_reported(weather: Model) {
    let err = weather
        .operations(&id("example.weather#Missing"))
        .expect_err("absent service");
    assert!(matches!(err, CodegenError::UnknownShape(ref shape) if shape == "example.weather#Missing"));
}

#[rstest]
fn trait_values_are_exposed(weather: Model) {
    let service = id("example.weather#Weather");
    let documentation = id("smithy.api#documentation");

    assert_eq!(
        weather.trait_value(&service, &documentation),
        Some(&Value::String("Provides weather forecasts.".to_owned()))
    );
    assert_eq!(weather.trait_value(&service, &aws_query_compatible_trait()), None);
    assert_eq!(weather.trait_value(&id("example.weather#Missing"), &documentation), None);
    assert_eq!(weather.trait_value(&id("example.weather#CityId"), &documentation), None);
}
