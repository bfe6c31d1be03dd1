//! Builders for Smithy JSON AST documents.
//!
//! # Examples
//!
//! ```
//! use smithy_codegen_test_helpers::models::ModelBuilder;
//!
//! let json = ModelBuilder::new()
//!     .service("example.notes#Notes", &["aws.protocols#restJson1"])
//!     .operation("example.notes#Notes", "example.notes#CreateNote", &[("token", true)])
//!     .to_json();
//! assert!(json.contains("smithy.api#idempotencyToken"));
//! ```

use serde_json::{Map, Value, json};

/// Trait marking idempotency token members.
pub const IDEMPOTENCY_TOKEN: &str = "smithy.api#idempotencyToken";

/// Incrementally assembles a model document.
#[derive(Clone, Debug, Default)]
pub struct ModelBuilder {
    shapes: Map<String, Value>,
}

impl ModelBuilder {
    /// Creates an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a service shape carrying `protocols` as traits.
    #[must_use]
    pub fn service(mut self, id: &str, protocols: &[&str]) -> Self {
        let traits: Map<String, Value> = protocols
            .iter()
            .map(|protocol| ((*protocol).to_owned(), json!({})))
            .collect();
        self.shapes.insert(
            id.to_owned(),
            json!({ "type": "service", "version": "2024-01-01", "operations": [], "traits": traits }),
        );
        self
    }

    /// Adds an operation bound to `service` whose input structure has
    /// `members`; `true` marks a member as an idempotency token.
    ///
    /// Services added later than their operations are not patched.
    #[must_use]
    pub fn operation(mut self, service: &str, operation: &str, members: &[(&str, bool)]) -> Self {
        let input = format!("{operation}Input");
        let member_map: Map<String, Value> = members
            .iter()
            .map(|(name, token)| {
                let traits = if *token {
                    json!({ IDEMPOTENCY_TOKEN: {} })
                } else {
                    json!({})
                };
                ((*name).to_owned(), json!({ "target": "smithy.api#String", "traits": traits }))
            })
            .collect();
        self.shapes
            .insert(input.clone(), json!({ "type": "structure", "members": member_map }));
        self.shapes.insert(
            operation.to_owned(),
            json!({ "type": "operation", "input": { "target": input } }),
        );
        if let Some(operations) = self
            .shapes
            .get_mut(service)
            .and_then(|shape| shape.get_mut("operations"))
            .and_then(Value::as_array_mut)
        {
            operations.push(json!({ "target": operation }));
        }
        self
    }

    /// Adds a custom protocol trait definition.
    #[must_use]
    pub fn protocol_definition(mut self, id: &str) -> Self {
        self.shapes.insert(
            id.to_owned(),
            json!({
                "type": "structure",
                "traits": { "smithy.api#trait": {}, "smithy.api#protocolDefinition": {} }
            }),
        );
        self
    }

    /// Serializes the document.
    #[must_use]
    pub fn to_json(&self) -> String {
        json!({ "smithy": "2.0", "shapes": self.shapes }).to_string()
    }
}

/// A restJson1 service with an idempotent `CreateForecast` operation and a
/// plain `GetCity` operation.
#[must_use]
pub fn weather() -> String {
    ModelBuilder::new()
        .service("example.weather#Weather", &["aws.protocols#restJson1"])
        .operation("example.weather#Weather", "example.weather#GetCity", &[("cityId", false)])
        .operation(
            "example.weather#Weather",
            "example.weather#CreateForecast",
            &[("cityId", false), ("clientToken", true)],
        )
        .to_json()
}
