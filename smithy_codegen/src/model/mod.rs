//! The slice of the Smithy semantic model the generators consume.
//!
//! [`ModelQuery`] is the seam generators use; [`Model`] implements it over
//! the Smithy JSON AST (`{"smithy": "2.0", "shapes": {...}}`).

mod shape_id;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

pub use shape_id::ShapeId;

use crate::error::{CodegenError, CodegenResult};

/// Namespace of the protocol traits shipped with Smithy.
pub const AWS_PROTOCOLS_NAMESPACE: &str = "aws.protocols";

/// Protocol trait names recognised without a `protocolDefinition` marker.
pub const KNOWN_PROTOCOLS: &[&str] = &["awsJson1_0", "awsJson1_1", "awsQuery", "ec2Query", "restJson1", "restXml"];

/// `smithy.api#idempotencyToken`.
#[must_use]
pub fn idempotency_token_trait() -> ShapeId {
    ShapeId::new("smithy.api", "idempotencyToken")
}

/// `aws.protocols#awsQueryCompatible`.
#[must_use]
pub fn aws_query_compatible_trait() -> ShapeId {
    ShapeId::new(AWS_PROTOCOLS_NAMESPACE, "awsQueryCompatible")
}

/// `smithy.api#protocolDefinition`.
#[must_use]
pub fn protocol_definition_trait() -> ShapeId {
    ShapeId::new("smithy.api", "protocolDefinition")
}

/// Facts about a structure member.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MemberInfo {
    /// Member identifier, such as `example#GetInput$token`.
    pub id: ShapeId,
    /// Target shape.
    pub target: ShapeId,
    /// Traits applied to the member.
    pub traits: BTreeSet<ShapeId>,
}

impl MemberInfo {
    /// Whether `trait_id` is applied to the member.
    #[must_use]
    pub fn has_trait(&self, trait_id: &ShapeId) -> bool {
        self.traits.contains(trait_id)
    }
}

/// Read-only queries over a semantic model.
pub trait ModelQuery {
    /// Every service shape, in identifier order.
    fn service_ids(&self) -> Vec<ShapeId>;

    /// Traits applied to `shape`, in identifier order.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::UnknownShape`] when `shape` is absent.
    fn traits(&self, shape: &ShapeId) -> CodegenResult<Vec<ShapeId>>;

    /// Whether `shape` exists and carries `trait_id`.
    fn has_trait(&self, shape: &ShapeId, trait_id: &ShapeId) -> bool;

    /// Value of `trait_id` on `shape`, if the shape exists and carries it.
    fn trait_value(&self, shape: &ShapeId, trait_id: &ShapeId) -> Option<&Value>;

    /// Operations reachable from `service` directly or through resources.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::UnknownShape`] when the service is absent.
    fn operations(&self, service: &ShapeId) -> CodegenResult<Vec<ShapeId>>;

    /// Members of the operation's input structure.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::UnknownShape`] when the operation is absent.
    fn input_members(&self, operation: &ShapeId) -> CodegenResult<Vec<MemberInfo>>;
}

/// Protocol traits declared on `service`, in identifier order.
///
/// A trait counts as a protocol when it is one of the [`KNOWN_PROTOCOLS`] in
/// [`AWS_PROTOCOLS_NAMESPACE`] or its definition carries
/// `aws.protocols#awsQueryCompatible`.
///
/// # Errors
///
/// Returns [`CodegenError::UnknownShape`] when the service is absent.
pub fn service_protocols(model: &dyn ModelQuery, service: &ShapeId) -> CodegenResult<Vec<ShapeId>> {
    let definition = protocol_definition_trait();
    Ok(model
        .traits(service)?
        .into_iter()
        .filter(|id| {
            (id.namespace() == AWS_PROTOCOLS_NAMESPACE && KNOWN_PROTOCOLS.contains(&id.name()))
                || model.has_trait(id, &definition)
        })
        .collect())
}

/// Whether any operation of `service` has an input member marked with
/// `smithy.api#idempotencyToken`.
///
/// # Errors
///
/// Returns [`CodegenError::UnknownShape`] when the service or one of its
/// operations is absent.
pub fn needs_idempotency_token(model: &dyn ModelQuery, service: &ShapeId) -> CodegenResult<bool> {
    let token = idempotency_token_trait();
    for operation in model.operations(service)? {
        if model
            .input_members(&operation)?
            .iter()
            .any(|member| member.has_trait(&token))
        {
            debug!(%service, %operation, "operation uses an idempotency token");
            return Ok(true);
        }
    }
    Ok(false)
}

/// Reference to another shape, as written in the JSON AST.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Referenced shape.
    pub target: ShapeId,
}

impl From<ShapeId> for Target {
    fn from(target: ShapeId) -> Self {
        Self { target }
    }
}

/// A `service` shape.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceShape {
    /// Service version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Operations bound directly to the service.
    #[serde(default)]
    pub operations: Vec<Target>,
    /// Resources bound to the service.
    #[serde(default)]
    pub resources: Vec<Target>,
    /// Applied traits.
    #[serde(default)]
    pub traits: BTreeMap<ShapeId, Value>,
}

/// A `resource` shape.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceShape {
    /// Lifecycle and instance operations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create: Option<Target>,
    /// `put` lifecycle operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<Target>,
    /// `read` lifecycle operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read: Option<Target>,
    /// `update` lifecycle operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<Target>,
    /// `delete` lifecycle operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<Target>,
    /// `list` lifecycle operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<Target>,
    /// Instance operations.
    #[serde(default)]
    pub operations: Vec<Target>,
    /// Collection operations.
    #[serde(default)]
    pub collection_operations: Vec<Target>,
    /// Child resources.
    #[serde(default)]
    pub resources: Vec<Target>,
    /// Applied traits.
    #[serde(default)]
    pub traits: BTreeMap<ShapeId, Value>,
}

impl ResourceShape {
    fn all_operations(&self) -> impl Iterator<Item = &Target> {
        [&self.create, &self.put, &self.read, &self.update, &self.delete, &self.list]
            .into_iter()
            .flatten()
            .chain(&self.operations)
            .chain(&self.collection_operations)
    }
}

/// An `operation` shape.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationShape {
    /// Input structure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Target>,
    /// Output structure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Target>,
    /// Applied traits.
    #[serde(default)]
    pub traits: BTreeMap<ShapeId, Value>,
}

/// A member of a structure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemberShape {
    /// Target shape.
    pub target: ShapeId,
    /// Applied traits.
    #[serde(default)]
    pub traits: BTreeMap<ShapeId, Value>,
}

/// A `structure` shape.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureShape {
    /// Members keyed by name.
    #[serde(default)]
    pub members: BTreeMap<String, MemberShape>,
    /// Applied traits.
    #[serde(default)]
    pub traits: BTreeMap<ShapeId, Value>,
}

/// Any shape in the model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Shape {
    /// A service.
    Service(ServiceShape),
    /// A resource.
    Resource(ResourceShape),
    /// An operation.
    Operation(OperationShape),
    /// A structure.
    Structure(StructureShape),
    /// Simple, collection and other shapes the generators do not inspect.
    #[serde(other)]
    Other,
}

impl Shape {
    fn traits(&self) -> Option<&BTreeMap<ShapeId, Value>> {
        match self {
            Self::Service(shape) => Some(&shape.traits),
            Self::Resource(shape) => Some(&shape.traits),
            Self::Operation(shape) => Some(&shape.traits),
            Self::Structure(shape) => Some(&shape.traits),
            Self::Other => None,
        }
    }
}

/// A model decoded from the Smithy JSON AST.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// IDL version the model was written against.
    #[serde(default = "default_smithy_version")]
    pub smithy: String,
    /// Shapes keyed by identifier.
    #[serde(default)]
    pub shapes: BTreeMap<ShapeId, Shape>,
}

fn default_smithy_version() -> String {
    "2.0".to_owned()
}

impl Model {
    /// Decodes a JSON AST document.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::Model`] when the JSON is malformed.
    pub fn from_json(json: &str) -> CodegenResult<Self> {
        serde_json::from_str(json).map_err(CodegenError::Model)
    }

    /// Adds or replaces a shape.
    pub fn insert(&mut self, id: ShapeId, shape: Shape) {
        self.shapes.insert(id, shape);
    }

    /// Looks up a shape.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::UnknownShape`] when `id` is absent.
    pub fn shape(&self, id: &ShapeId) -> CodegenResult<&Shape> {
        self.shapes
            .get(id)
            .ok_or_else(|| CodegenError::UnknownShape(id.to_string()))
    }

    fn collect_resource_operations(
        &self,
        resource: &ShapeId,
        seen: &mut BTreeSet<ShapeId>,
        operations: &mut BTreeSet<ShapeId>,
    ) -> CodegenResult<()> {
        if !seen.insert(resource.clone()) {
            return Ok(());
        }
        let Shape::Resource(shape) = self.shape(resource)? else {
            return Err(CodegenError::UnknownShape(resource.to_string()));
        };
        operations.extend(shape.all_operations().map(|target| target.target.clone()));
        for child in &shape.resources {
            self.collect_resource_operations(&child.target, seen, operations)?;
        }
        Ok(())
    }
}

impl ModelQuery for Model {
    fn service_ids(&self) -> Vec<ShapeId> {
        self.shapes
            .iter()
            .filter(|(_, shape)| matches!(shape, Shape::Service(_)))
            .map(|(id, _)| id.clone())
            .collect()
    }

    fn traits(&self, shape: &ShapeId) -> CodegenResult<Vec<ShapeId>> {
        Ok(self
            .shape(shape)?
            .traits()
            .map(|traits| traits.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn has_trait(&self, shape: &ShapeId, trait_id: &ShapeId) -> bool {
        self.shapes
            .get(shape)
            .and_then(Shape::traits)
            .is_some_and(|traits| traits.contains_key(trait_id))
    }

    fn trait_value(&self, shape: &ShapeId, trait_id: &ShapeId) -> Option<&Value> {
        self.shapes.get(shape).and_then(Shape::traits)?.get(trait_id)
    }

    fn operations(&self, service: &ShapeId) -> CodegenResult<Vec<ShapeId>> {
        let Shape::Service(shape) = self.shape(service)? else {
            return Err(CodegenError::UnknownShape(service.to_string()));
        };
        let mut operations: BTreeSet<ShapeId> =
            shape.operations.iter().map(|target| target.target.clone()).collect();
        let mut seen = BTreeSet::new();
        for resource in &shape.resources {
            self.collect_resource_operations(&resource.target, &mut seen, &mut operations)?;
        }
        Ok(operations.into_iter().collect())
    }

    fn input_members(&self, operation: &ShapeId) -> CodegenResult<Vec<MemberInfo>> {
        let Shape::Operation(shape) = self.shape(operation)? else {
            return Err(CodegenError::UnknownShape(operation.to_string()));
        };
        let Some(input) = &shape.input else {
            return Ok(Vec::new());
        };
        let Some(Shape::Structure(structure)) = self.shapes.get(&input.target) else {
            return Ok(Vec::new());
        };
        Ok(structure
            .members
            .iter()
            .map(|(name, member)| MemberInfo {
                id: input.target.with_member(name.clone()),
                target: member.target.clone(),
                traits: member.traits.keys().cloned().collect(),
            })
            .collect())
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests panic to surface model mistakes")]
mod tests;
