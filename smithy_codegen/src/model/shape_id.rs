//! Absolute shape identifiers such as `example.weather#GetForecast$city`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CodegenError;

/// An absolute shape identifier: `namespace#name`, optionally `$member`.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShapeId {
    namespace: String,
    name: String,
    member: Option<String>,
}

impl ShapeId {
    /// Builds an identifier from already validated parts.
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            member: None,
        }
    }

    /// Member `member` of this shape.
    #[must_use]
    pub fn with_member(&self, member: impl Into<String>) -> Self {
        Self {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            member: Some(member.into()),
        }
    }

    /// Namespace, such as `aws.protocols`.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Shape name, such as `restJson1`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member name, when the identifier targets a member.
    #[must_use]
    pub fn member(&self) -> Option<&str> {
        self.member.as_deref()
    }

    /// The identifier without its member part.
    #[must_use]
    pub fn without_member(&self) -> Self {
        Self::new(self.namespace.clone(), self.name.clone())
    }
}

fn is_identifier(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl FromStr for ShapeId {
    type Err = CodegenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| CodegenError::InvalidShapeId {
            value: value.to_owned(),
            reason,
        };
        let (namespace, rest) = value
            .split_once('#')
            .ok_or_else(|| invalid("missing '#' separator"))?;
        if namespace.is_empty() || !namespace.split('.').all(is_identifier) {
            return Err(invalid("namespace must be dot-separated identifiers"));
        }
        let (name, member) = match rest.split_once('$') {
            Some((shape, member_name)) => (shape, Some(member_name)),
            None => (rest, None),
        };
        if !is_identifier(name) {
            return Err(invalid("shape name must be an identifier"));
        }
        if member.is_some_and(|m| !is_identifier(m)) {
            return Err(invalid("member name must be an identifier"));
        }
        Ok(Self {
            namespace: namespace.to_owned(),
            name: name.to_owned(),
            member: member.map(str::to_owned),
        })
    }
}

impl TryFrom<String> for ShapeId {
    type Error = CodegenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ShapeId> for String {
    fn from(id: ShapeId) -> Self {
        id.to_string()
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.namespace, self.name)?;
        if let Some(member) = &self.member {
            write!(f, "${member}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests panic to surface parsing mistakes")]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain("aws.protocols#restJson1", "aws.protocols", "restJson1", None)]
    #[case::member("example.weather#GetInput$token", "example.weather", "GetInput", Some("token"))]
    #[case::numeric_name("unknownProtocol#1", "unknownProtocol", "1", None)]
    fn parses_valid_ids(
        #[case] raw: &str,
        #[case] namespace: &str,
        #[case] name: &str,
        #[case] member: Option<&str>,
    ) {
        let id: ShapeId = raw.parse().expect("valid id");
        assert_eq!(id.namespace(), namespace);
        assert_eq!(id.name(), name);
        assert_eq!(id.member(), member);
        assert_eq!(id.to_string(), raw);
    }

    #[rstest]
    #[case::no_hash("restJson1")]
    #[case::empty_namespace("#restJson1")]
    #[case::empty_name("aws.protocols#")]
    #[case::bad_member("a#B$")]
    #[case::double_dot("a..b#C")]
    fn rejects_invalid_ids(#[case] raw: &str) {
        let err = raw.parse::<ShapeId>().expect_err("invalid id");
        assert!(matches!(err, CodegenError::InvalidShapeId { .. }));
    }
}
