//! References to types that generated code uses.

use std::fmt;

use super::dependency::{CargoDependency, known, runtime};
use super::{InlineDependency, RustDependency};
use crate::settings::RuntimeConfig;

/// A path to a type or item, plus the dependency that provides it.
///
/// Rendering a `RuntimeType` through [`super::RustWriter`] records its
/// dependency, which is how crates and inline fragments find their way into
/// the generated manifest.
#[derive(Clone, Debug)]
pub struct RuntimeType {
    path: String,
    dependency: Option<RustDependency>,
}

impl RuntimeType {
    /// Creates a type reference from a path and an optional dependency.
    #[must_use]
    pub fn new(path: impl Into<String>, dependency: Option<RustDependency>) -> Self {
        Self {
            path: path.into(),
            dependency,
        }
    }

    /// A primitive or prelude type, such as `bool` or `String`.
    #[must_use]
    pub fn primitive(name: impl Into<String>) -> Self {
        Self::new(name, None)
    }

    /// The root of an external crate.
    #[must_use]
    pub fn from_crate(dependency: CargoDependency) -> Self {
        Self::new(format!("::{}", dependency.rust_name()), Some(dependency.into()))
    }

    /// The item exposed by an inline fragment.
    #[must_use]
    pub fn from_inline(dependency: InlineDependency) -> Self {
        Self::new(dependency.symbol_path().to_owned(), Some(dependency.into()))
    }

    /// Resolves an item below this path, keeping the dependency.
    #[must_use]
    pub fn resolve(&self, item: &str) -> Self {
        Self {
            path: format!("{}::{item}", self.path),
            dependency: self.dependency.clone(),
        }
    }

    /// Fully qualified path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last path segment, for example `bool` or `Layer`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.path.rsplit("::").next().unwrap_or(&self.path)
    }

    /// Dependency providing the type, if any.
    #[must_use]
    pub const fn dependency(&self) -> Option<&RustDependency> {
        self.dependency.as_ref()
    }

    /// `aws-smithy-types`.
    #[must_use]
    pub fn smithy_types(config: &RuntimeConfig) -> Self {
        Self::from_crate(runtime::smithy_types(config))
    }

    /// `aws-smithy-runtime-api`.
    #[must_use]
    pub fn smithy_runtime_api(config: &RuntimeConfig) -> Self {
        Self::from_crate(runtime::smithy_runtime_api(config))
    }

    /// `aws-smithy-json`.
    #[must_use]
    pub fn smithy_json(config: &RuntimeConfig) -> Self {
        Self::from_crate(runtime::smithy_json(config))
    }

    /// `aws-smithy-xml`.
    #[must_use]
    pub fn smithy_xml(config: &RuntimeConfig) -> Self {
        Self::from_crate(runtime::smithy_xml(config))
    }

    /// `aws-smithy-http-server`.
    #[must_use]
    pub fn smithy_http_server(config: &RuntimeConfig) -> Self {
        Self::from_crate(runtime::smithy_http_server(config))
    }

    /// `http`.
    #[must_use]
    pub fn http() -> Self {
        Self::from_crate(known::http())
    }

    /// `bytes`.
    #[must_use]
    pub fn bytes() -> Self {
        Self::from_crate(known::bytes())
    }
}

impl fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}
