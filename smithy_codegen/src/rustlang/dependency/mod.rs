//! Cargo dependency descriptors and their merge rules.
//!
//! A [`CargoDependency`] describes one external crate that generated code
//! requires. Descriptors sharing a [`DependencyKey`] refer to the same crate
//! and are merged rather than overwritten, so that every customization's
//! feature requests survive into the emitted manifest.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CodegenError, CodegenResult};
use crate::settings::RuntimeConfig;

/// Features that may only be enabled on development dependencies.
pub const DEV_ONLY_FEATURES: &[&str] = &["test-util"];

/// Version reported for local dependencies without an explicit version.
pub const LOCAL_VERSION: &str = "local";

/// Manifest table a dependency belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyScope {
    /// `[build-dependencies]`.
    Build,
    /// Dependencies gated behind the unstable cfg.
    CfgUnstable,
    /// `[dependencies]`.
    Compile,
    /// `[dev-dependencies]`.
    Dev,
}

impl fmt::Display for DependencyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Build => "Build",
            Self::CfgUnstable => "CfgUnstable",
            Self::Compile => "Compile",
            Self::Dev => "Dev",
        };
        f.write_str(label)
    }
}

/// Where a dependency is fetched from.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum DependencyLocation {
    /// Published on crates.io at `version`.
    CratesIo {
        /// Version requirement.
        version: String,
    },
    /// A path dependency rooted at `base_path`.
    Local {
        /// Directory containing the crate directory.
        base_path: String,
        /// Optional version override.
        version: Option<String>,
    },
}

impl DependencyLocation {
    /// Registry location with the given version requirement.
    #[must_use]
    pub fn crates_io(version: impl Into<String>) -> Self {
        Self::CratesIo {
            version: version.into(),
        }
    }

    /// Path location rooted at `base_path`.
    #[must_use]
    pub fn local(base_path: impl Into<String>, version: Option<String>) -> Self {
        Self::Local {
            base_path: base_path.into(),
            version,
        }
    }
}

/// Identity of a dependency: descriptors with equal keys are merged.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DependencyKey {
    /// Crate name.
    pub name: String,
    /// Crate location.
    pub location: DependencyLocation,
    /// Manifest scope.
    pub scope: DependencyScope,
}

/// Field-by-field description of a dependency, validated by [`Self::build`].
#[derive(Clone, Debug)]
pub struct DependencySpec {
    /// Crate name as published.
    pub name: String,
    /// Crate location.
    pub location: DependencyLocation,
    /// Manifest scope.
    pub scope: DependencyScope,
    /// Whether the dependency is optional.
    pub optional: bool,
    /// Requested features.
    pub features: BTreeSet<String>,
    /// Whether default features stay enabled.
    pub default_features: bool,
    /// Identifier used in generated code; derived from `name` when `None`.
    pub rust_name: Option<String>,
}

impl DependencySpec {
    /// Validates the spec and produces a descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::DevOnlyFeature`] when a development-only
    /// feature is requested outside [`DependencyScope::Dev`].
    pub fn build(self) -> CodegenResult<CargoDependency> {
        let rust_name = self
            .rust_name
            .unwrap_or_else(|| default_rust_name(&self.name));
        let dependency = CargoDependency {
            name: self.name,
            location: self.location,
            scope: self.scope,
            optional: self.optional,
            features: self.features,
            default_features: self.default_features,
            rust_name,
        };
        dependency.validate()?;
        Ok(dependency)
    }
}

/// A dependency on an external or runtime crate.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct CargoDependency {
    name: String,
    location: DependencyLocation,
    scope: DependencyScope,
    optional: bool,
    features: BTreeSet<String>,
    default_features: bool,
    rust_name: String,
}

impl CargoDependency {
    /// Creates a compile-scope dependency with default features and no extras.
    #[must_use]
    pub fn new(name: impl Into<String>, location: DependencyLocation) -> Self {
        let name = name.into();
        let rust_name = default_rust_name(&name);
        Self {
            name,
            location,
            scope: DependencyScope::Compile,
            optional: false,
            features: BTreeSet::new(),
            default_features: true,
            rust_name,
        }
    }

    /// Creates a dependency without features in the given scope.
    #[must_use]
    pub fn scoped(
        name: impl Into<String>,
        location: DependencyLocation,
        scope: DependencyScope,
    ) -> Self {
        Self {
            scope,
            ..Self::new(name, location)
        }
    }

    /// Creates a development dependency with the given features.
    ///
    /// Development scope accepts every feature, so this never fails.
    #[must_use]
    pub fn dev(
        name: impl Into<String>,
        location: DependencyLocation,
        features: &[&str],
    ) -> Self {
        let mut dependency = Self::new(name, location);
        dependency.scope = DependencyScope::Dev;
        dependency.features = features.iter().map(|f| (*f).to_owned()).collect();
        dependency
    }

    /// Crate name as published.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identifier used to refer to the crate from generated code.
    #[must_use]
    pub fn rust_name(&self) -> &str {
        &self.rust_name
    }

    /// Crate location.
    #[must_use]
    pub const fn location(&self) -> &DependencyLocation {
        &self.location
    }

    /// Manifest scope.
    #[must_use]
    pub const fn scope(&self) -> DependencyScope {
        self.scope
    }

    /// Whether the dependency is optional.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether default features stay enabled.
    #[must_use]
    pub const fn default_features(&self) -> bool {
        self.default_features
    }

    /// Requested features.
    #[must_use]
    pub const fn features(&self) -> &BTreeSet<String> {
        &self.features
    }

    /// Merge key identifying this dependency.
    #[must_use]
    pub fn key(&self) -> DependencyKey {
        DependencyKey {
            name: self.name.clone(),
            location: self.location.clone(),
            scope: self.scope,
        }
    }

    /// Version reported for bookkeeping.
    ///
    /// Local dependencies without an override report [`LOCAL_VERSION`].
    #[must_use]
    pub fn version(&self) -> &str {
        match &self.location {
            DependencyLocation::CratesIo { version } => version,
            DependencyLocation::Local { version, .. } => version.as_deref().unwrap_or(LOCAL_VERSION),
        }
    }

    /// Returns a copy with `feature` enabled.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::DevOnlyFeature`] if `feature` is development-only
    /// and the dependency is not in development scope.
    pub fn with_feature(&self, feature: impl Into<String>) -> CodegenResult<Self> {
        let mut dependency = self.clone();
        dependency.features.insert(feature.into());
        dependency.validate()?;
        Ok(dependency)
    }

    /// Returns a copy moved into `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::DevOnlyFeature`] if the current features are not
    /// allowed in `scope`.
    pub fn with_scope(&self, scope: DependencyScope) -> CodegenResult<Self> {
        let mut dependency = self.clone();
        dependency.scope = scope;
        dependency.validate()?;
        Ok(dependency)
    }

    /// Returns a copy in development scope.
    #[must_use]
    pub fn to_dev_dependency(&self) -> Self {
        let mut dependency = self.clone();
        dependency.scope = DependencyScope::Dev;
        dependency
    }

    /// Returns a copy with default features disabled.
    #[must_use]
    pub fn without_default_features(&self) -> Self {
        let mut dependency = self.clone();
        dependency.default_features = false;
        dependency
    }

    /// Returns a copy marked optional.
    #[must_use]
    pub fn into_optional(self) -> Self {
        Self {
            optional: true,
            ..self
        }
    }

    /// Returns a copy using `rust_name` as the in-code identifier.
    #[must_use]
    pub fn with_rust_name(self, rust_name: impl Into<String>) -> Self {
        Self {
            rust_name: rust_name.into(),
            ..self
        }
    }

    /// Merges two descriptors for the same dependency.
    ///
    /// Features are unioned. Default features stay enabled only when both
    /// descriptors keep them ("disable wins"), and the result is optional
    /// only when both inputs are. When the in-code identifiers differ the
    /// lexicographically smaller one is kept. The operation is commutative
    /// and idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::MergeKeyMismatch`] when the keys differ.
    pub fn merge(&self, other: &Self) -> CodegenResult<Self> {
        if self.key() != other.key() {
            return Err(CodegenError::MergeKeyMismatch {
                left: self.to_string(),
                right: other.to_string(),
            });
        }

        let rust_name = if self.rust_name <= other.rust_name {
            self.rust_name.clone()
        } else {
            other.rust_name.clone()
        };
        Ok(Self {
            name: self.name.clone(),
            location: self.location.clone(),
            scope: self.scope,
            optional: self.optional && other.optional,
            features: self.features.union(&other.features).cloned().collect(),
            default_features: self.default_features && other.default_features,
            rust_name,
        })
    }

    fn validate(&self) -> CodegenResult<()> {
        if self.scope == DependencyScope::Dev {
            return Ok(());
        }
        match DEV_ONLY_FEATURES
            .iter()
            .find(|feature| self.features.contains(**feature))
        {
            Some(feature) => Err(CodegenError::DevOnlyFeature {
                dependency: self.name.clone(),
                feature: (*feature).to_owned(),
            }),
            None => Ok(()),
        }
    }
}

impl fmt::Display for CargoDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {{ ", self.name)?;
        match &self.location {
            DependencyLocation::CratesIo { version } => write!(f, "version = {version:?}")?,
            DependencyLocation::Local { base_path, .. } => {
                write!(f, "path = \"{base_path}/{}\"", self.name)?;
            }
        }
        if !self.features.is_empty() {
            let quoted: Vec<String> = self.features.iter().map(|f| format!("{f:?}")).collect();
            write!(f, ", features = [{}]", quoted.join(","))?;
        }
        write!(f, ", scope = {} }}", self.scope)
    }
}

fn default_rust_name(name: &str) -> String {
    name.replace('-', "_")
}

fn crates_io(name: &str, version: &str) -> CargoDependency {
    CargoDependency::new(name, DependencyLocation::crates_io(version))
}

/// Well-known third-party crates referenced by generated code.
pub mod known {
    use super::{CargoDependency, DependencyLocation, DependencyScope, crates_io};

    /// `bytes`.
    #[must_use]
    pub fn bytes() -> CargoDependency {
        crates_io("bytes", "1.0.0")
    }

    /// `fastrand`.
    #[must_use]
    pub fn fastrand() -> CargoDependency {
        crates_io("fastrand", "2.0.0")
    }

    /// `futures-core`.
    #[must_use]
    pub fn futures_core() -> CargoDependency {
        crates_io("futures-core", "0.3.25")
    }

    /// `http`.
    #[must_use]
    pub fn http() -> CargoDependency {
        crates_io("http", "0.2.9")
    }

    /// `http-body`.
    #[must_use]
    pub fn http_body() -> CargoDependency {
        crates_io("http-body", "0.4.4")
    }

    /// `hyper`.
    #[must_use]
    pub fn hyper() -> CargoDependency {
        crates_io("hyper", "0.14.26")
    }

    /// `hyper` with the `stream` feature enabled.
    #[must_use]
    pub fn hyper_with_stream() -> CargoDependency {
        let mut hyper = hyper();
        hyper.features.insert("stream".to_owned());
        hyper
    }

    /// `md-5`, imported as `md5`.
    #[must_use]
    pub fn md5() -> CargoDependency {
        crates_io("md-5", "0.10.0").with_rust_name("md5")
    }

    /// `serde`, gated behind the unstable cfg.
    #[must_use]
    pub fn serde() -> CargoDependency {
        let mut serde = crates_io("serde", "1.0");
        serde.scope = DependencyScope::CfgUnstable;
        serde.features.insert("derive".to_owned());
        serde
    }

    /// `futures-util` for tests, without default features.
    #[must_use]
    pub fn futures_util_dev() -> CargoDependency {
        CargoDependency::dev("futures-util", DependencyLocation::crates_io("0.3.25"), &[])
            .without_default_features()
    }

    /// `pretty_assertions` for tests.
    #[must_use]
    pub fn pretty_assertions() -> CargoDependency {
        CargoDependency::dev("pretty_assertions", DependencyLocation::crates_io("1.3.0"), &[])
    }

    /// `tokio` for tests, with the runtime test utilities.
    #[must_use]
    pub fn tokio_dev() -> CargoDependency {
        CargoDependency::dev(
            "tokio",
            DependencyLocation::crates_io("1.23.1"),
            &["macros", "test-util", "rt-multi-thread"],
        )
    }
}

/// Runtime crates resolved through a [`RuntimeConfig`].
pub mod runtime {
    use super::{CargoDependency, DependencyScope, RuntimeConfig};

    /// `smithy-types`.
    #[must_use]
    pub fn smithy_types(config: &RuntimeConfig) -> CargoDependency {
        config.runtime_crate("smithy-types", DependencyScope::Compile)
    }

    /// `smithy-http-server`.
    #[must_use]
    pub fn smithy_http_server(config: &RuntimeConfig) -> CargoDependency {
        config.runtime_crate("smithy-http-server", DependencyScope::Compile)
    }

    /// `smithy-json`.
    #[must_use]
    pub fn smithy_json(config: &RuntimeConfig) -> CargoDependency {
        config.runtime_crate("smithy-json", DependencyScope::Compile)
    }

    /// `smithy-xml`.
    #[must_use]
    pub fn smithy_xml(config: &RuntimeConfig) -> CargoDependency {
        config.runtime_crate("smithy-xml", DependencyScope::Compile)
    }

    /// `smithy-runtime-api` with the `client` feature.
    #[must_use]
    pub fn smithy_runtime_api(config: &RuntimeConfig) -> CargoDependency {
        let mut dependency = config.runtime_crate("smithy-runtime-api", DependencyScope::Compile);
        dependency.features.insert("client".to_owned());
        dependency
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests panic to surface merge mistakes")]
mod tests;
