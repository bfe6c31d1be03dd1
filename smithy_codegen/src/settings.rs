//! Generator settings decoded from the plugin configuration.
//!
//! Settings follow the JSON layout used by build plugins:
//!
//! ```json
//! {
//!   "moduleName": "weather-sdk",
//!   "runtimeConfig": { "relativePath": "../rust-runtime" },
//!   "codegen": { "storageMode": "layeredBag" }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CodegenResult;
use crate::rustlang::dependency::{CargoDependency, DependencyLocation, DependencyScope};

/// Version used for runtime crates when the settings do not pin one.
pub const DEFAULT_RUNTIME_VERSION: &str = "1.0.0";

/// Key of the fallback entry in [`RuntimeConfig::versions`].
pub const DEFAULT_VERSION_KEY: &str = "DEFAULT";

/// Kind of crate being generated.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CodegenTarget {
    /// A client SDK.
    #[default]
    Client,
    /// Server scaffolding.
    Server,
}

/// How the generated service config stores its parameters.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StorageMode {
    /// Each parameter is a concrete struct field.
    DirectFields,
    /// Parameters live in a type-keyed layered property bag.
    #[default]
    LayeredBag,
}

/// Location and versions of the runtime crates generated code depends on.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConfig {
    /// Prefix prepended to runtime crate names (`aws` gives `aws-smithy-types`).
    #[serde(default = "default_crate_prefix")]
    pub crate_prefix: String,
    /// Directory holding local runtime crates; crates.io is used when absent.
    #[serde(default)]
    pub relative_path: Option<String>,
    /// Version overrides keyed by full crate name, with an optional
    /// [`DEFAULT_VERSION_KEY`] fallback.
    #[serde(default)]
    pub versions: BTreeMap<String, String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            crate_prefix: default_crate_prefix(),
            relative_path: None,
            versions: BTreeMap::new(),
        }
    }
}

impl RuntimeConfig {
    /// Full published name of the runtime crate `name`.
    #[must_use]
    pub fn crate_name(&self, name: &str) -> String {
        format!("{}-{name}", self.crate_prefix)
    }

    /// Resolves where the runtime crate `crate_name` comes from.
    #[must_use]
    pub fn crate_location(&self, crate_name: &str) -> DependencyLocation {
        let pinned = self
            .versions
            .get(crate_name)
            .or_else(|| self.versions.get(DEFAULT_VERSION_KEY))
            .cloned();
        match &self.relative_path {
            Some(path) => DependencyLocation::local(path.clone(), pinned),
            None => DependencyLocation::crates_io(
                pinned.unwrap_or_else(|| DEFAULT_RUNTIME_VERSION.to_owned()),
            ),
        }
    }

    /// Dependency on the runtime crate `name` in `scope`.
    #[must_use]
    pub fn runtime_crate(&self, name: &str, scope: DependencyScope) -> CargoDependency {
        let crate_name = self.crate_name(name);
        let location = self.crate_location(&crate_name);
        CargoDependency::scoped(crate_name, location, scope)
    }
}

fn default_crate_prefix() -> String {
    "aws".to_owned()
}

/// An extra config parameter declared in the settings.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigParamSettings {
    /// Parameter name, used for the field and setters.
    pub name: String,
    /// Path of the parameter type, for example `aws_types::region::Region`.
    #[serde(rename = "type")]
    pub type_path: String,
    /// Crate providing the type, if it is not a primitive.
    #[serde(default, rename = "crate")]
    pub crate_name: Option<String>,
    /// Version of `crate_name`.
    #[serde(default)]
    pub version: Option<String>,
    /// Setter documentation.
    #[serde(default)]
    pub docs: Option<String>,
}

/// Code generation switches.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodegenConfig {
    /// Storage strategy for the generated config.
    #[serde(default)]
    pub storage_mode: StorageMode,
    /// Whether to generate interceptor registration on the config builder.
    #[serde(default)]
    pub include_interceptors: bool,
    /// Additional standard config parameters.
    #[serde(default)]
    pub config_params: Vec<ConfigParamSettings>,
}

/// Settings for one generation run.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodegenSettings {
    /// Name of the generated crate.
    pub module_name: String,
    /// Version of the generated crate.
    #[serde(default = "default_module_version")]
    pub module_version: String,
    /// Service to generate; every service in the model when absent.
    #[serde(default)]
    pub service: Option<String>,
    /// Client or server generation.
    #[serde(default)]
    pub target: CodegenTarget,
    /// Runtime crate resolution.
    #[serde(default)]
    pub runtime_config: RuntimeConfig,
    /// Code generation switches.
    #[serde(default)]
    pub codegen: CodegenConfig,
}

impl CodegenSettings {
    /// Creates settings with defaults for everything but the crate name.
    #[must_use]
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            module_version: default_module_version(),
            service: None,
            target: CodegenTarget::default(),
            runtime_config: RuntimeConfig::default(),
            codegen: CodegenConfig::default(),
        }
    }

    /// Decodes settings from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CodegenError::Settings`] when the JSON is malformed.
    pub fn from_json(json: &str) -> CodegenResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Identifier of the generated crate as used in `use` paths.
    #[must_use]
    pub fn module_use_name(&self) -> String {
        self.module_name.replace('-', "_")
    }
}

fn default_module_version() -> String {
    "0.1.0".to_owned()
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests panic to surface configuration mistakes")]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn decodes_camel_case_settings() {
        let settings = CodegenSettings::from_json(
            r#"{
                "moduleName": "weather-sdk",
                "runtimeConfig": {
                    "relativePath": "../rust-runtime",
                    "versions": { "DEFAULT": "0.56.0" }
                },
                "codegen": { "storageMode": "directFields", "includeInterceptors": true }
            }"#,
        )
        .expect("valid settings");

        assert_eq!(settings.module_use_name(), "weather_sdk");
        assert_eq!(settings.module_version, "0.1.0");
        assert_eq!(settings.codegen.storage_mode, StorageMode::DirectFields);
        assert!(settings.codegen.include_interceptors);
        assert_eq!(settings.target, CodegenTarget::Client);
    }

    #[rstest]
    fn runtime_crate_prefers_local_path() {
        let config = RuntimeConfig {
            relative_path: Some("../rust-runtime".to_owned()),
            ..RuntimeConfig::default()
        };
        let dependency = config.runtime_crate("smithy-types", DependencyScope::Compile);
        assert_eq!(dependency.name(), "aws-smithy-types");
        assert_eq!(dependency.rust_name(), "aws_smithy_types");
        assert_eq!(
            dependency.location(),
            &DependencyLocation::local("../rust-runtime", None)
        );
    }

    #[rstest]
    #[case::pinned("aws-smithy-types", "0.9.1")]
    #[case::fallback("aws-smithy-json", "0.56.0")]
    fn runtime_crate_uses_version_map(#[case] crate_name: &str, #[case] expected: &str) {
        let config = RuntimeConfig {
            versions: BTreeMap::from([
                ("aws-smithy-types".to_owned(), "0.9.1".to_owned()),
                (DEFAULT_VERSION_KEY.to_owned(), "0.56.0".to_owned()),
            ]),
            ..RuntimeConfig::default()
        };
        assert_eq!(
            config.crate_location(crate_name),
            DependencyLocation::crates_io(expected)
        );
    }

    #[rstest]
    fn malformed_settings_are_rejected() {
        let err = CodegenSettings::from_json("{ \"codegen\": {} }").expect_err("missing name");
        assert!(matches!(err, crate::CodegenError::Settings(_)));
    }
}
