//! The service config construct: `Config`, its `Builder` and the runtime
//! plugin glue.
//!
//! [`ServiceConfigGenerator`] writes the skeleton and asks its
//! customizations for the content of each [`ServiceConfig`] section.
//! Storage is fixed at construction: direct struct fields, or a layered
//! property bag keyed by per-parameter newtypes.

mod idempotency;
mod interceptors;
mod param;

use std::sync::Arc;

use tracing::debug;

pub use idempotency::{IdempotencyTokenProviderCustomization, TEST_IDEMPOTENCY_TOKEN};
pub use interceptors::InterceptorConfigCustomization;
pub use param::{ConfigParam, StandardConfigParam, config_param_newtype, standard_config_param};

use crate::context::CodegenContext;
use crate::customize::{Section, SharedCustomization, compose_section, customization_names, write_customizations};
use crate::error::CodegenResult;
use crate::model::needs_idempotency_token;
use crate::rustlang::{RuntimeType, RustWriter};
use crate::settings::{RuntimeConfig, StorageMode};

/// Hook points of the service config construct.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ServiceConfig {
    /// Extra `///` lines on `Config`.
    ConfigStructAdditionalDocs,
    /// Fields of `Config`.
    ConfigStruct,
    /// Items of `impl Config`.
    ConfigImpl,
    /// Fields of `Builder`.
    BuilderStruct,
    /// Items of `impl Builder`.
    BuilderImpl,
    /// Statements and field initializers of `Builder::build`.
    BuilderBuild,
    /// Field initializers inside the `Config` literal (layered bag only).
    BuilderBuildExtras,
    /// Statements of `set_test_defaults`.
    DefaultForTests {
        /// Expression referring to the builder.
        config_builder_ref: String,
    },
    /// Statements of `RuntimePlugin::config`.
    RuntimePluginConfig {
        /// Name of the layer being filled.
        cfg: String,
    },
    /// Statements of `RuntimePlugin::interceptors`.
    RuntimePluginInterceptors {
        /// Name of the interceptor registrar.
        interceptors: String,
    },
    /// Items after the builder, at module scope.
    Extras,
}

impl Section for ServiceConfig {
    fn name(&self) -> &'static str {
        match self {
            Self::ConfigStructAdditionalDocs => "ConfigStructAdditionalDocs",
            Self::ConfigStruct => "ConfigStruct",
            Self::ConfigImpl => "ConfigImpl",
            Self::BuilderStruct => "BuilderStruct",
            Self::BuilderImpl => "BuilderImpl",
            Self::BuilderBuild => "BuilderBuild",
            Self::BuilderBuildExtras => "BuilderBuildExtras",
            Self::DefaultForTests { .. } => "DefaultForTests",
            Self::RuntimePluginConfig { .. } => "RuntimePluginConfig",
            Self::RuntimePluginInterceptors { .. } => "RuntimePluginInterceptors",
            Self::Extras => "Extras",
        }
    }
}

/// Writes `docs`, or allows missing docs when there are none.
pub(crate) fn docs_or_fallback(writer: &mut RustWriter, docs: Option<&str>) {
    match docs {
        Some(text) => {
            writer.docs(text);
        }
        None => {
            writer.rust("#[allow(missing_docs)] // documentation missing in model");
        }
    }
}

/// Customizations requested by the settings: declared config parameters,
/// then interceptors when enabled.
///
/// # Errors
///
/// Returns [`crate::CodegenError::MissingNewtype`] if a declared parameter
/// cannot be stored in the configured mode.
pub fn settings_customizations(ctx: &CodegenContext<'_>) -> CodegenResult<Vec<SharedCustomization<ServiceConfig>>> {
    let codegen = &ctx.settings().codegen;
    let mut customizations = Vec::with_capacity(codegen.config_params.len() + 1);
    for declared in &codegen.config_params {
        let param = ConfigParam::from_settings(declared, ctx.runtime_config());
        customizations.push(standard_config_param(param, ctx)?);
    }
    if codegen.include_interceptors {
        customizations.push(Arc::new(InterceptorConfigCustomization::new(ctx)) as SharedCustomization<ServiceConfig>);
    }
    Ok(customizations)
}

struct ConfigTypes {
    frozen_layer: RuntimeType,
    cloneable_layer: RuntimeType,
    layer: RuntimeType,
    runtime_plugin: RuntimeType,
    interceptor_registrar: RuntimeType,
}

impl ConfigTypes {
    fn new(config: &RuntimeConfig) -> Self {
        let config_bag = RuntimeType::smithy_types(config).resolve("config_bag");
        let client = RuntimeType::smithy_runtime_api(config).resolve("client");
        Self {
            frozen_layer: config_bag.resolve("FrozenLayer"),
            cloneable_layer: config_bag.resolve("CloneableLayer"),
            layer: config_bag.resolve("Layer"),
            runtime_plugin: client.resolve("runtime_plugin::RuntimePlugin"),
            interceptor_registrar: client.resolve("interceptors::InterceptorRegistrar"),
        }
    }
}

/// Renders the service config construct.
pub struct ServiceConfigGenerator {
    customizations: Vec<SharedCustomization<ServiceConfig>>,
    mode: StorageMode,
    types: ConfigTypes,
}

impl ServiceConfigGenerator {
    /// Creates a generator with exactly `customizations`, in order.
    #[must_use]
    pub fn new(ctx: &CodegenContext<'_>, customizations: Vec<SharedCustomization<ServiceConfig>>) -> Self {
        Self {
            customizations,
            mode: ctx.storage_mode(),
            types: ConfigTypes::new(ctx.runtime_config()),
        }
    }

    /// Creates a generator with the built-in customizations followed by
    /// `extras`.
    ///
    /// The idempotency token provider is included when an operation input
    /// member carries `smithy.api#idempotencyToken`.
    ///
    /// # Errors
    ///
    /// Fails when the model cannot be queried for the service or a bundled
    /// resource is missing.
    pub fn with_base_behavior(
        ctx: &CodegenContext<'_>,
        extras: Vec<SharedCustomization<ServiceConfig>>,
    ) -> CodegenResult<Self> {
        let mut customizations: Vec<SharedCustomization<ServiceConfig>> = Vec::with_capacity(extras.len() + 1);
        if needs_idempotency_token(ctx.model(), ctx.service())? {
            customizations.push(Arc::new(IdempotencyTokenProviderCustomization::new(ctx)?));
        }
        customizations.extend(extras);
        let generator = Self::new(ctx, customizations);
        debug!(
            service = %ctx.service(),
            customizations = ?generator.customization_names(),
            "service config generator ready"
        );
        Ok(generator)
    }

    /// Storage mode fixed at construction.
    #[must_use]
    pub const fn mode(&self) -> StorageMode {
        self.mode
    }

    /// Customization names, in order.
    #[must_use]
    pub fn customization_names(&self) -> Vec<&str> {
        customization_names(&self.customizations)
    }

    fn is_layered(&self) -> bool {
        self.mode == StorageMode::LayeredBag
    }

    fn section(&self, writer: &mut RustWriter, section: &ServiceConfig) {
        write_customizations(writer, &self.customizations, section);
    }

    /// Writes `Config`, `Builder` and their impls.
    pub fn render(&self, writer: &mut RustWriter) {
        writer.docs("Service config.");
        self.section(writer, &ServiceConfig::ConfigStructAdditionalDocs);
        writer.attribute("derive(Clone)");
        writer.rust_block("pub struct Config", |w| {
            if self.is_layered() {
                w.rust_template(
                    "inner: #{FrozenLayer},",
                    &[("FrozenLayer", (&self.types.frozen_layer).into())],
                );
            }
            self.section(w, &ServiceConfig::ConfigStruct);
        });
        writer.rust(
            r#"
            impl ::std::fmt::Debug for Config {
                fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                    f.debug_struct("Config").finish_non_exhaustive()
                }
            }
            "#,
        );
        writer.rust_block("impl Config", |w| {
            w.rust(
                r"
                /// Constructs a config builder.
                pub fn builder() -> Builder {
                    Builder::default()
                }
                ",
            );
            self.section(w, &ServiceConfig::ConfigImpl);
        });

        writer.docs("Builder for creating a `Config`.");
        writer.attribute("derive(Clone, Default)");
        writer.rust_block("pub struct Builder", |w| {
            if self.is_layered() {
                w.rust_template(
                    "inner: #{CloneableLayer},",
                    &[("CloneableLayer", (&self.types.cloneable_layer).into())],
                );
            }
            self.section(w, &ServiceConfig::BuilderStruct);
        });
        writer.rust(
            r#"
            impl ::std::fmt::Debug for Builder {
                fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                    f.debug_struct("Builder").finish_non_exhaustive()
                }
            }
            "#,
        );
        writer.rust_block("impl Builder", |w| {
            w.rust(
                r"
                /// Constructs a config builder.
                pub fn new() -> Self {
                    Self::default()
                }
                ",
            );
            self.section(w, &ServiceConfig::BuilderImpl);
            self.render_test_defaults(w);
            self.render_build(w);
        });
        self.section(writer, &ServiceConfig::Extras);
    }

    fn render_test_defaults(&self, writer: &mut RustWriter) {
        let defaults = compose_section(
            &self.customizations,
            &ServiceConfig::DefaultForTests {
                config_builder_ref: "self".to_owned(),
            },
        );
        writer.rust_template(
            r#"
            /// Apply test defaults to the builder.
            ##[cfg(any(feature = "test-util", test))]
            ##[allow(unused_mut)]
            pub fn set_test_defaults(&mut self) -> &mut Self {
                #{defaults}
                self
            }

            /// Apply test defaults to the builder.
            ##[cfg(any(feature = "test-util", test))]
            ##[allow(unused_mut)]
            pub fn with_test_defaults(mut self) -> Self {
                self.set_test_defaults();
                self
            }
            "#,
            &[("defaults", defaults.into())],
        );
    }

    fn render_build(&self, writer: &mut RustWriter) {
        let build = compose_section(&self.customizations, &ServiceConfig::BuilderBuild);
        writer.docs("Builds a [`Config`].");
        match self.mode {
            StorageMode::DirectFields => {
                writer.rust_template(
                    r"
                    pub fn build(self) -> Config {
                        Config {
                            #{build}
                        }
                    }
                    ",
                    &[("build", build.into())],
                );
            }
            StorageMode::LayeredBag => {
                let extras = compose_section(&self.customizations, &ServiceConfig::BuilderBuildExtras);
                writer.rust_template(
                    r"
                    ##[allow(unused_mut)]
                    pub fn build(mut self) -> Config {
                        #{build}
                        Config {
                            #{extras}
                            inner: self.inner.freeze(),
                        }
                    }
                    ",
                    &[("build", build.into()), ("extras", extras.into())],
                );
            }
        }
    }

    /// Writes `impl RuntimePlugin for Builder`.
    pub fn render_runtime_plugin_impl_for_builder(&self, writer: &mut RustWriter) {
        let config = compose_section(
            &self.customizations,
            &ServiceConfig::RuntimePluginConfig { cfg: "cfg".to_owned() },
        );
        let interceptors = compose_section(
            &self.customizations,
            &ServiceConfig::RuntimePluginInterceptors {
                interceptors: "_interceptors".to_owned(),
            },
        );
        writer.rust_template(
            r#"
            impl #{RuntimePlugin} for Builder {
                fn config(&self) -> Option<#{FrozenLayer}> {
                    ##[allow(unused_mut)]
                    let mut cfg = #{Layer}::new("service config");
                    #{config}
                    Some(cfg.freeze())
                }

                fn interceptors(&self, _interceptors: &mut #{InterceptorRegistrar}) {
                    #{interceptors}
                }
            }
            "#,
            &[
                ("RuntimePlugin", (&self.types.runtime_plugin).into()),
                ("FrozenLayer", (&self.types.frozen_layer).into()),
                ("Layer", (&self.types.layer).into()),
                ("InterceptorRegistrar", (&self.types.interceptor_registrar).into()),
                ("config", config.into()),
                ("interceptors", interceptors.into()),
            ],
        );
    }
}
