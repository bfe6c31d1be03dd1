//! Idempotency token provider on the service config.

use super::ServiceConfig;
use crate::context::CodegenContext;
use crate::customize::Customization;
use crate::error::CodegenResult;
use crate::rustlang::{InlineDependency, RuntimeType, Writable, writable};
use crate::settings::StorageMode;

/// Token used by `set_test_defaults` so generated tests are deterministic.
pub const TEST_IDEMPOTENCY_TOKEN: &str = "00000000-0000-4000-8000-000000000000";

/// Adds an `idempotency_token_provider` to the config.
///
/// Registered by [`super::ServiceConfigGenerator::with_base_behavior`] when an
/// operation of the service takes an idempotency token.
#[derive(Debug)]
pub struct IdempotencyTokenProviderCustomization {
    mode: StorageMode,
    provider: RuntimeType,
    default_provider: RuntimeType,
}

impl IdempotencyTokenProviderCustomization {
    /// Creates the customization for the context's storage mode.
    ///
    /// # Errors
    ///
    /// Fails if the bundled `idempotency_token` resource is missing.
    pub fn new(ctx: &CodegenContext<'_>) -> CodegenResult<Self> {
        let module = InlineDependency::idempotency_token(ctx.runtime_config())?.to_type();
        Ok(Self {
            mode: ctx.storage_mode(),
            provider: module.resolve("IdempotencyTokenProvider"),
            default_provider: module.resolve("default_provider"),
        })
    }
}

impl Customization<ServiceConfig> for IdempotencyTokenProviderCustomization {
    fn name(&self) -> &str {
        "idempotency_token_provider"
    }

    fn section(&self, section: &ServiceConfig) -> Writable<'_> {
        let provider = &self.provider;
        match (section, self.mode) {
            (ServiceConfig::ConfigStruct, StorageMode::DirectFields) => writable(move |w| {
                w.rust_template(
                    "pub(crate) idempotency_token_provider: #{Provider},",
                    &[("Provider", provider.into())],
                );
            }),
            (ServiceConfig::ConfigImpl, mode) => writable(move |w| {
                let body = match mode {
                    StorageMode::DirectFields => "self.idempotency_token_provider.clone()",
                    StorageMode::LayeredBag => {
                        "self.inner.load::<#{Provider}>().expect(\"the idempotency provider should be set\").clone()"
                    }
                };
                w.rust_template(
                    r"
                    /// Returns a copy of the idempotency token provider.
                    /// If a random token provider was configured,
                    /// a newly-randomized token provider will be returned.
                    pub fn idempotency_token_provider(&self) -> #{Provider} {
                        #{body}
                    }
                    ",
                    &[
                        ("Provider", provider.into()),
                        (
                            "body",
                            writable(move |out| {
                                out.rust_template(body, &[("Provider", provider.into())]);
                            })
                            .into(),
                        ),
                    ],
                );
            }),
            (ServiceConfig::BuilderStruct, StorageMode::DirectFields) => writable(move |w| {
                w.rust_template(
                    "idempotency_token_provider: Option<#{Provider}>,",
                    &[("Provider", provider.into())],
                );
            }),
            (ServiceConfig::BuilderImpl, mode) => writable(move |w| {
                let store = match mode {
                    StorageMode::DirectFields => "self.idempotency_token_provider = idempotency_token_provider;",
                    StorageMode::LayeredBag => "self.inner.store_or_unset(idempotency_token_provider);",
                };
                w.rust_template(
                    r"
                    /// Sets the idempotency token provider to use for service calls that require tokens.
                    pub fn idempotency_token_provider(mut self, idempotency_token_provider: impl Into<#{Provider}>) -> Self {
                        self.set_idempotency_token_provider(Some(idempotency_token_provider.into()));
                        self
                    }

                    /// Sets the idempotency token provider to use for service calls that require tokens.
                    pub fn set_idempotency_token_provider(&mut self, idempotency_token_provider: Option<#{Provider}>) -> &mut Self {
                        #{store}
                        self
                    }
                    ",
                    &[("Provider", provider.into()), ("store", store.into())],
                );
            }),
            (ServiceConfig::BuilderBuild, StorageMode::DirectFields) => writable(move |w| {
                w.rust_template(
                    "idempotency_token_provider: self.idempotency_token_provider.unwrap_or_else(#{default_provider}),",
                    &[("default_provider", (&self.default_provider).into())],
                );
            }),
            (ServiceConfig::BuilderBuild, StorageMode::LayeredBag) => writable(move |w| {
                w.rust_template(
                    r"
                    if self.inner.load::<#{Provider}>().is_none() {
                        self.inner.store_put(#{default_provider}());
                    }
                    ",
                    &[
                        ("Provider", provider.into()),
                        ("default_provider", (&self.default_provider).into()),
                    ],
                );
            }),
            (ServiceConfig::DefaultForTests { config_builder_ref }, _) => {
                let builder = config_builder_ref.clone();
                writable(move |w| {
                    w.rust_template(
                        "#{builder}.set_idempotency_token_provider(Some(#{token}.into()));",
                        &[
                            ("builder", builder.as_str().into()),
                            ("token", format!("{TEST_IDEMPOTENCY_TOKEN:?}").into()),
                        ],
                    );
                })
            }
            _ => Writable::empty(),
        }
    }
}
