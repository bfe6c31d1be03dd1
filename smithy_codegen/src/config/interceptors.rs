//! Interceptor registration on the config builder.

use super::ServiceConfig;
use crate::context::CodegenContext;
use crate::customize::Customization;
use crate::rustlang::{RuntimeType, Writable, writable};
use crate::settings::StorageMode;

/// Adds an interceptor list to the config and registers it with the
/// runtime plugin.
#[derive(Debug)]
pub struct InterceptorConfigCustomization {
    mode: StorageMode,
    interceptor: RuntimeType,
    shared_interceptor: RuntimeType,
}

impl InterceptorConfigCustomization {
    /// Creates the customization for the context's storage mode.
    #[must_use]
    pub fn new(ctx: &CodegenContext<'_>) -> Self {
        let interceptors = RuntimeType::smithy_runtime_api(ctx.runtime_config()).resolve("client::interceptors");
        Self {
            mode: ctx.storage_mode(),
            interceptor: interceptors.resolve("Intercept"),
            shared_interceptor: interceptors.resolve("SharedInterceptor"),
        }
    }
}

impl Customization<ServiceConfig> for InterceptorConfigCustomization {
    fn name(&self) -> &str {
        "interceptors"
    }

    fn section(&self, section: &ServiceConfig) -> Writable<'_> {
        let shared = &self.shared_interceptor;
        match section {
            ServiceConfig::ConfigStruct => writable(move |w| {
                w.rust_template(
                    "pub(crate) interceptors: Vec<#{SharedInterceptor}>,",
                    &[("SharedInterceptor", shared.into())],
                );
            }),
            ServiceConfig::ConfigImpl => writable(move |w| {
                w.rust_template(
                    r"
                    /// Returns interceptors currently registered by the user.
                    pub fn interceptors(&self) -> impl Iterator<Item = #{SharedInterceptor}> + '_ {
                        self.interceptors.iter().cloned()
                    }
                    ",
                    &[("SharedInterceptor", shared.into())],
                );
            }),
            ServiceConfig::BuilderStruct => writable(move |w| {
                w.rust_template(
                    "interceptors: Vec<#{SharedInterceptor}>,",
                    &[("SharedInterceptor", shared.into())],
                );
            }),
            ServiceConfig::BuilderImpl => writable(move |w| {
                w.rust_template(
                    r"
                    /// Adds an interceptor that runs at specific stages of the request execution pipeline.
                    pub fn interceptor(mut self, interceptor: impl #{Intercept} + 'static) -> Self {
                        self.push_interceptor(#{SharedInterceptor}::new(interceptor));
                        self
                    }

                    /// Adds a [`SharedInterceptor`](#{SharedInterceptor}) to the list of interceptors.
                    pub fn push_interceptor(&mut self, interceptor: #{SharedInterceptor}) -> &mut Self {
                        self.interceptors.push(interceptor);
                        self
                    }

                    /// Replaces all interceptors with `interceptors`.
                    pub fn set_interceptors(&mut self, interceptors: impl IntoIterator<Item = #{SharedInterceptor}>) -> &mut Self {
                        self.interceptors = interceptors.into_iter().collect();
                        self
                    }
                    ",
                    &[
                        ("Intercept", (&self.interceptor).into()),
                        ("SharedInterceptor", shared.into()),
                    ],
                );
            }),
            ServiceConfig::BuilderBuild if self.mode == StorageMode::DirectFields => writable(|w| {
                w.rust("interceptors: self.interceptors,");
            }),
            ServiceConfig::BuilderBuildExtras if self.mode == StorageMode::LayeredBag => writable(|w| {
                w.rust("interceptors: self.interceptors,");
            }),
            ServiceConfig::RuntimePluginInterceptors { interceptors } => {
                let registrar = interceptors.clone();
                writable(move |w| {
                    w.rust_template(
                        "#{registrar}.extend(self.interceptors.iter().cloned());",
                        &[("registrar", registrar.as_str().into())],
                    );
                })
            }
            _ => Writable::empty(),
        }
    }
}
