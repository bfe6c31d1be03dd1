//! Source files bundled with the generator and the fragments built on them.

use super::InlineDependency;
use crate::error::{CodegenError, CodegenResult};
use crate::rustlang::dependency::{known, runtime};
use crate::rustlang::{RustDependency, RustModule};
use crate::settings::RuntimeConfig;

const BUNDLED: &[(&str, &str)] = &[
    (
        "inlineable/aws_query_compatible_errors.rs",
        include_str!("../../../resources/inlineable/aws_query_compatible_errors.rs"),
    ),
    (
        "inlineable/hyper_body_wrap_stream.rs",
        include_str!("../../../resources/inlineable/hyper_body_wrap_stream.rs"),
    ),
    (
        "inlineable/idempotency_token.rs",
        include_str!("../../../resources/inlineable/idempotency_token.rs"),
    ),
    (
        "inlineable/json_errors.rs",
        include_str!("../../../resources/inlineable/json_errors.rs"),
    ),
    (
        "inlineable/rest_xml_unwrapped_errors.rs",
        include_str!("../../../resources/inlineable/rest_xml_unwrapped_errors.rs"),
    ),
    (
        "inlineable/rest_xml_wrapped_errors.rs",
        include_str!("../../../resources/inlineable/rest_xml_wrapped_errors.rs"),
    ),
];

/// Contents of the bundled resource at `path`.
pub(super) fn bundled(path: &str) -> CodegenResult<&'static str> {
    BUNDLED
        .iter()
        .find(|(name, _)| *name == path)
        .map(|(_, text)| *text)
        .ok_or_else(|| CodegenError::MissingResource {
            path: path.to_owned(),
        })
}

fn file(
    module: RustModule,
    extra_dependencies: Vec<RustDependency>,
) -> CodegenResult<InlineDependency> {
    let resource = format!("inlineable/{}.rs", module.name());
    InlineDependency::for_rust_file(module, &resource, extra_dependencies)
}

impl InlineDependency {
    /// Error metadata parsing for JSON protocols.
    ///
    /// # Errors
    ///
    /// Fails only if the bundled resource is missing.
    pub fn json_errors(config: &RuntimeConfig) -> CodegenResult<Self> {
        file(
            RustModule::private("json_errors"),
            vec![
                runtime::smithy_json(config).into(),
                runtime::smithy_types(config).into(),
                known::bytes().into(),
                known::http().into(),
            ],
        )
    }

    /// Error code translation for services compatible with awsQuery.
    ///
    /// # Errors
    ///
    /// Fails only if the bundled resource is missing.
    pub fn aws_query_compatible_errors(config: &RuntimeConfig) -> CodegenResult<Self> {
        file(
            RustModule::private("aws_query_compatible_errors"),
            vec![runtime::smithy_json(config).into(), known::http().into()],
        )
    }

    /// Idempotency token provider.
    ///
    /// # Errors
    ///
    /// Fails only if the bundled resource is missing.
    pub fn idempotency_token(config: &RuntimeConfig) -> CodegenResult<Self> {
        file(
            RustModule::public("idempotency_token"),
            vec![known::fastrand().into(), runtime::smithy_types(config).into()],
        )
    }

    /// Error metadata parsing for restXml with wrapped errors.
    ///
    /// # Errors
    ///
    /// Fails only if the bundled resource is missing.
    pub fn rest_xml_wrapped_errors(config: &RuntimeConfig) -> CodegenResult<Self> {
        file(
            RustModule::private("rest_xml_wrapped_errors"),
            vec![
                runtime::smithy_xml(config).into(),
                runtime::smithy_types(config).into(),
            ],
        )
    }

    /// Error metadata parsing for restXml with unwrapped errors.
    ///
    /// # Errors
    ///
    /// Fails only if the bundled resource is missing.
    pub fn rest_xml_unwrapped_errors(config: &RuntimeConfig) -> CodegenResult<Self> {
        file(
            RustModule::private("rest_xml_unwrapped_errors"),
            vec![
                runtime::smithy_xml(config).into(),
                runtime::smithy_types(config).into(),
            ],
        )
    }

    /// Adapter turning a byte stream into a streaming HTTP body.
    ///
    /// # Errors
    ///
    /// Fails only if the bundled resource is missing.
    pub fn hyper_body_wrap_stream(config: &RuntimeConfig) -> CodegenResult<Self> {
        file(
            RustModule::pub_crate("hyper_body_wrap_stream"),
            vec![
                known::hyper_with_stream().into(),
                known::futures_core().into(),
                known::bytes().into(),
                runtime::smithy_types(config).into(),
            ],
        )
    }
}
