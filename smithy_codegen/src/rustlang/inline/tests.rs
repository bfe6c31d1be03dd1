//! Tests for inline fragments and their registry.

use super::*;
use crate::CodegenError;
use crate::rustlang::dependency::known;
use crate::settings::RuntimeConfig;
use rstest::{fixture, rstest};

#[fixture]
fn runtime_config() -> RuntimeConfig {
    RuntimeConfig::default()
}

#[rstest]
fn missing_resource_is_reported() {
    let err = InlineDependency::for_rust_file(RustModule::private("absent"), "inlineable/absent.rs", Vec::new())
        .expect_err("resource is not bundled");
    assert!(matches!(err, CodegenError::MissingResource { ref path } if path == "inlineable/absent.rs"));
}

#[rstest]
fn bundled_file_renders_module_contents(runtime_config: RuntimeConfig) {
    let dependency = InlineDependency::idempotency_token(&runtime_config).expect("bundled");
    assert_eq!(dependency.symbol_path(), "crate::idempotency_token");
    assert_eq!(dependency.key().to_string(), "crate::idempotency_token::idempotency_token");

    let mut writer = RustWriter::new();
    dependency.render(&mut writer);
    assert!(writer.contents().contains("pub struct IdempotencyTokenProvider"));
}

#[rstest]
fn every_bundled_fragment_loads(runtime_config: RuntimeConfig) {
    let fragments = [
        InlineDependency::json_errors(&runtime_config),
        InlineDependency::aws_query_compatible_errors(&runtime_config),
        InlineDependency::rest_xml_wrapped_errors(&runtime_config),
        InlineDependency::rest_xml_unwrapped_errors(&runtime_config),
        InlineDependency::hyper_body_wrap_stream(&runtime_config),
    ];
    for fragment in fragments {
        let fragment = fragment.expect("bundled");
        assert_eq!(fragment.version().len(), 64, "{} has a sha256 version", fragment.name());
    }
}

#[rstest]
fn version_tracks_content() {
    let one = InlineDependency::new("A", RustModule::config(), Vec::new(), |w| {
        w.rust("pub struct A;");
    });
    let same = InlineDependency::new("A", RustModule::config(), Vec::new(), |w| {
        w.rust("pub struct A;");
    });
    let other = InlineDependency::new("A", RustModule::config(), Vec::new(), |w| {
        w.rust("pub struct A(u8);");
    });
    assert_eq!(one.version(), same.version());
    assert_ne!(one.version(), other.version());
}

#[rstest]
fn register_or_reuse_keeps_first_registration() {
    let mut registry = InlineRegistry::new();
    let first = registry.register_or_reuse(&RustModule::config(), "RegionParam", Vec::new(), |w| {
        w.rust("pub(crate) struct RegionParam(String);");
    });
    let second = registry.register_or_reuse(
        &RustModule::config(),
        "RegionParam",
        vec![known::bytes().into()],
        |w| {
            w.rust("pub(crate) struct RegionParam(Vec<u8>);");
        },
    );

    assert_eq!(registry.len(), 1);
    assert_eq!(first.path(), "crate::config::RegionParam");
    assert_eq!(second.path(), first.path());

    let stored = registry
        .get(&InlineKey::new(&RustModule::config(), "RegionParam"))
        .expect("registered");
    assert!(stored.extra_dependencies().is_empty());
    let mut writer = RustWriter::new();
    stored.render(&mut writer);
    assert_eq!(writer.contents(), "pub(crate) struct RegionParam(String);\n");
}

#[rstest]
fn register_reports_duplicates(runtime_config: RuntimeConfig) {
    let mut registry = InlineRegistry::new();
    let fragment = InlineDependency::json_errors(&runtime_config).expect("bundled");
    assert!(registry.register(fragment.clone()));
    assert!(!registry.register(fragment));
    assert_eq!(registry.len(), 1);
}

#[rstest]
fn fragments_group_by_module() {
    let mut registry = InlineRegistry::new();
    for name in ["B", "A"] {
        registry.register_or_reuse(&RustModule::config(), name, Vec::new(), |_| {});
    }
    registry.register_or_reuse(&RustModule::protocol(), "Helper", Vec::new(), |_| {});

    let grouped: Vec<(String, Vec<&str>)> = registry
        .by_module()
        .into_iter()
        .map(|(module, members)| {
            (
                module.fully_qualified_path(),
                members.iter().map(|member| member.name()).collect(),
            )
        })
        .collect();
    assert_eq!(
        grouped,
        vec![
            ("crate::config".to_owned(), vec!["A", "B"]),
            ("crate::protocol".to_owned(), vec!["Helper"]),
        ]
    );
}
