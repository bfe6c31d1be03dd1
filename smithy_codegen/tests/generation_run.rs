//! Tests for run-wide fragment deduplication and dependency merging.
#![allow(
    unfulfilled_lint_expectations,
    reason = "clippy::expect_used is denied globally; tests may not hit those branches"
)]
#![expect(
    clippy::expect_used,
    reason = "tests panic to surface run bookkeeping mistakes"
)]

use std::thread;

use anyhow::{Result, ensure};
use camino::Utf8Path;
use rstest::{fixture, rstest};
use smithy_codegen::rustlang::dependency::known;
use smithy_codegen::rustlang::{DependencyScope, RustModule, WriterOutput};
use smithy_codegen::settings::RuntimeConfig;
use smithy_codegen::{GenerationRun, InlineDependency, RuntimeType, RustWriter, ShapeId, SharedGenerationRun};
use test_helpers::text::occurrences;

fn id(raw: &str) -> ShapeId {
    raw.parse().expect("valid id")
}

#[fixture]
fn runtime() -> RuntimeConfig {
    RuntimeConfig::default()
}

/// Output referencing the idempotency fragment and `hyper` with
/// `hyper_feature` enabled.
fn service_output(runtime: &RuntimeConfig, hyper_feature: &str) -> WriterOutput {
    let token = InlineDependency::idempotency_token(runtime)
        .expect("bundled fragment")
        .to_type();
    let hyper = RuntimeType::from_crate(known::hyper().with_feature(hyper_feature).expect("feature allowed"));
    let mut writer = RustWriter::new();
    writer.rust_template(
        "type Provider = #{Provider};\ntype Body = #{Body};",
        &[
            ("Provider", token.resolve("IdempotencyTokenProvider").into()),
            ("Body", hyper.resolve("Body").into()),
        ],
    );
    writer.finish().expect("renders")
}

fn lookup<'a>(table: &'a toml::Table, path: &[&str]) -> Option<&'a toml::Value> {
    let (first, rest) = path.split_first()?;
    rest.iter()
        .try_fold(table.get(*first)?, |value, key| value.get(*key))
}

#[rstest]
fn fragments_are_emitted_once_per_run(runtime: RuntimeConfig) -> Result<()> {
    let mut run = GenerationRun::new();
    run.commit(&id("example#Alpha"), &[&service_output(&runtime, "client")])?;
    run.commit(&id("example#Beta"), &[&service_output(&runtime, "server")])?;

    ensure!(run.services() == [id("example#Alpha"), id("example#Beta")]);
    ensure!(run.fragments().len() == 1);

    let output = run.finish()?;
    let modules: Vec<String> = output.modules.iter().map(|m| m.module.to_string()).collect();
    ensure!(modules == ["crate::idempotency_token"], "{modules:?}");
    let contents = &output.modules.first().expect("one module").contents;
    ensure!(occurrences(contents, "pub struct IdempotencyTokenProvider") == 1);

    let hyper = output
        .dependencies
        .find("hyper", DependencyScope::Compile)
        .expect("hyper recorded");
    let features: Vec<&str> = hyper.features().iter().map(String::as_str).collect();
    ensure!(features == ["client", "server"], "{features:?}");
    ensure!(output.dependencies.find("fastrand", DependencyScope::Compile).is_some());
    Ok(())
}

#[rstest]
fn manifest_groups_dependencies_by_scope(runtime: RuntimeConfig) -> Result<()> {
    let mut run = GenerationRun::new();
    let mut writer = RustWriter::new();
    writer.add_dependency(known::serde());
    writer.add_dependency(known::tokio_dev());
    let extras = writer.finish()?;
    run.commit(&id("example#Alpha"), &[&service_output(&runtime, "client"), &extras])?;

    let manifest = run.finish()?.dependencies.render_manifest(Utf8Path::new("."))?;
    let parsed: toml::Table = toml::from_str(&manifest)?;

    let hyper_version = lookup(&parsed, &["dependencies", "hyper", "version"]).and_then(toml::Value::as_str);
    ensure!(hyper_version == Some("0.14.26"), "{manifest}");
    ensure!(lookup(&parsed, &["dev-dependencies", "tokio"]).is_some(), "{manifest}");
    ensure!(
        lookup(&parsed, &["target", "cfg(aws_sdk_unstable)", "dependencies", "serde"]).is_some(),
        "{manifest}"
    );
    Ok(())
}

#[rstest]
fn fragments_referencing_fragments_reach_a_fixpoint() -> Result<()> {
    let mut run = GenerationRun::new();
    let inner = InlineDependency::new("Inner", RustModule::pub_crate("support"), Vec::new(), |w| {
        w.rust("pub(crate) struct Inner;");
    });
    let inner_type = inner.to_type();
    let outer = InlineDependency::new("Outer", RustModule::config(), Vec::new(), move |w| {
        w.rust_template(
            "pub(crate) struct Outer(#{Inner});",
            &[("Inner", (&inner_type).into())],
        );
    });
    let mut writer = RustWriter::new();
    writer.rust_template("type Alias = #{Outer};", &[("Outer", outer.to_type().into())]);
    run.commit(&id("example#Alpha"), &[&writer.finish()?])?;
    ensure!(run.fragments().len() == 1);

    let output = run.finish()?;

    let modules: Vec<String> = output.modules.iter().map(|m| m.module.to_string()).collect();
    ensure!(modules == ["crate::config", "crate::support"], "{modules:?}");
    Ok(())
}

#[rstest]
fn shared_run_collects_parallel_commits(runtime: RuntimeConfig) -> Result<()> {
    let shared = SharedGenerationRun::new();
    let handles: Vec<_> = ["example#Alpha", "example#Beta", "example#Gamma"]
        .into_iter()
        .map(|service| {
            let run = shared.clone();
            let config = runtime.clone();
            thread::spawn(move || run.commit(&id(service), &[&service_output(&config, "client")]))
        })
        .collect();
    for handle in handles {
        handle.join().expect("thread completes")?;
    }

    let snapshot = shared.snapshot();
    ensure!(snapshot.services().len() == 3);
    ensure!(snapshot.fragments().len() == 1);

    let taken = shared.take();
    ensure!(taken.services().len() == 3);
    ensure!(shared.snapshot().services().is_empty());
    Ok(())
}
