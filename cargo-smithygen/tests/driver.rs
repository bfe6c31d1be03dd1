//! Drives the whole pipeline against models written to a temporary directory.
#![allow(
    unfulfilled_lint_expectations,
    reason = "clippy::expect_used is denied globally; tests may not hit those branches"
)]
#![expect(
    clippy::expect_used,
    reason = "tests panic to surface pipeline wiring mistakes"
)]

use std::fs;

use anyhow::{Result, bail, ensure};
use camino::{Utf8Path, Utf8PathBuf};
use cargo_smithygen::{Args, SmithygenError, run};
use rstest::{fixture, rstest};
use tempfile::TempDir;
use test_helpers::files::read_tree;
use test_helpers::models::{ModelBuilder, weather};

struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.root.join(name);
        fs::write(&path, contents).expect("write input");
        path
    }

    fn args(&self, model: Utf8PathBuf) -> Args {
        Args {
            model,
            settings: None,
            out_dir: self.root.join("out"),
            services: Vec::new(),
            should_emit_runtime_plugin: false,
        }
    }
}

#[fixture]
fn workspace() -> Workspace {
    let dir = TempDir::new().expect("create temp dir");
    let root = Utf8Path::from_path(dir.path()).expect("utf-8 temp dir").to_path_buf();
    Workspace { _dir: dir, root }
}

#[rstest]
fn single_service_uses_the_configured_crate_name(workspace: Workspace) -> Result<()> {
    let model = workspace.write("model.json", &weather());
    let settings = workspace.write(
        "settings.json",
        r#"{ "moduleName": "weather-sdk", "codegen": { "storageMode": "directFields" } }"#,
    );
    let args = Args {
        settings: Some(settings),
        should_emit_runtime_plugin: true,
        ..workspace.args(model)
    };

    let written = run(&args)?;

    ensure!(written.len() == 1);
    let crate_dir = workspace.root.join("out").join("weather-sdk");
    ensure!(written.first().map(|service| &service.path) == Some(&crate_dir));
    let files = read_tree(&crate_dir)?;
    let paths: Vec<&str> = files.keys().map(String::as_str).collect();
    ensure!(paths.contains(&"Cargo.toml"), "{paths:?}");
    ensure!(paths.contains(&"src/lib.rs"), "{paths:?}");
    ensure!(paths.contains(&"src/idempotency_token.rs"), "{paths:?}");
    let config = files.get("src/config.rs").map_or("", String::as_str);
    ensure!(config.contains("RuntimePlugin for Builder {"), "{config}");
    ensure!(!config.contains("inner:"), "{config}");
    Ok(())
}

#[rstest]
fn failing_service_does_not_stop_the_others(workspace: Workspace) -> Result<()> {
    let json = ModelBuilder::new()
        .protocol_definition("example.custom#fastProto")
        .service("example#Good", &["aws.protocols#awsJson1_1"])
        .service("example#Odd", &["example.custom#fastProto"])
        .to_json();
    let model = workspace.write("model.json", &json);

    let result = run(&workspace.args(model));

    let failed = match result {
        Err(SmithygenError::ServicesFailed { failed }) => failed,
        other => bail!("expected a partial failure, got {other:?}"),
    };
    ensure!(failed == ["example#Odd"]);
    let good = read_tree(&workspace.root.join("out").join("good"))?;
    ensure!(good.contains_key("src/protocol.rs"));
    ensure!(!workspace.root.join("out").join("odd").exists());
    Ok(())
}

#[rstest]
fn service_override_limits_generation(workspace: Workspace) -> Result<()> {
    let json = ModelBuilder::new()
        .service("example#Alpha", &["aws.protocols#restJson1"])
        .service("example#Beta", &["aws.protocols#restXml"])
        .to_json();
    let model = workspace.write("model.json", &json);
    let args = Args {
        services: vec!["example#Beta".to_owned()],
        ..workspace.args(model)
    };

    let written = run(&args)?;

    let names: Vec<&str> = written.iter().map(|service| service.crate_name.as_str()).collect();
    ensure!(names == ["beta"], "{names:?}");
    ensure!(!workspace.root.join("out").join("alpha").exists());
    let protocol = fs::read_to_string(workspace.root.join("out").join("beta").join("src/protocol.rs"))?;
    ensure!(protocol.contains("application/xml"), "{protocol}");
    Ok(())
}

#[rstest]
fn missing_model_reports_its_path(workspace: Workspace) {
    let args = workspace.args(workspace.root.join("absent.json"));

    let result = run(&args);

    assert!(matches!(result, Err(SmithygenError::Io { ref path, .. }) if path.ends_with("absent.json")));
}

#[rstest]
fn malformed_model_is_not_blamed_on_settings(workspace: Workspace) {
    let model = workspace.write("model.json", "{ not json");

    let message = run(&workspace.args(model)).err().map(|err| err.to_string()).unwrap_or_default();

    assert!(message.starts_with("failed to decode model: "), "{message}");
}

#[rstest]
#[case::client("client", false)]
#[case::server("server", true)]
fn settings_target_decides_stream_payload_wrapping(
    workspace: Workspace,
    #[case] target: &str,
    #[case] wraps: bool,
) -> Result<()> {
    let model = workspace.write("model.json", &weather());
    let settings = workspace.write(
        "settings.json",
        &format!(r#"{{ "moduleName": "weather-sdk", "target": "{target}" }}"#),
    );
    let args = Args {
        settings: Some(settings),
        ..workspace.args(model)
    };

    run(&args)?;

    let files = read_tree(&workspace.root.join("out").join("weather-sdk"))?;
    ensure!(files.contains_key("src/hyper_body_wrap_stream.rs") == wraps, "{:?}", files.keys());
    Ok(())
}
