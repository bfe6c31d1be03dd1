//! End-to-end generation of one service crate.
//!
//! [`render_service`] runs the generators for a service; [`generate_crate`]
//! commits the result into a fresh [`GenerationRun`] and lays the run's
//! output out as the files of a crate.

use std::collections::{BTreeMap, BTreeSet};

use camino::Utf8Path;
use tracing::{debug, info_span};

use crate::config::{ServiceConfigGenerator, settings_customizations};
use crate::context::{CodegenContext, GenerationRun, RunOutput};
use crate::error::CodegenResult;
use crate::manifest::DependencySet;
use crate::model::{ModelQuery, ShapeId};
use crate::protocols::ProtocolLoader;
use crate::rustlang::{RustModule, RustWriter, WriterOutput};
use crate::settings::CodegenSettings;

/// Crate-level file holding the module declarations.
const LIB_FILE: &str = "src/lib.rs";

/// Manifest file name.
pub const MANIFEST_FILE: &str = "Cargo.toml";

/// Switches for a generation pass.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct GenerateOptions {
    /// Emit `impl RuntimePlugin for Builder` in the config module.
    pub runtime_plugin: bool,
}

/// Rendered modules of one service, before they are committed to a run.
#[derive(Clone, Debug)]
pub struct ServiceArtifacts {
    /// Service that was rendered.
    pub service: ShapeId,
    /// Protocol selected for the service.
    pub protocol: ShapeId,
    /// The `config` module.
    pub config: WriterOutput,
    /// The `protocol` module.
    pub protocol_module: WriterOutput,
}

impl ServiceArtifacts {
    /// Outputs to commit, in module order.
    #[must_use]
    pub fn outputs(&self) -> [&WriterOutput; 2] {
        [&self.config, &self.protocol_module]
    }
}

/// Renders the config and protocol modules for the service in `ctx`.
///
/// # Errors
///
/// Fails when no declared protocol is supported, a bundled fragment is
/// missing, a config parameter cannot be stored or a template is broken.
pub fn render_service(
    ctx: &CodegenContext<'_>,
    loader: &ProtocolLoader,
    options: GenerateOptions,
) -> CodegenResult<ServiceArtifacts> {
    let (protocol, factory) = loader.protocol_for(ctx.model(), ctx.service())?;

    let mut protocol_writer = RustWriter::new();
    factory.build(ctx)?.render(&mut protocol_writer);
    let protocol_module = protocol_writer.finish()?;

    let generator = ServiceConfigGenerator::with_base_behavior(ctx, settings_customizations(ctx)?)?;
    let mut config_writer = RustWriter::new();
    generator.render(&mut config_writer);
    if options.runtime_plugin {
        config_writer.blank_line();
        generator.render_runtime_plugin_impl_for_builder(&mut config_writer);
    }
    let config = config_writer.finish()?;

    Ok(ServiceArtifacts {
        service: ctx.service().clone(),
        protocol,
        config,
        protocol_module,
    })
}

/// Files of a generated crate, keyed by path relative to the crate root.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GeneratedCrate {
    /// File contents keyed by relative path, including [`MANIFEST_FILE`].
    pub files: BTreeMap<String, String>,
}

impl GeneratedCrate {
    /// Contents of the file at `path`.
    #[must_use]
    pub fn file(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }
}

/// Generates the crate for `service`.
///
/// # Errors
///
/// Propagates [`render_service`] failures and dependency merge or manifest
/// serialization errors.
pub fn generate_crate(
    model: &dyn ModelQuery,
    settings: &CodegenSettings,
    service: &ShapeId,
    loader: &ProtocolLoader,
    options: GenerateOptions,
) -> CodegenResult<GeneratedCrate> {
    let _span = info_span!("generate_crate", %service, crate_name = %settings.module_name).entered();
    let ctx = CodegenContext::new(model, service, settings);
    let artifacts = render_service(&ctx, loader, options)?;
    let mut run = GenerationRun::new();
    run.commit(service, &artifacts.outputs())?;
    let output = run.finish()?;
    assemble(settings, &artifacts, output)
}

fn assemble(settings: &CodegenSettings, artifacts: &ServiceArtifacts, output: RunOutput) -> CodegenResult<GeneratedCrate> {
    let mut files: BTreeMap<String, String> = BTreeMap::new();
    let config = RustModule::config();
    let protocol = RustModule::protocol();
    let mut declarations: BTreeSet<String> = [config.declaration(), protocol.declaration()].into();
    files.insert(config.file_path(), artifacts.config.contents.clone());
    files.insert(protocol.file_path(), artifacts.protocol_module.contents.clone());

    for rendered in output.modules {
        declarations.insert(rendered.module.declaration());
        debug!(module = %rendered.module, "writing inline module");
        files
            .entry(rendered.module.file_path())
            .and_modify(|contents| {
                contents.push('\n');
                contents.push_str(&rendered.contents);
            })
            .or_insert(rendered.contents);
    }

    let block: String = declarations.iter().map(|line| format!("{line}\n")).collect();
    files.insert(LIB_FILE.to_owned(), format!("{}{block}", crate_docs(artifacts)));

    files.insert(MANIFEST_FILE.to_owned(), manifest(settings, &output.dependencies)?);
    Ok(GeneratedCrate { files })
}

fn crate_docs(artifacts: &ServiceArtifacts) -> String {
    format!(
        "//! Generated code for `{}`.\n//!\n//! Speaks the `{}` protocol.\n\n",
        artifacts.service, artifacts.protocol
    )
}

fn manifest(settings: &CodegenSettings, dependencies: &DependencySet) -> CodegenResult<String> {
    let mut package = toml::Table::new();
    package.insert("name".to_owned(), toml::Value::String(settings.module_name.clone()));
    package.insert("version".to_owned(), toml::Value::String(settings.module_version.clone()));
    package.insert("edition".to_owned(), toml::Value::String("2021".to_owned()));

    let mut features = toml::Table::new();
    features.insert("test-util".to_owned(), toml::Value::Array(Vec::new()));

    let mut package_table = toml::Table::new();
    package_table.insert("package".to_owned(), toml::Value::Table(package));
    let mut features_table = toml::Table::new();
    features_table.insert("features".to_owned(), toml::Value::Table(features));

    Ok(format!(
        "{}\n{}\n{}",
        toml::to_string(&package_table)?,
        toml::to_string(&features_table)?,
        dependencies.render_manifest(Utf8Path::new("."))?
    ))
}
