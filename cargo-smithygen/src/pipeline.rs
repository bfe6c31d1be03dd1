//! Generation pipeline: loads the inputs, generates one crate per service
//! and writes it below the output directory.

use camino::{Utf8Path, Utf8PathBuf};
use heck::ToKebabCase;
use smithy_codegen::{
    CodegenSettings, GenerateOptions, Model, ModelQuery, ProtocolLoader, ShapeId, generate_crate,
};
use tracing::{error, info, info_span};

use crate::cli::Args;
use crate::error::SmithygenError;
use crate::fs_helpers::read_input;
use crate::output::write_crate;

/// A crate written for one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedService {
    /// Service the crate was generated for.
    pub service: ShapeId,
    /// Name of the crate in its manifest.
    pub crate_name: String,
    /// Directory holding the crate.
    pub path: Utf8PathBuf,
}

/// Model and settings read from disk.
#[derive(Debug, Clone)]
pub struct Inputs {
    /// Decoded model.
    pub model: Model,
    /// Decoded settings, when a settings file was given.
    pub settings: Option<CodegenSettings>,
}

/// Reads the model and optional settings named by `args`.
///
/// # Errors
///
/// Fails when a file cannot be read or does not decode.
pub fn load_inputs(args: &Args) -> Result<Inputs, SmithygenError> {
    let model = Model::from_json(&read_input(&args.model)?)?;
    let settings = args.settings.as_deref().map(load_settings).transpose()?;
    Ok(Inputs { model, settings })
}

fn load_settings(path: &Utf8Path) -> Result<CodegenSettings, SmithygenError> {
    Ok(CodegenSettings::from_json(&read_input(path)?)?)
}

/// Services to generate: the CLI overrides, else the settings' service,
/// else every service in the model.
///
/// # Errors
///
/// Fails when a requested service is malformed or absent, or when the
/// model declares no services at all.
pub fn select_services(
    model: &Model,
    settings: Option<&CodegenSettings>,
    overrides: &[String],
    model_path: &Utf8Path,
) -> Result<Vec<ShapeId>, SmithygenError> {
    let requested: Vec<&str> = if overrides.is_empty() {
        settings
            .and_then(|declared| declared.service.as_deref())
            .into_iter()
            .collect()
    } else {
        overrides.iter().map(String::as_str).collect()
    };
    let available = model.service_ids();
    if requested.is_empty() {
        if available.is_empty() {
            return Err(SmithygenError::NoServices(model_path.to_path_buf()));
        }
        return Ok(available);
    }
    requested
        .into_iter()
        .map(|raw| {
            let id: ShapeId = raw.parse()?;
            if available.contains(&id) {
                Ok(id)
            } else {
                Err(SmithygenError::UnknownService(raw.to_owned()))
            }
        })
        .collect()
}

/// Settings for `service`'s crate.
///
/// A lone service keeps the configured crate name; several services get
/// `<name>-<service>` so their crates do not collide. Without settings the
/// crate is named after the service.
#[must_use]
pub fn settings_for(base: Option<&CodegenSettings>, service: &ShapeId, is_only_service: bool) -> CodegenSettings {
    let service_name = service.name().to_kebab_case();
    let Some(configured) = base else {
        return CodegenSettings::new(service_name);
    };
    let mut settings = configured.clone();
    if !is_only_service {
        settings.module_name = format!("{}-{service_name}", configured.module_name);
    }
    settings.service = Some(service.to_string());
    settings
}

/// Runs the whole pipeline for `args`.
///
/// Every selected service is attempted; failures are logged and reported
/// together once the remaining services have been written.
///
/// # Errors
///
/// Fails when the inputs cannot be loaded, no service can be selected, or
/// any service fails to generate.
pub fn run(args: &Args) -> Result<Vec<GeneratedService>, SmithygenError> {
    let inputs = load_inputs(args)?;
    let services = select_services(&inputs.model, inputs.settings.as_ref(), &args.services, &args.model)?;
    let options = GenerateOptions {
        runtime_plugin: args.should_emit_runtime_plugin,
    };

    let is_only_service = services.len() == 1;
    let mut written = Vec::with_capacity(services.len());
    let mut failed = Vec::new();
    for service in services {
        let settings = settings_for(inputs.settings.as_ref(), &service, is_only_service);
        let loader = ProtocolLoader::for_target(settings.target);
        match generate_service(&inputs.model, &settings, &service, &loader, options, &args.out_dir) {
            Ok(path) => {
                info!(%service, %path, "generated crate");
                written.push(GeneratedService {
                    service,
                    crate_name: settings.module_name,
                    path,
                });
            }
            Err(err) => {
                error!(%service, error = %err, "generation failed");
                failed.push(service.to_string());
            }
        }
    }

    if failed.is_empty() {
        Ok(written)
    } else {
        Err(SmithygenError::ServicesFailed { failed })
    }
}

fn generate_service(
    model: &Model,
    settings: &CodegenSettings,
    service: &ShapeId,
    loader: &ProtocolLoader,
    options: GenerateOptions,
    out_dir: &Utf8Path,
) -> Result<Utf8PathBuf, SmithygenError> {
    let _span = info_span!("service", %service).entered();
    let generated = generate_crate(model, settings, service, loader, options)?;
    write_crate(out_dir, &settings.module_name, &generated)
}
