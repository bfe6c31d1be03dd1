//! Command-line interface definitions for `cargo-smithygen`.

use camino::Utf8PathBuf;
use clap::Parser;

/// Parsed CLI arguments for `cargo-smithygen`.
#[derive(Debug, Clone, Parser)]
#[command(name = "cargo-smithygen")]
#[command(about = "Generate Rust crates from Smithy JSON AST models")]
#[command(version)]
pub struct Args {
    /// Smithy JSON AST model to generate from.
    #[arg(long, value_name = "path")]
    pub model: Utf8PathBuf,
    /// Generator settings in JSON.
    #[arg(long, value_name = "path")]
    pub settings: Option<Utf8PathBuf>,
    /// Directory receiving one crate per generated service.
    #[arg(long, value_name = "path", default_value = "generated")]
    pub out_dir: Utf8PathBuf,
    /// Service to generate (repeat for several); overrides the settings.
    #[arg(long = "service", value_name = "namespace#Name")]
    pub services: Vec<String>,
    /// Emit `impl RuntimePlugin for Builder` in each config module.
    #[arg(long = "runtime-plugin")]
    pub should_emit_runtime_plugin: bool,
}
