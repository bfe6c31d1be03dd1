//! Core crate for generating Rust code from Smithy service models.
//!
//! Generators expose named sections; customizations contribute fragments to
//! those sections in registration order. Everything a fragment references,
//! crates and inline snippets alike, is collected by the [`RustWriter`] that
//! renders it and merged into a [`GenerationRun`] once the service rendered
//! successfully.
//!
//! ```rust,no_run
//! use smithy_codegen::{
//!     CodegenSettings, GenerateOptions, Model, ProtocolLoader, ShapeId, generate_crate,
//! };
//!
//! # fn main() -> Result<(), smithy_codegen::CodegenError> {
//! let model = Model::from_json(
//!     r##"{
//!         "smithy": "2.0",
//!         "shapes": {
//!             "example.weather#Weather": {
//!                 "type": "service",
//!                 "traits": { "aws.protocols#restJson1": {} }
//!             }
//!         }
//!     }"##,
//! )?;
//! let settings = CodegenSettings::new("weather-sdk");
//! let service: ShapeId = "example.weather#Weather".parse()?;
//! let generated = generate_crate(
//!     &model,
//!     &settings,
//!     &service,
//!     &ProtocolLoader::for_target(settings.target),
//!     GenerateOptions::default(),
//! )?;
//! assert!(generated.file("src/config.rs").is_some());
//! # Ok(())
//! # }
//! ```

pub mod config;
mod context;
pub mod customize;
mod error;
mod generate;
pub mod manifest;
pub mod model;
pub mod protocols;
pub mod rustlang;
pub mod settings;

pub use config::{ServiceConfig, ServiceConfigGenerator};
pub use context::{CodegenContext, GenerationRun, RenderedModule, RunOutput, SharedGenerationRun};
pub use customize::{Customization, Section, SharedCustomization};
pub use error::{CodegenError, CodegenResult, ErrorKind};
pub use generate::{
    GenerateOptions, GeneratedCrate, MANIFEST_FILE, ServiceArtifacts, generate_crate, render_service,
};
pub use manifest::{DependencyRecord, DependencySet};
pub use model::{Model, ModelQuery, ShapeId};
pub use protocols::{HttpBoundProtocolSection, ProtocolLoader};
pub use rustlang::{CargoDependency, InlineDependency, RuntimeType, RustWriter, Writable};
pub use settings::{CodegenSettings, StorageMode};
