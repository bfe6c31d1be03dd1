//! Library interface for the `cargo-smithygen` driver.
//!
//! The driver reads a Smithy JSON AST model and optional generator settings,
//! then writes one crate per service using [`smithy_codegen`].

pub mod cli;
pub mod error;
mod fs_helpers;
pub mod logging;
pub mod output;
pub mod pipeline;

pub use cli::Args;
pub use error::SmithygenError;
pub use pipeline::{GeneratedService, run};
