//! Test helpers shared across crates.
//!
//! [`models`] builds Smithy JSON AST documents, [`text`] checks generated
//! source text, and [`files`] reads generated crates back from disk.

pub mod files;
pub mod models;
pub mod text;
