//! Rust language primitives used while emitting code.
//!
//! This module owns the pieces every generator shares: dependency
//! descriptors, inline fragments, module paths, runtime type references and
//! the template writer.

pub mod dependency;
pub mod inline;
mod module;
mod runtime_type;
mod writer;

pub use dependency::{CargoDependency, DependencyKey, DependencyLocation, DependencyScope, DependencySpec};
pub use inline::{InlineDependency, InlineKey, InlineRegistry};
pub use module::{RustModule, Visibility};
pub use runtime_type::RuntimeType;
pub use writer::{RustWriter, TemplateArg, Writable, WriterOutput, writable};

/// Anything generated code can depend on.
#[derive(Clone, Debug)]
pub enum RustDependency {
    /// An external crate.
    Cargo(CargoDependency),
    /// A snippet emitted into the generated crate.
    Inline(InlineDependency),
}

impl RustDependency {
    /// Name of the crate or fragment.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Cargo(dependency) => dependency.name(),
            Self::Inline(dependency) => dependency.name(),
        }
    }
}

impl From<CargoDependency> for RustDependency {
    fn from(dependency: CargoDependency) -> Self {
        Self::Cargo(dependency)
    }
}

impl From<InlineDependency> for RustDependency {
    fn from(dependency: InlineDependency) -> Self {
        Self::Inline(dependency)
    }
}
