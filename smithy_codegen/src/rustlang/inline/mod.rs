//! Inline fragments: source snippets emitted into the generated crate.
//!
//! Each fragment is identified by its module path and name. Registering the
//! same key twice keeps the first registration, so the snippet is written
//! exactly once however many generators reference it.

mod resources;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::debug;

use super::{RuntimeType, RustDependency, RustModule, RustWriter};
use crate::error::CodegenResult;

/// Closure that writes a fragment's contents.
pub type InlineRenderer = Arc<dyn Fn(&mut RustWriter) + Send + Sync>;

/// Registry key of a fragment: module path plus fragment name.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct InlineKey {
    /// Fully qualified module path, such as `crate::config`.
    pub module_path: String,
    /// Fragment name within the module.
    pub name: String,
}

impl InlineKey {
    /// Key of fragment `name` in `module`.
    #[must_use]
    pub fn new(module: &RustModule, name: &str) -> Self {
        Self {
            module_path: module.fully_qualified_path(),
            name: name.to_owned(),
        }
    }
}

impl fmt::Display for InlineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.module_path, self.name)
    }
}

/// A snippet of Rust written into a module of the generated crate.
#[derive(Clone)]
pub struct InlineDependency {
    name: String,
    module: RustModule,
    symbol_path: String,
    extra_dependencies: Vec<RustDependency>,
    renderer: InlineRenderer,
}

impl InlineDependency {
    /// A named item rendered into `module`.
    ///
    /// Referencing the fragment yields the path `module::name`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        module: RustModule,
        extra_dependencies: Vec<RustDependency>,
        render: impl Fn(&mut RustWriter) + Send + Sync + 'static,
    ) -> Self {
        let name = name.into();
        let symbol_path = format!("{}::{name}", module.fully_qualified_path());
        Self {
            name,
            module,
            symbol_path,
            extra_dependencies,
            renderer: Arc::new(render),
        }
    }

    /// A whole module whose contents come from a bundled resource file.
    ///
    /// Referencing the fragment yields the module path itself.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CodegenError::MissingResource`] when `resource` is not
    /// bundled with the generator.
    pub fn for_rust_file(
        module: RustModule,
        resource: &str,
        extra_dependencies: Vec<RustDependency>,
    ) -> CodegenResult<Self> {
        let text = resources::bundled(resource)?;
        Ok(Self {
            name: module.name().to_owned(),
            symbol_path: module.fully_qualified_path(),
            module,
            extra_dependencies,
            renderer: Arc::new(move |writer: &mut RustWriter| {
                writer.raw(text);
            }),
        })
    }

    /// Fragment name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Module the fragment is written into.
    #[must_use]
    pub const fn module(&self) -> &RustModule {
        &self.module
    }

    /// Path generated code uses to refer to the fragment.
    #[must_use]
    pub fn symbol_path(&self) -> &str {
        &self.symbol_path
    }

    /// Dependencies the fragment needs besides those it renders.
    #[must_use]
    pub fn extra_dependencies(&self) -> &[RustDependency] {
        &self.extra_dependencies
    }

    /// Registry key.
    #[must_use]
    pub fn key(&self) -> InlineKey {
        InlineKey::new(&self.module, &self.name)
    }

    /// Writes the fragment.
    pub fn render(&self, writer: &mut RustWriter) {
        (self.renderer)(writer);
    }

    /// Content hash of the rendered fragment, used as its version.
    #[must_use]
    pub fn version(&self) -> String {
        let mut writer = RustWriter::new();
        self.render(&mut writer);
        let mut hasher = Sha256::new();
        hasher.update(writer.contents().as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Type reference to the fragment.
    #[must_use]
    pub fn to_type(&self) -> RuntimeType {
        RuntimeType::from_inline(self.clone())
    }
}

impl fmt::Debug for InlineDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InlineDependency")
            .field("key", &self.key().to_string())
            .field("extra_dependencies", &self.extra_dependencies)
            .finish_non_exhaustive()
    }
}

/// Fragments registered during a generation run.
#[derive(Clone, Debug, Default)]
pub struct InlineRegistry {
    entries: BTreeMap<InlineKey, InlineDependency>,
}

impl InlineRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `dependency` unless its key is already present.
    ///
    /// Returns `true` when the fragment was newly added.
    pub fn register(&mut self, dependency: InlineDependency) -> bool {
        let key = dependency.key();
        if self.entries.contains_key(&key) {
            return false;
        }
        debug!(fragment = %key, "registered inline fragment");
        self.entries.insert(key, dependency);
        true
    }

    /// Returns the type of fragment `name` in `module`, registering it with
    /// `render` on first use.
    ///
    /// Later calls with the same key ignore their `render` and
    /// `extra_dependencies` and reuse the first registration.
    pub fn register_or_reuse(
        &mut self,
        module: &RustModule,
        name: &str,
        extra_dependencies: Vec<RustDependency>,
        render: impl Fn(&mut RustWriter) + Send + Sync + 'static,
    ) -> RuntimeType {
        let dependency = self
            .entries
            .entry(InlineKey::new(module, name))
            .or_insert_with(|| InlineDependency::new(name, module.clone(), extra_dependencies, render));
        dependency.to_type()
    }

    /// Looks up a fragment.
    #[must_use]
    pub fn get(&self, key: &InlineKey) -> Option<&InlineDependency> {
        self.entries.get(key)
    }

    /// Number of registered fragments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fragments in key order.
    pub fn iter(&self) -> impl Iterator<Item = &InlineDependency> {
        self.entries.values()
    }

    /// Fragments grouped by target module, in module path order.
    #[must_use]
    pub fn by_module(&self) -> Vec<(&RustModule, Vec<&InlineDependency>)> {
        let mut grouped: Vec<(&RustModule, Vec<&InlineDependency>)> = Vec::new();
        for dependency in self.entries.values() {
            match grouped.last_mut() {
                Some((module, members)) if module.fully_qualified_path() == dependency.module().fully_qualified_path() => {
                    members.push(dependency);
                }
                _ => grouped.push((dependency.module(), vec![dependency])),
            }
        }
        grouped
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests panic to surface registry mistakes")]
mod tests;
