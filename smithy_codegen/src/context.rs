//! Per-service codegen context and the run-wide fragment and dependency
//! collectors.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::error::CodegenResult;
use crate::manifest::DependencySet;
use crate::model::{ModelQuery, ShapeId};
use crate::rustlang::{InlineKey, InlineRegistry, RustDependency, RustModule, RustWriter, WriterOutput};
use crate::settings::{CodegenSettings, RuntimeConfig, StorageMode};

/// Everything a generator needs to know about the service being generated.
#[derive(Clone, Copy)]
pub struct CodegenContext<'a> {
    model: &'a dyn ModelQuery,
    service: &'a ShapeId,
    settings: &'a CodegenSettings,
}

impl<'a> CodegenContext<'a> {
    /// Creates a context for `service`.
    #[must_use]
    pub const fn new(model: &'a dyn ModelQuery, service: &'a ShapeId, settings: &'a CodegenSettings) -> Self {
        Self {
            model,
            service,
            settings,
        }
    }

    /// The semantic model.
    #[must_use]
    pub const fn model(&self) -> &'a dyn ModelQuery {
        self.model
    }

    /// The service being generated.
    #[must_use]
    pub const fn service(&self) -> &'a ShapeId {
        self.service
    }

    /// Generator settings.
    #[must_use]
    pub const fn settings(&self) -> &'a CodegenSettings {
        self.settings
    }

    /// Runtime crate resolution.
    #[must_use]
    pub const fn runtime_config(&self) -> &'a RuntimeConfig {
        &self.settings.runtime_config
    }

    /// Config storage mode.
    #[must_use]
    pub const fn storage_mode(&self) -> StorageMode {
        self.settings.codegen.storage_mode
    }

    /// Name of the generated crate in `use` paths.
    #[must_use]
    pub fn module_use_name(&self) -> String {
        self.settings.module_use_name()
    }
}

impl std::fmt::Debug for CodegenContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodegenContext")
            .field("service", self.service)
            .field("module_name", &self.settings.module_name)
            .finish_non_exhaustive()
    }
}

/// A generated source file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RenderedModule {
    /// Module the file belongs to.
    pub module: RustModule,
    /// File contents.
    pub contents: String,
}

/// Output of a finished run.
#[derive(Clone, Debug, Default)]
pub struct RunOutput {
    /// Inline fragment modules, in module path order.
    pub modules: Vec<RenderedModule>,
    /// Merged crate dependencies.
    pub dependencies: DependencySet,
}

/// Collects fragments and dependencies across the services of one run.
///
/// Each service's outputs are committed as a unit: if any part fails to
/// merge, the run keeps its previous state.
#[derive(Clone, Debug, Default)]
pub struct GenerationRun {
    fragments: InlineRegistry,
    dependencies: DependencySet,
    services: Vec<ShapeId>,
}

impl GenerationRun {
    /// Creates an empty run.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered fragments.
    #[must_use]
    pub const fn fragments(&self) -> &InlineRegistry {
        &self.fragments
    }

    /// Merged dependencies.
    #[must_use]
    pub const fn dependencies(&self) -> &DependencySet {
        &self.dependencies
    }

    /// Services committed so far, in commit order.
    #[must_use]
    pub fn services(&self) -> &[ShapeId] {
        &self.services
    }

    /// Mutable access to the fragment registry, for generators that
    /// register fragments directly.
    pub const fn fragments_mut(&mut self) -> &mut InlineRegistry {
        &mut self.fragments
    }

    /// Records the dependencies of a service's rendered files.
    ///
    /// # Errors
    ///
    /// Propagates dependency merge failures; the run is left unchanged.
    pub fn commit(&mut self, service: &ShapeId, outputs: &[&WriterOutput]) -> CodegenResult<()> {
        let mut staged = self.clone();
        for output in outputs {
            staged.absorb(&output.dependencies)?;
        }
        staged.services.push(service.clone());
        *self = staged;
        info!(%service, fragments = self.fragments.len(), dependencies = self.dependencies.len(), "service committed");
        Ok(())
    }

    fn absorb(&mut self, dependencies: &[RustDependency]) -> CodegenResult<()> {
        for dependency in dependencies {
            match dependency {
                RustDependency::Cargo(cargo) => self.dependencies.add(cargo.clone())?,
                RustDependency::Inline(inline) => {
                    self.fragments.register(inline.clone());
                }
            }
        }
        Ok(())
    }

    /// Renders every registered fragment, including fragments that other
    /// fragments reference, and returns the module files and dependencies.
    ///
    /// # Errors
    ///
    /// Returns the first template or merge error raised while rendering.
    pub fn finish(mut self) -> CodegenResult<RunOutput> {
        let mut rendered: BTreeMap<InlineKey, String> = BTreeMap::new();
        loop {
            let pending: Vec<_> = self
                .fragments
                .iter()
                .filter(|fragment| !rendered.contains_key(&fragment.key()))
                .cloned()
                .collect();
            if pending.is_empty() {
                break;
            }
            for fragment in pending {
                let mut writer = RustWriter::new();
                fragment.render(&mut writer);
                let output = writer.finish()?;
                self.absorb(&output.dependencies)?;
                self.absorb(fragment.extra_dependencies())?;
                debug!(fragment = %fragment.key(), "rendered inline fragment");
                rendered.insert(fragment.key(), output.contents);
            }
        }

        let modules = self
            .fragments
            .by_module()
            .into_iter()
            .map(|(module, members)| RenderedModule {
                module: module.clone(),
                contents: members
                    .iter()
                    .filter_map(|member| rendered.get(&member.key()))
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join("\n"),
            })
            .collect();
        Ok(RunOutput {
            modules,
            dependencies: self.dependencies,
        })
    }
}

/// A [`GenerationRun`] shared between threads generating services
/// concurrently.
#[derive(Clone, Debug, Default)]
pub struct SharedGenerationRun {
    inner: Arc<Mutex<GenerationRun>>,
}

impl SharedGenerationRun {
    /// Creates an empty shared run.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commits a service's outputs under the lock.
    ///
    /// # Errors
    ///
    /// Propagates [`GenerationRun::commit`] failures.
    pub fn commit(&self, service: &ShapeId, outputs: &[&WriterOutput]) -> CodegenResult<()> {
        self.inner.lock().commit(service, outputs)
    }

    /// Copy of the current run state.
    #[must_use]
    pub fn snapshot(&self) -> GenerationRun {
        self.inner.lock().clone()
    }

    /// Takes the accumulated run, leaving an empty one behind.
    #[must_use]
    pub fn take(&self) -> GenerationRun {
        std::mem::take(&mut *self.inner.lock())
    }
}
