//! Dependency collection and Cargo manifest emission.
//!
//! Dependencies referenced during a run are merged per [`DependencyKey`] and
//! emitted as Cargo.toml tables grouped by scope.

use std::collections::BTreeMap;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use tracing::{debug, trace};

use crate::error::CodegenResult;
use crate::rustlang::{CargoDependency, DependencyKey, DependencyLocation, DependencyScope};

const UNSTABLE_CFG: &str = "cfg(aws_sdk_unstable)";

/// One dependency as it appears in the manifest.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DependencyRecord {
    /// Crate name, used as the table key.
    pub name: String,
    /// Manifest scope.
    pub scope: DependencyScope,
    /// Version requirement, when known.
    pub version: Option<String>,
    /// Normalized path of a local crate.
    pub path: Option<String>,
    /// Enabled features, sorted.
    pub features: Vec<String>,
    /// Whether the dependency is optional.
    pub optional: bool,
    /// Whether default features stay enabled.
    pub default_features: bool,
}

impl DependencyRecord {
    /// Describes `dependency` with local paths resolved against `base`.
    #[must_use]
    pub fn new(dependency: &CargoDependency, base: &Utf8Path) -> Self {
        let (version, path) = match dependency.location() {
            DependencyLocation::CratesIo { version } => (Some(version.clone()), None),
            DependencyLocation::Local { base_path, version } => {
                let full = base.join(base_path).join(dependency.name());
                (version.clone(), Some(portable(&normalize_path(&full))))
            }
        };
        Self {
            name: dependency.name().to_owned(),
            scope: dependency.scope(),
            version,
            path,
            features: dependency.features().iter().cloned().collect(),
            optional: dependency.is_optional(),
            default_features: dependency.default_features(),
        }
    }

    fn to_table(&self) -> toml::Table {
        let mut entry = toml::Table::new();
        if let Some(version) = &self.version {
            entry.insert("version".to_owned(), toml::Value::String(version.clone()));
        }
        if let Some(path) = &self.path {
            entry.insert("path".to_owned(), toml::Value::String(path.clone()));
        }
        if !self.features.is_empty() {
            let features = self.features.iter().cloned().map(toml::Value::String).collect();
            entry.insert("features".to_owned(), toml::Value::Array(features));
        }
        if self.optional {
            entry.insert("optional".to_owned(), toml::Value::Boolean(true));
        }
        if !self.default_features {
            entry.insert("default-features".to_owned(), toml::Value::Boolean(false));
        }
        entry
    }
}

/// Merged set of crate dependencies.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DependencySet {
    entries: BTreeMap<DependencyKey, CargoDependency>,
}

impl DependencySet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `dependency`, merging it with an entry of the same key.
    ///
    /// # Errors
    ///
    /// Propagates [`CargoDependency::merge`] failures.
    pub fn add(&mut self, dependency: CargoDependency) -> CodegenResult<()> {
        let key = dependency.key();
        let merged = match self.entries.get(&key) {
            Some(existing) => {
                trace!(dependency = %dependency.name(), scope = %dependency.scope(), "merging dependency");
                existing.merge(&dependency)?
            }
            None => {
                debug!(dependency = %dependency.name(), scope = %dependency.scope(), "new dependency");
                dependency
            }
        };
        self.entries.insert(key, merged);
        Ok(())
    }

    /// Adds every dependency of `other`.
    ///
    /// # Errors
    ///
    /// Propagates [`CargoDependency::merge`] failures.
    pub fn extend(&mut self, other: &Self) -> CodegenResult<()> {
        for dependency in other.entries.values() {
            self.add(dependency.clone())?;
        }
        Ok(())
    }

    /// Looks up the merged entry for `key`.
    #[must_use]
    pub fn get(&self, key: &DependencyKey) -> Option<&CargoDependency> {
        self.entries.get(key)
    }

    /// Finds the entry named `name` in `scope`.
    #[must_use]
    pub fn find(&self, name: &str, scope: DependencyScope) -> Option<&CargoDependency> {
        self.entries
            .values()
            .find(|dependency| dependency.name() == name && dependency.scope() == scope)
    }

    /// Number of distinct dependencies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dependencies in key order.
    pub fn iter(&self) -> impl Iterator<Item = &CargoDependency> {
        self.entries.values()
    }

    /// Manifest records with local paths resolved against `base`.
    #[must_use]
    pub fn records(&self, base: &Utf8Path) -> Vec<DependencyRecord> {
        self.entries
            .values()
            .map(|dependency| DependencyRecord::new(dependency, base))
            .collect()
    }

    /// Builds the manifest dependency tables.
    ///
    /// Unstable dependencies go to
    /// `target.'cfg(aws_sdk_unstable)'.dependencies`.
    #[must_use]
    pub fn manifest_tables(&self, base: &Utf8Path) -> toml::Table {
        let mut tables: BTreeMap<DependencyScope, toml::Table> = BTreeMap::new();
        for record in self.records(base) {
            tables
                .entry(record.scope)
                .or_default()
                .insert(record.name.clone(), toml::Value::Table(record.to_table()));
        }

        let mut manifest = toml::Table::new();
        for (scope, table) in tables {
            match scope {
                DependencyScope::Compile => {
                    manifest.insert("dependencies".to_owned(), toml::Value::Table(table));
                }
                DependencyScope::Dev => {
                    manifest.insert("dev-dependencies".to_owned(), toml::Value::Table(table));
                }
                DependencyScope::Build => {
                    manifest.insert("build-dependencies".to_owned(), toml::Value::Table(table));
                }
                DependencyScope::CfgUnstable => {
                    let mut cfg = toml::Table::new();
                    cfg.insert("dependencies".to_owned(), toml::Value::Table(table));
                    let mut target = toml::Table::new();
                    target.insert(UNSTABLE_CFG.to_owned(), toml::Value::Table(cfg));
                    manifest.insert("target".to_owned(), toml::Value::Table(target));
                }
            }
        }
        manifest
    }

    /// Renders the dependency tables as TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CodegenError::Manifest`] if serialization fails.
    pub fn render_manifest(&self, base: &Utf8Path) -> CodegenResult<String> {
        Ok(toml::to_string(&self.manifest_tables(base))?)
    }
}

/// Resolves `.` and `..` components without touching the filesystem.
#[must_use]
pub fn normalize_path(path: &Utf8Path) -> Utf8PathBuf {
    let mut parts: Vec<Utf8Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => match parts.last() {
                Some(Utf8Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Utf8Component::RootDir | Utf8Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        return Utf8PathBuf::from(".");
    }
    parts.iter().map(Utf8Component::as_str).collect()
}

fn portable(path: &Utf8Path) -> String {
    path.as_str().replace('\\', "/")
}
