//! Reading generated crates back from disk.

use std::collections::BTreeMap;
use std::fs;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};

/// Reads every file below `root`, keyed by its `/`-separated path relative
/// to `root`.
///
/// # Errors
///
/// Fails when a directory cannot be listed, a path is not UTF-8, or a file
/// is not UTF-8 text.
pub fn read_tree(root: &Utf8Path) -> Result<BTreeMap<String, String>> {
    let mut files = BTreeMap::new();
    let mut pending: Vec<Utf8PathBuf> = vec![root.to_owned()];
    while let Some(dir) = pending.pop() {
        for listed in fs::read_dir(&dir).with_context(|| format!("listing {dir}"))? {
            let entry = listed.with_context(|| format!("reading entry of {dir}"))?;
            let path = Utf8PathBuf::try_from(entry.path()).context("non UTF-8 path")?;
            if entry.file_type()?.is_dir() {
                pending.push(path);
                continue;
            }
            let relative = path.strip_prefix(root).unwrap_or(&path);
            let key = relative.components().map(|component| component.as_str()).collect::<Vec<_>>().join("/");
            let contents = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            files.insert(key, contents);
        }
    }
    Ok(files)
}
