//! Writes generated crates to disk.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::fs_utf8::{Dir, OpenOptions};
use smithy_codegen::GeneratedCrate;
use tracing::debug;

use crate::error::SmithygenError;
use crate::fs_helpers::ensure_dir;

/// Writes every file of `generated` below `out_dir/crate_dir`, replacing
/// files that already exist, and returns the crate directory.
pub fn write_crate(
    out_dir: &Utf8Path,
    crate_dir: &str,
    generated: &GeneratedCrate,
) -> Result<Utf8PathBuf, SmithygenError> {
    let root = out_dir.join(crate_dir);
    let dir = ensure_dir(&root)?;
    for (relative, contents) in &generated.files {
        write_file(&dir, &root, Utf8Path::new(relative), contents)?;
    }
    debug!(path = %root, files = generated.files.len(), "wrote crate");
    Ok(root)
}

fn write_file(dir: &Dir, root: &Utf8Path, relative: &Utf8Path, contents: &str) -> Result<(), SmithygenError> {
    let target = root.join(relative);
    if let Some(parent) = relative.parent().filter(|parent| !parent.as_str().is_empty()) {
        dir.create_dir_all(parent)
            .map_err(|io_err| SmithygenError::io(root.join(parent), io_err))?;
    }
    let mut file = dir
        .open_with(relative, OpenOptions::new().write(true).create(true).truncate(true))
        .map_err(|io_err| SmithygenError::io(&target, io_err))?;
    file.write_all(contents.as_bytes())
        .map_err(|io_err| SmithygenError::io(&target, io_err))
}
