//! Filesystem helpers shared across `cargo-smithygen` modules.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use crate::error::SmithygenError;

/// Reads a UTF-8 input file through its parent directory.
pub fn read_input(path: &Utf8Path) -> Result<String, SmithygenError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| SmithygenError::NotAFile(path.to_path_buf()))?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|err| SmithygenError::io(parent, err))?;
    dir.read_to_string(file_name)
        .map_err(|err| SmithygenError::io(path, err))
}

/// Opens `path`, creating it and its parents when missing.
pub fn ensure_dir(path: &Utf8Path) -> Result<Dir, SmithygenError> {
    match Dir::open_ambient_dir(path, ambient_authority()) {
        Ok(dir) => Ok(dir),
        Err(open_err) if open_err.kind() == std::io::ErrorKind::NotFound => {
            Dir::create_ambient_dir_all(path, ambient_authority())
                .map_err(|io_err| SmithygenError::io(path, io_err))?;
            Dir::open_ambient_dir(path, ambient_authority()).map_err(|io_err| SmithygenError::io(path, io_err))
        }
        Err(open_err) => Err(SmithygenError::io(path, open_err)),
    }
}
