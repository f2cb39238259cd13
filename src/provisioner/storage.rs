// Key file persistence: existence checks, atomic or in-place writes, removal.

use serde::Deserialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{error_codes, KeyError, KeyResult};

/// Default permission bits for new key files
pub const DEFAULT_KEY_FILE_MODE: u32 = 0o600;

// Matches the Linux kernel's limit on symlink traversal
const MAX_SYMLINK_HOPS: usize = 40;

/// How `create` replaces the key file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteStrategy {
    /// Write a temporary file in the target directory, then rename it over the target
    #[default]
    Atomic,
    /// Truncate and write the target in place
    Direct,
}

pub(crate) fn path_exists(path: &Path) -> KeyResult<bool> {
    path.try_exists().map_err(|e| {
        KeyError::io_error("exists", path, &e, error_codes::EXISTENCE_CHECK_FAILED)
    })
}

pub(crate) fn write_key_file(
    path: &Path,
    contents: &[u8],
    strategy: WriteStrategy,
    mode: u32,
) -> KeyResult<()> {
    let write_failure =
        |e: io::Error| KeyError::io_error("write", path, &e, error_codes::KEY_WRITE_FAILED);

    match strategy {
        WriteStrategy::Atomic => write_atomic(path, contents, mode).map_err(write_failure),
        WriteStrategy::Direct => write_direct(path, contents, mode).map_err(write_failure),
    }
}

pub(crate) fn read_key_file(path: &Path) -> KeyResult<Vec<u8>> {
    fs::read(path).map_err(|e| KeyError::io_error("read", path, &e, error_codes::KEY_READ_FAILED))
}

pub(crate) fn remove_key_file(path: &Path) -> KeyResult<()> {
    fs::remove_file(path)
        .map_err(|e| KeyError::io_error("delete", path, &e, error_codes::KEY_DELETE_FAILED))
}

/// Follow `path` through any chain of symlinks to the entry that should
/// receive the key. A dangling link resolves to its missing target.
fn resolve_write_target(path: &Path) -> io::Result<PathBuf> {
    let mut current = path.to_path_buf();
    for _ in 0..MAX_SYMLINK_HOPS {
        match fs::symlink_metadata(&current) {
            Ok(meta) if meta.file_type().is_symlink() => {
                let target = fs::read_link(&current)?;
                // Relative targets are relative to the directory holding the link
                current = match current.parent() {
                    Some(parent) => parent.join(target),
                    None => target,
                };
            }
            Ok(_) => return Ok(current),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(current),
            Err(e) => return Err(e),
        }
    }
    Err(io::Error::new(
        io::ErrorKind::Other,
        format!("too many levels of symbolic links at {}", path.display()),
    ))
}

fn write_atomic(path: &Path, contents: &[u8], mode: u32) -> io::Result<()> {
    // Renaming over a symlink would replace the link itself
    let target = resolve_write_target(path)?;
    let path = target.as_path();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".ssl-pkey")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    restrict_permissions(tmp.as_file(), mode)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    // A failed persist drops the temp file, which removes it
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(unix)]
fn write_direct(path: &Path, contents: &[u8], mode: u32) -> io::Result<()> {
    use std::os::unix::fs::OpenOptionsExt as _;

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(mode)
        .open(path)?;
    // mode() only applies to newly created files
    restrict_permissions(&file, mode)?;
    file.write_all(contents)?;
    file.sync_all()
}

// TODO: apply an owner-only ACL on Windows; mode bits are ignored there.
#[cfg(not(unix))]
fn write_direct(path: &Path, contents: &[u8], _mode: u32) -> io::Result<()> {
    fs::write(path, contents)
}

#[cfg(unix)]
fn restrict_permissions(file: &fs::File, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt as _;
    file.set_permissions(fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &fs::File, _mode: u32) -> io::Result<()> {
    Ok(())
}
