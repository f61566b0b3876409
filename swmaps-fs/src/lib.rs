//! Shared filesystem helpers built on `cap-std` and `camino`.
//!
//! Every helper resolves an ambient base directory (the filesystem root for
//! absolute paths, the current directory otherwise) and performs the actual
//! operation relative to it through a capability handle.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use std::io;
use std::path::Component;

/// Open a UTF-8 file path using ambient authority.
///
/// # Errors
/// Propagates the I/O error raised when the file cannot be opened.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Resolve an ambient directory for the given path and return the directory with the file name.
///
/// # Errors
/// Fails when `path` has no file name or its parent cannot be opened.
pub fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("target should include a file name"))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Return whether a path exists and is a regular file using capability-based IO.
///
/// # Errors
/// Returns the I/O error raised while inspecting the path, including
/// `NotFound` when it does not exist.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

/// Delete `path` with all of its contents when present, then create it empty.
///
/// Parent directories are created as needed.
///
/// # Errors
/// Fails when `path` names the filesystem root or when removal or creation
/// fails.
pub fn recreate_dir(path: &Utf8Path) -> io::Result<()> {
    let (base_dir, relative) = base_dir_and_relative(path)?;
    if relative.as_str().is_empty() {
        return Err(io::Error::other(format!(
            "refusing to recreate base directory {path}"
        )));
    }
    if base_dir.exists(&relative) {
        base_dir.remove_dir_all(&relative)?;
    }
    base_dir.create_dir_all(&relative)
}

/// Create `path` and any missing parents; an existing directory is kept.
///
/// # Errors
/// Propagates the I/O error raised while creating the directories.
pub fn ensure_dir(path: &Utf8Path) -> io::Result<()> {
    let (base_dir, relative) = base_dir_and_relative(path)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base_dir.create_dir_all(&relative)
}

/// List the regular files directly inside `dir`, sorted by name.
///
/// # Errors
/// Fails when the directory cannot be opened or an entry cannot be
/// inspected.
pub fn list_files(dir: &Utf8Path) -> io::Result<Vec<Utf8PathBuf>> {
    list_entries(dir, |file_type| file_type.is_file())
}

/// List the directories directly inside `dir`, sorted by name.
///
/// # Errors
/// Fails when the directory cannot be opened or an entry cannot be
/// inspected.
pub fn list_dirs(dir: &Utf8Path) -> io::Result<Vec<Utf8PathBuf>> {
    list_entries(dir, |file_type| file_type.is_dir())
}

fn list_entries(
    dir: &Utf8Path,
    keep: impl Fn(&cap_std::fs::FileType) -> bool,
) -> io::Result<Vec<Utf8PathBuf>> {
    let handle = fs_utf8::Dir::open_ambient_dir(dir, ambient_authority())?;
    let mut paths = Vec::new();
    for entry in handle.entries()? {
        let entry = entry?;
        if keep(&entry.file_type()?) {
            paths.push(dir.join(entry.file_name()?));
        }
    }
    paths.sort();
    Ok(paths)
}

/// Read the full contents of a file.
///
/// # Errors
/// Propagates the I/O error raised while opening or reading the file.
pub fn read_bytes(path: &Utf8Path) -> io::Result<Vec<u8>> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.read(name.as_str())
}

/// Split an absolute or relative path into an ambient base directory and a relative suffix.
///
/// # Errors
/// Fails when the path is not valid UTF-8 after prefix stripping or when the
/// base directory cannot be opened.
pub fn base_dir_and_relative(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let std_path = path.as_std_path();

    let (base, relative) = match std_path.components().next() {
        // Windows absolute path with a drive or UNC prefix.
        Some(Component::Prefix(prefix)) => {
            let prefix_str = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;

            let base = Utf8PathBuf::from(prefix_str).join(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_path
                .strip_prefix(base.as_std_path())
                .or_else(|_| std_path.strip_prefix(prefix.as_os_str()))
                .map_err(|_| io::Error::other("failed to strip prefix from path"))?
                .to_path_buf();
            (base, relative)
        }
        // Unix-style absolute path.
        Some(Component::RootDir) => {
            let base = Utf8PathBuf::from(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_path
                .strip_prefix(base.as_std_path())
                .map_err(|_| io::Error::other("failed to strip root from absolute path"))?
                .to_path_buf();
            (base, relative)
        }
        // Relative path: resolve from the current directory.
        _ => (Utf8PathBuf::from("."), std_path.to_path_buf()),
    };

    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    let relative =
        Utf8PathBuf::from_path_buf(relative).map_err(|_| io::Error::other("non-UTF-8 path"))?;

    Ok((dir, relative))
}
