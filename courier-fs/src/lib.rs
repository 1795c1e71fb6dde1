//! Filesystem helpers built on `cap-std` and `camino`.
//!
//! Paths are resolved against ambient authority once, then every operation
//! goes through a capability handle on the containing directory.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use std::io::{self, Read, Write};
use std::path::Component;

/// Open a UTF-8 file path for reading.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Read a whole file into a string.
pub fn read_to_string(path: &Utf8Path) -> io::Result<String> {
    let mut contents = String::new();
    open_utf8_file(path)?.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Open the directory containing `path` and return it with the file name.
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

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    ensure_dir(parent)
}

/// Create `dir` and any missing ancestors.
pub fn ensure_dir(dir: &Utf8Path) -> io::Result<()> {
    if dir.as_str().is_empty() || dir == Utf8Path::new("/") {
        return Ok(());
    }
    let (base_dir, relative) = base_dir_and_relative(dir)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base_dir.create_dir_all(&relative)
}

/// Return whether a path exists and is a regular file.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

/// Replace `path` with `contents`, writing a sibling temporary file first
/// and renaming it into place so readers never observe a partial file.
pub fn write_atomic(path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
    ensure_parent_dir(path)?;
    let (dir, name) = open_dir_and_file(path)?;
    let staging = format!(".{name}.tmp");
    {
        let mut file = dir.create(&staging)?;
        file.write_all(contents)?;
        file.sync_all()?;
    }
    dir.rename(&staging, &dir, &name)
}

/// Remove the regular files directly inside `dir` whose names satisfy
/// `matches`, returning the removed names in sorted order.
///
/// A missing directory removes nothing.
pub fn remove_files_matching(
    dir: &Utf8Path,
    matches: impl Fn(&str) -> bool,
) -> io::Result<Vec<String>> {
    let handle = match fs_utf8::Dir::open_ambient_dir(dir, ambient_authority()) {
        Ok(handle) => handle,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err),
    };
    let mut removed = Vec::new();
    for entry in handle.entries()? {
        let entry = entry?;
        let name = entry.file_name()?;
        if entry.file_type()?.is_file() && matches(&name) {
            handle.remove_file(&name)?;
            removed.push(name);
        }
    }
    removed.sort();
    Ok(removed)
}

/// Split a parent path into an ambient base directory and a relative suffix.
pub fn base_dir_and_relative(parent: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let std_parent = parent.as_std_path();

    let (base, relative) = match std_parent.components().next() {
        // Windows absolute path with a drive or UNC prefix.
        Some(Component::Prefix(prefix)) => {
            let prefix_str = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;

            let base = Utf8PathBuf::from(prefix_str).join(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_parent
                .strip_prefix(base.as_std_path())
                .or_else(|_| std_parent.strip_prefix(prefix.as_os_str()))
                .map_err(|_| io::Error::other("failed to strip prefix from parent path"))?
                .to_path_buf();
            (base, relative)
        }
        Some(Component::RootDir) => {
            let base = Utf8PathBuf::from(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_parent
                .strip_prefix(base.as_std_path())
                .map_err(|_| io::Error::other("failed to strip root from absolute path"))?
                .to_path_buf();
            (base, relative)
        }
        _ => (Utf8PathBuf::from("."), std_parent.to_path_buf()),
    };

    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    let relative = Utf8PathBuf::from_path_buf(relative)
        .map_err(|_| io::Error::other("non-UTF-8 parent path"))?;

    Ok((dir, relative))
}
