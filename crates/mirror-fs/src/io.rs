//! Atomic I/O operations with file locking and modification time control

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use backoff::ExponentialBackoffBuilder;
use filetime::FileTime;
use fs2::FileExt;

use crate::{Error, Result};

/// Tuning for atomic writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobustnessConfig {
    /// How long to keep retrying the exclusive lock before giving up.
    pub lock_timeout: Duration,
    /// Flush file contents to disk before the rename.
    pub enable_fsync: bool,
}

impl Default for RobustnessConfig {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_secs(5),
            enable_fsync: true,
        }
    }
}

/// Write content atomically to a file.
///
/// Uses write-to-temp-then-rename so a reader never sees a partial file.
pub fn write_atomic(
    path: impl AsRef<Path>,
    content: &[u8],
    config: RobustnessConfig,
) -> Result<()> {
    write_atomic_inner(path.as_ref(), content, None, config)
}

/// Write content atomically and stamp the result with `mtime`.
///
/// The timestamp is applied to the temp file before the rename, so the
/// destination either keeps its previous state or appears with both the new
/// content and the requested modification time.
pub fn write_atomic_with_mtime(
    path: impl AsRef<Path>,
    content: &[u8],
    mtime: FileTime,
    config: RobustnessConfig,
) -> Result<()> {
    write_atomic_inner(path.as_ref(), content, Some(mtime), config)
}

fn write_atomic_inner(
    native_path: &Path,
    content: &[u8],
    mtime: Option<FileTime>,
    config: RobustnessConfig,
) -> Result<()> {
    if let Some(parent) = native_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    sweep_stale_temps(native_path);

    let temp_path = temp_path_for(native_path);
    let result = write_temp_then_rename(native_path, &temp_path, content, mtime, config);
    if result.is_err() && temp_path.exists() {
        if let Err(e) = fs::remove_file(&temp_path) {
            tracing::warn!(path = %temp_path.display(), error = %e, "failed to remove temp file");
        }
    }
    result
}

fn temp_prefix(native_path: &Path) -> String {
    format!(
        ".{}.",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default()
    )
}

fn temp_path_for(native_path: &Path) -> PathBuf {
    let temp_name = format!("{}{}.tmp", temp_prefix(native_path), std::process::id());
    native_path.with_file_name(temp_name)
}

/// Remove temp files a killed writer left next to `native_path`.
///
/// Only names of the exact `.{name}.{pid}.tmp` shape are touched. Failures are
/// logged, never returned: a leftover temp file does not block the write.
fn sweep_stale_temps(native_path: &Path) {
    let Some(parent) = native_path.parent() else {
        return;
    };
    let parent = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };
    let prefix = temp_prefix(native_path);
    let Ok(entries) = fs::read_dir(parent) else {
        return;
    };

    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let is_stale = name
            .strip_prefix(prefix.as_str())
            .and_then(|rest| rest.strip_suffix(".tmp"))
            .is_some_and(|pid| !pid.is_empty() && pid.bytes().all(|b| b.is_ascii_digit()));
        if !is_stale {
            continue;
        }
        match fs::remove_file(entry.path()) {
            Ok(()) => tracing::debug!(path = %entry.path().display(), "removed stale temp file"),
            Err(e) => tracing::warn!(
                path = %entry.path().display(),
                error = %e,
                "failed to remove stale temp file"
            ),
        }
    }
}

fn write_temp_then_rename(
    native_path: &Path,
    temp_path: &Path,
    content: &[u8],
    mtime: Option<FileTime>,
    config: RobustnessConfig,
) -> Result<()> {
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(temp_path)
        .map_err(|e| Error::io(temp_path, e))?;

    lock_with_timeout(&temp_file, native_path, config.lock_timeout)?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(temp_path, e))?;

    if config.enable_fsync {
        temp_file.sync_all().map_err(|e| Error::io(temp_path, e))?;
    }

    FileExt::unlock(&temp_file).map_err(|_| Error::LockFailed {
        path: native_path.to_path_buf(),
    })?;
    drop(temp_file);

    if let Some(mtime) = mtime {
        filetime::set_file_mtime(temp_path, mtime).map_err(|e| Error::io(temp_path, e))?;
    }

    fs::rename(temp_path, native_path).map_err(|e| Error::io(native_path, e))?;

    Ok(())
}

fn lock_with_timeout(file: &File, native_path: &Path, timeout: Duration) -> Result<()> {
    let policy = ExponentialBackoffBuilder::new()
        .with_initial_interval(Duration::from_millis(10))
        .with_max_interval(Duration::from_millis(250))
        .with_max_elapsed_time(Some(timeout))
        .build();

    backoff::retry(policy, || {
        file.try_lock_exclusive()
            .map_err(backoff::Error::transient)
    })
    .map_err(|_| Error::LockFailed {
        path: native_path.to_path_buf(),
    })
}

/// Modification time of `path`, or `None` when nothing exists there.
pub fn modified_time(path: impl AsRef<Path>) -> Result<Option<FileTime>> {
    let path = path.as_ref();
    match fs::metadata(path) {
        Ok(metadata) => Ok(Some(FileTime::from_last_modification_time(&metadata))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Set the modification time of an existing file, leaving its access time alone.
pub fn set_modified_time(path: impl AsRef<Path>, mtime: FileTime) -> Result<()> {
    let path = path.as_ref();
    filetime::set_file_mtime(path, mtime).map_err(|e| Error::io(path, e))
}

/// What occupies a path on disk, without following symbolic links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    /// Sockets, FIFOs, devices
    Other,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryKind::File => "file",
            EntryKind::Directory => "directory",
            EntryKind::Symlink => "symbolic link",
            EntryKind::Other => "special file",
        };
        f.write_str(label)
    }
}

/// Kind of the entry at `path`, or `None` when nothing exists there.
///
/// A symbolic link is reported as [`EntryKind::Symlink`] whatever it points
/// to, dangling links included.
pub fn entry_kind(path: impl AsRef<Path>) -> Result<Option<EntryKind>> {
    let path = path.as_ref();
    let file_type = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata.file_type(),
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::io(path, e)),
    };
    let kind = if file_type.is_symlink() {
        EntryKind::Symlink
    } else if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    };
    Ok(Some(kind))
}

/// Create a single directory level if absent.
///
/// Returns `true` when the directory was created by this call. The parent must
/// already exist. Anything other than a real directory at `path` is an error,
/// including a symbolic link to one.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    match entry_kind(path)? {
        Some(EntryKind::Directory) => return Ok(false),
        Some(kind) => return Err(occupied(path, kind)),
        None => {}
    }
    match fs::create_dir(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => match entry_kind(path)? {
            Some(EntryKind::Directory) => Ok(false),
            Some(kind) => Err(occupied(path, kind)),
            None => Err(Error::io(path, e)),
        },
        Err(e) => Err(Error::io(path, e)),
    }
}

fn occupied(path: &Path, kind: EntryKind) -> Error {
    Error::io(
        path,
        std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("a {kind} occupies the directory's place"),
        ),
    )
}

/// Read text content from a file.
pub fn read_text(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}
