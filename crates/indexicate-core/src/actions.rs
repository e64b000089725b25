//! File-manager actions: open, open containing folder, move, delete.
//!
//! Opening is delegated to the platform's default handler via the `open`
//! crate; deletion can go through the system trash via `trash`. Every
//! action is a single synchronous call and reports failures as
//! [`ActionError`] for the UI to show.

use crate::error::ActionError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// How `delete_path` disposes of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeleteMode {
    /// Move to the recycle bin / trash so it can be restored.
    #[default]
    Trash,
    /// Remove from disk immediately.
    Permanent,
}

impl DeleteMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Trash => "Move to trash",
            Self::Permanent => "Delete permanently",
        }
    }
}

/// Open a file or directory with its default application. Does not wait
/// for the application to exit.
pub fn open_path(path: &Path) -> Result<(), ActionError> {
    info!("Opening {}", path.display());
    open::that_detached(path).map_err(|e| ActionError::Open(e, path.to_path_buf()))
}

/// Open the directory that contains `path`.
pub fn open_location(path: &Path) -> Result<(), ActionError> {
    let folder = path.parent().unwrap_or(path);
    open_path(folder)
}

/// Move `src` into the directory `dest_dir`, keeping its name.
///
/// Refuses to overwrite an existing entry and to move a directory into
/// its own subtree. When a plain rename is impossible because the two
/// paths are on different filesystems, the entry is copied and the
/// original removed.
///
/// Returns the new path.
pub fn move_path(src: &Path, dest_dir: &Path) -> Result<PathBuf, ActionError> {
    let src_meta = fs::symlink_metadata(src).map_err(|e| ActionError::Io(e, src.to_path_buf()))?;
    let name = src.file_name().ok_or_else(|| {
        ActionError::Io(
            io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
            src.to_path_buf(),
        )
    })?;

    let dest_meta =
        fs::metadata(dest_dir).map_err(|e| ActionError::Io(e, dest_dir.to_path_buf()))?;
    if !dest_meta.is_dir() {
        return Err(ActionError::Io(
            io::Error::new(io::ErrorKind::NotADirectory, "destination is not a folder"),
            dest_dir.to_path_buf(),
        ));
    }

    if src_meta.is_dir() {
        let src_abs = fs::canonicalize(src).map_err(|e| ActionError::Io(e, src.to_path_buf()))?;
        let dest_abs =
            fs::canonicalize(dest_dir).map_err(|e| ActionError::Io(e, dest_dir.to_path_buf()))?;
        if dest_abs.starts_with(&src_abs) {
            return Err(ActionError::MoveIntoSelf(src.to_path_buf()));
        }
    }

    let target = dest_dir.join(name);
    if fs::symlink_metadata(&target).is_ok() {
        return Err(ActionError::DestinationExists(target));
    }

    match fs::rename(src, &target) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!("Rename across filesystems, copying {} instead", src.display());
            move_by_copy(src, &target)?;
        }
        Err(e) => return Err(ActionError::Io(e, src.to_path_buf())),
    }

    info!("Moved {} -> {}", src.display(), target.display());
    Ok(target)
}

/// Delete a file or directory (recursively).
pub fn delete_path(path: &Path, mode: DeleteMode) -> Result<(), ActionError> {
    if path.parent().is_none() {
        return Err(ActionError::Io(
            io::Error::new(io::ErrorKind::PermissionDenied, "refusing to delete a filesystem root"),
            path.to_path_buf(),
        ));
    }
    // Surface "not found" uniformly before either backend runs.
    fs::symlink_metadata(path).map_err(|e| ActionError::Io(e, path.to_path_buf()))?;

    match mode {
        DeleteMode::Trash => {
            trash::delete(path).map_err(|e| ActionError::Trash(e, path.to_path_buf()))?
        }
        DeleteMode::Permanent => {
            remove_any(path).map_err(|e| ActionError::Io(e, path.to_path_buf()))?
        }
    }
    info!("Deleted {} ({:?})", path.display(), mode);
    Ok(())
}

/// Remove a file, symlink or directory tree.
fn remove_any(path: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(path)?;
    if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

/// Move `src` to `target` by copying it and removing the original.
///
/// A copy that fails part way is removed again, so `target` is either
/// complete or absent. `target` must not exist yet.
fn move_by_copy(src: &Path, target: &Path) -> Result<(), ActionError> {
    if fs::symlink_metadata(target).is_ok() {
        return Err(ActionError::DestinationExists(target.to_path_buf()));
    }
    if let Err(copy_err) = copy_recursive(src, target) {
        let _ = remove_any(target);
        return Err(ActionError::Io(copy_err, target.to_path_buf()));
    }
    remove_any(src).map_err(|e| ActionError::Io(e, src.to_path_buf()))
}

fn copy_recursive(src: &Path, dst: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(src)?;
    if meta.is_dir() {
        fs::create_dir(dst)?;
        for entry in fs::read_dir(src)? {
            let entry = entry?;
            copy_recursive(&entry.path(), &dst.join(entry.file_name()))?;
        }
        Ok(())
    } else {
        fs::copy(src, dst).map(|_| ())
    }
}
