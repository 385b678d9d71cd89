//! Move / rename / delete operations on clip files.
//!
//! All three entry points return a success flag; failures are logged and
//! never propagated. Callers reconcile the in-memory library afterward
//! (remove the moved/deleted entry, rewrite the renamed entry's path) and
//! re-select an appropriate index.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
enum FileOpError {
    #[error("source file not found: {0}")]
    SourceMissing(PathBuf),
    #[error("destination already exists: {0}")]
    DestinationExists(PathBuf),
    #[error("invalid file name: {0:?}")]
    InvalidName(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Moves `source` into `dest_dir`, keeping its file name. Creates `dest_dir`
/// if absent; fails without touching anything if the source is missing or a
/// same-named file already exists at the destination.
pub fn move_to_dir(source: &Path, dest_dir: &Path) -> bool {
    match try_move_to_dir(source, dest_dir) {
        Ok(dest) => {
            info!("Moved {:?} to {:?}", source, dest);
            true
        }
        Err(e) => {
            error!("Failed to move {:?} to {:?}: {}", source, dest_dir, e);
            false
        }
    }
}

fn try_move_to_dir(source: &Path, dest_dir: &Path) -> Result<PathBuf, FileOpError> {
    if !source.is_file() {
        return Err(FileOpError::SourceMissing(source.to_path_buf()));
    }

    if !dest_dir.is_dir() {
        fs::create_dir_all(dest_dir)?;
        info!("Created directory {:?}", dest_dir);
    }

    let file_name = source
        .file_name()
        .ok_or_else(|| FileOpError::SourceMissing(source.to_path_buf()))?;
    let dest = dest_dir.join(file_name);

    // fs::rename would silently overwrite on Unix.
    if dest.exists() {
        return Err(FileOpError::DestinationExists(dest));
    }

    fs::rename(source, &dest)?;
    Ok(dest)
}

/// Renames `source` in place to `new_name`. Rejects invalid names and
/// collisions before any filesystem call; renaming to the current name is a
/// no-op success.
pub fn rename(source: &Path, new_name: &str) -> bool {
    match try_rename(source, new_name) {
        Ok(dest) => {
            if dest != source {
                info!("Renamed {:?} to {:?}", source, dest);
            }
            true
        }
        Err(e) => {
            error!("Failed to rename {:?} to {:?}: {}", source, new_name, e);
            false
        }
    }
}

fn try_rename(source: &Path, new_name: &str) -> Result<PathBuf, FileOpError> {
    if !is_valid_file_name(new_name) {
        return Err(FileOpError::InvalidName(new_name.to_string()));
    }

    if !source.is_file() {
        return Err(FileOpError::SourceMissing(source.to_path_buf()));
    }

    if source.file_name().and_then(|n| n.to_str()) == Some(new_name) {
        return Ok(source.to_path_buf());
    }

    let parent = source
        .parent()
        .ok_or_else(|| FileOpError::SourceMissing(source.to_path_buf()))?;
    let dest = parent.join(new_name);

    if dest.exists() {
        return Err(FileOpError::DestinationExists(dest));
    }

    fs::rename(source, &dest)?;
    Ok(dest)
}

/// Permanently deletes `path`. Fails silently (returns false) if the file is
/// already absent.
pub fn delete(path: &Path) -> bool {
    if !path.is_file() {
        warn!("File not found for deletion: {:?}", path);
        return false;
    }

    match fs::remove_file(path) {
        Ok(()) => {
            info!("Deleted {:?}", path);
            true
        }
        Err(e) => {
            error!("Failed to delete {:?}: {}", path, e);
            false
        }
    }
}

/// A plain file name: non-empty, no path separators or NUL, not a dot entry.
fn is_valid_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.chars().any(|c| matches!(c, '/' | '\\' | '\0'))
}
