//! Directory scanner for discovering playable clips.
//!
//! This module handles:
//! - Flat (non-recursive) listing of video files in the working directory
//! - A bounded-depth existence probe used to filter subfolder autocomplete
//! - Listing immediate subfolder names for the save/navigate modals

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Extensions the grid treats as playable video.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mkv", "avi", "mov"];

/// Depth bound for the subtree existence probe. A cost bound, not a
/// correctness requirement: at the cap the subtree is assumed to contain
/// videos without searching further.
pub const CONTAINS_PROBE_DEPTH: usize = 2;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("directory not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read directory {0}")]
    Io(PathBuf, #[source] std::io::Error),
}

/// True if the path has a playable video extension.
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            VIDEO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Lists immediate video files in `dir`, sorted by path for stable ordering.
///
/// Returns `ScanError::NotFound` when the directory is absent so callers can
/// fall back to re-opening the directory picker.
pub fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::NotFound(dir.to_path_buf()));
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_video_file(p))
        .collect();

    paths.sort();

    info!("Discovered {} video files in {:?}", paths.len(), dir);
    Ok(paths)
}

/// Answers "does this subtree contain any videos" down to
/// [`CONTAINS_PROBE_DEPTH`] levels.
pub fn subtree_contains_videos(dir: &Path) -> bool {
    contains_videos_recursive(dir, 0, CONTAINS_PROBE_DEPTH)
}

fn contains_videos_recursive(dir: &Path, depth: usize, max_depth: usize) -> bool {
    if depth >= max_depth {
        // Depth cap reached: assume the subtree might contain videos.
        return true;
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Could not access directory {:?}: {}", dir, e);
            return false;
        }
    };

    let mut subdirs = Vec::new();
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
        } else if is_video_file(&path) {
            return true;
        }
    }

    subdirs
        .iter()
        .any(|sub| contains_videos_recursive(sub, depth + 1, max_depth))
}

/// Immediate subfolder names of `dir`, sorted, for modal autocomplete.
pub fn list_subfolders(dir: &Path) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Could not list subfolders of {:?}: {}", dir, e);
            return Vec::new();
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .filter_map(|e| e.file_name().into_string().ok())
        .collect();

    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        File::create(path).unwrap();
    }

    #[test]
    fn test_is_video_file() {
        assert!(is_video_file(Path::new("a.mp4")));
        assert!(is_video_file(Path::new("b.MKV")));
        assert!(!is_video_file(Path::new("c.txt")));
        assert!(!is_video_file(Path::new("noext")));
    }

    #[test]
    fn test_scan_missing_directory() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        match scan_directory(&missing) {
            Err(ScanError::NotFound(p)) => assert_eq!(p, missing),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_is_flat_and_sorted() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("b.mp4"));
        touch(&dir.path().join("a.mp4"));
        touch(&dir.path().join("notes.txt"));
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        touch(&sub.join("nested.mp4"));

        let paths = scan_directory(dir.path()).unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].file_name().unwrap(), "a.mp4");
        assert_eq!(paths[1].file_name().unwrap(), "b.mp4");
    }

    #[test]
    fn test_scan_empty_directory() {
        let dir = tempdir().unwrap();
        assert!(scan_directory(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_contains_videos_at_top_level() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("clip.mp4"));
        assert!(subtree_contains_videos(dir.path()));
    }

    #[test]
    fn test_contains_videos_one_level_down() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        touch(&sub.join("clip.webm"));
        assert!(subtree_contains_videos(dir.path()));
    }

    #[test]
    fn test_contains_videos_optimistic_at_depth_cap() {
        // Videos three levels down are beyond the probe, but the probe hits
        // the depth cap on the intermediate directory and answers true.
        let dir = tempdir().unwrap();
        let deep = dir.path().join("a").join("b");
        fs::create_dir_all(&deep).unwrap();
        touch(&deep.join("clip.mp4"));
        assert!(subtree_contains_videos(dir.path()));
    }

    #[test]
    fn test_contains_videos_false_for_shallow_empty_tree() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("docs");
        fs::create_dir(&sub).unwrap();
        touch(&sub.join("readme.txt"));
        assert!(!subtree_contains_videos(dir.path()));
    }

    #[test]
    fn test_list_subfolders_sorted() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("nicer")).unwrap();
        fs::create_dir(dir.path().join("del")).unwrap();
        fs::create_dir(dir.path().join("nice")).unwrap();
        touch(&dir.path().join("clip.mp4"));

        let names = list_subfolders(dir.path());
        assert_eq!(names, vec!["del", "nice", "nicer"]);
    }
}
