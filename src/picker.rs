//! External collaborators that leave the process: the native folder picker
//! and shell-open for reveal / web search.

use std::path::{Path, PathBuf};

use tracing::{error, info};

/// Native directory-selection dialog. Blocks the calling flow until the user
/// responds; `None` means cancelled.
pub trait FolderPicker {
    fn pick_folder(&mut self, title: &str, initial: Option<&Path>) -> Option<PathBuf>;
}

/// Folder picker backed by the system dialog via `rfd`.
#[derive(Debug, Default)]
pub struct RfdFolderPicker;

impl FolderPicker for RfdFolderPicker {
    fn pick_folder(&mut self, title: &str, initial: Option<&Path>) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new().set_title(title);
        if let Some(dir) = initial {
            dialog = dialog.set_directory(dir);
        }
        let picked = dialog.pick_folder();
        match &picked {
            Some(dir) => info!("Selected directory {:?}", dir),
            None => info!("Directory selection cancelled"),
        }
        picked
    }
}

/// Opens the clip's parent directory in the system file manager.
pub fn reveal_in_file_manager(path: &Path) {
    let Some(parent) = path.parent() else {
        return;
    };
    if let Err(e) = open::that(parent) {
        error!("Failed to reveal {:?}: {}", path, e);
    }
}

/// Opens a web search for the clip's file name in the default browser.
pub fn web_search(file_name: &str) {
    let url = format!(
        "https://www.google.com/search?q={}",
        encode_query(file_name)
    );
    if let Err(e) = open::that(&url) {
        error!("Failed to open web search for {:?}: {}", file_name, e);
    }
}

/// Minimal percent-encoding for a query-string value.
fn encode_query(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
