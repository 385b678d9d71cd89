//! Central controller: startup path resolution, keyboard dispatch, and
//! orchestration of the grid, modals, file operations, and collaborators.
//!
//! Key handling has two layers. Normal mode drives selection, playback, and
//! the triage shortcuts; an open modal captures every key until it commits
//! or cancels. Disk mutations go through `fileops`, after which the in-memory
//! library and grid are reconciled (entry removed or path rewritten) and an
//! appropriate index re-selected.

use std::path::{Path, PathBuf};

use directories::UserDirs;
use tracing::{info, warn};

use crate::fileops;
use crate::models::{Library, SettingsStore};
use crate::picker::{self, FolderPicker};
use crate::scanner;
use crate::ui::grid::{EscapeAction, GridState, RemoveOutcome};
use crate::ui::keys::{Key, KeyEvent};
use crate::ui::modal::{ModalKind, ModalOutcome, ModalState};
use crate::video::player::PlayerBackend;

/// Implicit triage destination for delete candidates.
pub const DEL_FOLDER: &str = "del";
/// Implicit triage destination for keepers.
pub const NICE_FOLDER: &str = "nice";

const SEEK_STEP_SECS: f64 = 10.0;
const SEEK_STEP_LARGE_SECS: f64 = 300.0;
const VOLUME_STEP: f64 = 0.1;

const FILENAME_DISPLAY_SECS: f64 = 3.0;
const VOLUME_DISPLAY_SECS: f64 = 2.0;

/// Everything a frontend needs to draw one frame.
#[derive(Debug, Clone)]
pub struct FrameState {
    pub directory: Option<PathBuf>,
    pub video_count: usize,
    pub items: Vec<ItemView>,
    pub modal: Option<ModalView>,
    pub volume_osd: Option<String>,
    pub filename_osd: Option<String>,
}

/// Render info for one grid entry.
#[derive(Debug, Clone)]
pub struct ItemView {
    pub name: String,
    pub selected: bool,
    pub muted: bool,
    pub rate: f64,
    pub fullscreen: bool,
}

/// Render info for the active modal overlay.
#[derive(Debug, Clone)]
pub struct ModalView {
    pub title: &'static str,
    pub buffer: String,
    pub suggestions: Vec<String>,
    pub highlighted: Option<usize>,
}

pub struct MainController {
    library: Library,
    grid: GridState,
    modal: Option<ModalState>,
    current_dir: Option<PathBuf>,
    volume: f64,
    settings: SettingsStore,
    picker: Box<dyn FolderPicker>,
    backend: Box<dyn PlayerBackend>,
    volume_osd: Option<(String, f64)>,
    filename_osd: Option<(String, f64)>,
}

impl MainController {
    pub fn new(
        settings: SettingsStore,
        picker: Box<dyn FolderPicker>,
        backend: Box<dyn PlayerBackend>,
    ) -> Self {
        let volume = settings.volume();
        Self {
            library: Library::default(),
            grid: GridState::new(),
            modal: None,
            current_dir: None,
            volume,
            settings,
            picker,
            backend,
            volume_osd: None,
            filename_osd: None,
        }
    }

    /// Resolves what to show on startup, in priority order: an explicit
    /// launch path (file or directory), the persisted last directory, then
    /// the folder picker.
    pub fn startup(&mut self, launch_path: Option<&Path>) {
        if let Some(path) = launch_path {
            if path.is_dir() {
                info!("Launching with directory {:?}", path);
                self.load_directory(path, 0);
                return;
            }
            if path.is_file() {
                // Single-clip mode: no working directory, so the triage
                // shortcuts that need one stay inert.
                info!("Launching with single clip {:?}", path);
                self.library = Library::new(vec![path.to_path_buf()]);
                self.grid
                    .display(self.library.iter(), self.backend.as_mut(), self.volume);
                self.grid.select(Some(0));
                return;
            }
            warn!("Launch path {:?} is not a file or directory", path);
        }

        if let Some(last) = self.settings.last_directory() {
            if last.is_dir() {
                info!("Restoring last directory {:?}", last);
                self.load_directory(&last, 0);
                return;
            }
            warn!("Persisted directory {:?} no longer exists", last);
        }

        self.pick_directory();
    }

    /// Scans `dir` and rebuilds the library and grid, selecting
    /// `select_index` clamped to the new length. An absent or empty
    /// directory falls back to the picker.
    fn load_directory(&mut self, dir: &Path, select_index: usize) {
        match scanner::scan_directory(dir) {
            Ok(paths) if !paths.is_empty() => {
                self.library = Library::new(paths);
                self.grid
                    .display(self.library.iter(), self.backend.as_mut(), self.volume);
                self.current_dir = Some(dir.to_path_buf());
                if let Err(e) = self.settings.set_last_directory(dir) {
                    warn!("Failed to persist last directory: {e:#}");
                }
                let index = select_index.min(self.library.len() - 1);
                self.grid.select(Some(index));
                info!("Loaded {} clips from {:?}", self.library.len(), dir);
            }
            Ok(_) => {
                warn!("No video files found in {:?}", dir);
                self.pick_directory();
            }
            Err(e) => {
                warn!("{e}");
                self.pick_directory();
            }
        }
    }

    fn pick_directory(&mut self) {
        let initial = self
            .settings
            .last_directory()
            .filter(|d| d.is_dir())
            .or_else(|| UserDirs::new().map(|u| u.home_dir().to_path_buf()));

        let picked = self
            .picker
            .pick_folder("Select Video Directory", initial.as_deref());
        match picked {
            Some(dir) => self.load_directory(&dir, 0),
            None => warn!("Directory selection cancelled"),
        }
    }

    /// Per-frame update: decays the on-screen display timers.
    pub fn tick(&mut self, dt: f64) {
        if let Some((_, timer)) = &mut self.volume_osd {
            *timer -= dt;
            if *timer <= 0.0 {
                self.volume_osd = None;
            }
        }
        if let Some((_, timer)) = &mut self.filename_osd {
            *timer -= dt;
            if *timer <= 0.0 {
                self.filename_osd = None;
            }
        }
    }

    pub fn handle_key(&mut self, event: KeyEvent) {
        if self.modal.is_some() {
            self.handle_modal_key(event);
        } else {
            self.handle_normal_key(event);
        }
    }

    fn handle_normal_key(&mut self, event: KeyEvent) {
        match event.key {
            Key::Left | Key::Right => {
                let forward = event.key == Key::Right;
                if event.mods.ctrl {
                    self.move_selection(if forward { 1 } else { -1 });
                } else {
                    let step = if event.mods.shift {
                        SEEK_STEP_LARGE_SECS
                    } else {
                        SEEK_STEP_SECS
                    };
                    self.seek_selected(if forward { step } else { -step });
                }
            }
            Key::Up if event.mods.ctrl => self.go_to_parent(),
            Key::Down if event.mods.ctrl => self.open_navigate_modal(),
            Key::Up => self.adjust_volume(VOLUME_STEP),
            Key::Down => self.adjust_volume(-VOLUME_STEP),
            Key::Escape => {
                if self.grid.escape() == EscapeAction::PickDirectory {
                    self.pick_directory();
                }
            }
            Key::Space => {
                if let Some(slot) = self.grid.selected_slot_mut() {
                    slot.toggle_pause();
                }
            }
            Key::Backspace => {
                if let Some(slot) = self.grid.selected_slot_mut() {
                    slot.rewind();
                }
            }
            Key::Delete => self.delete_selected(),
            Key::Char(c) if !event.mods.ctrl => match c.to_ascii_lowercase() {
                'd' => self.move_selected_to(DEL_FOLDER),
                'n' => self.move_selected_to(NICE_FOLDER),
                's' => self.open_save_modal(),
                'r' => self.open_rename_modal(),
                'f' => {
                    if self.grid.toggle_fullscreen() {
                        self.show_filename_osd();
                    }
                }
                'm' => {
                    if let Some(slot) = self.grid.selected_slot_mut() {
                        slot.toggle_mute();
                    }
                }
                'o' => {
                    if let Some(path) = self.grid.selected_path() {
                        picker::reveal_in_file_manager(path);
                    }
                }
                'g' => {
                    if let Some(name) = self.selected_file_name() {
                        picker::web_search(&name);
                    }
                }
                _ => {}
            },
            _ => {}
        }
    }

    fn handle_modal_key(&mut self, event: KeyEvent) {
        let Some(mut modal) = self.modal.take() else {
            return;
        };
        let kind = modal.kind();
        let outcome = modal.handle_key(event, |input| self.suggestions_for(kind, input));

        match outcome {
            ModalOutcome::Pending => self.modal = Some(modal),
            ModalOutcome::Cancelled => info!("Modal cancelled"),
            ModalOutcome::Committed(input) => {
                if input.is_empty() {
                    // Empty commit closes without acting.
                    return;
                }
                match kind {
                    ModalKind::SaveToFolder => self.move_selected_to(&input),
                    ModalKind::Rename => self.rename_selected(&input),
                    ModalKind::NavigateDown => {
                        if let Some(dir) = self.current_dir.clone() {
                            self.load_directory(&dir.join(&input), 0);
                        }
                    }
                }
            }
        }
    }

    fn suggestions_for(&self, kind: ModalKind, input: &str) -> Vec<String> {
        let Some(dir) = &self.current_dir else {
            return Vec::new();
        };
        match kind {
            ModalKind::Rename => Vec::new(),
            ModalKind::SaveToFolder => {
                crate::ui::modal::prefix_matches(&scanner::list_subfolders(dir), input)
            }
            ModalKind::NavigateDown => {
                crate::ui::modal::prefix_matches(&scanner::list_subfolders(dir), input)
                    .into_iter()
                    .filter(|name| scanner::subtree_contains_videos(&dir.join(name)))
                    .collect()
            }
        }
    }

    fn open_save_modal(&mut self) {
        if self.grid.selected_index().is_none() {
            warn!("No clip selected to save");
            return;
        }
        self.modal = Some(ModalState::open(ModalKind::SaveToFolder, "", |input| {
            self.suggestions_for(ModalKind::SaveToFolder, input)
        }));
    }

    fn open_rename_modal(&mut self) {
        let Some(name) = self.selected_file_name() else {
            warn!("No clip selected to rename");
            return;
        };
        self.modal = Some(ModalState::open(ModalKind::Rename, &name, |_| Vec::new()));
    }

    fn open_navigate_modal(&mut self) {
        if self.current_dir.is_none() {
            warn!("No working directory to navigate from");
            return;
        }
        self.modal = Some(ModalState::open(ModalKind::NavigateDown, "", |input| {
            self.suggestions_for(ModalKind::NavigateDown, input)
        }));
    }

    fn move_selection(&mut self, delta: isize) {
        self.grid.move_selection(delta);
        if self.grid.is_fullscreen() {
            self.show_filename_osd();
        }
    }

    fn seek_selected(&mut self, seconds: f64) {
        if let Some(slot) = self.grid.selected_slot_mut() {
            slot.seek(seconds);
        }
    }

    fn adjust_volume(&mut self, delta: f64) {
        self.volume = (self.volume + delta).clamp(0.0, 1.0);
        self.grid.set_volume(self.volume);
        if let Err(e) = self.settings.set_volume(self.volume) {
            warn!("Failed to persist volume: {e:#}");
        }
        let text = format!("Volume: {:.0}%", self.volume * 100.0);
        info!("{text}");
        self.volume_osd = Some((text, VOLUME_DISPLAY_SECS));
    }

    fn go_to_parent(&mut self) {
        let Some(dir) = self.current_dir.clone() else {
            return;
        };
        match dir.parent() {
            Some(parent) => self.load_directory(parent, 0),
            None => warn!("Already at the filesystem root"),
        }
    }

    fn move_selected_to(&mut self, folder: &str) {
        let Some(index) = self.grid.selected_index() else {
            warn!("No clip selected");
            return;
        };
        let Some(dir) = self.current_dir.clone() else {
            warn!("No working directory for file operations");
            return;
        };
        let Some(source) = self.library.get(index).map(Path::to_path_buf) else {
            return;
        };

        if fileops::move_to_dir(&source, &dir.join(folder)) {
            self.remove_entry(index);
        }
    }

    fn delete_selected(&mut self) {
        let Some(index) = self.grid.selected_index() else {
            warn!("No clip selected");
            return;
        };
        let Some(source) = self.library.get(index).map(Path::to_path_buf) else {
            return;
        };

        if fileops::delete(&source) {
            self.remove_entry(index);
        }
    }

    fn rename_selected(&mut self, new_name: &str) {
        let Some(index) = self.grid.selected_index() else {
            warn!("No clip selected");
            return;
        };
        let Some(source) = self.library.get(index).map(Path::to_path_buf) else {
            return;
        };

        if fileops::rename(&source, new_name) {
            let new_path = match source.parent() {
                Some(parent) => parent.join(new_name),
                None => PathBuf::from(new_name),
            };
            self.library.rewrite(index, new_path.clone());
            self.grid.rewrite_path(index, new_path);
        }
    }

    /// Drops a library/grid entry whose file left the directory. An empty
    /// library falls back to the picker instead of a blank grid.
    fn remove_entry(&mut self, index: usize) {
        self.library.remove(index);
        if self.grid.remove(index) == RemoveOutcome::Empty {
            warn!("Library is empty; selecting a new directory");
            self.pick_directory();
        }
    }

    fn selected_file_name(&self) -> Option<String> {
        self.grid
            .selected_path()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
    }

    fn show_filename_osd(&mut self) {
        if let Some(name) = self.selected_file_name() {
            self.filename_osd = Some((name, FILENAME_DISPLAY_SECS));
        }
    }

    /// Snapshot of everything a frontend draws this frame.
    pub fn frame(&self) -> FrameState {
        let items = self
            .grid
            .slots()
            .iter()
            .map(|slot| ItemView {
                name: slot
                    .path()
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                selected: slot.is_selected(),
                muted: slot.is_muted(),
                rate: slot.rate(),
                fullscreen: slot.is_fullscreen(),
            })
            .collect();

        let modal = self.modal.as_ref().map(|m| ModalView {
            title: match m.kind() {
                ModalKind::SaveToFolder => "Save to Subfolder",
                ModalKind::Rename => "Rename Clip",
                ModalKind::NavigateDown => "Open Subfolder",
            },
            buffer: m.buffer().to_string(),
            suggestions: m.suggestions().to_vec(),
            highlighted: m.highlighted(),
        });

        FrameState {
            directory: self.current_dir.clone(),
            video_count: self.library.len(),
            items,
            modal,
            volume_osd: self.volume_osd.as_ref().map(|(t, _)| t.clone()),
            filename_osd: self.filename_osd.as_ref().map(|(t, _)| t.clone()),
        }
    }

    #[cfg(test)]
    pub fn selected_index(&self) -> Option<usize> {
        self.grid.selected_index()
    }

    #[cfg(test)]
    pub fn selected_path(&self) -> Option<&Path> {
        self.grid.selected_path()
    }

    #[cfg(test)]
    pub fn current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    #[cfg(test)]
    pub fn modal_buffer(&self) -> Option<&str> {
        self.modal.as_ref().map(|m| m.buffer())
    }
}
