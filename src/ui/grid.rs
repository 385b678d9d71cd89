//! Selection and fullscreen state for the thumbnail grid.
//!
//! The grid owns one slot per clip in the library. Every slot exclusively
//! owns its playback resources; unselected slots play muted at thumbnail
//! rate, the selected slot plays unmuted at normal rate, and at most one
//! slot (always the selected one) renders fullscreen.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::video::player::{
    PlayerBackend, PlayerHandle, RenderTarget, NORMAL_RATE, THUMBNAIL_RATE,
};

/// What Escape did, so the controller can fall through the cascade
/// fullscreen -> selection -> directory picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeAction {
    ExitedFullscreen,
    Deselected,
    /// Nothing to dismiss; the controller should re-open the folder picker.
    PickDirectory,
}

/// Result of removing a slot after a move/delete on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The removed slot was not selected; selection (if any) was preserved.
    Removed,
    /// The removed slot was selected; the slot now at the same (clamped)
    /// position was selected instead.
    Reselected(usize),
    /// The grid is now empty; the controller should pick a new directory.
    Empty,
}

/// One grid entry: a clip path plus its playback resources and the playback
/// flags derived from selection state.
pub struct GridSlot {
    path: PathBuf,
    handle: Box<dyn PlayerHandle>,
    selected: bool,
    muted: bool,
    rate: f64,
    fullscreen: bool,
}

impl GridSlot {
    fn new(path: PathBuf, handle: Box<dyn PlayerHandle>) -> Self {
        // Handles start muted at thumbnail rate per the backend contract.
        Self {
            path,
            handle,
            selected: false,
            muted: true,
            rate: THUMBNAIL_RATE,
            fullscreen: false,
        }
    }

    fn activate(&mut self) {
        self.selected = true;
        self.muted = false;
        self.rate = NORMAL_RATE;
        self.handle.set_mute(false);
        self.handle.set_rate(NORMAL_RATE);
    }

    fn deactivate(&mut self) {
        self.selected = false;
        self.muted = true;
        self.rate = THUMBNAIL_RATE;
        self.handle.set_mute(true);
        self.handle.set_rate(THUMBNAIL_RATE);
    }

    fn enter_fullscreen(&mut self) {
        self.fullscreen = true;
        self.handle.set_render_target(RenderTarget::Viewport);
    }

    fn exit_fullscreen(&mut self) {
        self.fullscreen = false;
        self.handle.set_render_target(RenderTarget::Thumbnail);
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        self.handle.set_mute(self.muted);
    }

    pub fn seek(&mut self, seconds: f64) {
        self.handle.seek(seconds);
    }

    pub fn rewind(&mut self) {
        self.handle.rewind();
    }

    pub fn toggle_pause(&mut self) {
        self.handle.toggle_pause();
    }
}

/// Grid state machine: Idle (no selection), Selected, Fullscreen.
///
/// Invariants: a fullscreen index always equals the selected index, and both
/// are in bounds or `None`.
#[derive(Default)]
pub struct GridState {
    slots: Vec<GridSlot>,
    selected: Option<usize>,
    fullscreen: Option<usize>,
}

impl GridState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the grid for a new directory listing. Old playback resources
    /// are released before any new ones are acquired, since the playback
    /// subsystem may pool decoders.
    pub fn display<'a>(
        &mut self,
        paths: impl IntoIterator<Item = &'a Path>,
        backend: &mut dyn PlayerBackend,
        volume: f64,
    ) {
        self.slots.clear();
        self.selected = None;
        self.fullscreen = None;

        for path in paths {
            let handle = backend.acquire(path, volume);
            self.slots.push(GridSlot::new(path.to_path_buf(), handle));
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[GridSlot] {
        &self.slots
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn fullscreen_index(&self) -> Option<usize> {
        self.fullscreen
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen.is_some()
    }

    pub fn selected_path(&self) -> Option<&Path> {
        self.selected.map(|i| self.slots[i].path())
    }

    pub fn selected_slot_mut(&mut self) -> Option<&mut GridSlot> {
        let index = self.selected?;
        self.slots.get_mut(index)
    }

    /// Selects `index` (or clears the selection with `None`). Selecting the
    /// current index is a no-op. A fullscreen slot exits fullscreen; plain
    /// selection never enters it.
    pub fn select(&mut self, index: Option<usize>) {
        self.select_inner(index, false);
    }

    fn select_inner(&mut self, index: Option<usize>, maintain_fullscreen: bool) {
        if index == self.selected {
            return;
        }
        if let Some(i) = index {
            if i >= self.slots.len() {
                warn!("select out of range: {} (len {})", i, self.slots.len());
                return;
            }
        }

        let was_fullscreen = self.fullscreen.is_some();

        // The old slot leaves fullscreen before anything else so no frame
        // ever has two fullscreen-active slots.
        if let Some(f) = self.fullscreen.take() {
            self.slots[f].exit_fullscreen();
        }

        let old = self.selected;
        self.selected = index;

        // The new slot activates before the old one deactivates; with pooled
        // playback resources the swapped order shows a both-muted frame.
        if let Some(i) = index {
            self.slots[i].activate();
            if maintain_fullscreen && was_fullscreen {
                self.slots[i].enter_fullscreen();
                self.fullscreen = Some(i);
            }
        }

        if let Some(o) = old {
            self.slots[o].deactivate();
        }
    }

    /// Moves the selection by `delta`, wrapping circularly. From Idle, a
    /// forward move starts at the first item and a backward move at the
    /// last. Fullscreen follows the selection.
    pub fn move_selection(&mut self, delta: isize) {
        if self.slots.is_empty() {
            return;
        }

        let len = self.slots.len() as isize;
        let next = match self.selected {
            None => {
                if delta > 0 {
                    0
                } else {
                    len - 1
                }
            }
            Some(s) => (s as isize + delta).rem_euclid(len),
        };

        self.select_inner(Some(next as usize), true);
    }

    /// Flips fullscreen on the selected slot. No-op without a selection.
    /// Returns whether a slot is fullscreen afterward.
    pub fn toggle_fullscreen(&mut self) -> bool {
        let Some(index) = self.selected else {
            return false;
        };

        if self.fullscreen.take().is_some() {
            self.slots[index].exit_fullscreen();
            false
        } else {
            self.slots[index].enter_fullscreen();
            self.fullscreen = Some(index);
            true
        }
    }

    /// Context-dependent exit: fullscreen first, then selection, then a
    /// request to pick a new directory.
    pub fn escape(&mut self) -> EscapeAction {
        if let Some(f) = self.fullscreen.take() {
            self.slots[f].exit_fullscreen();
            EscapeAction::ExitedFullscreen
        } else if self.selected.is_some() {
            self.select(None);
            EscapeAction::Deselected
        } else {
            EscapeAction::PickDirectory
        }
    }

    /// Removes the slot at `index` after its file left the directory,
    /// releasing its playback resources. If the removed slot was selected,
    /// the slot now at the same position (clamped to the new length) is
    /// selected instead, keeping fullscreen if it was active.
    pub fn remove(&mut self, index: usize) -> RemoveOutcome {
        if index >= self.slots.len() {
            warn!("remove out of range: {} (len {})", index, self.slots.len());
            return RemoveOutcome::Removed;
        }

        let was_selected = self.selected == Some(index);
        let was_fullscreen = self.fullscreen == Some(index);

        if was_fullscreen {
            self.fullscreen = None;
        }
        self.slots.remove(index);

        if let Some(s) = self.selected {
            if s > index {
                self.selected = Some(s - 1);
            }
        }
        if let Some(f) = self.fullscreen {
            if f > index {
                self.fullscreen = Some(f - 1);
            }
        }

        if !was_selected {
            return RemoveOutcome::Removed;
        }

        self.selected = None;
        if self.slots.is_empty() {
            return RemoveOutcome::Empty;
        }

        let new_index = index.min(self.slots.len() - 1);
        self.slots[new_index].activate();
        self.selected = Some(new_index);
        if was_fullscreen {
            self.slots[new_index].enter_fullscreen();
            self.fullscreen = Some(new_index);
        }

        RemoveOutcome::Reselected(new_index)
    }

    /// Rewrites a slot's path after a rename on disk. Playback continues on
    /// the open handle.
    pub fn rewrite_path(&mut self, index: usize, new_path: PathBuf) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.path = new_path;
        }
    }

    /// Applies the output volume to every slot.
    pub fn set_volume(&mut self, volume: f64) {
        for slot in &mut self.slots {
            slot.handle.set_volume(volume);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::player::recording::{PlayerEvent, RecordingBackend};

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|n| PathBuf::from(format!("/v/{n}"))).collect()
    }

    fn grid_with(names: &[&str]) -> (GridState, RecordingBackend) {
        let mut backend = RecordingBackend::new();
        let mut grid = GridState::new();
        let paths = paths(names);
        grid.display(paths.iter().map(|p| p.as_path()), &mut backend, 1.0);
        backend.log().borrow_mut().clear();
        (grid, backend)
    }

    fn assert_invariant(grid: &GridState) {
        if let Some(f) = grid.fullscreen_index() {
            assert_eq!(Some(f), grid.selected_index());
            assert!(f < grid.len());
        }
        if let Some(s) = grid.selected_index() {
            assert!(s < grid.len());
        }
    }

    #[test]
    fn test_select_is_idempotent() {
        let (mut grid, backend) = grid_with(&["a.mp4", "b.mp4"]);

        grid.select(Some(0));
        let after_first = backend.log().borrow().len();
        grid.select(Some(0));
        assert_eq!(backend.log().borrow().len(), after_first);
        assert_eq!(grid.selected_index(), Some(0));
    }

    #[test]
    fn test_select_activates_new_before_deactivating_old() {
        let (mut grid, backend) = grid_with(&["a.mp4", "b.mp4"]);
        grid.select(Some(0));
        backend.log().borrow_mut().clear();

        grid.select(Some(1));

        let log = backend.log();
        let log = log.borrow();
        let unmute_new = log
            .iter()
            .position(|e| *e == PlayerEvent::Mute(PathBuf::from("/v/b.mp4"), false))
            .expect("new slot unmuted");
        let mute_old = log
            .iter()
            .position(|e| *e == PlayerEvent::Mute(PathBuf::from("/v/a.mp4"), true))
            .expect("old slot muted");
        assert!(unmute_new < mute_old, "activation must precede deactivation");
    }

    #[test]
    fn test_move_selection_wraps_and_is_symmetric() {
        let (mut grid, _backend) = grid_with(&["a.mp4", "b.mp4", "c.mp4"]);

        for start in 0..3 {
            grid.select(Some(start));
            grid.move_selection(1);
            grid.move_selection(-1);
            assert_eq!(grid.selected_index(), Some(start));
        }

        // Circular wrap both ways.
        grid.select(Some(2));
        grid.move_selection(1);
        assert_eq!(grid.selected_index(), Some(0));
        grid.move_selection(-1);
        assert_eq!(grid.selected_index(), Some(2));
    }

    #[test]
    fn test_move_selection_from_idle() {
        let (mut grid, _backend) = grid_with(&["a.mp4", "b.mp4", "c.mp4"]);

        grid.move_selection(1);
        assert_eq!(grid.selected_index(), Some(0));

        grid.select(None);
        grid.move_selection(-1);
        assert_eq!(grid.selected_index(), Some(2));
    }

    #[test]
    fn test_move_selection_on_empty_grid() {
        let (mut grid, _backend) = grid_with(&[]);
        grid.move_selection(1);
        assert_eq!(grid.selected_index(), None);
    }

    #[test]
    fn test_fullscreen_requires_selection() {
        let (mut grid, _backend) = grid_with(&["a.mp4"]);
        assert!(!grid.toggle_fullscreen());
        assert_eq!(grid.fullscreen_index(), None);
    }

    #[test]
    fn test_fullscreen_follows_selection() {
        let (mut grid, backend) = grid_with(&["a.mp4", "b.mp4"]);
        grid.select(Some(0));
        assert!(grid.toggle_fullscreen());
        backend.log().borrow_mut().clear();

        grid.move_selection(1);
        assert_invariant(&grid);
        assert_eq!(grid.fullscreen_index(), Some(1));

        // The old slot leaves the viewport before the new one enters it.
        let log = backend.log();
        let log = log.borrow();
        let exit_old = log
            .iter()
            .position(|e| {
                *e == PlayerEvent::Target(PathBuf::from("/v/a.mp4"), RenderTarget::Thumbnail)
            })
            .expect("old slot left fullscreen");
        let enter_new = log
            .iter()
            .position(|e| {
                *e == PlayerEvent::Target(PathBuf::from("/v/b.mp4"), RenderTarget::Viewport)
            })
            .expect("new slot entered fullscreen");
        assert!(exit_old < enter_new, "no frame may have two fullscreen slots");
    }

    #[test]
    fn test_plain_select_drops_fullscreen() {
        let (mut grid, _backend) = grid_with(&["a.mp4", "b.mp4"]);
        grid.select(Some(0));
        grid.toggle_fullscreen();

        grid.select(Some(1));
        assert_eq!(grid.selected_index(), Some(1));
        assert_eq!(grid.fullscreen_index(), None);
        assert_invariant(&grid);
    }

    #[test]
    fn test_escape_cascade() {
        let (mut grid, _backend) = grid_with(&["a.mp4"]);
        grid.select(Some(0));
        grid.toggle_fullscreen();

        assert_eq!(grid.escape(), EscapeAction::ExitedFullscreen);
        assert_eq!(grid.selected_index(), Some(0));
        assert_eq!(grid.escape(), EscapeAction::Deselected);
        assert_eq!(grid.selected_index(), None);
        assert_eq!(grid.escape(), EscapeAction::PickDirectory);
    }

    #[test]
    fn test_remove_selected_reselects_same_position() {
        let (mut grid, _backend) = grid_with(&["a.mp4", "b.mp4", "c.mp4"]);
        grid.select(Some(1));

        assert_eq!(grid.remove(1), RemoveOutcome::Reselected(1));
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.selected_path().unwrap(), Path::new("/v/c.mp4"));
        assert_invariant(&grid);
    }

    #[test]
    fn test_remove_selected_last_clamps() {
        let (mut grid, _backend) = grid_with(&["a.mp4", "b.mp4"]);
        grid.select(Some(1));

        assert_eq!(grid.remove(1), RemoveOutcome::Reselected(0));
        assert_eq!(grid.selected_path().unwrap(), Path::new("/v/a.mp4"));
    }

    #[test]
    fn test_remove_before_selection_shifts_index() {
        let (mut grid, _backend) = grid_with(&["a.mp4", "b.mp4", "c.mp4"]);
        grid.select(Some(2));

        assert_eq!(grid.remove(0), RemoveOutcome::Removed);
        assert_eq!(grid.selected_index(), Some(1));
        assert_eq!(grid.selected_path().unwrap(), Path::new("/v/c.mp4"));
        assert_invariant(&grid);
    }

    #[test]
    fn test_remove_last_item_empties_grid() {
        let (mut grid, _backend) = grid_with(&["a.mp4"]);
        grid.select(Some(0));
        grid.toggle_fullscreen();

        assert_eq!(grid.remove(0), RemoveOutcome::Empty);
        assert_eq!(grid.selected_index(), None);
        assert_eq!(grid.fullscreen_index(), None);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_remove_keeps_fullscreen_on_reselected_slot() {
        let (mut grid, _backend) = grid_with(&["a.mp4", "b.mp4", "c.mp4"]);
        grid.select(Some(1));
        grid.toggle_fullscreen();

        assert_eq!(grid.remove(1), RemoveOutcome::Reselected(1));
        assert_eq!(grid.fullscreen_index(), Some(1));
        assert_invariant(&grid);
    }

    #[test]
    fn test_remove_releases_slot_resources() {
        let (mut grid, backend) = grid_with(&["a.mp4", "b.mp4"]);
        grid.remove(0);

        let log = backend.log();
        assert!(log
            .borrow()
            .contains(&PlayerEvent::Release(PathBuf::from("/v/a.mp4"))));
    }

    #[test]
    fn test_display_releases_before_acquiring() {
        let mut backend = RecordingBackend::new();
        let mut grid = GridState::new();
        let first = paths(&["a.mp4"]);
        grid.display(first.iter().map(|p| p.as_path()), &mut backend, 1.0);
        backend.log().borrow_mut().clear();

        let second = paths(&["b.mp4"]);
        grid.display(second.iter().map(|p| p.as_path()), &mut backend, 1.0);

        let log = backend.log();
        let log = log.borrow();
        let release = log
            .iter()
            .position(|e| *e == PlayerEvent::Release(PathBuf::from("/v/a.mp4")))
            .expect("old slot released");
        let acquire = log
            .iter()
            .position(|e| *e == PlayerEvent::Acquire(PathBuf::from("/v/b.mp4")))
            .expect("new slot acquired");
        assert!(release < acquire, "release must precede reacquisition");
    }

    #[test]
    fn test_slot_flags_track_selection() {
        let (mut grid, _backend) = grid_with(&["a.mp4", "b.mp4"]);
        grid.select(Some(0));

        assert!(grid.slots()[0].is_selected());
        assert!(!grid.slots()[0].is_muted());
        assert_eq!(grid.slots()[0].rate(), NORMAL_RATE);
        assert!(grid.slots()[1].is_muted());
        assert_eq!(grid.slots()[1].rate(), THUMBNAIL_RATE);

        grid.select(Some(1));
        assert!(grid.slots()[0].is_muted());
        assert_eq!(grid.slots()[0].rate(), THUMBNAIL_RATE);
    }

    #[test]
    fn test_rewrite_path() {
        let (mut grid, _backend) = grid_with(&["a.mp4"]);
        grid.rewrite_path(0, PathBuf::from("/v/renamed.mp4"));
        assert_eq!(grid.slots()[0].path(), Path::new("/v/renamed.mp4"));
    }
}
