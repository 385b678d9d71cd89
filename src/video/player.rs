//! Playback resource model for grid slots.
//!
//! Decoding and rendering are delegated to an external playback subsystem;
//! this module defines the command surface the grid drives. Each visible grid
//! slot exclusively owns one `PlayerHandle` (decoder + texture). Dropping the
//! handle releases the underlying resources, and a slot must drop its old
//! handle before acquiring one for a new path.

use std::path::{Path, PathBuf};

use tracing::debug;

/// Playback rate for unselected thumbnail slots.
pub const THUMBNAIL_RATE: f64 = 0.1;
/// Playback rate for the selected clip.
pub const NORMAL_RATE: f64 = 1.0;

/// Render target size for a slot.
///
/// Thumbnails render into a small fixed texture; the fullscreen clip renders
/// at viewport resolution. Swapping targets releases the old texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderTarget {
    Thumbnail,
    Viewport,
}

/// One clip's playback resources. Commands are fire-and-forget; the playback
/// subsystem applies them to its own pipeline.
pub trait PlayerHandle {
    fn path(&self) -> &Path;
    fn set_mute(&mut self, mute: bool);
    fn set_rate(&mut self, rate: f64);
    fn set_volume(&mut self, volume: f64);
    /// Seek relative to the current position, in seconds.
    fn seek(&mut self, seconds: f64);
    /// Jump back to the start of the clip.
    fn rewind(&mut self);
    fn toggle_pause(&mut self);
    fn set_render_target(&mut self, target: RenderTarget);
}

/// Factory for per-slot playback resources.
pub trait PlayerBackend {
    /// Acquires playback resources for `path`. New handles start muted at
    /// thumbnail rate with the given output volume, looping from the start.
    fn acquire(&mut self, path: &Path, volume: f64) -> Box<dyn PlayerHandle>;
}

/// Backend that logs commands instead of decoding.
///
/// Stands in for a real playback subsystem during development and in the
/// terminal frontend, where there is nothing to render video into.
#[derive(Debug, Default)]
pub struct StubBackend;

impl PlayerBackend for StubBackend {
    fn acquire(&mut self, path: &Path, volume: f64) -> Box<dyn PlayerHandle> {
        debug!("acquire player for {:?} (volume {:.2})", path, volume);
        Box::new(StubHandle {
            path: path.to_path_buf(),
        })
    }
}

struct StubHandle {
    path: PathBuf,
}

impl PlayerHandle for StubHandle {
    fn path(&self) -> &Path {
        &self.path
    }

    fn set_mute(&mut self, mute: bool) {
        debug!("{:?}: mute={}", self.path, mute);
    }

    fn set_rate(&mut self, rate: f64) {
        debug!("{:?}: rate={}", self.path, rate);
    }

    fn set_volume(&mut self, volume: f64) {
        debug!("{:?}: volume={:.2}", self.path, volume);
    }

    fn seek(&mut self, seconds: f64) {
        debug!("{:?}: seek {:+}s", self.path, seconds);
    }

    fn rewind(&mut self) {
        debug!("{:?}: rewind", self.path);
    }

    fn toggle_pause(&mut self) {
        debug!("{:?}: toggle pause", self.path);
    }

    fn set_render_target(&mut self, target: RenderTarget) {
        debug!("{:?}: render target {:?}", self.path, target);
    }
}

impl Drop for StubHandle {
    fn drop(&mut self) {
        debug!("release player for {:?}", self.path);
    }
}
