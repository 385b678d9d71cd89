//! Terminal frontend.
//!
//! Renders the grid as a text listing and maps raw-mode key input onto the
//! controller's key events. Playback goes through the stub backend here, so
//! this frontend is mainly useful for driving the triage workflow over SSH
//! or inspecting state during development.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{cursor, queue, terminal};

use crate::app::{Frontend, FrontendEvent};
use crate::ui::controller::FrameState;
use crate::ui::keys::{Key, KeyEvent, Modifiers};

pub struct ConsoleFrontend {
    stdout: io::Stdout,
}

impl ConsoleFrontend {
    pub fn new() -> Result<Self> {
        terminal::enable_raw_mode().context("Failed to enable raw terminal mode")?;
        let mut stdout = io::stdout();
        queue!(stdout, terminal::EnterAlternateScreen, cursor::Hide)
            .context("Failed to enter alternate screen")?;
        stdout.flush()?;
        Ok(Self { stdout })
    }
}

impl Drop for ConsoleFrontend {
    fn drop(&mut self) {
        let _ = queue!(self.stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = self.stdout.flush();
        let _ = terminal::disable_raw_mode();
    }
}

impl Frontend for ConsoleFrontend {
    fn poll_events(&mut self, timeout: Duration) -> Result<Vec<FrontendEvent>> {
        let mut events = Vec::new();
        let mut wait = timeout;
        while event::poll(wait)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(mapped) = map_key(key) {
                        events.push(mapped);
                    }
                }
            }
            // Drain whatever else is already buffered without waiting again.
            wait = Duration::ZERO;
        }
        Ok(events)
    }

    fn present(&mut self, frame: &FrameState) -> Result<()> {
        queue!(
            self.stdout,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0)
        )?;

        for line in render_lines(frame) {
            write!(self.stdout, "{line}\r\n")?;
        }
        self.stdout.flush()?;
        Ok(())
    }
}

fn map_key(key: event::KeyEvent) -> Option<FrontendEvent> {
    let mods = Modifiers {
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
        shift: key.modifiers.contains(KeyModifiers::SHIFT),
    };

    let mapped = match key.code {
        KeyCode::Char('c') | KeyCode::Char('q') if mods.ctrl => return Some(FrontendEvent::Quit),
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Esc => Key::Escape,
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Char(c) => Key::Char(c),
        _ => return None,
    };

    Some(FrontendEvent::Key(KeyEvent::new(mapped, mods)))
}

/// Renders one frame snapshot as plain text lines.
fn render_lines(frame: &FrameState) -> Vec<String> {
    let mut lines = Vec::new();

    match &frame.directory {
        Some(dir) => lines.push(format!(
            "{} ({} clips)",
            dir.display(),
            frame.video_count
        )),
        None => lines.push(format!("({} clips)", frame.video_count)),
    }
    lines.push(String::new());

    for item in &frame.items {
        let marker = if item.selected { '>' } else { ' ' };
        let mut flags = String::new();
        if item.fullscreen {
            flags.push_str(" [FS]");
        }
        if item.muted {
            flags.push_str(" [muted]");
        }
        lines.push(format!("{marker} {} (x{}){flags}", item.name, item.rate));
    }

    if let Some(modal) = &frame.modal {
        lines.push(String::new());
        lines.push(format!("-- {} --", modal.title));
        lines.push(format!("> {}_", modal.buffer));
        for (i, suggestion) in modal.suggestions.iter().enumerate() {
            let marker = if modal.highlighted == Some(i) { '*' } else { ' ' };
            lines.push(format!("  {marker} {suggestion}"));
        }
    }

    if let Some(osd) = &frame.filename_osd {
        lines.push(String::new());
        lines.push(osd.clone());
    }
    if let Some(osd) = &frame.volume_osd {
        lines.push(String::new());
        lines.push(osd.clone());
    }

    lines
}
