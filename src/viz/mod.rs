//! Dashboard visualizations.
//!
//! Each view is its own module with a `run()` function owning the
//! render loop.

pub mod globe;

use crate::help::render_help_overlay;
use crate::terminal::Terminal;
use crossterm::event::{KeyCode, KeyModifiers};
use crossterm::style::Color;

/// Runtime state for interactive controls shared by views: frame
/// speed, pause, and the help overlay.
pub struct VizState {
    pub speed: f32,
    pub paused: bool,
    pub show_help: bool,
    help: &'static str,
}

impl VizState {
    pub fn new(initial_speed: f32, help: &'static str) -> Self {
        Self {
            speed: initial_speed,
            paused: false,
            show_help: false,
            help,
        }
    }

    /// Handle a global key, returns true if the view should quit.
    pub fn handle_key(&mut self, code: KeyCode, _modifiers: KeyModifiers) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char(' ') => self.paused = !self.paused,
            KeyCode::Char('?') => self.show_help = !self.show_help,
            // Number keys: speed presets (1=fastest, 9=slowest)
            KeyCode::Char(c) if ('1'..='9').contains(&c) => {
                let n = c.to_digit(10).unwrap() as f32;
                self.speed = 0.005 * n * n;
            }
            _ => {}
        }
        false
    }

    /// Draw the help hint and, when toggled, the overlay box.
    pub fn render_help(&self, term: &mut Terminal, width: u16, height: u16) {
        let hint = "? help  q quit";
        term.set_str(
            (width as i32).saturating_sub(hint.len() as i32 + 1),
            height as i32 - 1,
            hint,
            Some(Color::DarkGrey),
            false,
        );
        if self.show_help {
            render_help_overlay(term, width, height, self.help);
        }
    }
}
