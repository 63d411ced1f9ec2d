/// Keyboard input.
///
/// The game is turn-based: every key press is one action, so input is a
/// blocking read of the next terminal event mapped through the
/// configured key bindings. Only Press events count; Repeat and Release
/// events (reported by terminals with keyboard enhancement) are dropped.

use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::KeyBindings;
use crate::domain::entity::Action;

/// What one terminal event means to the game loop.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Input {
    Action(Action),
    /// Terminal resized: redraw everything.
    Resize,
    Ignored,
}

pub struct InputState {
    keys: KeyBindings,
}

impl InputState {
    pub fn new(keys: KeyBindings) -> Self {
        InputState { keys }
    }

    /// Block until the next terminal event.
    pub fn next(&self) -> io::Result<Input> {
        Ok(match event::read()? {
            Event::Key(key) => self.map_key(&key),
            Event::Resize(..) => Input::Resize,
            _ => Input::Ignored,
        })
    }

    pub fn map_key(&self, key: &KeyEvent) -> Input {
        if key.kind != KeyEventKind::Press {
            return Input::Ignored;
        }
        if is_ctrl_c(key) {
            return Input::Action(Action::Quit);
        }
        match self.keys.action_for(key.code) {
            Some(action) => {
                log::trace!("{:?} -> {action:?}", key.code);
                Input::Action(action)
            }
            None => Input::Ignored,
        }
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && (key.code == KeyCode::Char('c') || key.code == KeyCode::Char('C'))
}
