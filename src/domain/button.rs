/// Dial buttons: pressing one while standing on it advances its value,
/// wrapping from `max` back to zero.

use crate::domain::entity::{Hue, Pos};

/// Static description of a button, one per hue per level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonDef {
    pub pos: Pos,
    pub max: u32,
    pub target: u32,
}

impl ButtonDef {
    pub const fn new(col: usize, row: usize, max: u32, target: u32) -> Self {
        ButtonDef { pos: Pos::new(col, row), max, target }
    }
}

#[derive(Clone, Debug)]
pub struct Button {
    pub pos: Pos,
    pub hue: Hue,
    value: u32,
    max: u32,
    target: u32,
    /// Pressed during the current input cycle. Cleared by `clear_flash`.
    flash: bool,
}

impl Button {
    pub fn new(def: ButtonDef, hue: Hue) -> Self {
        Button {
            pos: def.pos,
            hue,
            value: 0,
            max: def.max,
            target: def.target,
            flash: false,
        }
    }

    /// Advance the dial if the player is standing on this button.
    /// Returns true when the press landed.
    pub fn press(&mut self, player: Pos) -> bool {
        if player != self.pos {
            return false;
        }
        self.flash = true;
        self.value = if self.value < self.max { self.value + 1 } else { 0 };
        true
    }

    pub fn is_at_target(&self) -> bool {
        self.value == self.target
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn is_flashing(&self) -> bool {
        self.flash
    }

    pub fn clear_flash(&mut self) {
        self.flash = false;
    }
}
