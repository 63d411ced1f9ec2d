/// Overlay panels drawn over the level: intro, help, hint, locked-door
/// warning, the marker's question, the personality result.
///
/// Owned by the presentation layer. Keys toggle or dismiss panels here;
/// everything else changes in response to `GameEvent`s.

use crate::domain::entity::Action;
use crate::sim::event::GameEvent;

pub const INTRO: &[&str] = &[
    "Welcome to RGB.",
    "",
    "Every room hides three dials: red, green and blue.",
    "Turn each one to its number and a question mark appears.",
    "Pick it up, then answer with your feet:",
    "the left door means yes, the right door means no.",
    "",
    "Eight questions later you will know your colour.",
];

pub const HELP: &[&str] = &[
    "Arrows / WASD   move",
    "Space           press a dial, paint, use the palette",
    "I               invert (when the room allows it)",
    "R               restart the room",
    "H               hint",
    "Enter           dismiss",
    "M               sound on/off",
    "J               this help",
    "Esc / Q         quit",
];

pub const WARNING: &str = "The doors are locked. Set all three dials and pick up the question mark first.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Overlays {
    pub intro: bool,
    pub help: bool,
    pub hint: bool,
    pub warning: bool,
    pub question: bool,
    pub result: bool,
    pub sound_on: bool,
    /// One-line status message, cleared on the next key.
    pub message: Option<String>,
}

impl Overlays {
    /// Game start: intro and help showing.
    pub fn new(sound_on: bool) -> Self {
        Overlays {
            intro: true,
            help: true,
            hint: false,
            warning: false,
            question: false,
            result: false,
            sound_on,
            message: None,
        }
    }

    /// Apply the overlay side of a key. Returns true when a panel was
    /// dismissed.
    pub fn handle(&mut self, action: Action) -> bool {
        self.message = None;
        match action {
            Action::Confirm => {
                let any = self.warning || self.hint || self.intro || self.question;
                self.warning = false;
                self.hint = false;
                self.intro = false;
                self.question = false;
                any
            }
            Action::ToggleHint => {
                self.hint = !self.hint;
                false
            }
            Action::ToggleHelp => {
                self.help = !self.help;
                false
            }
            Action::ToggleSound => {
                self.sound_on = !self.sound_on;
                false
            }
            _ => false,
        }
    }

    /// React to what the simulation did this cycle.
    pub fn apply(&mut self, events: &[GameEvent]) {
        for e in events {
            match e {
                GameEvent::LevelLoaded { .. } => {
                    self.warning = false;
                    self.hint = false;
                    self.question = false;
                    self.help = false;
                    self.result = false;
                }
                GameEvent::DoorLocked => self.warning = true,
                GameEvent::MarkerCollected { .. } => self.question = true,
                GameEvent::GameFinished { .. } => self.result = true,
                GameEvent::GameRestarted => self.intro = true,
                _ => {}
            }
        }
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }
}
