/// Events emitted while handling one key action.
/// The presentation layer consumes these for overlays and sound.

use crate::domain::entity::{Hue, Pos};
use crate::domain::rules::DoorSide;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    ButtonPressed { hue: Hue, value: u32 },
    PaintPicked { paint: Option<Hue> },
    PaintApplied { pos: Pos, hue: Hue },
    PaintCleared { pos: Pos },
    CanvasRevealed { hue: Hue },
    GridInverted,
    WallsVanished,
    DecoyVanished { pos: Pos },
    LevelCompleted { level: usize },
    MarkerCollected { level: usize },
    /// Tried a door before finishing the level.
    DoorLocked,
    DoorTaken { level: usize, side: DoorSide, vote: Option<Hue> },
    LevelLoaded { level: usize },
    GameFinished { result: Hue },
    EpilogueStarted,
    GameRestarted,
}
