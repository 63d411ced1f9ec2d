/// Tile types and their properties.
/// Properties are queried via methods, not stored as flags,
/// so tile semantics are centralized here.

use crate::domain::entity::Hue;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tile {
    Empty,
    Wall,
    Door,
    RedPaint,
    GreenPaint,
    BluePaint,
    HiddenPath,      // Looks like Empty, survives the canvas flood
    FakeRedButton,   // Decoy, vanishes when stepped on
    FakeGreenButton,
    FakeBlueButton,
}

impl Tile {
    /// Map a layout digit value to its tile. Values without a tile return None.
    pub fn from_code(code: u8) -> Option<Tile> {
        match code {
            0 => Some(Tile::Empty),
            1 => Some(Tile::Wall),
            2 => Some(Tile::Door),
            4 => Some(Tile::HiddenPath),
            7 => Some(Tile::FakeRedButton),
            8 => Some(Tile::FakeGreenButton),
            9 => Some(Tile::FakeBlueButton),
            10 => Some(Tile::RedPaint),
            11 => Some(Tile::GreenPaint),
            12 => Some(Tile::BluePaint),
            _ => None,
        }
    }

    #[allow(dead_code)]
    pub fn code(self) -> u8 {
        match self {
            Tile::Empty => 0,
            Tile::Wall => 1,
            Tile::Door => 2,
            Tile::HiddenPath => 4,
            Tile::FakeRedButton => 7,
            Tile::FakeGreenButton => 8,
            Tile::FakeBlueButton => 9,
            Tile::RedPaint => 10,
            Tile::GreenPaint => 11,
            Tile::BluePaint => 12,
        }
    }

    /// The paint tile for a hue.
    pub fn paint(hue: Hue) -> Tile {
        match hue {
            Hue::Red => Tile::RedPaint,
            Hue::Green => Tile::GreenPaint,
            Hue::Blue => Tile::BluePaint,
        }
    }

    /// Can the player occupy this cell? Everything but walls.
    pub fn is_walkable(self) -> bool {
        !matches!(self, Tile::Wall)
    }

    pub fn is_fake_button(self) -> bool {
        matches!(self, Tile::FakeRedButton | Tile::FakeGreenButton | Tile::FakeBlueButton)
    }

    /// Hue of a paint tile or a decoy button.
    pub fn hue(self) -> Option<Hue> {
        match self {
            Tile::RedPaint | Tile::FakeRedButton => Some(Hue::Red),
            Tile::GreenPaint | Tile::FakeGreenButton => Some(Hue::Green),
            Tile::BluePaint | Tile::FakeBlueButton => Some(Hue::Blue),
            _ => None,
        }
    }
}

impl Default for Tile {
    fn default() -> Self {
        Tile::Empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for code in 0..=12u8 {
            if let Some(tile) = Tile::from_code(code) {
                assert_eq!(tile.code(), code);
            }
        }
    }

    #[test]
    fn unassigned_codes_have_no_tile() {
        assert_eq!(Tile::from_code(3), None);
        assert_eq!(Tile::from_code(5), None);
        assert_eq!(Tile::from_code(6), None);
        assert_eq!(Tile::from_code(13), None);
    }

    #[test]
    fn only_walls_block() {
        assert!(!Tile::Wall.is_walkable());
        assert!(Tile::Door.is_walkable());
        assert!(Tile::BluePaint.is_walkable());
        assert!(Tile::HiddenPath.is_walkable());
        assert!(Tile::FakeGreenButton.is_walkable());
    }
}
