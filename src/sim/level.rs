/// Level table and layout loader.
///
/// ## Sources (priority order):
///   1. `<levels_dir>/<layout>.txt`, re-read on every level load
///   2. Built-in layouts compiled into the binary
///
/// ## Layout format:
///   Rows of ASCII digits, all the same length (25 × 23 for the built-in
///   set). Row 0 is the top wall; row 1 holds the "yes" door at column 11
///   and the "no" door at column 13.
///
/// ## Tile legend:
///   '0' = Path        '1' = Wall          '2' = Door
///   '4' = Hidden path '7'/'8'/'9' = Decoy red/green/blue button

use std::path::PathBuf;

use crate::domain::button::ButtonDef;
use crate::domain::entity::{Hue, Pos};
use crate::domain::grid::Grid;
use crate::domain::rules::SCORED_LEVELS;
use crate::error::{LevelError, Result};

pub const LEVEL_COUNT: usize = 10;
/// Backdrop for the personality result.
pub const RESULT_LEVEL: usize = SCORED_LEVELS + 1;
/// Free painting after the result has been dismissed.
pub const EPILOGUE_LEVEL: usize = LEVEL_COUNT;

pub const DOOR_ROW: usize = 1;
pub const YES_DOOR_COL: usize = 11;
pub const NO_DOOR_COL: usize = 13;

/// Column used for buttons that must never be reachable.
const OFF_GRID: usize = usize::MAX;

/// Inclusive rectangle of grid cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub left: usize,
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
}

impl Rect {
    pub fn contains(&self, pos: Pos) -> bool {
        (self.left..=self.right).contains(&pos.col) && (self.top..=self.bottom).contains(&pos.row)
    }
}

/// Level-specific behavior layered on the common movement/paint rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelRule {
    Plain,
    /// The invert key swaps walls and paths.
    Inverse,
    /// Decoy buttons vanish when stepped on.
    Decoys,
    /// Painting outside `frame` floods the grid with paint.
    Canvas { frame: Rect },
    /// Every key press clears the interior walls.
    Vanishing,
}

/// Where the renderer prints a button's dial value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialDisplay {
    OnButton,
    /// On the cell this many rows below the button.
    Below(usize),
}

/// Static configuration of one level.
#[derive(Clone, Debug)]
pub struct LevelDef {
    pub number: usize,
    pub title: &'static str,
    pub layout: &'static str,
    pub start: Pos,
    pub start_paint: Option<Hue>,
    /// Red, green, blue.
    pub buttons: [ButtonDef; 3],
    pub marker: Pos,
    /// Top cell of the four-cell palette column.
    pub palette: Option<Pos>,
    pub rule: LevelRule,
    pub dial: DialDisplay,
    pub hint: &'static str,
    pub question: &'static str,
}

const fn level(
    number: usize,
    title: &'static str,
    layout: &'static str,
    start: (usize, usize),
    buttons: [ButtonDef; 3],
    marker: (usize, usize),
) -> LevelDef {
    LevelDef {
        number,
        title,
        layout,
        start: Pos::new(start.0, start.1),
        start_paint: None,
        buttons,
        marker: Pos::new(marker.0, marker.1),
        palette: None,
        rule: LevelRule::Plain,
        dial: DialDisplay::OnButton,
        hint: "",
        question: "",
    }
}

pub static LEVELS: [LevelDef; LEVEL_COUNT] = [
    LevelDef {
        hint: "Dial red to 2, green to 1 and blue to 2 with SPACE, then pick up the question mark.",
        question: "Do you plan your route before you take the first step?",
        ..level(1, "First Light", "default", (5, 5),
            [ButtonDef::new(10, 17, 5, 2), ButtonDef::new(12, 17, 5, 1), ButtonDef::new(14, 17, 5, 2)],
            (17, 18))
    },
    LevelDef {
        rule: LevelRule::Inverse,
        hint: "Some mazes are easier inside out. Press I. The dials want 2, 5 and 3.",
        question: "When a road is blocked, do you turn back and look for another?",
        ..level(2, "Negative Space", "maze", (22, 2),
            [ButtonDef::new(8, 20, 5, 2), ButtonDef::new(12, 20, 5, 5), ButtonDef::new(16, 20, 5, 3)],
            (17, 18))
    },
    LevelDef {
        rule: LevelRule::Decoys,
        dial: DialDisplay::Below(5),
        hint: "Only three buttons are real. Their numbers are written on the wall below. Aim for 2, 1, 2.",
        question: "Do you trust what you see at first glance?",
        ..level(3, "Decoys", "decoys", (5, 5),
            [ButtonDef::new(10, 17, 5, 2), ButtonDef::new(12, 17, 5, 1), ButtonDef::new(14, 17, 5, 2)],
            (17, 18))
    },
    LevelDef {
        start_paint: Some(Hue::Red),
        palette: Some(Pos::new(7, 7)),
        rule: LevelRule::Canvas { frame: Rect { left: 6, top: 5, right: 18, bottom: 12 } },
        hint: "Think outside the box. Then paint.",
        question: "Do you colour inside the lines?",
        ..level(4, "Canvas", "canvas", (10, 8),
            [ButtonDef::new(10, 21, 5, 1), ButtonDef::new(12, 21, 5, 3), ButtonDef::new(14, 21, 5, 4)],
            (17, 18))
    },
    LevelDef {
        hint: "Red rises to five, green stops at three, blue reaches seven.",
        question: "Would you rather lead than follow?",
        ..level(5, "Spectrum", "default", (5, 5),
            [ButtonDef::new(7, 17, 9, 5), ButtonDef::new(12, 17, 9, 3), ButtonDef::new(17, 17, 9, 7)],
            (12, 5))
    },
    LevelDef {
        rule: LevelRule::Vanishing,
        hint: "Look before you move. The numbers fade at your first step.",
        question: "Do you remember the details others forget?",
        ..level(6, "Afterimage", "vanishing", (1, 2),
            [ButtonDef::new(22, 4, 20, 5), ButtonDef::new(22, 10, 20, 13), ButtonDef::new(22, 16, 20, 8)],
            (22, 5))
    },
    LevelDef {
        hint: "Letters are numbers too. R, G, B.",
        question: "Do rules feel like puzzles rather than walls?",
        ..level(7, "Alphabet", "default", (5, 5),
            [ButtonDef::new(10, 17, 26, 18), ButtonDef::new(12, 17, 26, 7), ButtonDef::new(14, 17, 26, 2)],
            (9, 8))
    },
    LevelDef {
        palette: Some(Pos::new(6, 5)),
        hint: "Word search: RED hides twice, GREEN twice, BLUE three times. Paint the floor if it helps.",
        question: "Is it the journey, more than the door at the end?",
        ..level(8, "Word Search", "default", (5, 5),
            [ButtonDef::new(10, 17, 9, 2), ButtonDef::new(12, 17, 9, 2), ButtonDef::new(14, 17, 9, 3)],
            (9, 8))
    },
    LevelDef {
        palette: Some(Pos::new(6, 5)),
        hint: "Your colours have been counted.",
        ..level(9, "Reflection", "default", (5, 5),
            [ButtonDef::new(10, 17, 9, 2), ButtonDef::new(12, 17, 9, 2), ButtonDef::new(14, 17, 9, 3)],
            (9, 8))
    },
    LevelDef {
        palette: Some(Pos::new(1, 2)),
        hint: "Nothing left to solve. Paint whatever you like.",
        ..level(10, "Free Paint", "default", (5, 5),
            [ButtonDef::new(OFF_GRID, 17, 99, 100), ButtonDef::new(OFF_GRID, 18, 99, 100), ButtonDef::new(OFF_GRID, 19, 99, 100)],
            (9, 8))
    },
];

/// Configuration for a 1-based level number.
pub fn level_def(number: usize) -> Option<&'static LevelDef> {
    number.checked_sub(1).and_then(|i| LEVELS.get(i))
}

// ══════════════════════════════════════════════════════════════
// Layout store
// ══════════════════════════════════════════════════════════════

const EMBEDDED_LAYOUTS: [(&str, &str); 5] = [
    ("default", include_str!("../../levels/default.txt")),
    ("maze", include_str!("../../levels/maze.txt")),
    ("decoys", include_str!("../../levels/decoys.txt")),
    ("canvas", include_str!("../../levels/canvas.txt")),
    ("vanishing", include_str!("../../levels/vanishing.txt")),
];

/// Resolves layout names to grids.
#[derive(Clone, Debug, Default)]
pub struct LevelStore {
    dir: Option<PathBuf>,
}

impl LevelStore {
    /// Built-in layouts only.
    pub fn embedded() -> Self {
        LevelStore { dir: None }
    }

    /// Files in `dir` override the built-in layouts of the same name.
    pub fn with_dir(dir: PathBuf) -> Self {
        LevelStore { dir: Some(dir) }
    }

    pub fn grid(&self, layout: &str) -> Result<Grid> {
        if let Some(dir) = &self.dir {
            let path = dir.join(format!("{layout}.txt"));
            if path.is_file() {
                let text = std::fs::read_to_string(&path).map_err(|e| {
                    LevelError::malformed(layout, format!("cannot read {}: {e}", path.display()))
                })?;
                log::debug!("layout `{layout}` loaded from {}", path.display());
                return Grid::parse(layout, &text);
            }
        }

        let text = EMBEDDED_LAYOUTS
            .iter()
            .find(|(name, _)| *name == layout)
            .map(|(_, text)| *text)
            .ok_or_else(|| LevelError::malformed(layout, "no such layout"))?;
        Grid::parse(layout, text)
    }
}
