/// Entities and input vocabulary shared by the session and the controller.

/// The three colors of the game: button dials, paint, and personality votes.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Hue {
    Red,
    Green,
    Blue,
}

impl Hue {
    pub const ALL: [Hue; 3] = [Hue::Red, Hue::Green, Hue::Blue];

    pub fn name(self) -> &'static str {
        match self {
            Hue::Red => "Red",
            Hue::Green => "Green",
            Hue::Blue => "Blue",
        }
    }
}

/// Movement direction (one cell per key press)
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveDir {
    Left,
    Right,
    Up,
    Down,
}

impl MoveDir {
    pub fn delta(self) -> (i32, i32) {
        match self {
            MoveDir::Left => (-1, 0),
            MoveDir::Right => (1, 0),
            MoveDir::Up => (0, -1),
            MoveDir::Down => (0, 1),
        }
    }
}

/// A discrete key action delivered by the input layer.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    Move(MoveDir),
    Activate,
    Invert,
    RestartLevel,
    Confirm,
    ToggleHint,
    ToggleHelp,
    ToggleSound,
    NewGame,
    Quit,
}

/// Grid coordinate: `col` grows right, `row` grows down.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Pos {
    pub col: usize,
    pub row: usize,
}

impl Pos {
    pub const fn new(col: usize, row: usize) -> Self {
        Pos { col, row }
    }

    /// Neighbor one step in `dir`, or None when it would leave the
    /// non-negative quadrant.
    pub fn step(self, dir: MoveDir) -> Option<Pos> {
        let (dx, dy) = dir.delta();
        let col = self.col.checked_add_signed(dx as isize)?;
        let row = self.row.checked_add_signed(dy as isize)?;
        Some(Pos { col, row })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub pos: Pos,
    /// Paint currently carried; None = unpainted.
    pub paint: Option<Hue>,
}

impl Player {
    pub fn new(pos: Pos, paint: Option<Hue>) -> Self {
        Player { pos, paint }
    }
}
