/// The per-level tile grid.
///
/// Loaded from rows of ASCII digits, one digit per cell. The outer ring
/// (row 0, the door row 1, the last row, first and last column) is the
/// level frame; whole-grid level rules only touch the interior.

use crate::domain::entity::Pos;
use crate::domain::tile::Tile;
use crate::error::{LevelError, Result};

/// First interior row. Rows above it hold the top wall and the doors.
const INTERIOR_TOP: usize = 2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    tiles: Vec<Vec<Tile>>,
    width: usize,
    height: usize,
}

impl Grid {
    /// Build a grid from equal-length digit rows.
    pub fn load<S: AsRef<str>>(layout: &str, rows: &[S]) -> Result<Grid> {
        if rows.is_empty() {
            return Err(LevelError::malformed(layout, "no rows"));
        }
        let width = rows[0].as_ref().len();
        if width == 0 {
            return Err(LevelError::malformed(layout, "first row is empty"));
        }

        let mut tiles = Vec::with_capacity(rows.len());
        for (y, row) in rows.iter().enumerate() {
            let row: &str = row.as_ref();
            if row.len() != width {
                return Err(LevelError::malformed(
                    layout,
                    format!("row {y} has {} columns, expected {width}", row.len()),
                ));
            }
            let mut line = Vec::with_capacity(width);
            for (x, ch) in row.bytes().enumerate() {
                if !ch.is_ascii_digit() {
                    return Err(LevelError::malformed(
                        layout,
                        format!("non-digit {:?} at ({x}, {y})", ch as char),
                    ));
                }
                let tile = Tile::from_code(ch - b'0').ok_or_else(|| {
                    LevelError::malformed(
                        layout,
                        format!("digit {} at ({x}, {y}) has no tile", ch as char),
                    )
                })?;
                line.push(tile);
            }
            tiles.push(line);
        }

        Ok(Grid { height: tiles.len(), width, tiles })
    }

    /// Parse layout text: one row per line, trailing blank lines ignored.
    pub fn parse(layout: &str, text: &str) -> Result<Grid> {
        let mut rows: Vec<&str> = text.lines().map(|l| l.trim_end_matches('\r')).collect();
        while rows.last().map_or(false, |r| r.trim().is_empty()) {
            rows.pop();
        }
        Grid::load(layout, &rows)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.col < self.width && pos.row < self.height
    }

    pub fn tile_at(&self, pos: Pos) -> Result<Tile> {
        if self.contains(pos) {
            Ok(self.tiles[pos.row][pos.col])
        } else {
            Err(LevelError::OutOfBounds { col: pos.col, row: pos.row })
        }
    }

    pub fn set_tile(&mut self, pos: Pos, tile: Tile) -> Result<()> {
        if self.contains(pos) {
            self.tiles[pos.row][pos.col] = tile;
            Ok(())
        } else {
            Err(LevelError::OutOfBounds { col: pos.col, row: pos.row })
        }
    }

    /// Off-grid cells count as walls.
    #[inline]
    pub fn is_walkable(&self, pos: Pos) -> bool {
        self.tile_at(pos).map_or(false, Tile::is_walkable)
    }

    pub fn rows(&self) -> &[Vec<Tile>] {
        &self.tiles
    }

    // ── Interior rules ──

    /// Apply `f` to every interior tile.
    fn map_interior(&mut self, mut f: impl FnMut(Tile) -> Tile) {
        if self.height < 2 || self.width < 2 {
            return;
        }
        for row in INTERIOR_TOP..self.height - 1 {
            for col in 1..self.width - 1 {
                let tile = &mut self.tiles[row][col];
                *tile = f(*tile);
            }
        }
    }

    /// Remove every interior wall.
    pub fn clear_interior_walls(&mut self) {
        self.map_interior(|t| if t == Tile::Wall { Tile::Empty } else { t });
    }

    /// Swap Empty and Wall across the interior. Other tiles are untouched.
    pub fn invert_interior(&mut self) {
        self.map_interior(|t| match t {
            Tile::Empty => Tile::Wall,
            Tile::Wall => Tile::Empty,
            other => other,
        });
    }

    /// Cover every interior tile except hidden paths with `tile`.
    pub fn flood_interior(&mut self, tile: Tile) {
        self.map_interior(|t| if t == Tile::HiddenPath { t } else { tile });
    }
}
