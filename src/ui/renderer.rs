/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The renderer only reads: a `Snapshot` of the simulation and the
/// `Overlays` state. It never changes either.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::{Hue, Pos};
use crate::domain::tile::Tile;
use crate::sim::game::{Phase, Snapshot};
use crate::sim::level::{DialDisplay, LEVEL_COUNT, YES_DOOR_COL};
use crate::ui::overlay::{self, Overlays};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: [u8; 4],
    ch_len: u8,
    fg: Color,
    bg: Color,
    wide: bool,    // true = this char occupies 2 terminal columns
    cont: bool,    // true = continuation of previous wide char (skip render)
}

impl Cell {
    /// Explicit background for every "empty" terminal cell, so cell gaps
    /// match the cleared screen.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell {
        ch: [b' ', 0, 0, 0],
        ch_len: 1,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: false,
    };

    const WIDE_CONT: Cell = Cell {
        ch: [0; 4],
        ch_len: 0,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: true,
    };

    /// Sentinel used to invalidate the back buffer.
    const INVALID: Cell = Cell {
        ch: [b'?', 0, 0, 0],
        ch_len: 1,
        fg: Color::Magenta,
        bg: Color::Magenta,
        wide: false,
        cont: false,
    };

    #[inline]
    fn norm_bg(bg: Color) -> Color {
        match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        }
    }

    fn from_char(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        cell.ch_len = c.encode_utf8(&mut cell.ch).len() as u8;
        cell.fg = fg;
        cell.bg = Self::norm_bg(bg);
        cell
    }

    fn from_char_wide(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::from_char(c, fg, bg);
        cell.wide = true;
        cell
    }

    fn as_str(&self) -> &str {
        std::str::from_utf8(&self.ch[..self.ch_len as usize]).unwrap_or("")
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::from_char(ch, fg, bg));
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::from_char(' ', Color::White, bg));
        }
    }
}

// ── Palette ──

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const MSG_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };
const WALL_FG: Color = Color::Rgb { r: 120, g: 120, b: 120 };
const WALL_BG: Color = Color::Rgb { r: 70, g: 70, b: 70 };
const DOOR_BG: Color = Color::Rgb { r: 110, g: 70, b: 30 };
const PANEL_BG: Color = Color::Rgb { r: 40, g: 40, b: 40 };
const PANEL_HDR: Color = Color::Rgb { r: 255, g: 220, b: 50 };
const PANEL_TEXT: Color = Color::Rgb { r: 210, g: 210, b: 210 };

fn hue_color(hue: Hue) -> Color {
    match hue {
        Hue::Red => Color::Rgb { r: 200, g: 40, b: 40 },
        Hue::Green => Color::Rgb { r: 40, g: 170, b: 60 },
        Hue::Blue => Color::Rgb { r: 50, g: 80, b: 210 },
    }
}

fn result_blurb(hue: Hue) -> &'static [&'static str] {
    match hue {
        Hue::Red => &[
            "You act first and think on the move.",
            "Direct, energetic, hard to stop.",
        ],
        Hue::Green => &[
            "You keep things growing and in balance.",
            "Patient, steady, good company.",
        ],
        Hue::Blue => &[
            "You look deep before you leap.",
            "Calm, careful, quietly certain.",
        ],
    }
}

// ── Renderer ──

/// Each game cell = 2 terminal columns.
const CELL_W: usize = 2;

/// Vertical offsets
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_level: Option<usize>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_level: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.invalidate();

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Force a full repaint on the next frame.
    pub fn invalidate(&mut self) {
        self.back.cells.fill(Cell::INVALID);
    }

    pub fn render(&mut self, snap: &Snapshot, overlays: &Overlays) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.invalidate();
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // New level: clean slate.
        if self.last_level != Some(snap.level) {
            self.invalidate();
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_level = Some(snap.level);
        }

        self.front.clear();
        self.compose_game(snap, overlays);
        self.compose_overlays(snap, overlays);

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colors; ResetColor would fall back to the
        // terminal's own default background.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            let mut x = 0;
            while x < self.front.width {
                let cell = self.front.get(x, y);
                let prev = self.back.get(x, y);

                if cell.cont {
                    if cell != prev { need_move = true; }
                    x += 1;
                    continue;
                }

                let cont_changed = cell.wide
                    && x + 1 < self.front.width
                    && self.front.get(x + 1, y) != self.back.get(x + 1, y);

                if cell == prev && !cont_changed {
                    need_move = true;
                    x += 1;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.as_str()))?;

                if cell.wide {
                    last_x = x + 1;
                    x += 2;
                } else {
                    last_x = x;
                    x += 1;
                }
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_game(&mut self, s: &Snapshot, o: &Overlays) {
        // ── HUD row ──
        let status = match s.phase {
            Phase::Result => "your colour".to_string(),
            Phase::Epilogue => "free paint".to_string(),
            Phase::Playing if s.marker.is_collected() => "choose a door".to_string(),
            Phase::Playing if s.completed => "find the ?".to_string(),
            Phase::Playing => String::new(),
        };
        let hud = format!(
            " RGB  Room {}/{}  {:<16} {:<14} sound:{}",
            s.level, LEVEL_COUNT, s.title, status,
            if o.sound_on { "on" } else { "off" },
        );
        self.front.fill_row(HUD_ROW, HUD_BG);
        self.front.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);

        // ── Map ──
        for gy in 0..s.grid.height() {
            let row = MAP_ROW + gy;
            if row >= self.front.height { break; }
            for gx in 0..s.grid.width() {
                self.compose_cell(s, Pos::new(gx, gy), gx * CELL_W, row);
            }
        }
        if let DialDisplay::Below(offset) = s.dial {
            for b in s.buttons.iter() {
                let at = Pos::new(b.pos.col, b.pos.row + offset);
                if s.grid.contains(at) {
                    let label = format!("{:>2}", b.value());
                    self.front.put_str(at.col * CELL_W, MAP_ROW + at.row, &label, hue_color(b.hue), WALL_BG);
                }
            }
        }

        // ── Message bar ──
        let msg_row = MAP_ROW + s.grid.height() + 1;
        if let Some(msg) = &o.message {
            self.front.fill_row(msg_row, MSG_BG);
            self.front.put_str(0, msg_row, &format!(" ◈ {msg} "), Color::Black, MSG_BG);
        }

        // ── Help bar ──
        let help_row = msg_row + 2;
        let help = match s.phase {
            Phase::Result => " Enter: continue   N: new game   Esc: quit",
            _ => " Arrows:move  Space:use  I:invert  R:restart  H:hint  J:help  M:sound  Esc:quit",
        };
        self.front.put_str(0, help_row, help, Color::DarkGrey, Color::Reset);
    }

    /// Write the visual for game cell `p` into the front buffer at (col, row).
    fn compose_cell(&mut self, s: &Snapshot, p: Pos, col: usize, row: usize) {
        if s.player.pos == p {
            let bg = s.player.paint.map_or(Color::Reset, hue_color);
            self.front.set(col, row, Cell::from_char_wide('👻', Color::Reset, bg));
            self.front.set(col + 1, row, Cell::WIDE_CONT);
            return;
        }

        if let Some(b) = s.buttons.iter().find(|b| b.pos == p) {
            let (fg, bg) = if b.is_flashing() {
                (Color::Black, Color::White)
            } else {
                (Color::White, hue_color(b.hue))
            };
            let label = match s.dial {
                DialDisplay::OnButton => format!("{:>2}", b.value()),
                DialDisplay::Below(_) => "  ".to_string(),
            };
            self.front.put_str(col, row, &label, fg, bg);
            return;
        }

        if s.marker.is_visible() && s.marker.pos == p {
            self.front.put_str(col, row, " ?", Color::Black, PANEL_HDR);
            return;
        }

        if let Some(anchor) = s.palette {
            if p.col == anchor.col && p.row >= anchor.row && p.row - anchor.row < 4 {
                let swatch = match p.row - anchor.row {
                    0 => ("▓▓", hue_color(Hue::Red)),
                    1 => ("▓▓", hue_color(Hue::Green)),
                    2 => ("▓▓", hue_color(Hue::Blue)),
                    _ => ("░░", Color::White),
                };
                self.front.put_str(col, row, swatch.0, swatch.1, Color::Reset);
                return;
            }
        }

        let Ok(tile) = s.grid.tile_at(p) else {
            return;
        };
        let (glyph, fg, bg) = match tile {
            Tile::Empty | Tile::HiddenPath => ("  ", Color::Reset, Color::Reset),
            Tile::Wall => ("██", WALL_FG, WALL_BG),
            Tile::Door if p.col == YES_DOOR_COL => ("Y ", Color::White, DOOR_BG),
            Tile::Door => ("N ", Color::White, DOOR_BG),
            Tile::RedPaint | Tile::GreenPaint | Tile::BluePaint
            | Tile::FakeRedButton | Tile::FakeGreenButton | Tile::FakeBlueButton => {
                let bg = tile.hue().map_or(Color::Reset, hue_color);
                ("  ", Color::White, bg)
            }
        };
        self.front.put_str(col, row, glyph, fg, bg);
    }

    // ── Overlay panels ──

    fn compose_overlays(&mut self, s: &Snapshot, o: &Overlays) {
        let width = s.grid.width() * CELL_W;
        let view = (width, s.grid.height());
        if o.help {
            self.compose_panel("HELP", overlay::HELP.iter().map(|l| l.to_string()).collect(), view);
        }
        if o.intro {
            self.compose_panel("RGB", overlay::INTRO.iter().map(|l| l.to_string()).collect(), view);
        }
        if o.hint && !s.hint.is_empty() {
            self.compose_panel("HINT", wrap(s.hint, width.saturating_sub(6)), view);
        }
        if o.warning {
            self.compose_panel("LOCKED", wrap(overlay::WARNING, width.saturating_sub(6)), view);
        }
        if o.question && !s.question.is_empty() {
            let mut lines = wrap(s.question, width.saturating_sub(6));
            lines.push(String::new());
            lines.push("Yes: left door (Y)   No: right door (N)".to_string());
            self.compose_panel("?", lines, view);
        }
        if let (true, Some(hue)) = (o.result, s.result) {
            let mut lines = vec![format!("Your colour is {}.", hue.name().to_uppercase()), String::new()];
            lines.extend(result_blurb(hue).iter().map(|l| l.to_string()));
            lines.push(String::new());
            lines.push("Enter: paint freely   N: new game".to_string());
            self.compose_panel("RESULT", lines, view);
        }
    }

    /// Box centered over the map area.
    fn compose_panel(&mut self, title: &str, lines: Vec<String>, (view_cols, view_rows): (usize, usize)) {
        let text_w = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0).max(title.len());
        let box_w = (text_w + 4).min(view_cols);
        let box_h = lines.len() + 4;
        let box_x = view_cols.saturating_sub(box_w) / 2;
        let box_y = MAP_ROW + view_rows.saturating_sub(box_h) / 2;

        for y in box_y..box_y + box_h {
            for x in box_x..box_x + box_w {
                self.front.set(x, y, Cell::from_char(' ', Color::Reset, PANEL_BG));
            }
        }
        let title_x = box_x + box_w.saturating_sub(title.len()) / 2;
        self.front.put_str(title_x, box_y + 1, title, PANEL_HDR, PANEL_BG);
        for (i, line) in lines.iter().enumerate() {
            self.front.put_str(box_x + 2, box_y + 3 + i, line, PANEL_TEXT, PANEL_BG);
        }
    }
}

/// Greedy word wrap to `width` columns.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_breaks_on_words() {
        assert_eq!(wrap("aa bb cc", 5), vec!["aa bb", "cc"]);
        assert_eq!(wrap("  one  ", 10), vec!["one"]);
        assert!(wrap("", 10).is_empty());
    }

    #[test]
    fn wrap_keeps_overlong_words_whole() {
        assert_eq!(wrap("abcdefgh ij", 4), vec!["abcdefgh", "ij"]);
    }

    #[test]
    fn cells_compare_by_content() {
        let a = Cell::from_char('x', Color::White, Color::Reset);
        assert_eq!(a.as_str(), "x");
        assert_eq!(a.bg, Cell::BASE_BG);
        assert!(a != Cell::INVALID);
        let ghost = Cell::from_char_wide('👻', Color::Reset, Color::Reset);
        assert!(ghost.wide);
        assert_eq!(ghost.as_str(), "👻");
    }
}
