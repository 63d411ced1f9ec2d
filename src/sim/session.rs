/// One level in play: grid, player, three dials, the marker and the
/// level's special rule.
///
/// Processing order for every key action (`step`):
///   1. Clear button flashes from the previous action
///   2. Vanishing walls (rule)
///   3. Movement, door check
///   4. Activate: dials, palette, paint, canvas flood (rule)
///   5. Invert (rule)
///   6. Completion check
///   7. Marker pickup
///   8. Decoy removal (rule)
///
/// Every step is total: coordinates are checked before any grid probe,
/// so no grid error can escape from here.

use crate::domain::button::Button;
use crate::domain::entity::{Action, Hue, MoveDir, Player, Pos};
use crate::domain::grid::Grid;
use crate::domain::marker::Marker;
use crate::domain::rules::DoorSide;
use crate::domain::tile::Tile;
use super::event::GameEvent;
use super::level::{LevelDef, LevelRule, DOOR_ROW, NO_DOOR_COL, YES_DOOR_COL};

/// Paint picked up from each palette cell, top to bottom.
const PALETTE: [Option<Hue>; 4] = [Some(Hue::Red), Some(Hue::Green), Some(Hue::Blue), None];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionState {
    /// Dials not yet solved.
    Active,
    /// Dials solved; marker may be showing or already collected.
    Completed,
    /// Player walked through a door with the marker in hand.
    AwaitingTransition,
}

#[derive(Clone, Debug)]
pub struct LevelSession {
    pub def: &'static LevelDef,
    pub grid: Grid,
    pub player: Player,
    /// Red, green, blue.
    pub buttons: [Button; 3],
    pub marker: Marker,
    completed: bool,
    pending_door: Option<DoorSide>,
}

/// Which door, if any, sits at `pos`.
pub fn door_side(pos: Pos) -> Option<DoorSide> {
    match (pos.col, pos.row) {
        (YES_DOOR_COL, DOOR_ROW) => Some(DoorSide::Yes),
        (NO_DOOR_COL, DOOR_ROW) => Some(DoorSide::No),
        _ => None,
    }
}

impl LevelSession {
    pub fn new(def: &'static LevelDef, grid: Grid) -> Self {
        let [red, green, blue] = def.buttons;
        LevelSession {
            def,
            grid,
            player: Player::new(def.start, def.start_paint),
            buttons: [
                Button::new(red, Hue::Red),
                Button::new(green, Hue::Green),
                Button::new(blue, Hue::Blue),
            ],
            marker: Marker::new(def.marker),
            completed: false,
            pending_door: None,
        }
    }

    pub fn number(&self) -> usize {
        self.def.number
    }

    pub fn palette(&self) -> Option<Pos> {
        self.def.palette
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn state(&self) -> SessionState {
        if self.pending_door.is_some() {
            SessionState::AwaitingTransition
        } else if self.is_completed() {
            SessionState::Completed
        } else {
            SessionState::Active
        }
    }

    /// Hand the pending door transition to the controller.
    pub fn take_door(&mut self) -> Option<DoorSide> {
        self.pending_door.take()
    }

    /// Apply one key action.
    pub fn step(&mut self, action: Action) -> Vec<GameEvent> {
        let mut events = Vec::new();

        for b in self.buttons.iter_mut() {
            b.clear_flash();
        }

        if self.def.rule == LevelRule::Vanishing {
            resolve_vanishing(self, &mut events);
        }

        match action {
            Action::Move(dir) => resolve_movement(self, dir, &mut events),
            Action::Activate => resolve_activate(self, &mut events),
            Action::Invert => resolve_invert(self, &mut events),
            _ => {}
        }

        resolve_completion(self, &mut events);
        resolve_marker(self, &mut events);

        if self.def.rule == LevelRule::Decoys {
            resolve_decoys(self, &mut events);
        }

        events
    }
}

// ══════════════════════════════════════════════════════════════
// Level rules
// ══════════════════════════════════════════════════════════════

fn resolve_vanishing(s: &mut LevelSession, events: &mut Vec<GameEvent>) {
    let before = s.grid.rows().iter().flatten().filter(|t| **t == Tile::Wall).count();
    s.grid.clear_interior_walls();
    let after = s.grid.rows().iter().flatten().filter(|t| **t == Tile::Wall).count();
    if after != before {
        events.push(GameEvent::WallsVanished);
    }
}

fn resolve_invert(s: &mut LevelSession, events: &mut Vec<GameEvent>) {
    if s.def.rule != LevelRule::Inverse {
        return;
    }
    s.grid.invert_interior();
    events.push(GameEvent::GridInverted);
}

fn resolve_decoys(s: &mut LevelSession, events: &mut Vec<GameEvent>) {
    let pos = s.player.pos;
    let on_decoy = s.grid.tile_at(pos).map_or(false, Tile::is_fake_button);
    if on_decoy && s.grid.set_tile(pos, Tile::Empty).is_ok() {
        events.push(GameEvent::DecoyVanished { pos });
    }
}

// ══════════════════════════════════════════════════════════════
// Movement
// ══════════════════════════════════════════════════════════════

fn resolve_movement(s: &mut LevelSession, dir: MoveDir, events: &mut Vec<GameEvent>) {
    let target = match s.player.pos.step(dir) {
        Some(p) if s.grid.is_walkable(p) => p,
        _ => return,
    };
    s.player.pos = target;

    let side = match door_side(target) {
        Some(side) => side,
        None => return,
    };
    if s.completed && s.marker.is_collected() {
        s.pending_door = Some(side);
    } else {
        events.push(GameEvent::DoorLocked);
    }
}

// ══════════════════════════════════════════════════════════════
// Activate: dials, palette, paint
// ══════════════════════════════════════════════════════════════

fn resolve_activate(s: &mut LevelSession, events: &mut Vec<GameEvent>) {
    let pos = s.player.pos;

    for b in s.buttons.iter_mut() {
        if b.press(pos) {
            events.push(GameEvent::ButtonPressed { hue: b.hue, value: b.value() });
        }
    }

    if let Some(anchor) = s.def.palette {
        if pos.col == anchor.col && pos.row >= anchor.row && pos.row - anchor.row < PALETTE.len() {
            let paint = PALETTE[pos.row - anchor.row];
            s.player.paint = paint;
            events.push(GameEvent::PaintPicked { paint });
        }
    }

    match s.player.paint {
        Some(hue) => {
            if s.grid.set_tile(pos, Tile::paint(hue)).is_ok() {
                events.push(GameEvent::PaintApplied { pos, hue });
            }
        }
        None if s.def.palette.is_some() => {
            if s.grid.set_tile(pos, Tile::Empty).is_ok() {
                events.push(GameEvent::PaintCleared { pos });
            }
        }
        None => {}
    }

    if let (LevelRule::Canvas { frame }, Some(hue)) = (s.def.rule, s.player.paint) {
        if !frame.contains(pos) {
            s.grid.flood_interior(Tile::paint(hue));
            events.push(GameEvent::CanvasRevealed { hue });
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Completion and marker
// ══════════════════════════════════════════════════════════════

fn resolve_completion(s: &mut LevelSession, events: &mut Vec<GameEvent>) {
    if s.marker.is_collected() || !s.buttons.iter().all(Button::is_at_target) {
        return;
    }
    if !s.completed {
        s.completed = true;
        events.push(GameEvent::LevelCompleted { level: s.def.number });
    }
    s.marker.show();
}

fn resolve_marker(s: &mut LevelSession, events: &mut Vec<GameEvent>) {
    if s.completed && !s.marker.is_collected() && s.player.pos == s.marker.pos {
        s.marker.collect();
        events.push(GameEvent::MarkerCollected { level: s.def.number });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::tests::open_room;
    use crate::sim::level::{level_def, LevelStore};

    /// Level `n` on its real layout.
    fn real(n: usize) -> LevelSession {
        let def = level_def(n).unwrap();
        let grid = LevelStore::embedded().grid(def.layout).unwrap();
        LevelSession::new(def, grid)
    }

    /// Level `n`'s configuration on an open room.
    fn open(n: usize) -> LevelSession {
        let def = level_def(n).unwrap();
        LevelSession::new(def, Grid::load("room", &open_room()).unwrap())
    }

    /// Step and check the marker invariant after every action.
    fn act(s: &mut LevelSession, action: Action) -> Vec<GameEvent> {
        let events = s.step(action);
        assert!(!(s.marker.is_collected() && s.marker.is_visible()));
        events
    }

    /// Walk column first, then row. Only valid on open ground.
    fn goto(s: &mut LevelSession, to: Pos) -> Vec<GameEvent> {
        let mut events = Vec::new();
        while s.player.pos.col != to.col {
            let dir = if s.player.pos.col < to.col { MoveDir::Right } else { MoveDir::Left };
            events.extend(act(s, Action::Move(dir)));
        }
        while s.player.pos.row != to.row {
            let dir = if s.player.pos.row < to.row { MoveDir::Down } else { MoveDir::Up };
            events.extend(act(s, Action::Move(dir)));
        }
        events
    }

    fn dial_all(s: &mut LevelSession) {
        for i in 0..3 {
            let (pos, target) = (s.buttons[i].pos, s.buttons[i].target());
            goto(s, pos);
            for _ in 0..target {
                act(s, Action::Activate);
            }
        }
    }

    // ── Movement ──

    #[test]
    fn wall_blocks_movement() {
        let mut s = open(1);
        goto(&mut s, Pos::new(1, 5));
        let events = act(&mut s, Action::Move(MoveDir::Left));
        assert_eq!(s.player.pos, Pos::new(1, 5));
        assert!(events.is_empty());
    }

    #[test]
    fn paint_tile_is_enterable() {
        let mut s = open(1);
        s.grid.set_tile(Pos::new(6, 5), Tile::BluePaint).unwrap();
        act(&mut s, Action::Move(MoveDir::Right));
        assert_eq!(s.player.pos, Pos::new(6, 5));
    }

    #[test]
    fn probes_at_grid_edge_are_absorbed() {
        let mut s = LevelSession::new(level_def(1).unwrap(), Grid::load("tiny", &["00", "00"]).unwrap());
        s.player.pos = Pos::new(0, 0);
        act(&mut s, Action::Move(MoveDir::Left));
        act(&mut s, Action::Move(MoveDir::Up));
        assert_eq!(s.player.pos, Pos::new(0, 0));
        s.player.pos = Pos::new(1, 1);
        act(&mut s, Action::Move(MoveDir::Right));
        act(&mut s, Action::Move(MoveDir::Down));
        assert_eq!(s.player.pos, Pos::new(1, 1));
    }

    // ── Doors ──

    #[test]
    fn locked_door_warns_but_lets_player_in() {
        for col in [YES_DOOR_COL, NO_DOOR_COL] {
            let mut s = open(1);
            goto(&mut s, Pos::new(col, 2));
            let events = act(&mut s, Action::Move(MoveDir::Up));
            assert_eq!(s.player.pos, Pos::new(col, DOOR_ROW));
            assert!(events.contains(&GameEvent::DoorLocked));
            assert_eq!(s.take_door(), None);
            assert_eq!(s.state(), SessionState::Active);
        }
    }

    #[test]
    fn completed_without_marker_is_still_locked() {
        let mut s = open(1);
        dial_all(&mut s);
        assert!(s.is_completed());
        goto(&mut s, Pos::new(YES_DOOR_COL, 2));
        let events = act(&mut s, Action::Move(MoveDir::Up));
        assert!(events.contains(&GameEvent::DoorLocked));
        assert_eq!(s.take_door(), None);
    }

    #[test]
    fn marker_opens_the_doors() {
        let mut s = open(1);
        dial_all(&mut s);
        let marker = s.marker.pos;
        let events = goto(&mut s, marker);
        assert!(events.contains(&GameEvent::MarkerCollected { level: 1 }));
        goto(&mut s, Pos::new(NO_DOOR_COL, 2));
        let events = act(&mut s, Action::Move(MoveDir::Up));
        assert!(!events.contains(&GameEvent::DoorLocked));
        assert_eq!(s.state(), SessionState::AwaitingTransition);
        assert_eq!(s.take_door(), Some(DoorSide::No));
        assert_eq!(s.state(), SessionState::Completed);
    }

    // ── Dials and completion ──

    #[test]
    fn completion_shows_marker_once() {
        let mut s = open(1);
        let start = s.player.pos;
        let (pos, target) = (s.buttons[0].pos, s.buttons[0].target());
        goto(&mut s, pos);
        for _ in 0..target {
            act(&mut s, Action::Activate);
        }
        assert!(!s.is_completed());
        assert!(!s.marker.is_visible());

        let mut completions = 0;
        for i in 1..3 {
            let (pos, target) = (s.buttons[i].pos, s.buttons[i].target());
            goto(&mut s, pos);
            for _ in 0..target {
                completions += act(&mut s, Action::Activate)
                    .iter()
                    .filter(|e| matches!(e, GameEvent::LevelCompleted { .. }))
                    .count();
            }
        }
        assert_eq!(completions, 1);
        assert!(s.is_completed());
        assert!(s.marker.is_visible());
        goto(&mut s, start);
        assert!(s.marker.is_visible());
    }

    #[test]
    fn completion_is_monotone() {
        let mut s = open(1);
        dial_all(&mut s);
        assert!(s.is_completed());
        let (red, marker) = (s.buttons[0].pos, s.marker.pos);
        goto(&mut s, red);
        act(&mut s, Action::Activate);
        assert!(!s.buttons[0].is_at_target());
        assert!(s.is_completed());
        goto(&mut s, marker);
        assert!(s.marker.is_collected());
        for _ in 0..6 {
            goto(&mut s, red);
            act(&mut s, Action::Activate);
            assert!(s.is_completed());
            assert!(!s.marker.is_visible());
        }
    }

    #[test]
    fn button_flash_lasts_one_action() {
        let mut s = open(1);
        let green = s.buttons[1].pos;
        goto(&mut s, green);
        let events = act(&mut s, Action::Activate);
        assert_eq!(events, vec![GameEvent::ButtonPressed { hue: Hue::Green, value: 1 }]);
        assert!(s.buttons[1].is_flashing());
        act(&mut s, Action::Move(MoveDir::Up));
        assert!(!s.buttons[1].is_flashing());
    }

    #[test]
    fn activate_on_plain_floor_without_palette_changes_nothing() {
        let mut s = open(1);
        let before = s.grid.clone();
        let events = act(&mut s, Action::Activate);
        assert!(events.is_empty());
        assert_eq!(s.grid, before);
    }

    // ── Paint ──

    #[test]
    fn palette_picks_each_color() {
        let mut s = open(8);
        let anchor = s.palette().unwrap();
        let expected = [Some(Hue::Red), Some(Hue::Green), Some(Hue::Blue), None];
        for (i, paint) in expected.into_iter().enumerate() {
            goto(&mut s, Pos::new(anchor.col, anchor.row + i));
            let events = act(&mut s, Action::Activate);
            assert!(events.contains(&GameEvent::PaintPicked { paint }));
            assert_eq!(s.player.paint, paint);
        }
    }

    #[test]
    fn paint_then_clear_restores_empty() {
        let mut s = open(8);
        let anchor = s.palette().unwrap();
        let spot = Pos::new(3, 12);

        goto(&mut s, anchor);
        act(&mut s, Action::Activate);
        goto(&mut s, spot);
        act(&mut s, Action::Activate);
        assert_eq!(s.grid.tile_at(spot), Ok(Tile::RedPaint));

        goto(&mut s, Pos::new(anchor.col, anchor.row + 3));
        act(&mut s, Action::Activate);
        assert_eq!(s.player.paint, None);
        goto(&mut s, spot);
        let events = act(&mut s, Action::Activate);
        assert!(events.contains(&GameEvent::PaintCleared { pos: spot }));
        assert_eq!(s.grid.tile_at(spot), Ok(Tile::Empty));
    }

    #[test]
    fn palette_cells_do_nothing_without_palette() {
        let mut s = open(5);
        goto(&mut s, Pos::new(7, 7));
        act(&mut s, Action::Activate);
        assert_eq!(s.player.paint, None);
        assert_eq!(s.grid.tile_at(Pos::new(7, 7)), Ok(Tile::Empty));
    }

    // ── Level rules ──

    #[test]
    fn canvas_paints_inside_the_frame() {
        let mut s = real(4);
        assert_eq!(s.player.paint, Some(Hue::Red));
        let start = s.player.pos;
        let events = act(&mut s, Action::Activate);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::CanvasRevealed { .. })));
        assert_eq!(s.grid.tile_at(start), Ok(Tile::RedPaint));
        assert_eq!(s.grid.tile_at(Pos::new(6, 5)), Ok(Tile::Wall));
    }

    #[test]
    fn canvas_floods_outside_the_frame() {
        let mut s = real(4);
        // Out through the gap in the bottom of the frame.
        goto(&mut s, Pos::new(12, 8));
        goto(&mut s, Pos::new(12, 13));
        assert_eq!(s.player.pos, Pos::new(12, 13));

        let events = act(&mut s, Action::Activate);
        assert!(events.contains(&GameEvent::CanvasRevealed { hue: Hue::Red }));
        assert_eq!(s.grid.tile_at(Pos::new(9, 14)), Ok(Tile::HiddenPath));
        assert_eq!(s.grid.tile_at(Pos::new(8, 14)), Ok(Tile::RedPaint));
        assert_eq!(s.grid.tile_at(Pos::new(6, 5)), Ok(Tile::RedPaint));
        assert_eq!(s.grid.tile_at(Pos::new(0, 14)), Ok(Tile::Wall));
        assert_eq!(s.grid.tile_at(Pos::new(YES_DOOR_COL, DOOR_ROW)), Ok(Tile::Door));
    }

    #[test]
    fn invert_swaps_maze_on_inverse_level_only() {
        let mut s = real(2);
        assert_eq!(s.grid.tile_at(Pos::new(2, 3)), Ok(Tile::Wall));
        assert_eq!(s.grid.tile_at(Pos::new(1, 3)), Ok(Tile::Empty));
        let events = act(&mut s, Action::Invert);
        assert_eq!(events, vec![GameEvent::GridInverted]);
        assert_eq!(s.grid.tile_at(Pos::new(2, 3)), Ok(Tile::Empty));
        assert_eq!(s.grid.tile_at(Pos::new(1, 3)), Ok(Tile::Wall));
        assert_eq!(s.grid.tile_at(Pos::new(NO_DOOR_COL, DOOR_ROW)), Ok(Tile::Door));

        let mut plain = open(1);
        let before = plain.grid.clone();
        assert!(act(&mut plain, Action::Invert).is_empty());
        assert_eq!(plain.grid, before);
    }

    #[test]
    fn vanishing_walls_go_on_any_key() {
        let mut s = real(6);
        assert_eq!(s.grid.tile_at(Pos::new(3, 6)), Ok(Tile::Wall));
        let events = act(&mut s, Action::ToggleHint);
        assert_eq!(events, vec![GameEvent::WallsVanished]);
        assert_eq!(s.grid.tile_at(Pos::new(3, 6)), Ok(Tile::Empty));
        assert_eq!(s.grid.tile_at(Pos::new(0, 6)), Ok(Tile::Wall));
        assert!(act(&mut s, Action::ToggleHint).is_empty());
    }

    #[test]
    fn decoys_vanish_underfoot() {
        let mut s = real(3);
        let decoy = Pos::new(4, 8);
        assert_eq!(s.grid.tile_at(decoy), Ok(Tile::FakeRedButton));
        let events = goto(&mut s, decoy);
        assert!(events.contains(&GameEvent::DecoyVanished { pos: decoy }));
        assert_eq!(s.grid.tile_at(decoy), Ok(Tile::Empty));
    }

    #[test]
    fn decoys_stay_on_other_levels() {
        let mut s = open(1);
        s.grid.set_tile(Pos::new(6, 5), Tile::FakeBlueButton).unwrap();
        act(&mut s, Action::Move(MoveDir::Right));
        assert_eq!(s.grid.tile_at(Pos::new(6, 5)), Ok(Tile::FakeBlueButton));
    }

    #[test]
    fn epilogue_never_completes() {
        let mut s = open(10);
        for _ in 0..120 {
            act(&mut s, Action::Activate);
        }
        assert!(!s.is_completed());
        assert_eq!(s.state(), SessionState::Active);
    }
}
