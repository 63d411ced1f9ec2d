/// Game: the run-level controller above a single `LevelSession`.
///
/// ## Phases
///   - `Playing`:  levels 1..=9, doors advance to the next level.
///     Doors on levels 1..=8 vote into the tally; leaving level 8
///     computes the personality and moves to `Result`.
///   - `Result`:   level 9 is the backdrop for the result panel. Only
///     Confirm (on to the epilogue) and NewGame are honored.
///   - `Epilogue`: level 10, free painting. No further transitions.
///
/// Level loads are all-or-nothing: when a layout fails to load the
/// error is returned and the current session stays in place.

use crate::domain::button::Button;
use crate::domain::entity::{Action, Hue, Player, Pos};
use crate::domain::grid::Grid;
use crate::domain::marker::Marker;
use crate::domain::rules::{self, DoorSide, Tally};
use crate::error::{LevelError, Result};
use super::event::GameEvent;
use super::level::{self, DialDisplay, LevelStore, EPILOGUE_LEVEL, LEVEL_COUNT, RESULT_LEVEL};
use super::session::{LevelSession, SessionState};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Playing,
    Result,
    Epilogue,
}

/// Read-only view of everything the renderer draws from the simulation.
pub struct Snapshot<'a> {
    pub level: usize,
    pub title: &'static str,
    pub phase: Phase,
    pub grid: &'a Grid,
    pub player: &'a Player,
    pub buttons: &'a [Button; 3],
    pub marker: &'a Marker,
    pub palette: Option<Pos>,
    pub dial: DialDisplay,
    pub completed: bool,
    pub hint: &'static str,
    pub question: &'static str,
    pub result: Option<Hue>,
}

pub struct Game {
    store: LevelStore,
    session: LevelSession,
    phase: Phase,
    tally: Tally,
    result: Option<Hue>,
}

impl Game {
    /// Start a new run on level 1.
    pub fn start(store: LevelStore) -> Result<Game> {
        let session = load_session(&store, 1)?;
        log::info!("game started on level 1 ({})", session.def.title);
        Ok(Game {
            store,
            session,
            phase: Phase::Playing,
            tally: Tally::default(),
            result: None,
        })
    }

    pub fn level(&self) -> usize {
        self.session.number()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn result(&self) -> Option<Hue> {
        self.result
    }

    /// Apply one key action to the run.
    pub fn handle_key(&mut self, action: Action) -> Result<Vec<GameEvent>> {
        match self.phase {
            Phase::Result => match action {
                Action::Confirm => self.enter_epilogue(),
                Action::NewGame => self.restart(),
                _ => Ok(Vec::new()),
            },
            Phase::Playing | Phase::Epilogue => match action {
                Action::RestartLevel => self.restart_level(),
                Action::NewGame | Action::Quit => Ok(Vec::new()),
                other => {
                    let mut events = self.session.step(other);
                    if let Some(side) = self.session.take_door() {
                        self.pass_door(side, &mut events)?;
                    }
                    Ok(events)
                }
            },
        }
    }

    /// Back to level 1 with an empty tally.
    pub fn restart(&mut self) -> Result<Vec<GameEvent>> {
        self.load(1)?;
        self.tally.clear();
        self.result = None;
        self.phase = Phase::Playing;
        log::info!("new game");
        Ok(vec![GameEvent::GameRestarted, GameEvent::LevelLoaded { level: 1 }])
    }

    /// Reload the current level from its layout.
    pub fn restart_level(&mut self) -> Result<Vec<GameEvent>> {
        let level = self.level();
        self.load(level)?;
        log::debug!("level {level} restarted");
        Ok(vec![GameEvent::LevelLoaded { level }])
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        let s = &self.session;
        Snapshot {
            level: s.number(),
            title: s.def.title,
            phase: self.phase,
            grid: &s.grid,
            player: &s.player,
            buttons: &s.buttons,
            marker: &s.marker,
            palette: s.palette(),
            dial: s.def.dial,
            completed: s.state() != SessionState::Active,
            hint: s.def.hint,
            question: s.def.question,
            result: self.result,
        }
    }

    // ── Transitions ──

    fn pass_door(&mut self, side: DoorSide, events: &mut Vec<GameEvent>) -> Result<()> {
        let level = self.level();
        let next = level + 1;
        if next > LEVEL_COUNT {
            return Ok(());
        }
        self.load(next)?;

        let vote = rules::choice_for(level, side);
        if let Some(hue) = vote {
            self.tally.add(hue);
        }
        log::info!("level {level}: {side:?} door, vote {vote:?}, tally {}", self.tally);
        events.push(GameEvent::DoorTaken { level, side, vote });
        events.push(GameEvent::LevelLoaded { level: next });

        if next == EPILOGUE_LEVEL {
            self.phase = Phase::Epilogue;
        } else if next == RESULT_LEVEL {
            let result = self.tally.result();
            self.result = Some(result);
            self.phase = Phase::Result;
            log::info!("personality result: {}", result.name());
            events.push(GameEvent::GameFinished { result });
        }
        Ok(())
    }

    fn enter_epilogue(&mut self) -> Result<Vec<GameEvent>> {
        self.load(EPILOGUE_LEVEL)?;
        self.phase = Phase::Epilogue;
        Ok(vec![GameEvent::EpilogueStarted, GameEvent::LevelLoaded { level: EPILOGUE_LEVEL }])
    }

    fn load(&mut self, number: usize) -> Result<()> {
        self.session = load_session(&self.store, number)?;
        Ok(())
    }
}

fn load_session(store: &LevelStore, number: usize) -> Result<LevelSession> {
    let def = level::level_def(number)
        .ok_or_else(|| LevelError::malformed(&format!("level {number}"), "no such level"))?;
    let grid = store.grid(def.layout).map_err(|e| {
        log::error!("level {number}: {e}");
        e
    })?;
    Ok(LevelSession::new(def, grid))
}
