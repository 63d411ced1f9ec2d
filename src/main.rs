/// Entry point and game loop.

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use config::GameConfig;
use domain::entity::Action;
use sim::game::Game;
use sim::level::LevelStore;
use ui::input::{Input, InputState};
use ui::overlay::Overlays;
use ui::renderer::Renderer;
use ui::sound::{self, Sfx, SoundEngine};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = GameConfig::load();

    let store = match &config.levels_dir {
        Some(dir) => LevelStore::with_dir(dir.clone()),
        None => LevelStore::embedded(),
    };
    let mut game = match Game::start(store) {
        Ok(game) => game,
        Err(e) => {
            eprintln!("Cannot start RGB: {e}");
            std::process::exit(1);
        }
    };

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();
    let mut overlays = Overlays::new(config.sound);

    let result = game_loop(&mut game, &mut overlays, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    log::info!("final tally {}", game.tally());
    println!();
    match game.result() {
        Some(hue) => println!("Your colour: {}. Thanks for playing RGB!", hue.name()),
        None => println!("Thanks for playing RGB!"),
    }
}

/// Redraw-on-input: block for a key, advance the game, render once.
fn game_loop(
    game: &mut Game,
    overlays: &mut Overlays,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let input = InputState::new(config.keys.clone());
    renderer.render(&game.snapshot(), overlays)?;

    loop {
        let action = match input.next()? {
            Input::Action(Action::Quit) => break,
            Input::Action(action) => action,
            Input::Resize => {
                renderer.invalidate();
                renderer.render(&game.snapshot(), overlays)?;
                continue;
            }
            Input::Ignored => continue,
        };

        let mut cues = Vec::new();
        if overlays.handle(action) {
            cues.push(Sfx::Bloop);
        }
        if action == Action::ToggleHint && overlays.hint {
            cues.push(Sfx::Chime);
        }

        match game.handle_key(action) {
            Ok(events) => {
                overlays.apply(&events);
                cues.extend(sound::cues(&events));
            }
            Err(e) => overlays.set_message(format!("Cannot load the next room: {e}")),
        }

        if overlays.sound_on {
            process_sound_cues(sound, &cues);
        }
        renderer.render(&game.snapshot(), overlays)?;
    }

    Ok(())
}

fn process_sound_cues(sound: Option<&SoundEngine>, cues: &[Sfx]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    let mut played = Vec::with_capacity(cues.len());
    for &cue in cues {
        if !played.contains(&cue) {
            sfx.play(cue);
            played.push(cue);
        }
    }
}
