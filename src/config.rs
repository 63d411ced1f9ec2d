/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory, the CWD or
/// `~/.local/share/rgb`. Falls back to defaults if the file is missing
/// or incomplete.

use crossterm::event::KeyCode;
use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::entity::{Action, MoveDir};

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    /// Directory whose layout files override the built-in ones.
    pub levels_dir: Option<PathBuf>,
    pub sound: bool,
    pub keys: KeyBindings,
}

/// Key → action table built from the `[keys]` section.
#[derive(Clone, Debug, Default)]
pub struct KeyBindings {
    bindings: Vec<(KeyCode, Action)>,
}

impl KeyBindings {
    pub fn action_for(&self, code: KeyCode) -> Option<Action> {
        let code = normalize(code);
        self.bindings.iter().find(|(k, _)| *k == code).map(|(_, a)| *a)
    }

    fn bind(&mut self, names: &[String], action: Action) {
        for name in names {
            match parse_key(name) {
                Some(code) => self.bindings.push((code, action)),
                None => log::warn!("config.toml: unknown key name {name:?} for {action:?}"),
            }
        }
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    keys: TomlKeys,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_levels_dir")]
    levels_dir: String,
    #[serde(default = "default_sound")]
    sound: bool,
}

#[derive(Deserialize, Debug)]
struct TomlKeys {
    #[serde(default = "default_up")]
    up: Vec<String>,
    #[serde(default = "default_down")]
    down: Vec<String>,
    #[serde(default = "default_left")]
    left: Vec<String>,
    #[serde(default = "default_right")]
    right: Vec<String>,
    #[serde(default = "default_activate")]
    activate: Vec<String>,
    #[serde(default = "default_restart")]
    restart: Vec<String>,
    #[serde(default = "default_invert")]
    invert: Vec<String>,
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_hint")]
    hint: Vec<String>,
    #[serde(default = "default_help")]
    help: Vec<String>,
    #[serde(default = "default_sound_key")]
    sound: Vec<String>,
    #[serde(default = "default_new_game")]
    new_game: Vec<String>,
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

// ── Defaults ──

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn default_levels_dir() -> String { "levels".into() }
fn default_sound() -> bool { true }

fn default_up() -> Vec<String> { keys(&["Up", "w"]) }
fn default_down() -> Vec<String> { keys(&["Down", "s"]) }
fn default_left() -> Vec<String> { keys(&["Left", "a"]) }
fn default_right() -> Vec<String> { keys(&["Right", "d"]) }
fn default_activate() -> Vec<String> { keys(&["Space"]) }
fn default_restart() -> Vec<String> { keys(&["r"]) }
fn default_invert() -> Vec<String> { keys(&["i"]) }
fn default_confirm() -> Vec<String> { keys(&["Enter"]) }
fn default_hint() -> Vec<String> { keys(&["h"]) }
fn default_help() -> Vec<String> { keys(&["j"]) }
fn default_sound_key() -> Vec<String> { keys(&["m"]) }
fn default_new_game() -> Vec<String> { keys(&["n"]) }
fn default_quit() -> Vec<String> { keys(&["Esc", "q"]) }

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            levels_dir: default_levels_dir(),
            sound: default_sound(),
        }
    }
}

impl Default for TomlKeys {
    fn default() -> Self {
        TomlKeys {
            up: default_up(),
            down: default_down(),
            left: default_left(),
            right: default_right(),
            activate: default_activate(),
            restart: default_restart(),
            invert: default_invert(),
            confirm: default_confirm(),
            hint: default_hint(),
            help: default_help(),
            sound: default_sound_key(),
            new_game: default_new_game(),
            quit: default_quit(),
        }
    }
}

impl TomlKeys {
    fn bindings(&self) -> KeyBindings {
        let mut kb = KeyBindings::default();
        kb.bind(&self.up, Action::Move(MoveDir::Up));
        kb.bind(&self.down, Action::Move(MoveDir::Down));
        kb.bind(&self.left, Action::Move(MoveDir::Left));
        kb.bind(&self.right, Action::Move(MoveDir::Right));
        kb.bind(&self.activate, Action::Activate);
        kb.bind(&self.restart, Action::RestartLevel);
        kb.bind(&self.invert, Action::Invert);
        kb.bind(&self.confirm, Action::Confirm);
        kb.bind(&self.hint, Action::ToggleHint);
        kb.bind(&self.help, Action::ToggleHelp);
        kb.bind(&self.sound, Action::ToggleSound);
        kb.bind(&self.new_game, Action::NewGame);
        kb.bind(&self.quit, Action::Quit);
        kb
    }
}

// ── Key names ──

/// Letters compare case-insensitively.
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

/// Parse a key name such as `"Left"`, `"Space"`, `"F1"` or `"x"`.
pub fn parse_key(name: &str) -> Option<KeyCode> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(normalize(KeyCode::Char(c)));
    }
    let code = match name.to_ascii_lowercase().as_str() {
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "space" => KeyCode::Char(' '),
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        other => {
            let n: u8 = other.strip_prefix('f')?.parse().ok()?;
            if !(1..=12).contains(&n) {
                return None;
            }
            KeyCode::F(n)
        }
    };
    Some(code)
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        GameConfig::resolve(toml_cfg, &search_dirs)
    }

    fn resolve(toml_cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        let levels_dir_str = &toml_cfg.general.levels_dir;
        let levels_dir = if PathBuf::from(levels_dir_str).is_absolute() {
            Some(PathBuf::from(levels_dir_str)).filter(|p| p.is_dir())
        } else {
            search_dirs.iter()
                .map(|d| d.join(levels_dir_str))
                .find(|p| p.is_dir())
        };
        match &levels_dir {
            Some(dir) => log::info!("layout overrides from {}", dir.display()),
            None => log::debug!("no levels directory, using built-in layouts"),
        }

        GameConfig {
            levels_dir,
            sound: toml_cfg.general.sound,
            keys: toml_cfg.keys.bindings(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::resolve(TomlConfig::default(), &[])
    }
}

/// Candidate directories to search: exe dir + CWD + XDG data (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/rgb");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// First readable config.toml in the candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => return parse_toml(&text),
            Err(e) => log::warn!("could not read {}: {e}", path.display()),
        }
    }
    TomlConfig::default()
}

fn parse_toml(text: &str) -> TomlConfig {
    toml::from_str::<TomlConfig>(text).unwrap_or_else(|e| {
        log::warn!("config.toml parse error, using default settings: {e}");
        TomlConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings(text: &str) -> KeyBindings {
        parse_toml(text).keys.bindings()
    }

    #[test]
    fn key_names() {
        assert_eq!(parse_key("Left"), Some(KeyCode::Left));
        assert_eq!(parse_key("space"), Some(KeyCode::Char(' ')));
        assert_eq!(parse_key("Enter"), Some(KeyCode::Enter));
        assert_eq!(parse_key("ESC"), Some(KeyCode::Esc));
        assert_eq!(parse_key("F1"), Some(KeyCode::F(1)));
        assert_eq!(parse_key("W"), Some(KeyCode::Char('w')));
        assert_eq!(parse_key("F13"), None);
        assert_eq!(parse_key("Hyper"), None);
        assert_eq!(parse_key(""), None);
    }

    #[test]
    fn default_keymap() {
        let kb = bindings("");
        assert_eq!(kb.action_for(KeyCode::Up), Some(Action::Move(MoveDir::Up)));
        assert_eq!(kb.action_for(KeyCode::Char('a')), Some(Action::Move(MoveDir::Left)));
        assert_eq!(kb.action_for(KeyCode::Char(' ')), Some(Action::Activate));
        assert_eq!(kb.action_for(KeyCode::Char('I')), Some(Action::Invert));
        assert_eq!(kb.action_for(KeyCode::Enter), Some(Action::Confirm));
        assert_eq!(kb.action_for(KeyCode::Char('m')), Some(Action::ToggleSound));
        assert_eq!(kb.action_for(KeyCode::Char('n')), Some(Action::NewGame));
        assert_eq!(kb.action_for(KeyCode::Esc), Some(Action::Quit));
        assert_eq!(kb.action_for(KeyCode::Char('z')), None);
    }

    #[test]
    fn partial_keys_section_keeps_other_defaults() {
        let kb = bindings("[keys]\nactivate = [\"e\", \"Enter\"]\n");
        assert_eq!(kb.action_for(KeyCode::Char('e')), Some(Action::Activate));
        assert_eq!(kb.action_for(KeyCode::Char(' ')), None);
        assert_eq!(kb.action_for(KeyCode::Left), Some(Action::Move(MoveDir::Left)));
    }

    #[test]
    fn unknown_key_names_are_skipped() {
        let kb = bindings("[keys]\nhint = [\"Nope\", \"x\"]\n");
        assert_eq!(kb.action_for(KeyCode::Char('x')), Some(Action::ToggleHint));
    }

    #[test]
    fn general_section() {
        let cfg = parse_toml("[general]\nsound = false\n");
        assert!(!cfg.general.sound);
        assert_eq!(cfg.general.levels_dir, "levels");
    }

    #[test]
    fn broken_toml_falls_back_to_defaults() {
        let cfg = parse_toml("[general\nsound = ");
        assert!(cfg.general.sound);
        assert_eq!(cfg.keys.quit, vec!["Esc".to_string(), "q".to_string()]);
    }

    #[test]
    fn missing_levels_dir_means_builtin() {
        let cfg = GameConfig::resolve(
            parse_toml("[general]\nlevels_dir = \"/definitely/not/here\"\n"),
            &[],
        );
        assert_eq!(cfg.levels_dir, None);
        assert!(cfg.sound);
    }
}
