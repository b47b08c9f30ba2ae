/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Missing file or missing keys fall back to defaults; a file that does
/// not parse or fails validation is reported as a `ConfigError`.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.toml";

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub board: BoardConfig,
    pub players: PlayersConfig,
    pub sound: SoundConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BoardConfig {
    pub rows: usize,
    pub cols: usize,
    pub workers_per_player: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayersConfig {
    pub names: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SoundConfig {
    pub enabled: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoggingConfig {
    /// Log file path. `None` disables logging.
    pub file: Option<PathBuf>,
    pub level: String,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    board: TomlBoard,
    #[serde(default)]
    players: TomlPlayers,
    #[serde(default)]
    sound: TomlSound,
    #[serde(default)]
    logging: TomlLogging,
}

#[derive(Deserialize, Debug)]
struct TomlBoard {
    #[serde(default = "default_rows")]
    rows: usize,
    #[serde(default = "default_cols")]
    cols: usize,
    #[serde(default = "default_workers")]
    workers_per_player: usize,
}

#[derive(Deserialize, Debug)]
struct TomlPlayers {
    #[serde(default = "default_names")]
    names: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlSound {
    #[serde(default = "default_sound")]
    enabled: bool,
}

#[derive(Deserialize, Debug)]
struct TomlLogging {
    #[serde(default = "default_log_file")]
    file: String,
    #[serde(default = "default_log_level")]
    level: String,
}

// ── Defaults ──

fn default_rows() -> usize { 5 }
fn default_cols() -> usize { 5 }
fn default_workers() -> usize { 2 }
fn default_names() -> Vec<String> { vec!["Player 1".into(), "Player 2".into()] }
fn default_sound() -> bool { true }
fn default_log_file() -> String { "benevolence.log".into() }
fn default_log_level() -> String { "info".into() }

impl Default for TomlBoard {
    fn default() -> Self {
        TomlBoard {
            rows: default_rows(),
            cols: default_cols(),
            workers_per_player: default_workers(),
        }
    }
}

impl Default for TomlPlayers {
    fn default() -> Self {
        TomlPlayers { names: default_names() }
    }
}

impl Default for TomlSound {
    fn default() -> Self {
        TomlSound { enabled: default_sound() }
    }
}

impl Default for TomlLogging {
    fn default() -> Self {
        TomlLogging {
            file: default_log_file(),
            level: default_log_level(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default())
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    pub fn load() -> Result<Self, ConfigError> {
        for dir in candidate_dirs() {
            let path = dir.join(CONFIG_FILE);
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(GameConfig::default())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let toml_cfg: TomlConfig = toml::from_str(text)?;
        let cfg = GameConfig::from_toml(toml_cfg);
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_toml(toml_cfg: TomlConfig) -> Self {
        let file = toml_cfg.logging.file.trim();
        GameConfig {
            board: BoardConfig {
                rows: toml_cfg.board.rows,
                cols: toml_cfg.board.cols,
                workers_per_player: toml_cfg.board.workers_per_player,
            },
            players: PlayersConfig { names: toml_cfg.players.names },
            sound: SoundConfig { enabled: toml_cfg.sound.enabled },
            logging: LoggingConfig {
                file: (!file.is_empty()).then(|| PathBuf::from(file)),
                level: toml_cfg.logging.level,
            },
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let b = &self.board;
        if b.rows < 2 || b.cols < 2 {
            return Err(ConfigError::Invalid(format!(
                "board must be at least 2x2, got {}x{}", b.rows, b.cols
            )));
        }
        if b.workers_per_player == 0 {
            return Err(ConfigError::Invalid("workers_per_player must be at least 1".into()));
        }
        // Every worker needs a square, plus one to move into.
        if b.workers_per_player * 2 + 1 > b.rows * b.cols {
            return Err(ConfigError::Invalid(format!(
                "{} workers per player do not fit on a {}x{} board",
                b.workers_per_player, b.rows, b.cols
            )));
        }
        if self.players.names.len() != 2 {
            return Err(ConfigError::Invalid(format!(
                "expected 2 player names, got {}", self.players.names.len()
            )));
        }
        Ok(())
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
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

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let cfg = GameConfig::parse("").unwrap();
        assert_eq!(cfg, GameConfig::default());
        assert_eq!(cfg.board.rows, 5);
        assert_eq!(cfg.board.workers_per_player, 2);
        assert_eq!(cfg.logging.file, Some(PathBuf::from("benevolence.log")));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::parse("[board]\nrows = 7\n\n[players]\nnames = [\"Ada\", \"Bo\"]\n").unwrap();
        assert_eq!(cfg.board.rows, 7);
        assert_eq!(cfg.board.cols, 5);
        assert_eq!(cfg.players.names, vec!["Ada".to_string(), "Bo".to_string()]);
        assert!(cfg.sound.enabled);
    }

    #[test]
    fn blank_log_file_disables_logging() {
        let cfg = GameConfig::parse("[logging]\nfile = \"\"\n").unwrap();
        assert_eq!(cfg.logging.file, None);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = GameConfig::parse("[board\nrows = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn tiny_board_is_rejected() {
        let err = GameConfig::parse("[board]\nrows = 1\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn too_many_workers_are_rejected() {
        let err = GameConfig::parse("[board]\nrows = 2\ncols = 2\nworkers_per_player = 2\n").unwrap_err();
        assert!(err.to_string().contains("do not fit"));
    }

    #[test]
    fn three_names_are_rejected() {
        let err = GameConfig::parse("[players]\nnames = [\"a\", \"b\", \"c\"]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
