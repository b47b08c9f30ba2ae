/// Tracing setup. The terminal belongs to the renderer while the game runs,
/// so events go to a log file or nowhere.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing::Level;

use crate::config::LoggingConfig;
use crate::error::AppError;

/// Install the global subscriber. Returns false when logging is disabled.
pub fn init(config: &LoggingConfig) -> Result<bool, AppError> {
    let Some(path) = &config.file else {
        return Ok(false);
    };

    let level = parse_level(&config.level)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| AppError::LogFile { path: path.clone(), source })?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_max_level(level)
        .init();
    Ok(true)
}

fn parse_level(level: &str) -> Result<Level, AppError> {
    level
        .trim()
        .parse::<Level>()
        .map_err(|_| AppError::LogLevel(level.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names_parse_case_insensitively() {
        assert_eq!(parse_level("debug").unwrap(), Level::DEBUG);
        assert_eq!(parse_level(" WARN ").unwrap(), Level::WARN);
    }

    #[test]
    fn unknown_level_is_an_error() {
        assert!(matches!(parse_level("loud"), Err(AppError::LogLevel(_))));
    }

    #[test]
    fn disabled_logging_installs_nothing() {
        let cfg = LoggingConfig { file: None, level: "info".into() };
        assert!(!init(&cfg).unwrap());
    }
}
