use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use super::gameplay::{GridSize, GridSizeError};

pub(crate) const CONFIG_ENV_VAR: &str = "CHOCOBOTS_CONFIG";
pub(crate) const GRID_SIZE_ENV_VAR: &str = "CHOCOBOTS_GRID_SIZE";
pub(crate) const SEED_ENV_VAR: &str = "CHOCOBOTS_SEED";
pub(crate) const AUTOPLAY_STEP_TICKS_ENV_VAR: &str = "CHOCOBOTS_AUTOPLAY_STEP_TICKS";

const DEFAULT_GRID_SIZE: usize = 5;
const DEFAULT_AUTOPLAY_STEP_TICKS: u32 = 12;

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config '{path}' at {field}: {source}")]
    Parse {
        path: PathBuf,
        field: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Gameplay settings. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    pub(crate) grid_size: usize,
    pub(crate) seed: Option<u64>,
    pub(crate) autoplay_step_ticks: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            seed: None,
            autoplay_step_ticks: DEFAULT_AUTOPLAY_STEP_TICKS,
        }
    }
}

impl GameConfig {
    /// Defaults, then the file named by `CHOCOBOTS_CONFIG`, then the
    /// per-field env overrides.
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                let path = PathBuf::from(path);
                let config = Self::from_json_file(&path)?;
                info!(path = %path.display(), "config_loaded");
                config
            }
            None => Self::default(),
        };
        config.apply_env_overrides(|name| env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw, path)
    }

    fn from_json_str(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        serde_path_to_error::deserialize::<_, GameConfig>(&mut deserializer).map_err(|error| {
            let field = error.path().to_string();
            ConfigError::Parse {
                path: path.to_path_buf(),
                field,
                source: error.into_inner(),
            }
        })
    }

    /// Unparsable env values are logged and skipped; the file or default
    /// value stays in effect.
    pub(crate) fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = parse_env_value::<usize>(&lookup, GRID_SIZE_ENV_VAR) {
            self.grid_size = value;
        }
        if let Some(value) = parse_env_value::<u64>(&lookup, SEED_ENV_VAR) {
            self.seed = Some(value);
        }
        if let Some(value) = parse_env_value::<u32>(&lookup, AUTOPLAY_STEP_TICKS_ENV_VAR) {
            self.autoplay_step_ticks = value;
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        self.grid_size()?;
        if self.autoplay_step_ticks == 0 {
            return Err(ConfigError::Invalid {
                field: "autoplay_step_ticks",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn grid_size(&self) -> Result<GridSize, ConfigError> {
        GridSize::new(self.grid_size).map_err(|error: GridSizeError| ConfigError::Invalid {
            field: "grid_size",
            reason: error.to_string(),
        })
    }
}

fn parse_env_value<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Option<T> {
    let raw = lookup(name)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(
                env_var = name,
                value = raw.as_str(),
                "invalid env override; keeping configured value"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn empty_object_uses_defaults() {
        let config = GameConfig::from_json_str("{}", Path::new("inline")).expect("config");
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.grid_size, 5);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{ "grid_size": 8, "seed": 17 }}"#).expect("write");

        let config = GameConfig::from_json_file(file.path()).expect("config");
        assert_eq!(config.grid_size, 8);
        assert_eq!(config.seed, Some(17));
        assert_eq!(config.autoplay_step_ticks, DEFAULT_AUTOPLAY_STEP_TICKS);
    }

    #[test]
    fn parse_error_reports_field_path() {
        let error = GameConfig::from_json_str(r#"{ "grid_size": "big" }"#, Path::new("game.json"))
            .expect_err("should fail");
        match error {
            ConfigError::Parse { field, path, .. } => {
                assert_eq!(field, "grid_size");
                assert_eq!(path, PathBuf::from("game.json"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let error = GameConfig::from_json_str(r#"{ "speed": 3 }"#, Path::new("game.json"))
            .expect_err("should fail");
        assert!(matches!(error, ConfigError::Parse { .. }));
        assert!(error.to_string().contains("speed"));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let error = GameConfig::from_json_file(&dir.path().join("absent.json"))
            .expect_err("should fail");
        assert!(matches!(error, ConfigError::Read { .. }));
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut config = GameConfig::default();
        config.apply_env_overrides(env_from(&[
            (GRID_SIZE_ENV_VAR, " 9 "),
            (SEED_ENV_VAR, "1234"),
            (AUTOPLAY_STEP_TICKS_ENV_VAR, "3"),
        ]));
        assert_eq!(
            config,
            GameConfig {
                grid_size: 9,
                seed: Some(1234),
                autoplay_step_ticks: 3,
            }
        );
    }

    #[test]
    fn invalid_env_overrides_are_ignored() {
        let mut config = GameConfig::default();
        config.apply_env_overrides(env_from(&[
            (GRID_SIZE_ENV_VAR, "lots"),
            (SEED_ENV_VAR, "-1"),
        ]));
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let zero_size = GameConfig {
            grid_size: 0,
            ..GameConfig::default()
        };
        assert!(matches!(
            zero_size.validate(),
            Err(ConfigError::Invalid {
                field: "grid_size",
                ..
            })
        ));

        let too_large = GameConfig {
            grid_size: 33,
            ..GameConfig::default()
        };
        assert!(too_large.validate().is_err());

        let no_ticks = GameConfig {
            autoplay_step_ticks: 0,
            ..GameConfig::default()
        };
        assert!(matches!(
            no_ticks.validate(),
            Err(ConfigError::Invalid {
                field: "autoplay_step_ticks",
                ..
            })
        ));
        assert!(GameConfig::default().validate().is_ok());
    }
}
