//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/orgtree/orgtree.toml`
//! 3. Local config: `<dir>/.orgtree.toml`
//! 4. Environment variables: `ORGTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{expand_env_vars, SuccessionPolicy, SuccessorPicker};

/// Unified configuration for orgtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    /// Roster file used when no `--roster` is given
    pub roster: Option<PathBuf>,
    /// How a fired employee's successor is chosen
    pub succession: SuccessionPolicy,
    /// Seed for random succession (unset = different choice every run)
    pub succession_seed: Option<u64>,
}

/// Raw settings for intermediate parsing (None = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub roster: Option<PathBuf>,
    pub succession: Option<SuccessionPolicy>,
    pub succession_seed: Option<u64>,
}

/// Get the XDG config directory for orgtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "orgtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("orgtree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".orgtree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
///
/// A relative `roster` is resolved against the directory of the file.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    let mut raw: RawSettings = toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })?;
    if let (Some(roster), Some(dir)) = (raw.roster.as_ref(), path.parent()) {
        let expanded = PathBuf::from(expand_env_vars(&roster.to_string_lossy()));
        if expanded.is_relative() {
            raw.roster = Some(dir.join(expanded));
        }
    }
    Ok(raw)
}

impl Settings {
    /// Overlay wins for every value it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            roster: overlay.roster.clone().or_else(|| self.roster.clone()),
            succession: overlay.succession.unwrap_or(self.succession),
            succession_seed: overlay.succession_seed.or(self.succession_seed),
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(roster) = &self.roster {
            self.roster = Some(PathBuf::from(expand_env_vars(&roster.to_string_lossy())));
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.orgtree.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current, Self::env_source())?;

        current.expand_paths();

        Ok(current)
    }

    fn env_source() -> Environment {
        Environment::with_prefix("ORGTREE")
            .prefix_separator("_")
            .separator("__")
    }

    /// Apply ORGTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self, env: Environment) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(env)
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("roster") {
            settings.roster = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("succession") {
            settings.succession = val
                .parse()
                .map_err(|message| ApplicationError::Config { message })?;
        }
        if let Ok(val) = config.get_string("succession_seed") {
            let seed = val.trim().parse::<u64>().map_err(|e| ApplicationError::Config {
                message: format!("ORGTREE_SUCCESSION_SEED '{val}': {e}"),
            })?;
            settings.succession_seed = Some(seed);
        }

        Ok(settings)
    }

    /// Successor picker configured by these settings.
    pub fn successor_picker(&self) -> Box<dyn SuccessorPicker> {
        self.succession.picker(self.succession_seed)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# orgtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/orgtree/orgtree.toml
#   Local:  <dir>/.orgtree.toml
#   Env:    ORGTREE_* environment variables (e.g. ORGTREE_SUCCESSION_SEED=42)

# Roster file (JSON: { "employees": [ { "name", "jobTitle", "salary", "boss" } ] })
# Relative paths are resolved against the directory of this file.
# roster = "employees.json"

# Successor of a fired employee: "random" or "first-in-line"
# succession = "random"

# Pin random succession to a reproducible sequence
# succession_seed = 42
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_with(vars: &[(&str, &str)]) -> Environment {
        let map: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::env_source().source(Some(map))
    }

    #[test]
    fn given_defaults_when_created_then_random_succession_without_roster() {
        let settings = Settings::default();
        assert_eq!(settings.roster, None);
        assert_eq!(settings.succession, SuccessionPolicy::Random);
        assert_eq!(settings.succession_seed, None);
    }

    #[test]
    fn given_overlay_when_merging_then_specified_values_win() {
        let base = Settings {
            roster: Some(PathBuf::from("/base/employees.json")),
            succession: SuccessionPolicy::Random,
            succession_seed: Some(1),
        };
        let overlay = RawSettings {
            roster: None,
            succession: Some(SuccessionPolicy::FirstInLine),
            succession_seed: None,
        };

        let result = base.merge_with(&overlay);

        assert_eq!(result.roster, Some(PathBuf::from("/base/employees.json")));
        assert_eq!(result.succession, SuccessionPolicy::FirstInLine);
        assert_eq!(result.succession_seed, Some(1));
    }

    #[test]
    fn given_env_vars_when_applying_overrides_then_replace_values() {
        let env = env_with(&[
            ("ORGTREE_ROSTER", "/tmp/staff.json"),
            ("ORGTREE_SUCCESSION", "first-in-line"),
            ("ORGTREE_SUCCESSION_SEED", "42"),
        ]);

        let settings = Settings::apply_env_overrides(Settings::default(), env).unwrap();

        assert_eq!(settings.roster, Some(PathBuf::from("/tmp/staff.json")));
        assert_eq!(settings.succession, SuccessionPolicy::FirstInLine);
        assert_eq!(settings.succession_seed, Some(42));
    }

    #[test]
    fn given_invalid_seed_in_env_when_applying_overrides_then_fails() {
        let env = env_with(&[("ORGTREE_SUCCESSION_SEED", "many")]);

        let err = Settings::apply_env_overrides(Settings::default(), env).unwrap_err();

        assert!(matches!(err, ApplicationError::Config { .. }));
    }

    #[test]
    fn given_tilde_in_roster_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            roster: Some(PathBuf::from("~/staff/employees.json")),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let roster = settings.roster.unwrap();
        assert!(roster.to_string_lossy().starts_with(&home));
        assert!(!roster.to_string_lossy().contains('~'));
    }

    #[test]
    fn given_settings_when_rendering_toml_then_round_trips_policy_name() {
        let settings = Settings {
            succession: SuccessionPolicy::FirstInLine,
            ..Settings::default()
        };
        let rendered = settings.to_toml().unwrap();
        assert!(rendered.contains("succession = \"first-in-line\""));
    }
}
