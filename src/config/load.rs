use std::{env, path::PathBuf, str::FromStr};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `CHOREO__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("CHOREO")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.controls.frame_interval_ms == 0 {
            return Err("controls.frame_interval_ms must be >= 1".to_string());
        }
        if self.storage.title_history_limit == 0 {
            return Err("storage.title_history_limit must be >= 1".to_string());
        }
        if log::LevelFilter::from_str(&self.logging.level).is_err() {
            return Err(format!("logging.level {:?} is not a log level", self.logging.level));
        }
        Ok(())
    }

    /// The configured data file, or the XDG default.
    pub fn data_file(&self) -> Option<PathBuf> {
        self.storage.data_file.clone().or_else(default_data_path)
    }

    /// The configured log file, or `choreo.log` beside the data file.
    pub fn log_file(&self) -> Option<PathBuf> {
        if let Some(file) = &self.logging.file {
            return Some(file.clone());
        }
        self.data_file()
            .and_then(|p| p.parent().map(|d| d.join("choreo.log")))
    }

    /// Render the effective settings as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Resolve the config path from `CHOREO_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("CHOREO_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/choreo/config.toml`
/// or `~/.config/choreo/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("choreo").join("config.toml"))
}

/// `$XDG_DATA_HOME/choreo/storage.json` or `~/.local/share/choreo/storage.json`.
pub fn default_data_path() -> Option<PathBuf> {
    xdg_dir("XDG_DATA_HOME", ".local/share").map(|d| d.join("choreo").join("storage.json"))
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var) {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_fallback))
    }
}
