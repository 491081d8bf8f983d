use std::{env, fmt, fs, path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation;

pub const ENV_TARGET_URL: &str = "STATUSBOARD_TARGET_URL";
pub const ENV_DATABASE_PATH: &str = "STATUSBOARD_DATABASE_PATH";
pub const ENV_BIND: &str = "STATUSBOARD_BIND";
pub const ENV_PORT: &str = "STATUSBOARD_PORT";

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read config file {0}")]
    ReadFailed(path::PathBuf),
    #[error("failed to write config file {0}")]
    WriteFailed(path::PathBuf),
    #[error("failed to parse config: {0}")]
    ParseFailed(String),
    #[error("no config directory available (set XDG_CONFIG_HOME or HOME)")]
    ConfigPathUnavailable,
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub monitor: Monitor,
    pub database: Database,
    pub server: Server,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Monitor {
    pub target_url: String,
    pub interval_seconds: u64,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Database {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    /// Days of history served by the history endpoint and the status page
    pub history_days: u32,
}

impl Default for Monitor {
    fn default() -> Self {
        Self {
            target_url: "https://deploy.tz".into(),
            interval_seconds: 60,
            timeout_seconds: 10,
        }
    }
}

impl Default for Database {
    fn default() -> Self {
        Self { path: "status.db".into() }
    }
}

impl Default for Server {
    fn default() -> Self {
        Self { bind: "0.0.0.0".into(), port: 8000, history_days: 90 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self { monitor: Monitor::default(), database: Database::default(), server: Server::default() }
    }
}

/// Used to ensure we are actually reading a toml file
fn normalize_toml_path(path: &path::Path) -> path::PathBuf {
    let mut path = path.to_path_buf();
    if path.extension().map(|ext| ext != "toml").unwrap_or(true) {
        path.set_extension("toml");
    }
    path
}

/// Get default config path ($XDG_CONFIG_HOME/statusboard/config.toml or
/// $HOME/.config/...)
fn default_config_path() -> Result<path::PathBuf, Error> {
    let path = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        path::PathBuf::from(config_home)
    } else if let Some(home_dir) = env::home_dir() {
        home_dir.join(".config")
    } else {
        return Err(Error::ConfigPathUnavailable);
    };

    Ok(path.join("statusboard/config.toml"))
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
                writeln!(f, "  {:indent$}{}: {}", "", label, value, indent = level * 2)
            }
        };
        let write_title_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str| {
                writeln!(f, "{:indent$}{}", "", label, indent = level * 2)
            }
        };

        let write_title_1 = write_title_indented(1);
        let write_1 = write_indented(1);

        writeln!(f, "Current Internal Configuration State:")?;
        write_title_1(f, "Monitor")?;
        write_1(f, "Target URL", &self.monitor.target_url)?;
        write_1(f, "Interval (s)", &self.monitor.interval_seconds)?;
        write_1(f, "Timeout (s)", &self.monitor.timeout_seconds)?;
        write_title_1(f, "Database")?;
        write_1(f, "Path", &self.database.path)?;
        write_title_1(f, "Server")?;
        write_1(f, "Bind Address", &self.server.bind)?;
        write_1(f, "Port", &self.server.port)?;
        write_1(f, "History (days)", &self.server.history_days)?;

        Ok(())
    }
}

impl Config {
    /// Generate Config structure from file
    ///
    /// Creates a default config in ~/.config/statusboard/config.toml
    ///  or the specified path, with the name config.toml if one does not exist.
    /// Environment variables (and a `.env` file, if present) override the
    /// values read from disk.
    ///
    /// ```no_run
    /// use statusboard_service::Config;
    ///
    /// let cfg = Config::from_config(None::<&std::path::Path>)?;
    /// println!("{}", cfg);
    /// # Ok::<(), statusboard_service::config::Error>(())
    /// ```
    pub fn from_config(optional_path: Option<impl AsRef<path::Path>>) -> Result<Self, Error> {
        let config_path: path::PathBuf = if let Some(path) = optional_path {
            normalize_toml_path(path.as_ref())
        } else {
            default_config_path()?
        };

        let mut config = if config_path.exists() {
            let raw_string =
                fs::read_to_string(&config_path).map_err(|_err| Error::ReadFailed(config_path.clone()))?;
            Self::from_toml_str(&raw_string)?
        } else {
            let config = Self::default();
            config.write_config(&config_path)?;
            config
        };

        dotenvy::dotenv().ok();
        config.apply_overrides(|name| env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, Error> {
        toml::from_str(raw).map_err(|err| Error::ParseFailed(err.to_string()))
    }

    /// Apply overrides from a variable lookup (normally the process environment)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_TARGET_URL) {
            self.monitor.target_url = url;
        }
        if let Some(path) = lookup(ENV_DATABASE_PATH) {
            self.database.path = path;
        }
        if let Some(bind) = lookup(ENV_BIND) {
            self.server.bind = bind;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port
                .parse()
                .map_err(|_err| Error::Invalid(format!("{ENV_PORT} is not a valid port: {port}")))?;
        }
        Ok(())
    }

    /// Check that the configuration can drive the prober and the server
    pub fn validate(&self) -> Result<(), Error> {
        let checks = [
            validation::validate_http_endpoint(&self.monitor.target_url),
            validation::validate_interval(self.monitor.interval_seconds),
            validation::validate_timeout(self.monitor.timeout_seconds, self.monitor.interval_seconds),
            validation::validate_history_days(self.server.history_days),
        ];

        for check in checks {
            check.to_result().map_err(|err| Error::Invalid(err.to_string()))?;
        }

        if self.database.path.trim().is_empty() {
            return Err(Error::Invalid("Database path cannot be empty".into()));
        }

        Ok(())
    }

    /// Serialize and write a config to a file
    pub fn write_config(&self, path: &std::path::Path) -> Result<(), Error> {
        let config_str: String =
            toml::to_string_pretty(self).map_err(|err| Error::ParseFailed(err.to_string()))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|_err| Error::WriteFailed(path.to_path_buf()))?;
        }

        std::fs::write(path, config_str).map_err(|_err| Error::WriteFailed(path.to_path_buf()))
    }
}
