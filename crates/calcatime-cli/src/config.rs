//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::Cli;

/// Application configuration.
///
/// Every field can also be given on the command line, which takes precedence.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Calendar provider URI, e.g. `exchange:https://mail.example.com/EWS/Exchange.asmx`.
    pub calendar: Option<String>,
    /// Account domain.
    pub domain: Option<String>,
    /// Account user name.
    pub username: Option<String>,
    /// Account password.
    pub password: Option<String>,
    /// Grouping used when `--by` is not given.
    pub default_grouping: Option<String>,
    /// Keep groups whose total is zero.
    pub include_zero: bool,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("calendar", &self.calendar)
            .field("domain", &self.domain)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("default_grouping", &self.default_grouping)
            .field("include_zero", &self.include_zero)
            .finish()
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (CALCATIME_*)
        figment = figment.merge(Env::prefixed("CALCATIME_"));

        figment.extract()
    }

    /// Overlays values given on the command line.
    #[must_use]
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        let overlay = |target: &mut Option<String>, value: &Option<String>| {
            if value.is_some() {
                target.clone_from(value);
            }
        };
        overlay(&mut self.calendar, &cli.calendar);
        overlay(&mut self.domain, &cli.domain);
        overlay(&mut self.username, &cli.username);
        overlay(&mut self.password, &cli.password);
        overlay(&mut self.default_grouping, &cli.by);
        self.include_zero |= cli.include_zero;
        self
    }
}

/// Returns the platform-specific config directory for calcatime.
///
/// On Linux: `~/.config/calcatime`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("calcatime"))
}
