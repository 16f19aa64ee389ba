//! User configuration at ~/.config/postcal/config.toml

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::caption::Theme;
use crate::date_grid::ViewMode;
use crate::error::{ScheduleError, ScheduleResult};

static DEFAULT_CAPTION_DELAY: &str = "700ms";
static DEFAULT_CAPTION_TIMEOUT: &str = "10s";

fn default_caption_delay() -> String {
    DEFAULT_CAPTION_DELAY.to_string()
}

fn default_caption_timeout() -> String {
    DEFAULT_CAPTION_TIMEOUT.to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PostcalConfig {
    /// View shown on startup
    #[serde(default)]
    pub view: ViewMode,

    /// Theme preselected for caption generation
    #[serde(default)]
    pub theme: Theme,

    /// Artificial latency of the bundled caption generator
    #[serde(default = "default_caption_delay")]
    pub caption_delay: String,

    /// Give up on a caption generation after this long
    #[serde(default = "default_caption_timeout")]
    pub caption_timeout: String,
}

impl Default for PostcalConfig {
    fn default() -> Self {
        PostcalConfig {
            view: ViewMode::default(),
            theme: Theme::default(),
            caption_delay: default_caption_delay(),
            caption_timeout: default_caption_timeout(),
        }
    }
}

impl PostcalConfig {
    pub fn config_path() -> ScheduleResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ScheduleError::Config("Could not determine config directory".into()))?
            .join("postcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, writing a commented template first
    /// if none exists. `POSTCAL_*` environment variables override the file.
    pub fn load() -> ScheduleResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> ScheduleResult<Self> {
        let config: PostcalConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("POSTCAL"))
            .build()
            .map_err(|e| ScheduleError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ScheduleError::Config(e.to_string()))?;

        // Fail early on bad durations rather than at first use
        config.caption_delay()?;
        config.caption_timeout()?;

        Ok(config)
    }

    pub fn caption_delay(&self) -> ScheduleResult<Duration> {
        parse_duration("caption_delay", &self.caption_delay)
    }

    pub fn caption_timeout(&self) -> ScheduleResult<Duration> {
        parse_duration("caption_timeout", &self.caption_timeout)
    }

    pub fn save(&self, path: &Path) -> ScheduleResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ScheduleError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| ScheduleError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> ScheduleResult<()> {
        let contents = format!(
            "\
# postcal configuration

# View on startup (\"month\" or \"week\"):
# view = \"month\"

# Caption theme (motivational, funny, aesthetic, lifestyle):
# theme = \"motivational\"

# How long the sample caption generator pretends to think:
# caption_delay = \"{}\"

# Give up on caption generation after:
# caption_timeout = \"{}\"
",
            DEFAULT_CAPTION_DELAY, DEFAULT_CAPTION_TIMEOUT
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ScheduleError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| ScheduleError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

fn parse_duration(key: &str, value: &str) -> ScheduleResult<Duration> {
    humantime::parse_duration(value)
        .map_err(|e| ScheduleError::Config(format!("Invalid {key} '{value}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_loads_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");

        PostcalConfig::create_default_config(&path).unwrap();
        let config = PostcalConfig::load_from(&path).unwrap();

        assert_eq!(config, PostcalConfig::default());
        assert_eq!(config.caption_delay().unwrap(), Duration::from_millis(700));
        assert_eq!(config.caption_timeout().unwrap(), Duration::from_secs(10));
    }

    #[test]
    fn reads_values_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "view = \"week\"\ntheme = \"funny\"\ncaption_delay = \"0s\"\n",
        )
        .unwrap();

        let config = PostcalConfig::load_from(&path).unwrap();
        assert_eq!(config.view, ViewMode::Week);
        assert_eq!(config.theme, Theme::Funny);
        assert_eq!(config.caption_delay().unwrap(), Duration::ZERO);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = PostcalConfig {
            view: ViewMode::Week,
            theme: Theme::Aesthetic,
            caption_delay: "1s".into(),
            caption_timeout: "5s".into(),
        };

        config.save(&path).unwrap();
        assert_eq!(PostcalConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn rejects_bad_duration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "caption_delay = \"soon\"\n").unwrap();

        let err = PostcalConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ScheduleError::Config(msg) if msg.contains("caption_delay")));
    }

    #[test]
    fn rejects_unknown_theme() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "theme = \"gloomy\"\n").unwrap();

        assert!(PostcalConfig::load_from(&path).is_err());
    }
}
