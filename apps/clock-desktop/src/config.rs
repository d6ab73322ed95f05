//! Clock configuration.
//!
//! The defaults are the shipped behaviour. A bundle may carry
//! `Resources/clock.toml` to rename its assets or change the output buffer;
//! the file is only ever read. Chime timing is fixed and cannot be changed
//! here.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::resources::Resources;

/// Name of the optional override file inside the resources directory.
pub const CONFIG_FILE: &str = "clock.toml";

/// Clock configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Chime sound, relative to the resources directory.
    #[serde(default = "default_chime_file")]
    pub chime_file: String,

    /// Tray icon, relative to the resources directory.
    #[serde(default = "default_icon_file")]
    pub icon_file: String,

    /// Output device buffer, in milliseconds of audio.
    #[serde(default = "default_output_buffer_ms")]
    pub output_buffer_ms: u64,
}

fn default_chime_file() -> String {
    "chime.mp3".into()
}

fn default_icon_file() -> String {
    "icon.png".into()
}

fn default_output_buffer_ms() -> u64 {
    100
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chime_file: default_chime_file(),
            icon_file: default_icon_file(),
            output_buffer_ms: default_output_buffer_ms(),
        }
    }
}

impl Config {
    /// Loads the bundle's override file, or the defaults if there is none.
    pub fn load(resources: &Resources) -> anyhow::Result<Self> {
        let path = resources.path(CONFIG_FILE);

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            tracing::debug!(path = %path.display(), "configuration overrides loaded");
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn output_buffer(&self) -> Duration {
        Duration::from_millis(self.output_buffer_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn resources_in(dir: &Path) -> Resources {
        Resources::beside(&dir.join("MacOS").join("cityclock"), "../Resources")
    }

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.chime_file, "chime.mp3");
        assert_eq!(config.icon_file, "icon.png");
        assert_eq!(config.output_buffer(), Duration::from_millis(100));
    }

    #[test]
    fn config_partial_toml() {
        // Only the icon is overridden, the rest keeps its default.
        let config: Config = toml::from_str("icon_file = \"bell.png\"").unwrap();
        assert_eq!(config.icon_file, "bell.png");
        assert_eq!(config.chime_file, "chime.mp3");
        assert_eq!(config.output_buffer_ms, 100);
    }

    #[test]
    fn strike_timing_cannot_be_overridden() {
        assert!(toml::from_str::<Config>("strike_pause_ms = 750").is_err());
        assert!(toml::from_str::<Config>("tick_settle_ms = 0").is_err());
    }

    #[test]
    fn load_without_file_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load(&resources_in(tmp.path())).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_reads_bundle_file() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("Resources")).unwrap();
        std::fs::write(
            tmp.path().join("Resources").join(CONFIG_FILE),
            "chime_file = \"bell.wav\"\n",
        )
        .unwrap();

        let config = Config::load(&resources_in(tmp.path())).unwrap();
        assert_eq!(config.chime_file, "bell.wav");
        assert_eq!(config.icon_file, "icon.png");
    }

    #[test]
    fn load_rejects_malformed_file() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("Resources")).unwrap();
        std::fs::write(tmp.path().join("Resources").join(CONFIG_FILE), "output_buffer_ms = \"soon\"").unwrap();

        assert!(Config::load(&resources_in(tmp.path())).is_err());
    }

    #[test]
    fn load_rejects_pause_override() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("Resources")).unwrap();
        std::fs::write(
            tmp.path().join("Resources").join(CONFIG_FILE),
            "chime_file = \"bell.wav\"\nstrike_pause_ms = 750\n",
        )
        .unwrap();

        let err = Config::load(&resources_in(tmp.path())).unwrap_err();
        assert!(format!("{err:#}").contains("strike_pause_ms"), "{err:#}");
    }
}
