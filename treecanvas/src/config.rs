//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treecanvas/treecanvas.toml`
//! 3. Explicit config file (`--config` / `TREECANVAS_CONFIG`)
//! 4. Environment variables: `TREECANVAS_*` prefix, `__` between nested keys

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{node_count, seed, TreeLimits};

const ENV_PREFIX: &str = "TREECANVAS";

/// Upper bound for every layout value, in pixels.
pub const MAX_LAYOUT_PIXELS: u32 = 10_000;

/// Spacing constants used to turn tree metrics into a canvas size.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LayoutSettings {
    /// Horizontal distance between neighbouring nodes
    pub horizontal_spacing: u32,
    /// Vertical distance between levels
    pub vertical_spacing: u32,
    /// Padding on every side of the canvas
    pub padding: u32,
    /// Extra padding above the root
    pub padding_top: u32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            horizontal_spacing: 60,
            vertical_spacing: 80,
            padding: 20,
            padding_top: 40,
        }
    }
}

/// Raw layout config for intermediate parsing (None means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLayoutSettings {
    pub horizontal_spacing: Option<u32>,
    pub vertical_spacing: Option<u32>,
    pub padding: Option<u32>,
    pub padding_top: Option<u32>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub id_limit: Option<u32>,
    pub max_fan_out: Option<usize>,
    pub layout: RawLayoutSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Size of the node id space
    pub id_limit: u32,
    /// Maximum number of children per node
    pub max_fan_out: usize,
    pub layout: LayoutSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            id_limit: 1000,
            max_fan_out: 10,
            layout: LayoutSettings::default(),
        }
    }
}

impl LayoutSettings {
    fn merge_with(&self, overlay: &RawLayoutSettings) -> Self {
        Self {
            horizontal_spacing: overlay
                .horizontal_spacing
                .unwrap_or(self.horizontal_spacing),
            vertical_spacing: overlay.vertical_spacing.unwrap_or(self.vertical_spacing),
            padding: overlay.padding.unwrap_or(self.padding),
            padding_top: overlay.padding_top.unwrap_or(self.padding_top),
        }
    }
}

pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treecanvas").map(|dirs| dirs.config_dir().to_path_buf())
}

pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treecanvas.toml"))
}

fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Tree bounds handed to the model.
    pub fn limits(&self) -> TreeLimits {
        TreeLimits {
            id_limit: self.id_limit,
            max_fan_out: Some(self.max_fan_out),
        }
    }

    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            id_limit: overlay.id_limit.unwrap_or(self.id_limit),
            max_fan_out: overlay.max_fan_out.unwrap_or(self.max_fan_out),
            layout: self.layout.merge_with(&overlay.layout),
        }
    }

    /// Loads settings from every layer.
    ///
    /// An explicit path must exist; the global file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_layers(global_config_path().as_deref(), explicit, ENV_PREFIX)
    }

    /// Layers `global`, `explicit` and `<env_prefix>_*` variables over the defaults.
    pub fn load_layers(
        global: Option<&Path>,
        explicit: Option<&Path>,
        env_prefix: &str,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global.filter(|path| path.exists()) {
            debug!(path = %global_path.display(), "loading global config");
            current = current.merge_with(&load_raw_settings(global_path)?);
        }

        // 3. Explicit config file
        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading explicit config");
            current = current.merge_with(&load_raw_settings(path)?);
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current, env_prefix)?;

        current.validate()?;
        Ok(current)
    }

    fn apply_env_overrides(mut settings: Self, prefix: &str) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_value(&config, "id_limit")? {
            settings.id_limit = val;
        }
        if let Some(val) = env_value(&config, "max_fan_out")? {
            settings.max_fan_out = val;
        }
        if let Some(val) = env_value(&config, "layout.horizontal_spacing")? {
            settings.layout.horizontal_spacing = val;
        }
        if let Some(val) = env_value(&config, "layout.vertical_spacing")? {
            settings.layout.vertical_spacing = val;
        }
        if let Some(val) = env_value(&config, "layout.padding")? {
            settings.layout.padding = val;
        }
        if let Some(val) = env_value(&config, "layout.padding_top")? {
            settings.layout.padding_top = val;
        }

        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ApplicationError> {
        let seed_size = node_count(&seed::default_seed());
        if (self.id_limit as usize) < seed_size {
            return Err(ApplicationError::Config {
                message: format!(
                    "id_limit {} is smaller than the seed tree ({} nodes)",
                    self.id_limit, seed_size
                ),
            });
        }
        if self.max_fan_out == 0 {
            return Err(ApplicationError::Config {
                message: "max_fan_out must be at least 1".to_string(),
            });
        }
        let layout = [
            ("horizontal_spacing", self.layout.horizontal_spacing),
            ("vertical_spacing", self.layout.vertical_spacing),
            ("padding", self.layout.padding),
            ("padding_top", self.layout.padding_top),
        ];
        if let Some((name, value)) = layout.iter().find(|(_, v)| *v > MAX_LAYOUT_PIXELS) {
            return Err(ApplicationError::Config {
                message: format!("layout.{name} = {value} exceeds {MAX_LAYOUT_PIXELS}"),
            });
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    pub fn template() -> String {
        r#"# treecanvas configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/treecanvas/treecanvas.toml
#   Explicit: --config <file> or TREECANVAS_CONFIG
#   Env:      TREECANVAS_* variables (e.g. TREECANVAS_LAYOUT__PADDING=10)

# Node ids are drawn from 0..id_limit (must cover the 14-node seed tree)
# id_limit = 1000

# Maximum number of children a single node may have
# max_fan_out = 10

[layout]
# Pixels between neighbouring nodes on a level
# horizontal_spacing = 60

# Pixels between levels
# vertical_spacing = 80

# Padding around the canvas
# padding = 20

# Extra padding above the root
# padding_top = 40
"#
        .to_string()
    }
}

fn env_value<T: DeserializeOwned>(config: &Config, key: &str) -> Result<Option<T>, ApplicationError> {
    match config.get::<T>(key) {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
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

    #[test]
    fn given_defaults_when_validating_then_ok() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.limits().max_fan_out, Some(10));
    }

    #[test]
    fn given_partial_overlay_when_merging_then_unspecified_fields_keep_base() {
        let overlay = RawSettings {
            id_limit: Some(50),
            max_fan_out: None,
            layout: RawLayoutSettings {
                padding: Some(5),
                ..RawLayoutSettings::default()
            },
        };

        let result = Settings::default().merge_with(&overlay);

        assert_eq!(result.id_limit, 50);
        assert_eq!(result.max_fan_out, 10);
        assert_eq!(result.layout.padding, 5);
        assert_eq!(result.layout.horizontal_spacing, 60);
    }

    #[test]
    fn given_id_limit_below_seed_size_when_validating_then_config_error() {
        let settings = Settings {
            id_limit: 13,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ApplicationError::Config { .. })
        ));
    }

    #[test]
    fn given_zero_fan_out_when_validating_then_config_error() {
        let settings = Settings {
            max_fan_out: 0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn given_layout_at_bound_when_validating_then_ok() {
        let settings = Settings {
            layout: LayoutSettings {
                padding_top: MAX_LAYOUT_PIXELS,
                ..LayoutSettings::default()
            },
            ..Settings::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn given_env_vars_when_applying_overrides_then_replace_values() {
        std::env::set_var("TCTESTENVA_ID_LIMIT", "250");
        std::env::set_var("TCTESTENVA_LAYOUT__PADDING", "7");

        let settings = Settings::apply_env_overrides(Settings::default(), "TCTESTENVA").unwrap();

        assert_eq!(settings.id_limit, 250);
        assert_eq!(settings.layout.padding, 7);
        assert_eq!(settings.max_fan_out, 10);
    }

    #[test]
    fn given_malformed_env_var_when_applying_overrides_then_config_error() {
        std::env::set_var("TCTESTENVB_MAX_FAN_OUT", "many");
        assert!(Settings::apply_env_overrides(Settings::default(), "TCTESTENVB").is_err());
    }

    #[test]
    fn given_settings_when_serializing_then_toml_round_trips() {
        let settings = Settings::default();
        let text = settings.to_toml().unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn given_template_when_parsing_then_yields_defaults() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert_eq!(Settings::default().merge_with(&raw), Settings::default());
    }
}
