use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub slider: SliderConfig,
    #[serde(default)]
    pub smooth_scroll: ScrollConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Slider behaviour, fixed for the lifetime of an engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderConfig {
    /// Number of slides visible at once
    #[serde(default = "default_slides_per_view")]
    pub slides_per_view: u32,
    /// Number of slides moved by one left/right command
    #[serde(default = "default_scroll_number")]
    pub scroll_number: u32,
    /// Wrap around at both ends instead of stopping
    #[serde(default = "default_true")]
    pub infinite_scroll: bool,
    /// Start autoplay when the engine runs
    #[serde(default)]
    pub auto_scroll: bool,
    /// Autoplay period in seconds
    #[serde(default = "default_scroll_period")]
    pub scroll_period_secs: f64,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            slides_per_view: default_slides_per_view(),
            scroll_number: default_scroll_number(),
            infinite_scroll: default_true(),
            auto_scroll: false,
            scroll_period_secs: default_scroll_period(),
        }
    }
}

impl SliderConfig {
    /// Autoplay tick interval, `None` unless the period is a positive finite number
    pub fn scroll_period(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(self.scroll_period_secs)
            .ok()
            .filter(|period| !period.is_zero())
    }

    /// Reject zero counts and non-positive periods.
    ///
    /// The engine itself never calls this; it is applied when configuration
    /// is loaded from disk.
    pub fn validate(&self) -> crate::Result<()> {
        if self.slides_per_view == 0 {
            return Err(crate::Error::Config(
                "slides_per_view must be at least 1".to_string(),
            ));
        }
        if self.scroll_number == 0 {
            return Err(crate::Error::Config(
                "scroll_number must be at least 1".to_string(),
            ));
        }
        if self.scroll_period().is_none() {
            return Err(crate::Error::Config(format!(
                "scroll_period_secs must be a positive number, got {}",
                self.scroll_period_secs
            )));
        }
        Ok(())
    }
}

/// Easing curve used by animated scrolling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    None,
    Linear,
    #[default]
    Cubic,
    Quintic,
    EaseOut,
}

/// Smooth scrolling parameters for the simulated host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    #[serde(default = "default_animation_duration")]
    pub animation_duration_ms: u64,
    #[serde(default)]
    pub easing: EasingType,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_animation_duration(),
            easing: EasingType::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_slides_per_view() -> u32 {
    3
}

fn default_scroll_number() -> u32 {
    1
}

fn default_scroll_period() -> f64 {
    3.0
}

fn default_animation_duration() -> u64 {
    300
}

impl AppConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file, falling back to defaults if it does not exist
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse and validate TOML configuration text
    pub fn parse(content: &str) -> crate::Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.slider.validate()?;
        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml()?)?;

        Ok(())
    }

    /// Render configuration as pretty TOML
    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/carousel/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("carousel")
            .join("config.toml")
    }
}
