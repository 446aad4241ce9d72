use std::fmt;
use std::time::Duration;

use effects::{EffectKind, Tuning};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = "warpfx.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WarpConfig {
    pub version: u32,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub tuning: Tuning,
    #[serde(default)]
    pub panels: Vec<PanelConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerSetting {
    #[default]
    High,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpaceSetting {
    #[default]
    Gamma,
    Linear,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    pub power: PowerSetting,
    pub color_space: ColorSpaceSetting,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "warpfx".into(),
            width: 1_612,
            height: 480,
            vsync: true,
            power: PowerSetting::default(),
            color_space: ColorSpaceSetting::default(),
        }
    }
}

/// Row layout of the panels inside the window, in logical pixels.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub padding: u32,
    pub gap: u32,
    /// Fixed panel width; `None` splits the row evenly.
    pub panel_width: Option<u32>,
    /// Fixed panel height; `None` fills the padded height.
    pub panel_height: Option<u32>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: 40,
            gap: 16,
            panel_width: Some(500),
            panel_height: Some(400),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FetchConfig {
    #[serde(
        default = "default_fetch_timeout",
        deserialize_with = "deserialize_duration",
        serialize_with = "serialize_duration"
    )]
    pub timeout: Duration,
    /// Largest response body accepted from a remote image.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: default_fetch_timeout(),
            max_bytes: default_max_bytes(),
        }
    }
}

/// Accepted range of `simulation.step_hz`.
pub const MIN_STEP_HZ: f32 = 1.0;
pub const MAX_STEP_HZ: f32 = 1_000.0;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub step_hz: f32,
    pub max_catch_up: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            step_hz: 60.0,
            max_catch_up: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PanelConfig {
    pub effect: EffectKind,
    pub image: String,
    /// Seed for effects that draw random numbers; defaults to the panel index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl PanelConfig {
    pub fn new(effect: EffectKind, image: impl Into<String>) -> Self {
        Self {
            effect,
            image: image.into(),
            seed: None,
        }
    }
}

fn default_fetch_timeout() -> Duration {
    Duration::from_secs(20)
}

fn default_max_bytes() -> u64 {
    32 * 1024 * 1024
}

fn serialize_duration<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&humantime::format_duration(*value).to_string())
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Duration;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a duration as number of seconds or human-readable string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            humantime::parse_duration(v)
                .map_err(|err| E::custom(format!("invalid duration '{v}': {err}")))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Duration::from_secs(v))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v < 0 {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Duration::from_secs(v as u64))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if !v.is_finite() || v.is_sign_negative() {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Duration::from_secs_f64(v))
        }
    }

    deserializer.deserialize_any(Visitor)
}

impl WarpConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: WarpConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    /// Built-in configuration used when no file exists: one panel per effect.
    pub fn demo() -> Self {
        Self {
            version: 1,
            window: WindowConfig::default(),
            layout: LayoutConfig::default(),
            fetch: FetchConfig::default(),
            simulation: SimulationConfig::default(),
            tuning: Tuning::default(),
            panels: vec![
                PanelConfig::new(
                    EffectKind::Ripple,
                    "https://t4.ftcdn.net/jpg/06/41/42/69/360_F_641426931_sJkCqdIkiI5GPtbBQ92S7xIJk9akRo33.jpg",
                ),
                PanelConfig::new(
                    EffectKind::Glitch,
                    "https://assets.codepen.io/9051928/glitch.png",
                ),
                PanelConfig::new(
                    EffectKind::Wavy,
                    "https://static.vecteezy.com/system/resources/thumbnails/026/829/465/small_2x/beautiful-girl-with-autumn-leaves-photo.jpg",
                ),
            ],
        }
    }

    /// Seed for panel `index`, falling back to the index itself.
    pub fn panel_seed(&self, index: usize) -> u64 {
        self.panels
            .get(index)
            .and_then(|panel| panel.seed)
            .unwrap_or(index as u64)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != 1 {
            return Err(ConfigError::Invalid(format!(
                "unsupported config version {}; expected 1",
                self.version
            )));
        }

        if self.panels.is_empty() {
            return Err(ConfigError::Invalid(
                "config must define at least one panel".into(),
            ));
        }

        for (index, panel) in self.panels.iter().enumerate() {
            if panel.image.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "panel {index} ({}) has an empty image reference",
                    panel.effect
                )));
            }
        }

        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(
                "window width and height must be greater than zero".into(),
            ));
        }

        if let Some(0) = self.layout.panel_width {
            return Err(ConfigError::Invalid(
                "layout.panel_width must be greater than zero".into(),
            ));
        }

        if let Some(0) = self.layout.panel_height {
            return Err(ConfigError::Invalid(
                "layout.panel_height must be greater than zero".into(),
            ));
        }

        let step_hz = self.simulation.step_hz;
        if !(MIN_STEP_HZ..=MAX_STEP_HZ).contains(&step_hz) {
            return Err(ConfigError::Invalid(format!(
                "simulation.step_hz must be in [{MIN_STEP_HZ}, {MAX_STEP_HZ}], got {step_hz}"
            )));
        }

        if self.simulation.max_catch_up == 0 {
            return Err(ConfigError::Invalid(
                "simulation.max_catch_up must be at least 1".into(),
            ));
        }

        if self.fetch.timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "fetch.timeout must be greater than zero".into(),
            ));
        }

        if self.fetch.max_bytes == 0 {
            return Err(ConfigError::Invalid(
                "fetch.max_bytes must be greater than zero".into(),
            ));
        }

        self.tuning
            .validate()
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;

        Ok(())
    }
}
