use anyhow::{Context, Result};
use rebound_core::{AnimateError, BouncePlan, StyleSink, StyleTarget};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};

/// Main configuration for a bounce animation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Element property the animation writes to
    #[serde(default)]
    pub target: TargetConfig,

    /// Bounce chain parameters
    #[serde(default)]
    pub bounce: BounceConfig,
}

/// Write destination configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Label of the element being animated
    #[serde(default = "default_element")]
    pub element: String,

    /// Style property to write (height, top, width, ...)
    #[serde(default = "default_property")]
    pub property: String,

    /// Unit appended to every written value (px, %, vh, ...)
    #[serde(default = "default_unit")]
    pub unit: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            element: default_element(),
            property: default_property(),
            unit: default_unit(),
        }
    }
}

/// Bounce chain configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BounceConfig {
    /// Total number of rising and falling passes
    #[serde(default = "default_passes")]
    pub passes: i64,

    #[serde(default)]
    pub amplitude_start: f64,

    /// Height of the first bounce
    #[serde(default = "default_amplitude_end")]
    pub amplitude_end: f64,

    /// How much lower each bounce is than the one before it
    #[serde(default = "default_amplitude_decay")]
    pub amplitude_decay: f64,

    /// Counter increment per tick
    #[serde(default = "default_step")]
    pub step: f64,

    /// Milliseconds between ticks
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Milliseconds to wait before the first pass
    #[serde(default)]
    pub delay_ms: u64,

    /// Restart the whole chain on this period until interrupted
    #[serde(default)]
    pub repeat_ms: Option<u64>,
}

impl Default for BounceConfig {
    fn default() -> Self {
        Self {
            passes: default_passes(),
            amplitude_start: 0.0,
            amplitude_end: default_amplitude_end(),
            amplitude_decay: default_amplitude_decay(),
            step: default_step(),
            tick_ms: default_tick_ms(),
            delay_ms: 0,
            repeat_ms: None,
        }
    }
}

fn default_element() -> String {
    "element".to_string()
}

fn default_property() -> String {
    "top".to_string()
}

fn default_unit() -> String {
    "px".to_string()
}

fn default_passes() -> i64 {
    4
}

fn default_amplitude_end() -> f64 {
    20.0
}

fn default_amplitude_decay() -> f64 {
    5.0
}

fn default_step() -> f64 {
    1.0
}

fn default_tick_ms() -> u64 {
    10
}

impl Config {
    /// Load configuration from a file, auto-detecting TOML or JSON format
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        // Try to determine format from extension
        let extension = path.extension().and_then(|s| s.to_str());

        match extension {
            Some("toml") => Self::from_toml(&content),
            Some("json") => Self::from_json(&content),
            _ => {
                // Try TOML first (preferred), fall back to JSON
                Self::from_toml(&content).or_else(|_| Self::from_json(&content))
            }
        }
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse config as TOML")
    }

    /// Parse configuration from JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("failed to parse config as JSON")
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.target.property.is_empty() {
            anyhow::bail!("target.property cannot be empty");
        }
        if self.bounce.repeat_ms == Some(0) {
            anyhow::bail!("bounce.repeat_ms must be greater than zero");
        }
        self.bounce_plan()?
            .validate()
            .context("invalid bounce parameters")?;
        Ok(())
    }

    /// The plan for the first pass of the chain.
    pub fn bounce_plan(&self) -> rebound_core::Result<BouncePlan> {
        let remaining_passes =
            u32::try_from(self.bounce.passes).map_err(|_| AnimateError::InvalidParameter {
                name: "passes",
                reason: format!("{} is not a pass count", self.bounce.passes),
            })?;
        Ok(BouncePlan {
            remaining_passes,
            amplitude_start: self.bounce.amplitude_start,
            amplitude_end: self.bounce.amplitude_end,
            amplitude_decay: self.bounce.amplitude_decay,
            step: self.bounce.step,
            tick_period: Duration::from_millis(self.bounce.tick_ms),
        })
    }

    pub fn target<S: StyleSink>(&self, sink: S) -> StyleTarget<S> {
        StyleTarget::new(
            self.target.element.as_str(),
            self.target.property.as_str(),
            self.target.unit.as_str(),
            sink,
        )
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.bounce.delay_ms)
    }

    pub fn repeat(&self) -> Option<Duration> {
        self.bounce.repeat_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rebound_core::RecordingSink;

    #[test]
    fn test_parse_toml() {
        let toml = r##"
[target]
element = "#logo"
property = "height"
unit = "vh"

[bounce]
passes = 6
amplitude_end = 30
amplitude_decay = 10
step = 2
tick_ms = 16
repeat_ms = 5000
"##;

        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.target.element, "#logo");
        assert_eq!(config.target.unit, "vh");
        assert_eq!(config.bounce.passes, 6);
        assert_eq!(config.bounce.amplitude_end, 30.0);
        assert_eq!(config.repeat(), Some(Duration::from_secs(5)));
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_json() {
        let json = r##"{
            "target": { "element": "#logo", "property": "width", "unit": "%" },
            "bounce": { "passes": 2, "amplitude_end": 50, "step": 5, "delay_ms": 250 }
        }"##;

        let config = Config::from_json(json).unwrap();
        assert_eq!(config.target.property, "width");
        assert_eq!(config.bounce.step, 5.0);
        assert_eq!(config.bounce.amplitude_decay, 5.0);
        assert_eq!(config.delay(), Duration::from_millis(250));
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.target.element, "element");
        assert_eq!(config.target.property, "top");
        assert_eq!(config.target.unit, "px");
        let plan = config.bounce_plan().unwrap();
        assert_eq!(plan.remaining_passes, 4);
        assert_eq!(plan.amplitude_end, 20.0);
        assert_eq!(plan.tick_period, Duration::from_millis(10));
        assert_eq!(config.repeat(), None);
    }

    #[test]
    fn test_rejects_negative_passes() {
        let config = Config::from_toml("[bounce]\npasses = -2\n").unwrap();
        assert!(matches!(
            config.bounce_plan(),
            Err(AnimateError::InvalidParameter { name: "passes", .. })
        ));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_step() {
        let config = Config::from_toml("[bounce]\nstep = 0\n").unwrap();
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "invalid bounce parameters");
    }

    #[test]
    fn test_target_uses_configured_unit() {
        let config = Config::from_toml("[target]\nunit = \"%\"\n").unwrap();
        let mut target = config.target(RecordingSink::default());
        target.write(7.0).unwrap();
        assert_eq!(target.sink().writes[0].1, "7%");
    }
}
