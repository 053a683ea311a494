use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub stack: StackConfig,
    #[serde(default)]
    pub spotlight: SpotlightConfig,
    #[serde(default)]
    pub rebind: RebindConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (preview logs are written here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Easing curve applied to a sub-animation or a smooth scroll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    /// Jump to the end value when the window closes
    None,
    Linear,
    /// 1 - (1-t)^2
    Quad,
    /// 1 - (1-t)^3
    #[default]
    Cubic,
    /// 1 - (1-t)^5
    Quintic,
    /// 1 - 2^(-10t)
    EaseOut,
}

/// Which choreography the pinned section plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Choreography {
    /// Sliding window of stacked cards, newest in front
    #[default]
    Stack,
    /// Five-card grid rising around a centred card
    Spotlight,
}

/// Stacked-cards choreography. Durations and offsets are in timeline units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackConfig {
    /// Offset between consecutive entrances
    #[serde(default = "default_step")]
    pub step: f64,
    /// Maximum number of cards visible in the foreground stack
    #[serde(default = "default_max_visible")]
    pub max_visible: usize,
    /// Scale per depth, index 0 is the frontmost card
    #[serde(default = "default_depth_scales")]
    pub depth_scales: Vec<f64>,
    /// Time reserved after the last entrance begins
    #[serde(default = "default_settle_span")]
    pub settle_span: f64,
    #[serde(default = "default_entrance_duration")]
    pub entrance_duration: f64,
    #[serde(default = "default_recede_duration")]
    pub recede_duration: f64,
    /// Seek lands this far before the next entrance
    #[serde(default = "default_seek_epsilon")]
    pub seek_epsilon: f64,
    /// Pre-entrance tilt in degrees
    #[serde(default = "default_tilt_degrees")]
    pub tilt_degrees: f64,
    /// Vertical gap between stacked cards as a fraction of viewport height
    #[serde(default = "default_spacing_ratio")]
    pub spacing_ratio: f64,
    /// Entry offset bias on wide layouts (entry = vh * (1 - bias))
    #[serde(default = "default_entry_bias_wide")]
    pub entry_bias_wide: f64,
    /// Entry offset bias on narrow layouts
    #[serde(default = "default_entry_bias_narrow")]
    pub entry_bias_narrow: f64,
    /// Pin distance as a multiple of viewport height
    #[serde(default = "default_stack_distance_factor")]
    pub distance_factor: f64,
    /// Pinned distance from the viewport top in pixels
    #[serde(default = "default_stack_pin_offset")]
    pub pin_offset: f64,
    #[serde(default = "default_cubic")]
    pub entrance_easing: EasingType,
    #[serde(default = "default_quad")]
    pub recede_easing: EasingType,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            step: default_step(),
            max_visible: default_max_visible(),
            depth_scales: default_depth_scales(),
            settle_span: default_settle_span(),
            entrance_duration: default_entrance_duration(),
            recede_duration: default_recede_duration(),
            seek_epsilon: default_seek_epsilon(),
            tilt_degrees: default_tilt_degrees(),
            spacing_ratio: default_spacing_ratio(),
            entry_bias_wide: default_entry_bias_wide(),
            entry_bias_narrow: default_entry_bias_narrow(),
            distance_factor: default_stack_distance_factor(),
            pin_offset: default_stack_pin_offset(),
            entrance_easing: default_cubic(),
            recede_easing: default_quad(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotlightConfig {
    /// Pin distance as a multiple of viewport height
    #[serde(default = "default_spotlight_distance_factor")]
    pub distance_factor: f64,
    /// Pinned distance from the viewport top in pixels
    #[serde(default)]
    pub pin_offset: f64,
    /// Narrower viewports leave the section unpinned
    #[serde(default = "default_spotlight_min_width")]
    pub min_width: f64,
    /// Horizontal offset of the inner pair while rising, in pixels
    #[serde(default = "default_side_offset")]
    pub side_offset: f64,
}

impl Default for SpotlightConfig {
    fn default() -> Self {
        Self {
            distance_factor: default_spotlight_distance_factor(),
            pin_offset: 0.0,
            min_width: default_spotlight_min_width(),
            side_offset: default_side_offset(),
        }
    }
}

/// What survives a re-bind when geometry changes mid-scroll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizePolicy {
    /// Keep the absolute scroll pixel, re-derive progress
    #[default]
    PreserveOffset,
    /// Scroll once so progress through the pinned range is unchanged
    PreserveProgress,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebindConfig {
    /// Quiet period after the last resize before re-binding
    #[serde(default = "default_resize_debounce")]
    pub resize_debounce_ms: u64,
    #[serde(default = "default_orientation_delay")]
    pub orientation_delay_ms: u64,
    #[serde(default = "default_visibility_delay")]
    pub visibility_delay_ms: u64,
    /// Delay of the confirmation pass after the initial bind
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,
    /// Ignore height-only resizes on narrow layouts (soft keyboard, URL bar)
    #[serde(default = "default_true")]
    pub ignore_mobile_resize: bool,
    /// Height change ratio below which a narrow-layout resize is ignored
    #[serde(default = "default_keyboard_resize_ratio")]
    pub keyboard_resize_ratio: f64,
    #[serde(default)]
    pub resize_policy: ResizePolicy,
}

impl Default for RebindConfig {
    fn default() -> Self {
        Self {
            resize_debounce_ms: default_resize_debounce(),
            orientation_delay_ms: default_orientation_delay(),
            visibility_delay_ms: default_visibility_delay(),
            settle_delay_ms: default_settle_delay(),
            ignore_mobile_resize: default_true(),
            keyboard_resize_ratio: default_keyboard_resize_ratio(),
            resize_policy: ResizePolicy::default(),
        }
    }
}

/// Smooth scrolling used when a seek moves the page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Enable smooth scrolling
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    /// Animation duration in milliseconds
    #[serde(default = "default_animation_duration")]
    pub animation_duration_ms: u64,
    /// Hard upper bound on any seek animation
    #[serde(default = "default_max_duration")]
    pub max_duration_ms: u64,
    /// Easing function
    #[serde(default)]
    pub easing: EasingType,
    /// Animation frame rate
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// A reported scroll this far from the seek's own position counts as user input
    #[serde(default = "default_interrupt_tolerance")]
    pub interrupt_tolerance_px: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_animation_duration(),
            max_duration_ms: default_max_duration(),
            easing: EasingType::default(),
            animation_fps: default_animation_fps(),
            interrupt_tolerance_px: default_interrupt_tolerance(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    #[serde(default)]
    pub choreography: Choreography,
    /// Number of cards in the preview section
    #[serde(default = "default_cards")]
    pub cards: usize,
    /// Theme name
    #[serde(default = "default_theme_name")]
    pub theme: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            choreography: Choreography::default(),
            cards: default_cards(),
            theme: default_theme_name(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scrollpin")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_step() -> f64 {
    0.5
}

fn default_max_visible() -> usize {
    3
}

fn default_depth_scales() -> Vec<f64> {
    vec![1.0, 0.94, 0.88]
}

fn default_settle_span() -> f64 {
    1.0
}

fn default_entrance_duration() -> f64 {
    0.6
}

fn default_recede_duration() -> f64 {
    0.4
}

fn default_seek_epsilon() -> f64 {
    0.001
}

fn default_tilt_degrees() -> f64 {
    -10.0
}

fn default_spacing_ratio() -> f64 {
    0.03
}

fn default_entry_bias_wide() -> f64 {
    0.3
}

fn default_entry_bias_narrow() -> f64 {
    0.4
}

fn default_stack_distance_factor() -> f64 {
    2.6
}

fn default_stack_pin_offset() -> f64 {
    40.0
}

fn default_cubic() -> EasingType {
    EasingType::Cubic
}

fn default_quad() -> EasingType {
    EasingType::Quad
}

fn default_spotlight_distance_factor() -> f64 {
    3.0
}

fn default_spotlight_min_width() -> f64 {
    1024.0
}

fn default_side_offset() -> f64 {
    80.0
}

fn default_resize_debounce() -> u64 {
    150
}

fn default_orientation_delay() -> u64 {
    200
}

fn default_visibility_delay() -> u64 {
    120
}

fn default_settle_delay() -> u64 {
    80
}

fn default_keyboard_resize_ratio() -> f64 {
    0.25
}

fn default_animation_duration() -> u64 {
    600
}

fn default_max_duration() -> u64 {
    1500
}

fn default_animation_fps() -> u32 {
    60
}

fn default_interrupt_tolerance() -> f64 {
    1.0
}

fn default_tick_rate() -> u64 {
    100
}

fn default_cards() -> usize {
    5
}

fn default_theme_name() -> String {
    "gruvbox-dark".to_string()
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl StackConfig {
    /// Check that the policy can produce a well-formed timeline
    pub fn validate(&self) -> crate::Result<()> {
        if self.step.is_nan() || self.step <= 0.0 {
            return Err(crate::Error::Config(format!(
                "stack.step must be positive, got {}",
                self.step
            )));
        }
        if self.max_visible == 0 {
            return Err(crate::Error::Config(
                "stack.max_visible must be at least 1".to_string(),
            ));
        }
        if self.depth_scales.len() < self.max_visible {
            return Err(crate::Error::Config(format!(
                "stack.depth_scales has {} entries, max_visible needs {}",
                self.depth_scales.len(),
                self.max_visible
            )));
        }
        for (name, duration) in [
            ("entrance_duration", self.entrance_duration),
            ("recede_duration", self.recede_duration),
        ] {
            if duration < 0.0 || duration > self.settle_span {
                return Err(crate::Error::Config(format!(
                    "stack.{} must lie in [0, settle_span], got {}",
                    name, duration
                )));
            }
        }
        if self.step > self.settle_span {
            return Err(crate::Error::Config(format!(
                "stack.step ({}) must not exceed settle_span ({})",
                self.step, self.settle_span
            )));
        }
        // a zero epsilon lands exactly on the next card's reveal
        if !(self.seek_epsilon > 0.0 && self.seek_epsilon < self.step) {
            return Err(crate::Error::Config(format!(
                "stack.seek_epsilon must lie in (0, step), got {}",
                self.seek_epsilon
            )));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate configuration text
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml()?)?;

        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    pub fn validate(&self) -> crate::Result<()> {
        self.stack.validate()?;
        if self.scroll.max_duration_ms == 0 {
            return Err(crate::Error::Config(
                "scroll.max_duration_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/scrollpin/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("scrollpin")
            .join("config.toml")
    }

    /// Get the preview log file path
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("scrollpin.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.stack.step, 0.5);
        assert_eq!(config.stack.max_visible, 3);
        assert_eq!(config.stack.depth_scales, vec![1.0, 0.94, 0.88]);
        assert_eq!(config.stack.distance_factor, 2.6);
        assert_eq!(config.spotlight.distance_factor, 3.0);
        assert_eq!(config.rebind.resize_policy, ResizePolicy::PreserveOffset);
        assert!(config.scroll.smooth_enabled);
        assert_eq!(config.scroll.easing, EasingType::Cubic);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [stack]
            step = 0.4
            max_visible = 2

            [rebind]
            resize_policy = "preserve-progress"

            [ui]
            choreography = "spotlight"
            "#,
        )
        .unwrap();

        assert_eq!(config.stack.step, 0.4);
        assert_eq!(config.stack.max_visible, 2);
        assert_eq!(config.stack.entrance_duration, 0.6);
        assert_eq!(config.rebind.resize_policy, ResizePolicy::PreserveProgress);
        assert_eq!(config.ui.choreography, Choreography::Spotlight);
        assert_eq!(config.ui.cards, 5);
    }

    #[test]
    fn test_toml_roundtrip_keeps_enums() {
        let mut config = AppConfig::default();
        config.stack.recede_easing = EasingType::Linear;
        let text = config.to_toml().unwrap();
        let parsed = AppConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.stack.recede_easing, EasingType::Linear);
    }

    #[test]
    fn test_validate_rejects_bad_stack() {
        let mut stack = StackConfig::default();
        stack.step = 0.0;
        assert!(stack.validate().is_err());

        let mut stack = StackConfig::default();
        stack.max_visible = 4;
        assert!(stack.validate().is_err());

        let mut stack = StackConfig::default();
        stack.entrance_duration = 1.5;
        assert!(stack.validate().is_err());

        let mut stack = StackConfig::default();
        stack.seek_epsilon = 0.5;
        assert!(stack.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_seek_epsilon() {
        let mut stack = StackConfig::default();
        stack.seek_epsilon = 0.0;
        assert!(stack.validate().is_err());

        let mut config = AppConfig::default();
        config.stack.seek_epsilon = 0.0;
        let text = config.to_toml().unwrap();
        assert!(AppConfig::from_toml(&text).is_err());

        stack.seek_epsilon = f64::NAN;
        assert!(stack.validate().is_err());
    }
}
