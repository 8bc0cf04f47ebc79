//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by an optional `config.toml` in the site root. The file is
//! sparse: it only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "ASIMO Technical Club"
//! storage = ".club-site/storage.json"  # Local key-value store (theme, notifications)
//!
//! [home]
//! max_featured_events = 6   # Cap on the home page event timeline
//! gallery_preview = 3       # Gallery items shown on the home page
//!
//! [carousel]
//! mode = "looping"          # "looping" (clone-and-snap strip) or "simple"
//! # interval_ms = 3000      # Auto-advance period (3000 looping, 5000 simple)
//! pause_ms = 3000           # Cool-down after manual navigation (looping)
//! transition_ms = 600       # Slide transition; snap-back waits this long
//!
//! [loading]
//! policy = "independent"    # or "all_or_nothing"
//!
//! [colors.light]
//! background = "#f5f7fb"
//! text = "#1a1a2e"
//! text_muted = "#5c6370"
//! accent = "#667eea"
//! card = "rgba(255, 255, 255, 0.7)"
//!
//! [colors.dark]
//! background = "#0a0a14"
//! text = "#eeeeee"
//! text_muted = "#9aa0aa"
//! accent = "#8fa2ff"
//! card = "rgba(255, 255, 255, 0.06)"
//!
//! [processing]
//! max_processes = 4         # Max parallel loaders/probes (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::carousel::{CarouselMode, CarouselTiming};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub site: SiteSection,
    pub home: HomeConfig,
    pub carousel: CarouselConfig,
    pub loading: LoadingConfig,
    pub colors: ColorConfig,
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.home.max_featured_events == 0 {
            return Err(ConfigError::Validation(
                "home.max_featured_events must be at least 1".into(),
            ));
        }
        if self.carousel.interval_ms == Some(0) {
            return Err(ConfigError::Validation(
                "carousel.interval_ms must be non-zero".into(),
            ));
        }
        if self.carousel.transition_ms >= self.carousel.interval() {
            return Err(ConfigError::Validation(
                "carousel.transition_ms must be shorter than the auto-advance interval".into(),
            ));
        }
        if self.site.storage.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site.storage must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    /// Shown in the page `<title>` and header.
    pub title: String,
    /// Path of the local key-value store, relative to the site root.
    pub storage: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: "ASIMO Technical Club".to_string(),
            storage: ".club-site/storage.json".to_string(),
        }
    }
}

/// Home page slicing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HomeConfig {
    pub max_featured_events: usize,
    pub gallery_preview: usize,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            max_featured_events: 6,
            gallery_preview: 3,
        }
    }
}

/// Featured banner carousel behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarouselConfig {
    pub mode: CarouselMode,
    /// Auto-advance period. When absent, follows the mode.
    pub interval_ms: Option<u64>,
    pub pause_ms: u64,
    pub transition_ms: u64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            mode: CarouselMode::Looping,
            interval_ms: None,
            pause_ms: 3000,
            transition_ms: 600,
        }
    }
}

impl CarouselConfig {
    pub fn interval(&self) -> u64 {
        self.interval_ms
            .unwrap_or_else(|| self.mode.default_interval_ms())
    }

    pub fn timing(&self) -> CarouselTiming {
        CarouselTiming {
            interval: Duration::from_millis(self.interval()),
            pause: Duration::from_millis(self.pause_ms),
            transition: Duration::from_millis(self.transition_ms),
        }
    }
}

/// How the orchestrator joins its resource loads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    /// Render every section whose resource loaded; failed sections show the
    /// error message.
    #[default]
    Independent,
    /// Any failed core resource turns the whole page into the error state.
    AllOrNothing,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadingConfig {
    pub policy: LoadPolicy,
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Color configuration for light and dark themes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Secondary text (dates, captions, timestamps).
    pub text_muted: String,
    /// Buttons, active indicators, the notification dot.
    pub accent: String,
    /// Glass card fill.
    pub card: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#f5f7fb".to_string(),
            text: "#1a1a2e".to_string(),
            text_muted: "#5c6370".to_string(),
            accent: "#667eea".to_string(),
            card: "rgba(255, 255, 255, 0.7)".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#0a0a14".to_string(),
            text: "#eeeeee".to_string(),
            text_muted: "#9aa0aa".to_string(),
            accent: "#8fa2ff".to_string(),
            card: "rgba(255, 255, 255, 0.06)".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_dark()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// The stock defaults as a TOML table, the base every `config.toml` is
/// layered onto.
fn stock_defaults() -> Result<toml::Table, ConfigError> {
    match toml::Value::try_from(SiteConfig::default())? {
        toml::Value::Table(table) => Ok(table),
        _ => Err(ConfigError::Validation("stock defaults are not a table".into())),
    }
}

/// Layer `overlay` onto `base` in place. Nested tables merge key by key;
/// any other value replaces what was there.
fn overlay_table(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        if let toml::Value::Table(nested) = value {
            if let Some(toml::Value::Table(inner)) = base.get_mut(&key) {
                overlay_table(inner, nested);
            } else {
                base.insert(key, toml::Value::Table(nested));
            }
        } else {
            base.insert(key, value);
        }
    }
}

/// Load `config.toml` from the site root over the stock defaults, then
/// validate. A missing file yields the defaults.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let mut table = stock_defaults()?;
    let path = root.join("config.toml");
    match fs::read_to_string(&path) {
        Ok(text) => overlay_table(&mut table, toml::from_str(&text)?),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config.toml, using defaults");
        }
        Err(e) => return Err(e.into()),
    }
    let config: SiteConfig = toml::Value::Table(table).try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# club-site configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

[site]
# Shown in the page <title> and header.
title = "ASIMO Technical Club"

# Local key-value store (theme preference, notification state), relative to
# the site root. Shared by every command; last write wins.
storage = ".club-site/storage.json"

# ---------------------------------------------------------------------------
# Home page
# ---------------------------------------------------------------------------
[home]
# Featured events shown on the home timeline, lowest priority first.
max_featured_events = 6

# Gallery items previewed on the home page. The gallery page shows all.
gallery_preview = 3

# ---------------------------------------------------------------------------
# Featured banner carousel
# ---------------------------------------------------------------------------
[carousel]
# "looping": sliding strip with indicator dots and an infinite-loop illusion.
# "simple":  one active card at a time with prev/next buttons and nav dots.
mode = "looping"

# Auto-advance period in milliseconds.
# Omit to follow the mode: 3000 for looping, 5000 for simple.
# interval_ms = 3000

# After manual navigation, auto-advance pauses this long (looping mode).
pause_ms = 3000

# Slide transition length. The loop snap-back waits for it to finish.
transition_ms = 600

# ---------------------------------------------------------------------------
# Content loading
# ---------------------------------------------------------------------------
[loading]
# "independent":    render every section that loaded; failed sections show
#                   an error message.
# "all_or_nothing": any failed core resource puts every section in the
#                   error state.
policy = "independent"

# ---------------------------------------------------------------------------
# Colors - light theme
# ---------------------------------------------------------------------------
[colors.light]
background = "#f5f7fb"
text = "#1a1a2e"
text_muted = "#5c6370"
accent = "#667eea"
card = "rgba(255, 255, 255, 0.7)"

# ---------------------------------------------------------------------------
# Colors - dark theme (default)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#0a0a14"
text = "#eeeeee"
text_muted = "#9aa0aa"
accent = "#8fa2ff"
card = "rgba(255, 255, 255, 0.06)"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers for resource loads and image probes.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

/// Generate CSS custom properties from color config.
///
/// Dark is the default scheme; `body.light-theme` switches to light.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {dark_bg};
    --color-text: {dark_text};
    --color-text-muted: {dark_text_muted};
    --color-accent: {dark_accent};
    --color-card: {dark_card};
}}

body.light-theme {{
    --color-bg: {light_bg};
    --color-text: {light_text};
    --color-text-muted: {light_text_muted};
    --color-accent: {light_accent};
    --color-card: {light_card};
}}"#,
        dark_bg = colors.dark.background,
        dark_text = colors.dark.text,
        dark_text_muted = colors.dark.text_muted,
        dark_accent = colors.dark.accent,
        dark_card = colors.dark.card,
        light_bg = colors.light.background,
        light_text = colors.light.text,
        light_text_muted = colors.light.text_muted,
        light_accent = colors.light.accent,
        light_card = colors.light.card,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = SiteConfig::default();
        assert_eq!(config.home.max_featured_events, 6);
        assert_eq!(config.home.gallery_preview, 3);
        assert_eq!(config.carousel.mode, CarouselMode::Looping);
        assert_eq!(config.loading.policy, LoadPolicy::Independent);
        assert_eq!(config.site.storage, ".club-site/storage.json");
    }

    #[test]
    fn interval_follows_mode_when_unset() {
        let mut carousel = CarouselConfig::default();
        assert_eq!(carousel.interval(), 3000);
        carousel.mode = CarouselMode::Simple;
        assert_eq!(carousel.interval(), 5000);
        carousel.interval_ms = Some(4000);
        assert_eq!(carousel.interval(), 4000);
    }

    #[test]
    fn timing_converts_to_durations() {
        let timing = CarouselConfig::default().timing();
        assert_eq!(timing.interval, Duration::from_millis(3000));
        assert_eq!(timing.pause, Duration::from_millis(3000));
        assert_eq!(timing.transition, Duration::from_millis(600));
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[carousel]
mode = "simple"

[colors.light]
background = "#fafafa"
"##;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.carousel.mode, CarouselMode::Simple);
        assert_eq!(config.colors.light.background, "#fafafa");
        // Defaults preserved
        assert_eq!(config.colors.light.text, "#1a1a2e");
        assert_eq!(config.carousel.pause_ms, 3000);
    }

    #[test]
    fn parse_loading_policy() {
        let toml = r#"
[loading]
policy = "all_or_nothing"
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.loading.policy, LoadPolicy::AllOrNothing);
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.home.max_featured_events, 6);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[home]
max_featured_events = 4

[site]
title = "Robotics Society"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.home.max_featured_events, 4);
        assert_eq!(config.home.gallery_preview, 3);
        assert_eq!(config.site.title, "Robotics Society");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
[home]
max_featured = 6
"#;
        let result: Result<SiteConfig, _> = toml::from_str(toml_str);
        assert!(result.unwrap_err().to_string().contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[homepage]\nx = 1\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_mode_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[carousel]\nmode = \"bouncy\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_zero_featured_cap() {
        let mut config = SiteConfig::default();
        config.home.max_featured_events = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_transition_longer_than_interval() {
        let mut config = SiteConfig::default();
        config.carousel.transition_ms = 3000;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("transition_ms"));
    }

    #[test]
    fn validate_rejects_zero_interval() {
        let mut config = SiteConfig::default();
        config.carousel.interval_ms = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[home]\nmax_featured_events = 0\n",
        )
        .unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn overlay_merges_nested_tables() {
        let mut base: toml::Table =
            toml::from_str("[home]\nmax_featured_events = 6\ngallery_preview = 3\n").unwrap();
        let overlay: toml::Table = toml::from_str("[home]\ngallery_preview = 5\n").unwrap();
        overlay_table(&mut base, overlay);
        let home = base["home"].as_table().unwrap();
        assert_eq!(home["gallery_preview"].as_integer(), Some(5));
        assert_eq!(home["max_featured_events"].as_integer(), Some(6));
    }

    #[test]
    fn overlay_replaces_scalars_and_keeps_the_rest() {
        let mut base: toml::Table = toml::from_str("a = 1\nb = 2\n").unwrap();
        overlay_table(&mut base, toml::from_str("a = 10\nc = 3\n").unwrap());
        assert_eq!(base["a"].as_integer(), Some(10));
        assert_eq!(base["b"].as_integer(), Some(2));
        assert_eq!(base["c"].as_integer(), Some(3));
    }

    #[test]
    fn load_config_keeps_defaults_beside_overrides() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[carousel]\npause_ms = 1500\n").unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.carousel.pause_ms, 1500);
        assert_eq!(config.carousel.transition_ms, 600);
    }

    #[test]
    fn load_config_surfaces_read_errors() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("config.toml")).unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Io(_))));
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config.home.max_featured_events, 6);
        assert_eq!(config.carousel.mode, CarouselMode::Looping);
        assert_eq!(config.carousel.interval_ms, None);
        assert_eq!(config.colors.dark.background, "#0a0a14");
        assert_eq!(config.loading.policy, LoadPolicy::Independent);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        for section in [
            "[site]",
            "[home]",
            "[carousel]",
            "[loading]",
            "[colors.light]",
            "[colors.dark]",
            "[processing]",
        ] {
            assert!(content.contains(section), "missing {section}");
        }
    }

    #[test]
    fn generate_css_dark_default_light_override() {
        let mut colors = ColorConfig::default();
        colors.light.background = "#ffffff".to_string();
        let css = generate_color_css(&colors);
        assert!(css.contains("--color-bg: #0a0a14"));
        assert!(css.contains("body.light-theme"));
        assert!(css.contains("--color-bg: #ffffff"));
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let config = ProcessingConfig {
            max_processes: Some(99999),
        };
        assert_eq!(effective_threads(&config), cores);
    }
}
