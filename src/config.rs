//! Layout and font configuration.
//!
//! Every field has a default, so a partial JSON/TOML object is enough to build a
//! [`LayoutConfig`]. [`LayoutConfig::from_env`] overlays the font locations from
//! environment variables (call `dotenvy::dotenv().ok()` first to pick up a `.env`).

use log::warn;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::errors::{LayoutError, Result};
use crate::models::common::SlideDimensions;
use crate::models::elements::ContentKind;

pub const ENV_FONT_DIR: &str = "SLIDES_LAYOUT_FONT_DIR";
pub const ENV_FONT_CACHE_DIR: &str = "SLIDES_LAYOUT_FONT_CACHE_DIR";
pub const ENV_FONT_URL: &str = "SLIDES_LAYOUT_FONT_URL";
pub const ENV_FONT_TIMEOUT_SECS: &str = "SLIDES_LAYOUT_FONT_TIMEOUT_SECS";

/// Where fonts come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FontConfig {
    /// Directory holding the bundled font files.
    pub font_dir: PathBuf,
    /// Directory where fetched substitute fonts are stored.
    pub cache_dir: PathBuf,
    /// Base URL of the remote font source; a substitute's remote path is appended.
    pub remote_base_url: String,
    /// Upper bound for a single remote fetch.
    pub fetch_timeout_secs: u64,
    /// Family used when a requested font cannot be resolved.
    pub default_family: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            font_dir: PathBuf::from("fonts"),
            cache_dir: env::temp_dir().join("slides-layout-fonts"),
            remote_base_url: "https://github.com/google/fonts/raw/main".to_string(),
            fetch_timeout_secs: 10,
            default_family: "DejaVu Sans".to_string(),
        }
    }
}

/// Font size ceilings (points) per block kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FontSizes {
    /// Ceilings for heading levels 1 to 6.
    pub headings: [f64; 6],
    pub body: f64,
    pub list: f64,
    pub table: f64,
    pub code: f64,
    /// No best-fit result goes below this.
    pub min: f64,
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            headings: [40.0, 32.0, 28.0, 24.0, 20.0, 18.0],
            body: 18.0,
            list: 18.0,
            table: 14.0,
            code: 14.0,
            min: 10.0,
        }
    }
}

impl FontSizes {
    /// Ceiling for a heading level; out-of-range levels are clamped into 1..=6.
    pub fn heading(&self, level: u8) -> f64 {
        let index = usize::from(level.clamp(1, 6)) - 1;
        self.headings[index]
    }

    /// Rejects sizes the best-fit search cannot work with: every size must be
    /// finite and positive.
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("body", self.body),
            ("list", self.list),
            ("table", self.table),
            ("code", self.code),
            ("min", self.min),
        ];
        let headings = self.headings.iter().map(|&size| ("headings", size));
        for (name, size) in named.into_iter().chain(headings) {
            if !size.is_finite() || size <= 0.0 {
                return Err(LayoutError::InvalidConfig(format!(
                    "fontSizes.{} must be a positive number, got {}",
                    name, size
                )));
            }
        }
        Ok(())
    }

    /// Ceiling for the block kind.
    pub fn for_kind(&self, kind: ContentKind) -> f64 {
        match kind {
            ContentKind::Heading { level } => self.heading(level),
            ContentKind::BulletList | ContentKind::NumberedList => self.list,
            ContentKind::Table => self.table,
            ContentKind::CodeBlock => self.code,
            ContentKind::Paragraph | ContentKind::Blockquote | ContentKind::Image => self.body,
        }
    }
}

/// Geometry and sizing knobs of the layout engine (all lengths in inches).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    /// Canvas used for slides created without explicit dimensions.
    pub canvas: SlideDimensions,
    pub margin_left: f64,
    pub margin_right: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
    /// Vertical gap between stacked blocks.
    pub block_gap: f64,
    /// Smallest height a stacked block may be given.
    pub min_block_height: f64,
    /// Center level-1 headings horizontally.
    pub center_title: bool,
    pub font_sizes: FontSizes,
    /// Increment used by the auto-position search.
    pub auto_position_step: f64,
    pub fonts: FontConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas: SlideDimensions::default(),
            margin_left: 0.5,
            margin_right: 0.5,
            margin_top: 0.5,
            margin_bottom: 0.5,
            block_gap: 0.2,
            min_block_height: 0.4,
            center_title: true,
            font_sizes: FontSizes::default(),
            auto_position_step: 0.1,
            fonts: FontConfig::default(),
        }
    }
}

impl LayoutConfig {
    /// Default configuration with font locations taken from the environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(dir) = env::var(ENV_FONT_DIR) {
            config.fonts.font_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var(ENV_FONT_CACHE_DIR) {
            config.fonts.cache_dir = PathBuf::from(dir);
        }
        if let Ok(url) = env::var(ENV_FONT_URL) {
            config.fonts.remote_base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(raw) = env::var(ENV_FONT_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.fonts.fetch_timeout_secs = secs,
                _ => warn!(
                    "Ignoring {}={:?}: expected a positive number of seconds",
                    ENV_FONT_TIMEOUT_SECS, raw
                ),
            }
        }
        config
    }

    /// Checks the values layout arithmetic depends on.
    pub fn validate(&self) -> Result<()> {
        self.font_sizes.validate()?;
        if !self.auto_position_step.is_finite() || self.auto_position_step <= 0.0 {
            return Err(LayoutError::InvalidConfig(format!(
                "autoPositionStep must be a positive number, got {}",
                self.auto_position_step
            )));
        }
        Ok(())
    }

    /// Width available to content between the side margins of `canvas`.
    pub fn content_width(&self, canvas: &SlideDimensions) -> f64 {
        (canvas.width - self.margin_left - self.margin_right).max(self.min_block_height)
    }

    /// Lowest y coordinate content should reach on `canvas`.
    pub fn content_bottom(&self, canvas: &SlideDimensions) -> f64 {
        canvas.height - self.margin_bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: LayoutConfig =
            serde_json::from_str(r#"{"blockGap": 0.3, "fonts": {"fetchTimeoutSecs": 2}}"#)
                .unwrap();
        assert_eq!(config.block_gap, 0.3);
        assert_eq!(config.margin_left, 0.5);
        assert_eq!(config.fonts.fetch_timeout_secs, 2);
        assert_eq!(config.fonts.default_family, "DejaVu Sans");
        assert_eq!(config.font_sizes.min, 10.0);
    }

    #[test]
    fn test_heading_ceiling_clamps_level() {
        let sizes = FontSizes::default();
        assert_eq!(sizes.heading(1), 40.0);
        assert_eq!(sizes.heading(0), 40.0);
        assert_eq!(sizes.heading(9), 18.0);
    }

    #[test]
    fn test_validate_rejects_unusable_font_sizes() {
        assert!(LayoutConfig::default().validate().is_ok());

        let config: LayoutConfig =
            serde_json::from_str(r#"{"fontSizes": {"body": 1e17}}"#).unwrap();
        assert!(config.validate().is_ok());

        let mut config = LayoutConfig::default();
        config.font_sizes.headings[2] = f64::INFINITY;
        assert!(matches!(config.validate(), Err(LayoutError::InvalidConfig(_))));

        let mut config = LayoutConfig::default();
        config.font_sizes.min = 0.0;
        assert!(matches!(config.validate(), Err(LayoutError::InvalidConfig(_))));

        let mut config = LayoutConfig::default();
        config.auto_position_step = -0.1;
        assert!(matches!(config.validate(), Err(LayoutError::InvalidConfig(_))));
    }

    #[test]
    fn test_content_width_uses_margins() {
        let config = LayoutConfig::default();
        let canvas = SlideDimensions { width: 10.0, height: 7.5 };
        assert!((config.content_width(&canvas) - 9.0).abs() < 1e-9);
        assert!((config.content_bottom(&canvas) - 7.0).abs() < 1e-9);
    }
}
