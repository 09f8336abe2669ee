//! Puzzle configuration
//!
//! Everything the engine treats as a fixed input: which board to load,
//! grid geometry, animation timings and the confetti palette. Every section
//! has defaults, so a JSON override only needs the fields it changes.

use serde::{Deserialize, Serialize};

use crate::error::{PuzzleError, PuzzleResult};

/// Pixels kept clear between the board and the viewport edge
pub const VIEWPORT_MARGIN_PX: f64 = 40.0;

/// Which board to play
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleSource {
    pub name: String,
    pub folder: String,
    pub image: String,
    /// Bundle offered for download once the board is solved
    pub downloads: Option<String>,
}

impl Default for PuzzleSource {
    fn default() -> Self {
        Self {
            name: "valentines_day_2026".to_string(),
            folder: "valentines_day_2026".to_string(),
            image: "puzzle.png".to_string(),
            downloads: Some("valentines_day_2026.zip".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub base: String,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            base: "assets/puzzle-boards".to_string(),
        }
    }
}

/// Board geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Tiles per side
    pub size: usize,
    /// Pixels between neighbouring tiles
    pub gap: u32,
    /// Total border padding around the tiles
    pub padding: u32,
    /// Overshoot multiplier applied after fitting the image
    pub scale_factor: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 5,
            gap: 2,
            padding: 16,
            scale_factor: 1.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub swap_duration_ms: u32,
    /// Delay between the solving swap and the win reveal
    pub win_delay_ms: u32,
    pub confetti_count: usize,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            swap_duration_ms: 300,
            win_delay_ms: 500,
            confetti_count: 140,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Touch moves within this many pixels of the start point are jitter
    pub touch_threshold_px: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            touch_threshold_px: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfettiConfig {
    pub colors: Vec<String>,
    pub size_range: (i32, i32),
    pub drift_range: (i32, i32),
    pub duration_range: (f64, f64),
    pub delay_range: (f64, f64),
}

impl Default for ConfettiConfig {
    fn default() -> Self {
        Self {
            colors: ["#ff0000", "#ff69b4", "#ff1493", "#ffc0cb", "#ff6b9d", "#ffd166", "#f78c6b"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            size_range: (6, 12),
            drift_range: (-100, 100),
            duration_range: (2.5, 5.0),
            delay_range: (0.0, 0.6),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleConfig {
    pub puzzle: PuzzleSource,
    pub paths: AssetPaths,
    pub grid: GridConfig,
    pub animation: AnimationConfig,
    pub interaction: InteractionConfig,
    pub confetti: ConfettiConfig,
}

impl PuzzleConfig {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> PuzzleResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| PuzzleError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PuzzleResult<()> {
        let invalid = |reason: &str| Err(PuzzleError::InvalidConfig(reason.to_string()));

        if self.grid.size == 0 {
            return invalid("grid size must be at least 1");
        }
        if !self.grid.scale_factor.is_finite() || self.grid.scale_factor < 1.0 {
            return invalid("scale factor must be a finite number >= 1");
        }
        let threshold = self.interaction.touch_threshold_px;
        if !threshold.is_finite() || threshold < 0.0 {
            return invalid("touch threshold must be a finite, non-negative number");
        }
        if self.puzzle.image.trim().is_empty() {
            return invalid("puzzle image must be set");
        }

        let confetti = &self.confetti;
        if confetti.colors.is_empty() {
            return invalid("confetti palette must not be empty");
        }
        if confetti.size_range.0 > confetti.size_range.1
            || confetti.drift_range.0 > confetti.drift_range.1
            || confetti.duration_range.0 > confetti.duration_range.1
            || confetti.delay_range.0 > confetti.delay_range.1
        {
            return invalid("confetti ranges must be ordered (min, max)");
        }
        Ok(())
    }

    fn board_dir(&self) -> String {
        format!("{}/{}", self.paths.base, self.puzzle.folder)
    }

    pub fn image_path(&self) -> String {
        format!("{}/{}", self.board_dir(), self.puzzle.image)
    }

    /// Download path for the bundle, if one is configured
    pub fn bundle_path(&self) -> Option<String> {
        self.bundle_filename()
            .map(|file| format!("{}/{}", self.board_dir(), file))
    }

    pub fn bundle_filename(&self) -> Option<&str> {
        self.puzzle
            .downloads
            .as_deref()
            .map(str::trim)
            .filter(|file| !file.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let config = PuzzleConfig::default();
        assert_eq!(
            config.image_path(),
            "assets/puzzle-boards/valentines_day_2026/puzzle.png"
        );
        assert_eq!(
            config.bundle_path().as_deref(),
            Some("assets/puzzle-boards/valentines_day_2026/valentines_day_2026.zip")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PuzzleConfig::from_json(r#"{ "grid": { "size": 3 } }"#).unwrap();
        assert_eq!(config.grid.size, 3);
        assert_eq!(config.grid.gap, 2);
        assert_eq!(config.animation.win_delay_ms, 500);
        assert_eq!(config.puzzle.name, "valentines_day_2026");
    }

    #[test]
    fn test_blank_downloads_means_no_bundle() {
        let config =
            PuzzleConfig::from_json(r#"{ "puzzle": { "downloads": "  " } }"#).unwrap();
        assert_eq!(config.bundle_path(), None);

        let config = PuzzleConfig::from_json(r#"{ "puzzle": { "downloads": null } }"#).unwrap();
        assert_eq!(config.bundle_filename(), None);
    }

    #[test]
    fn test_rejects_bad_values() {
        for json in [
            r#"{ "grid": { "size": 0 } }"#,
            r#"{ "grid": { "scale_factor": 0.5 } }"#,
            r#"{ "interaction": { "touch_threshold_px": -1.0 } }"#,
            r#"{ "confetti": { "colors": [] } }"#,
            r#"{ "confetti": { "size_range": [12, 6] } }"#,
            r#"{ "grid": "#,
        ] {
            let err = PuzzleConfig::from_json(json).unwrap_err();
            assert!(matches!(err, PuzzleError::InvalidConfig(_)), "{json}");
        }
    }
}
