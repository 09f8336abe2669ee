//! Confetti burst for the win screen

use serde::{Deserialize, Serialize};

use crate::config::ConfettiConfig;
use crate::rng::SimpleRng;

/// Extra time a piece stays in the DOM after its animation ends
const REMOVAL_SLACK_MS: f64 = 200.0;

/// Share of pieces drawn as 2px-cornered rectangles rather than circles
const SQUARE_CHANCE: f64 = 0.6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfettiPiece {
    /// Horizontal start, percent of viewport width
    pub left_pct: f64,
    pub color: String,
    pub opacity: f64,
    pub round: bool,
    pub size_px: i32,
    pub drift_px: i32,
    pub duration_s: f64,
    pub delay_s: f64,
}

impl ConfettiPiece {
    pub fn border_radius(&self) -> &'static str {
        if self.round {
            "50%"
        } else {
            "2px"
        }
    }

    /// How long after spawning the piece can be removed
    pub fn lifetime_ms(&self) -> u32 {
        ((self.duration_s + self.delay_s) * 1000.0 + REMOVAL_SLACK_MS).round() as u32
    }

    pub fn animation_css(&self) -> String {
        format!(
            "confetti {:.2}s linear {:.2}s 1",
            self.duration_s, self.delay_s
        )
    }
}

fn random_piece(config: &ConfettiConfig, rng: &mut SimpleRng) -> ConfettiPiece {
    let color = config.colors[rng.below(config.colors.len())].clone();
    ConfettiPiece {
        left_pct: rng.next_f64() * 100.0,
        color,
        opacity: rng.range_f64(0.6, 1.0),
        round: rng.next_f64() > SQUARE_CHANCE,
        size_px: rng.range_i32(config.size_range.0, config.size_range.1),
        drift_px: rng.range_i32(config.drift_range.0, config.drift_range.1),
        duration_s: rng.range_f64(config.duration_range.0, config.duration_range.1),
        delay_s: rng.range_f64(config.delay_range.0, config.delay_range.1),
    }
}

pub fn confetti_burst(
    config: &ConfettiConfig,
    count: usize,
    rng: &mut SimpleRng,
) -> Vec<ConfettiPiece> {
    if config.colors.is_empty() {
        return Vec::new();
    }
    (0..count).map(|_| random_piece(config, rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_respects_ranges() {
        let config = ConfettiConfig::default();
        let mut rng = SimpleRng::with_seed(2026);
        let burst = confetti_burst(&config, 140, &mut rng);

        assert_eq!(burst.len(), 140);
        for piece in &burst {
            assert!(config.colors.contains(&piece.color));
            assert!((6..=12).contains(&piece.size_px));
            assert!((-100..=100).contains(&piece.drift_px));
            assert!((2.5..5.0).contains(&piece.duration_s));
            assert!((0.0..0.6).contains(&piece.delay_s));
            assert!((0.6..1.0).contains(&piece.opacity));
            assert!((0.0..100.0).contains(&piece.left_pct));
        }
        assert!(burst.iter().any(|p| p.round));
        assert!(burst.iter().any(|p| !p.round));
    }

    #[test]
    fn test_lifetime_covers_delay_and_slack() {
        let piece = ConfettiPiece {
            left_pct: 10.0,
            color: "#ff0000".to_string(),
            opacity: 0.8,
            round: false,
            size_px: 8,
            drift_px: -20,
            duration_s: 3.0,
            delay_s: 0.5,
        };
        assert_eq!(piece.lifetime_ms(), 3700);
        assert_eq!(piece.border_radius(), "2px");
        assert_eq!(piece.animation_css(), "confetti 3.00s linear 0.50s 1");
    }

    #[test]
    fn test_empty_palette_yields_nothing() {
        let config = ConfettiConfig {
            colors: Vec::new(),
            ..ConfettiConfig::default()
        };
        let mut rng = SimpleRng::with_seed(1);
        assert!(confetti_burst(&config, 10, &mut rng).is_empty());
    }
}
