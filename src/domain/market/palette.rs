//! Sentiment colour bands consumed by the cube widget.
//!
//! Ten bands ordered from euphoria down to panic. A score between two band
//! floors is linearly blended between their colours.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    fn blend(&self, other: &Rgba, position: f64) -> Rgba {
        let channel = |from: u8, to: u8| -> u8 {
            (from as f64 + (to as f64 - from as f64) * position)
                .round()
                .clamp(0.0, 255.0) as u8
        };

        Rgba {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
            a: self.a + (other.a - self.a) * position,
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {:.2})", self.r, self.g, self.b, self.a)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MoodBand {
    pub min: f64,
    pub color: Rgba,
    pub label: &'static str,
}

pub static MOOD_BANDS: [MoodBand; 10] = [
    MoodBand { min: 85.0, color: Rgba::new(0, 255, 136, 0.95), label: "FOMO ESTREMO" },
    MoodBand { min: 75.0, color: Rgba::new(0, 204, 255, 0.90), label: "OTTIMISMO FORTE" },
    MoodBand { min: 65.0, color: Rgba::new(100, 149, 237, 0.85), label: "OTTIMISMO" },
    MoodBand { min: 55.0, color: Rgba::new(157, 78, 221, 0.80), label: "LEGGERO OTTIMISMO" },
    MoodBand { min: 45.0, color: Rgba::new(138, 43, 226, 0.75), label: "NEUTRO-POSITIVO" },
    MoodBand { min: 40.0, color: Rgba::new(186, 85, 211, 0.70), label: "NEUTRO-NEGATIVO" },
    MoodBand { min: 35.0, color: Rgba::new(255, 140, 0, 0.65), label: "CAUTELA" },
    MoodBand { min: 30.0, color: Rgba::new(255, 69, 0, 0.60), label: "PESSIMISMO" },
    MoodBand { min: 20.0, color: Rgba::new(220, 20, 60, 0.55), label: "PESSIMISMO FORTE" },
    MoodBand { min: 0.0, color: Rgba::new(139, 0, 0, 0.50), label: "PANICO" },
];

/// Band whose floor is the highest one not above `sentiment`
pub fn mood_for(sentiment: f64) -> &'static MoodBand {
    MOOD_BANDS
        .iter()
        .find(|band| sentiment >= band.min)
        .unwrap_or(&MOOD_BANDS[MOOD_BANDS.len() - 1])
}

/// Interpolated colour for a sentiment score
pub fn color_for(sentiment: f64) -> Rgba {
    for pair in MOOD_BANDS.windows(2) {
        let (upper, lower) = (&pair[0], &pair[1]);
        if sentiment < upper.min && sentiment >= lower.min {
            let position = (sentiment - lower.min) / (upper.min - lower.min);
            return lower.color.blend(&upper.color, position);
        }
    }

    if sentiment >= MOOD_BANDS[0].min {
        MOOD_BANDS[0].color
    } else {
        MOOD_BANDS[MOOD_BANDS.len() - 1].color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_floors_are_inclusive() {
        assert_eq!(mood_for(85.0).label, "FOMO ESTREMO");
        assert_eq!(mood_for(84.9).label, "OTTIMISMO FORTE");
        assert_eq!(mood_for(40.0).label, "NEUTRO-NEGATIVO");
        assert_eq!(mood_for(0.0).label, "PANICO");
        assert_eq!(mood_for(-5.0).label, "PANICO");
    }

    #[test]
    fn test_color_on_band_floor_is_exact() {
        assert_eq!(color_for(45.0), Rgba::new(138, 43, 226, 0.75));
        assert_eq!(color_for(99.0), MOOD_BANDS[0].color);
    }

    #[test]
    fn test_color_midpoint_blends_neighbours() {
        // Halfway between PANICO (0) and PESSIMISMO FORTE (20)
        let color = color_for(10.0);
        assert_eq!((color.r, color.g, color.b), (180, 10, 30));
        assert!((color.a - 0.525).abs() < 1e-9);
        assert!(color.to_string().starts_with("rgba(180, 10, 30, 0.5"));
    }
}
