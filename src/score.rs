//! Palette-level sustainability scoring and rating bands

use crate::palette::Palette;
use serde::Serialize;
use std::fmt;

/// Width-weighted sustainability of a palette, 0 for an empty palette.
///
/// Widths already total 100, so the weighted sum needs no normalization.
///
/// ```
/// use ecopalette::color::Color;
/// use ecopalette::palette::{Palette, PaletteEntry};
/// use ecopalette::score::palette_sustainability;
///
/// let p = Palette::from_entries(vec![
///     PaletteEntry::new(Color::BLACK, 75.0),
///     PaletteEntry::new(Color::WHITE, 25.0),
/// ])
/// .unwrap();
/// assert_eq!(palette_sustainability(&p), 75);
/// ```
pub fn palette_sustainability(palette: &Palette) -> u8 {
    if palette.is_empty() {
        return 0;
    }
    let weighted: f64 = palette
        .entries()
        .iter()
        .map(|e| f64::from(e.color.sustainability()) * (e.width / 100.0))
        .sum();
    weighted.round().clamp(0.0, 100.0) as u8
}

/// Rating band for a single color's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl Rating {
    pub fn from_score(score: u8) -> Self {
        match score {
            75.. => Rating::Excellent,
            50..=74 => Rating::Good,
            25..=49 => Rating::Fair,
            _ => Rating::Poor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rating::Excellent => "Excellent",
            Rating::Good => "Good",
            Rating::Fair => "Fair",
            Rating::Poor => "Poor",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Rating::Excellent => "Very energy efficient",
            Rating::Good => "Moderately efficient",
            Rating::Fair => "Limited efficiency",
            Rating::Poor => "High energy consumption",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Overall verdict for a palette's aggregate score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteRating {
    Highly,
    Moderately,
    Limited,
    Poor,
}

impl PaletteRating {
    /// Bands are exclusive at the bottom: 75 is only moderately sustainable.
    pub fn from_score(score: u8) -> Self {
        if score > 75 {
            PaletteRating::Highly
        } else if score > 60 {
            PaletteRating::Moderately
        } else if score > 45 {
            PaletteRating::Limited
        } else {
            PaletteRating::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaletteRating::Highly => "Highly Sustainable",
            PaletteRating::Moderately => "Moderately Sustainable",
            PaletteRating::Limited => "Limited Sustainability",
            PaletteRating::Poor => "Poor Sustainability",
        }
    }
}

impl fmt::Display for PaletteRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::palette::PaletteEntry;

    #[test]
    fn test_empty_palette_scores_zero() {
        assert_eq!(palette_sustainability(&Palette::new()), 0);
    }

    #[test]
    fn test_weighted_not_mean() {
        let p = Palette::from_entries(vec![
            PaletteEntry::new(Color::BLACK, 90.0),
            PaletteEntry::new(Color::WHITE, 10.0),
        ])
        .unwrap();
        // A simple mean would give 50
        assert_eq!(palette_sustainability(&p), 90);
    }

    #[test]
    fn test_single_color_matches_color_score() {
        let c = Color::from_hex("#336699").unwrap();
        let p = Palette::from_entries(vec![PaletteEntry::new(c, 100.0)]).unwrap();
        assert_eq!(palette_sustainability(&p), c.sustainability());
    }

    #[test]
    fn test_rating_bands() {
        assert_eq!(Rating::from_score(100), Rating::Excellent);
        assert_eq!(Rating::from_score(75), Rating::Excellent);
        assert_eq!(Rating::from_score(74), Rating::Good);
        assert_eq!(Rating::from_score(50), Rating::Good);
        assert_eq!(Rating::from_score(49), Rating::Fair);
        assert_eq!(Rating::from_score(25), Rating::Fair);
        assert_eq!(Rating::from_score(24), Rating::Poor);
        assert_eq!(Rating::from_score(0), Rating::Poor);
    }

    #[test]
    fn test_palette_rating_bands() {
        assert_eq!(PaletteRating::from_score(76), PaletteRating::Highly);
        assert_eq!(PaletteRating::from_score(75), PaletteRating::Moderately);
        assert_eq!(PaletteRating::from_score(61), PaletteRating::Moderately);
        assert_eq!(PaletteRating::from_score(60), PaletteRating::Limited);
        assert_eq!(PaletteRating::from_score(45), PaletteRating::Poor);
        assert_eq!(PaletteRating::Highly.to_string(), "Highly Sustainable");
    }
}
