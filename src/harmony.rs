//! Harmony rules for deriving related colors from a base color
//!
//! Each strategy rotates or shifts the base color on the HSL wheel to get
//! three core colors, then adds a light (L = 85) and a mid-light (L = 70)
//! variant. The two variants are inserted at random positions so the
//! generated palettes don't share a fixed visual ordering.

use crate::color::{Color, Hsl};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of colors in a generated harmony set.
pub const HARMONY_SIZE: usize = 5;

const LIGHT_LIGHTNESS: f64 = 85.0;
const MID_LIGHT_LIGHTNESS: f64 = 70.0;

/// Strategy used to derive a palette from a base color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HarmonyStrategy {
    /// Unconstrained random colors
    Random,
    /// Neighbours on the color wheel
    Analogous,
    /// Shades of the base hue
    #[default]
    Monochromatic,
    /// Three evenly spaced hues
    Triad,
    /// Opposite hues
    Complementary,
}

/// Error for unknown strategy names
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown harmony '{0}', expected one of: random, analogous, monochromatic, triad, complementary")]
pub struct UnknownHarmony(pub String);

impl HarmonyStrategy {
    pub const ALL: [HarmonyStrategy; 5] = [
        HarmonyStrategy::Random,
        HarmonyStrategy::Analogous,
        HarmonyStrategy::Monochromatic,
        HarmonyStrategy::Triad,
        HarmonyStrategy::Complementary,
    ];

    /// Lowercase identifier, as accepted by `FromStr`.
    pub fn as_str(&self) -> &'static str {
        match self {
            HarmonyStrategy::Random => "random",
            HarmonyStrategy::Analogous => "analogous",
            HarmonyStrategy::Monochromatic => "monochromatic",
            HarmonyStrategy::Triad => "triad",
            HarmonyStrategy::Complementary => "complementary",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            HarmonyStrategy::Random => "Random",
            HarmonyStrategy::Analogous => "Analogous",
            HarmonyStrategy::Monochromatic => "Monochromatic",
            HarmonyStrategy::Triad => "Triad",
            HarmonyStrategy::Complementary => "Complementary",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            HarmonyStrategy::Random => "Generate random colour combinations",
            HarmonyStrategy::Analogous => "Colours next to each other on the wheel",
            HarmonyStrategy::Monochromatic => "Different shades of the same colour",
            HarmonyStrategy::Triad => "Three evenly spaced colours",
            HarmonyStrategy::Complementary => "Opposite colours on the wheel",
        }
    }
}

impl fmt::Display for HarmonyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HarmonyStrategy {
    type Err = UnknownHarmony;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HarmonyStrategy::ALL
            .into_iter()
            .find(|h| h.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownHarmony(s.to_string()))
    }
}

/// Saturation rule for a light variant: `max(S - drop, floor)`.
#[derive(Debug, Clone, Copy)]
struct Desaturate {
    drop: f64,
    floor: f64,
}

impl Desaturate {
    const fn new(drop: f64, floor: f64) -> Self {
        Self { drop, floor }
    }

    fn apply(&self, s: f64) -> f64 {
        (s - self.drop).max(self.floor)
    }
}

/// Derive the five-color harmony set for `base`.
///
/// Returns `None` for [`HarmonyStrategy::Random`], which has no harmony
/// math; callers use the random palette sampler instead.
pub fn harmony_colors<R: Rng + ?Sized>(
    base: Color,
    strategy: HarmonyStrategy,
    rng: &mut R,
) -> Option<Vec<Color>> {
    let Hsl { h, s, l } = base.hsl();
    let hsl = |h: f64, s: f64, l: f64| Color::from_hsl(h.rem_euclid(360.0), s, l);

    let (core, light_hue, mid_hue, light_sat, mid_sat) = match strategy {
        HarmonyStrategy::Random => return None,
        HarmonyStrategy::Analogous => (
            [hsl(h + 30.0, s, l), hsl(h + 60.0, s, l), hsl(h - 30.0, s, l)],
            h + if rng.gen_bool(0.5) { 30.0 } else { -30.0 },
            h + if rng.gen_bool(0.5) { 60.0 } else { -60.0 },
            Desaturate::new(10.0, 30.0),
            Desaturate::new(5.0, 40.0),
        ),
        HarmonyStrategy::Monochromatic => (
            [hsl(h, s, (l - 30.0).max(10.0)), hsl(h, s, l), hsl(h, s, (l - 45.0).max(5.0))],
            h,
            h,
            Desaturate::new(20.0, 20.0),
            Desaturate::new(10.0, 30.0),
        ),
        HarmonyStrategy::Triad => {
            let angles = [0.0, 120.0, 240.0];
            (
                [hsl(h + 120.0, s, l), hsl(h + 240.0, s, l), hsl(h, s, (l - 20.0).max(20.0))],
                h + angles.choose(rng).copied().unwrap_or(0.0),
                h + angles.choose(rng).copied().unwrap_or(0.0),
                Desaturate::new(15.0, 25.0),
                Desaturate::new(10.0, 35.0),
            )
        }
        HarmonyStrategy::Complementary => (
            [
                hsl(h + 180.0, s, l),
                hsl(h, s, (l - 20.0).max(20.0)),
                hsl(h + 180.0, s, (l - 20.0).max(20.0)),
            ],
            h + if rng.gen_bool(0.5) { 0.0 } else { 180.0 },
            h + if rng.gen_bool(0.5) { 0.0 } else { 180.0 },
            Desaturate::new(15.0, 25.0),
            Desaturate::new(10.0, 35.0),
        ),
    };

    let mut colors = core.to_vec();
    let light = hsl(light_hue, light_sat.apply(s), LIGHT_LIGHTNESS);
    let mid_light = hsl(mid_hue, mid_sat.apply(s), MID_LIGHT_LIGHTNESS);
    insert_at_random(&mut colors, light, rng);
    insert_at_random(&mut colors, mid_light, rng);

    Some(colors)
}

/// Insert `color` at a uniformly chosen slot in `0..=colors.len()`.
pub(crate) fn insert_at_random<R: Rng + ?Sized>(colors: &mut Vec<Color>, color: Color, rng: &mut R) {
    let index = rng.gen_range(0..=colors.len());
    colors.insert(index, color);
}
