//! Width allocation for freshly generated palettes
//!
//! Darker (more sustainable) colors get a larger share of the palette. Very
//! light colors are pinned to the minimum width and the least sustainable
//! color absorbs whatever is left, so the widths always total exactly 100.

use crate::color::Color;
use crate::palette::{PaletteEntry, MIN_WIDTH};

/// Largest share any non-final entry can receive during allocation.
pub const MAX_ALLOCATED_WIDTH: f64 = 50.0;

/// Scores below this get the minimum width.
pub const LOW_SCORE: u8 = 30;

/// Assign usage widths to `colors` based on their sustainability scores.
///
/// The result is ordered by descending score (ties keep their input order),
/// every entry is unlocked and the widths sum to 100.
///
/// # Examples
///
/// ```
/// use ecopalette::allocate::allocate_widths;
/// use ecopalette::color::Color;
///
/// let entries = allocate_widths(&[Color::WHITE, Color::BLACK]);
/// assert_eq!(entries[0].color, Color::BLACK);
/// assert_eq!(entries[0].width, 50.0);
/// assert_eq!(entries[1].width, 50.0);
/// ```
pub fn allocate_widths(colors: &[Color]) -> Vec<PaletteEntry> {
    let mut scored: Vec<(Color, u8)> = colors.iter().map(|c| (*c, c.sustainability())).collect();
    // sort_by is stable, so equal scores keep their relative order
    scored.sort_by(|a, b| b.1.cmp(&a.1));

    let total: f64 = scored.iter().map(|(_, s)| f64::from(*s)).sum();
    let count = scored.len();
    let mut remaining = 100.0;
    let mut entries = Vec::with_capacity(count);

    for (index, (color, score)) in scored.into_iter().enumerate() {
        let left_after = (count - index - 1) as f64;
        let width = if index == count - 1 {
            remaining
        } else if score < LOW_SCORE {
            MIN_WIDTH
        } else {
            let proportional = (f64::from(score) / total * 100.0).round();
            proportional
                .clamp(MIN_WIDTH, MAX_ALLOCATED_WIDTH)
                .min(remaining - MIN_WIDTH * left_after)
        };
        remaining -= width;
        entries.push(PaletteEntry::new(color, width));
    }

    entries
}
