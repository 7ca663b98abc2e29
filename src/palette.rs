//! Palette state machine
//!
//! A palette is an ordered list of up to five colors, each with a usage width
//! (a percentage) and a lock flag. Every mutation keeps three invariants:
//!
//! - widths sum to 100 (within [`SUM_TOLERANCE`]) whenever the palette is
//!   non-empty
//! - unlocked entries are at least [`MIN_WIDTH`] wide; locked entries keep
//!   whatever width they were locked at
//! - no color appears twice
//!
//! Mutators build a candidate entry list, check it, and only then commit.
//! A rejected mutation returns a [`PaletteError`] and leaves the palette
//! exactly as it was.

use crate::color::{Color, ColorError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Maximum number of entries in a palette.
pub const MAX_SIZE: usize = 5;

/// Minimum width of an unlocked entry.
pub const MIN_WIDTH: f64 = 5.0;

/// Upper bound for stepwise width adjustment.
pub const MAX_STEP_WIDTH: f64 = 70.0;

/// Width change per [`Palette::adjust_width`] call.
pub const WIDTH_STEP: f64 = 1.0;

/// Allowed deviation of the width total from 100.
pub const SUM_TOLERANCE: f64 = 0.1;

/// Reason a palette operation did not change anything.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaletteError {
    #[error("invalid color: {0}")]
    InvalidColor(#[from] ColorError),
    #[error("palette already has the maximum of 5 colors")]
    CapacityExceeded,
    #[error("color {0} is already in the palette")]
    DuplicateColor(Color),
    #[error("color {0} is not in the palette")]
    ColorNotFound(Color),
    #[error("cannot swap {0} with itself")]
    SameColor(Color),
    #[error("index {index} out of range for palette of {len} colors")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("color at index {0} is locked")]
    Locked(usize),
    #[error("width of color at index {0} is already at its limit")]
    AtBound(usize),
    #[error("no other unlocked color can absorb the change")]
    NothingToRebalance,
    #[error("no color is selected")]
    NoSelection,
    #[error("no resize is in progress")]
    NoActiveResize,
    #[error("change would break palette invariants: {0}")]
    InvariantViolation(String),
}

/// Direction of a stepwise width adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    fn delta(self) -> f64 {
        match self {
            Direction::Up => WIDTH_STEP,
            Direction::Down => -WIDTH_STEP,
        }
    }
}

/// One color in a palette.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub color: Color,
    /// Share of total usage, in percent
    pub width: f64,
    #[serde(default)]
    pub locked: bool,
}

impl PaletteEntry {
    /// Create an unlocked entry.
    pub fn new(color: Color, width: f64) -> Self {
        Self { color, width, locked: false }
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }
}

/// An ordered palette of up to [`MAX_SIZE`] unique colors.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    /// Create an empty palette.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a palette from existing entries, checking every invariant.
    pub fn from_entries(entries: Vec<PaletteEntry>) -> Result<Self, PaletteError> {
        check_invariants(&entries)?;
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&PaletteEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= MAX_SIZE
    }

    pub fn colors(&self) -> impl Iterator<Item = Color> + '_ {
        self.entries.iter().map(|e| e.color)
    }

    pub fn contains(&self, color: Color) -> bool {
        self.position(color).is_some()
    }

    pub fn position(&self, color: Color) -> Option<usize> {
        self.entries.iter().position(|e| e.color == color)
    }

    /// Sum of all widths.
    pub fn total_width(&self) -> f64 {
        self.entries.iter().map(|e| e.width).sum()
    }

    /// Sum of the widths of locked entries.
    pub fn locked_width(&self) -> f64 {
        locked_width(&self.entries)
    }

    /// Check the palette invariants.
    pub fn validate(&self) -> Result<(), PaletteError> {
        check_invariants(&self.entries)
    }

    /// Remove every entry.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Append `color`, giving every unlocked entry an equal share of the
    /// width not held by locked entries.
    pub fn add(&mut self, color: Color) -> Result<(), PaletteError> {
        if self.is_full() {
            return Err(PaletteError::CapacityExceeded);
        }
        if self.contains(color) {
            return Err(PaletteError::DuplicateColor(color));
        }

        let mut candidate = self.entries.clone();
        candidate.push(PaletteEntry::new(color, 0.0));
        spread_evenly(&mut candidate);
        self.commit(candidate, "add")
    }

    /// Parse `hex` and [`add`](Self::add) it.
    pub fn add_hex(&mut self, hex: &str) -> Result<(), PaletteError> {
        self.add(Color::from_hex(hex)?)
    }

    /// Drop `color` and split the freed width evenly among the unlocked
    /// survivors. Returns the index the color occupied.
    pub fn remove(&mut self, color: Color) -> Result<usize, PaletteError> {
        let index = self.position(color).ok_or(PaletteError::ColorNotFound(color))?;

        let mut candidate = self.entries.clone();
        candidate.remove(index);
        spread_evenly(&mut candidate);
        self.commit(candidate, "remove")?;
        Ok(index)
    }

    /// Exchange the positions of two colors.
    ///
    /// Width and lock state belong to the slot, not the color: after the swap
    /// slot `a` holds color `b` with slot `a`'s original width and lock flag.
    pub fn swap(&mut self, a: Color, b: Color) -> Result<(), PaletteError> {
        if a == b {
            return Err(PaletteError::SameColor(a));
        }
        let ia = self.position(a).ok_or(PaletteError::ColorNotFound(a))?;
        let ib = self.position(b).ok_or(PaletteError::ColorNotFound(b))?;

        self.entries[ia].color = b;
        self.entries[ib].color = a;
        Ok(())
    }

    /// Flip the lock flag at `index`. Widths are not touched.
    ///
    /// Unlocking an entry narrower than [`MIN_WIDTH`] is rejected. Returns the
    /// new lock state.
    pub fn toggle_lock(&mut self, index: usize) -> Result<bool, PaletteError> {
        let locked = !self.entry(index)?.locked;
        let mut candidate = self.entries.clone();
        candidate[index].locked = locked;
        self.commit(candidate, "toggle_lock")?;
        Ok(locked)
    }

    /// Replace the color at `index`, keeping its width and lock flag.
    pub fn recolor(&mut self, index: usize, color: Color) -> Result<(), PaletteError> {
        self.entry(index)?;
        if self.position(color).is_some_and(|i| i != index) {
            return Err(PaletteError::DuplicateColor(color));
        }
        self.entries[index].color = color;
        Ok(())
    }

    /// Grow or shrink the entry at `index` by one percentage point.
    ///
    /// The difference is taken from (or given to) the other unlocked entries
    /// in proportion to their current widths. Locked entries never move.
    pub fn adjust_width(&mut self, index: usize, direction: Direction) -> Result<(), PaletteError> {
        let current = self.entry(index)?;
        if current.locked {
            return Err(PaletteError::Locked(index));
        }

        let new_width = (current.width + direction.delta()).clamp(MIN_WIDTH, MAX_STEP_WIDTH);
        if new_width == current.width {
            return Err(PaletteError::AtBound(index));
        }

        let others: f64 = self.others_unlocked(index).map(|e| e.width).sum();
        if others <= 0.0 {
            return Err(PaletteError::NothingToRebalance);
        }
        let delta = new_width - current.width;
        let ratio = (others - delta) / others;

        let mut candidate = self.entries.clone();
        for (i, entry) in candidate.iter_mut().enumerate() {
            if i == index {
                entry.width = new_width;
            } else if !entry.locked {
                entry.width = (entry.width * ratio).max(MIN_WIDTH);
            }
        }

        // Rescale only the flexible entries rather than every width by
        // 100/total, so locked entries and the one-point step stay exact.
        let total: f64 = candidate.iter().map(|e| e.width).sum();
        if (total - 100.0).abs() > SUM_TOLERANCE {
            normalize_flexible(&mut candidate, index);
        }
        self.commit(candidate, "adjust_width")
    }

    /// Change the width at `index` by `delta` percentage points, as driven by
    /// a pointer drag.
    ///
    /// The entry can grow until every other unlocked entry is at the minimum
    /// width. The other unlocked entries share what is left in proportion to
    /// their widths before the step. Either the whole step applies or nothing
    /// does.
    pub fn resize(&mut self, index: usize, delta: f64) -> Result<(), PaletteError> {
        let current = self.entry(index)?;
        if current.locked {
            return Err(PaletteError::Locked(index));
        }
        if !delta.is_finite() {
            return Err(PaletteError::InvariantViolation(format!("non-finite resize delta {delta}")));
        }

        let locked = self.locked_width();
        let others: Vec<f64> = self.others_unlocked(index).map(|e| e.width).collect();
        let max_width = 100.0 - locked - MIN_WIDTH * others.len() as f64;
        let new_width = (current.width + delta).max(MIN_WIDTH).min(max_width);
        if (new_width - current.width).abs() < f64::EPSILON {
            return Err(PaletteError::AtBound(index));
        }

        let remaining = 100.0 - locked - new_width;
        if remaining < MIN_WIDTH * others.len() as f64 - f64::EPSILON {
            return Err(PaletteError::InvariantViolation(format!(
                "{remaining:.2}% left for {} other colors",
                others.len()
            )));
        }

        let others_total: f64 = others.iter().sum();
        if others.is_empty() || others_total <= 0.0 {
            return Err(PaletteError::NothingToRebalance);
        }

        let mut candidate = self.entries.clone();
        for (i, entry) in candidate.iter_mut().enumerate() {
            if i == index {
                entry.width = new_width;
            } else if !entry.locked {
                entry.width = (remaining * entry.width / others_total).max(MIN_WIDTH);
            }
        }
        self.commit(candidate, "resize")
    }

    fn entry(&self, index: usize) -> Result<PaletteEntry, PaletteError> {
        self.entries
            .get(index)
            .copied()
            .ok_or(PaletteError::IndexOutOfRange { index, len: self.len() })
    }

    fn others_unlocked(&self, index: usize) -> impl Iterator<Item = &PaletteEntry> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(move |(i, e)| *i != index && !e.locked)
            .map(|(_, e)| e)
    }

    fn commit(&mut self, candidate: Vec<PaletteEntry>, op: &str) -> Result<(), PaletteError> {
        if let Err(e) = check_invariants(&candidate) {
            debug!(op, error = %e, "rejected palette change");
            return Err(e);
        }
        self.entries = candidate;
        Ok(())
    }
}

impl<'de> Deserialize<'de> for Palette {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<PaletteEntry>::deserialize(deserializer)?;
        Palette::from_entries(entries).map_err(serde::de::Error::custom)
    }
}

fn locked_width(entries: &[PaletteEntry]) -> f64 {
    entries.iter().filter(|e| e.locked).map(|e| e.width).sum()
}

/// Give every unlocked entry an equal share of `100 - locked`.
fn spread_evenly(entries: &mut [PaletteEntry]) {
    let unlocked = entries.iter().filter(|e| !e.locked).count();
    if unlocked == 0 {
        return;
    }
    let share = (100.0 - locked_width(entries)) / unlocked as f64;
    for entry in entries.iter_mut().filter(|e| !e.locked) {
        entry.width = share;
    }
}

/// Scale the flexible entries so the total comes back to 100.
///
/// Flexible means unlocked, above the minimum width and not `pinned`. Locked
/// entries, floored entries and the entry the user just changed keep their
/// width. If nothing is flexible the entries are left alone and the caller's
/// invariant check rejects the change.
fn normalize_flexible(entries: &mut [PaletteEntry], pinned: usize) {
    let is_flexible = |i: usize, e: &PaletteEntry| i != pinned && !e.locked && e.width > MIN_WIDTH;

    let (flexible, fixed) = entries.iter().enumerate().fold((0.0, 0.0), |(flex, fixed), (i, e)| {
        if is_flexible(i, e) {
            (flex + e.width, fixed)
        } else {
            (flex, fixed + e.width)
        }
    });
    if flexible <= 0.0 {
        return;
    }

    let scale = (100.0 - fixed) / flexible;
    for (i, entry) in entries.iter_mut().enumerate() {
        if is_flexible(i, entry) {
            entry.width *= scale;
        }
    }
}

fn check_invariants(entries: &[PaletteEntry]) -> Result<(), PaletteError> {
    if entries.len() > MAX_SIZE {
        return Err(PaletteError::CapacityExceeded);
    }
    if entries.is_empty() {
        return Ok(());
    }

    for (i, entry) in entries.iter().enumerate() {
        if !entry.width.is_finite() || entry.width < 0.0 {
            return Err(PaletteError::InvariantViolation(format!(
                "color {} has invalid width {}",
                entry.color, entry.width
            )));
        }
        if !entry.locked && entry.width < MIN_WIDTH - 1e-9 {
            return Err(PaletteError::InvariantViolation(format!(
                "color {} would be {:.2}% wide, below the {MIN_WIDTH}% minimum",
                entry.color, entry.width
            )));
        }
        if entries[..i].iter().any(|other| other.color == entry.color) {
            return Err(PaletteError::DuplicateColor(entry.color));
        }
    }

    let total: f64 = entries.iter().map(|e| e.width).sum();
    if (total - 100.0).abs() > SUM_TOLERANCE {
        return Err(PaletteError::InvariantViolation(format!("widths sum to {total:.2}%, not 100%")));
    }
    Ok(())
}
