//! Property-style tests for palette editing.
//!
//! Drives sessions through long seeded random walks of edits and checks after
//! every step that the width, minimum and uniqueness invariants hold, and that
//! rejected edits leave the palette exactly as it was.

use ecopalette::color::Color;
use ecopalette::generate::GenerationPolicy;
use ecopalette::harmony::HarmonyStrategy;
use ecopalette::palette::{Direction, Palette, PaletteEntry, PaletteError, MIN_WIDTH};
use ecopalette::session::{Edit, Session};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

fn hex(s: &str) -> Color {
    Color::from_hex(s).unwrap()
}

/// Assert every palette invariant directly, without going through `validate`.
fn assert_invariants(palette: &Palette) {
    let entries = palette.entries();
    assert!(entries.len() <= 5, "too many entries: {entries:?}");
    if entries.is_empty() {
        return;
    }

    let total: f64 = entries.iter().map(|e| e.width).sum();
    assert!((total - 100.0).abs() <= 0.1, "widths sum to {total}: {entries:?}");

    for entry in entries.iter().filter(|e| !e.locked) {
        assert!(entry.width >= MIN_WIDTH - 1e-9, "unlocked entry below minimum: {entries:?}");
    }

    let unique: HashSet<Color> = entries.iter().map(|e| e.color).collect();
    assert_eq!(unique.len(), entries.len(), "duplicate colors: {entries:?}");
}

fn random_edit(rng: &mut StdRng, palette: &Palette, pool: &[Color]) -> Edit {
    let len = palette.len().max(1);
    let present: Vec<Color> = palette.colors().collect();
    let any_color = |rng: &mut StdRng| *pool.choose(rng).unwrap();
    let some_present = |rng: &mut StdRng| present.choose(rng).copied().unwrap_or_else(|| any_color(rng));

    match rng.gen_range(0..12) {
        0 => Edit::Generate { harmony: HarmonyStrategy::ALL.choose(rng).copied() },
        1 | 2 => Edit::Add { color: any_color(rng) },
        3 => Edit::Remove { color: some_present(rng) },
        4 => Edit::Swap { a: some_present(rng), b: some_present(rng) },
        5 => Edit::Lock { index: rng.gen_range(0..len + 1) },
        6 | 7 => Edit::Adjust {
            index: rng.gen_range(0..len),
            direction: if rng.gen_bool(0.5) { Direction::Up } else { Direction::Down },
        },
        8 | 9 => Edit::Resize {
            index: rng.gen_range(0..len),
            deltas: (0..rng.gen_range(1..6)).map(|_| rng.gen_range(-40.0..40.0)).collect(),
        },
        10 => Edit::Select { index: rng.gen_range(0..len) },
        _ => Edit::Recolor { color: any_color(rng) },
    }
}

#[test]
fn test_random_walks_preserve_invariants() {
    let pool: Vec<Color> = [
        "#101010", "#202830", "#3A1F0B", "#0B3A1F", "#1F0B3A", "#454545", "#7F7F7F", "#C0C0C0",
        "#E0E0E0", "#102A43",
    ]
    .iter()
    .map(|s| hex(s))
    .collect();

    for seed in 0..25u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut session = Session::seeded(seed, GenerationPolicy::default());

        for step in 0..300 {
            let edit = random_edit(&mut rng, session.palette(), &pool);
            let before = session.palette().clone();
            let result = session.apply(&edit);

            assert_invariants(session.palette());
            if let Err(e) = &result {
                // A resize edit is a sequence of moves; earlier moves may
                // commit before a later one is rejected.
                if !matches!(edit, Edit::Resize { .. }) {
                    assert_eq!(
                        session.palette(),
                        &before,
                        "seed {seed} step {step}: rejected {edit:?} ({e}) changed the palette"
                    );
                }
            }
            assert!(session.active_resize().is_none());
        }
    }
}

#[test]
fn test_locked_entries_never_move() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut palette = Palette::from_entries(vec![
        PaletteEntry::new(hex("#101010"), 30.0),
        PaletteEntry::new(hex("#202020"), 25.0).locked(),
        PaletteEntry::new(hex("#303030"), 20.0),
        PaletteEntry::new(hex("#404040"), 15.0).locked(),
        PaletteEntry::new(hex("#505050"), 10.0),
    ])
    .unwrap();

    for _ in 0..500 {
        let index = *[0usize, 2, 4].choose(&mut rng).unwrap();
        if rng.gen_bool(0.5) {
            let direction = if rng.gen_bool(0.5) { Direction::Up } else { Direction::Down };
            let _ = palette.adjust_width(index, direction);
        } else {
            let _ = palette.resize(index, rng.gen_range(-15.0..15.0));
        }

        assert_eq!(palette.get(1).unwrap().width, 25.0);
        assert_eq!(palette.get(3).unwrap().width, 15.0);
        assert_invariants(&palette);
    }
}

#[test]
fn test_locked_entries_reject_width_changes() {
    let mut palette = Palette::new();
    palette.add(hex("#101010")).unwrap();
    palette.add(hex("#202020")).unwrap();
    palette.toggle_lock(0).unwrap();

    let before = palette.clone();
    assert_eq!(palette.adjust_width(0, Direction::Up), Err(PaletteError::Locked(0)));
    assert_eq!(palette.resize(0, 10.0), Err(PaletteError::Locked(0)));
    assert_eq!(palette, before);
}

#[test]
fn test_add_then_remove_restores_width_split() {
    let mut palette = Palette::new();
    for color in ["#101010", "#202020", "#303030"] {
        palette.add_hex(color).unwrap();
    }
    let before: Vec<f64> = palette.entries().iter().map(|e| e.width).collect();

    palette.add_hex("#404040").unwrap();
    assert_eq!(palette.len(), 4);
    palette.remove(hex("#404040")).unwrap();

    let after: Vec<f64> = palette.entries().iter().map(|e| e.width).collect();
    assert_eq!(palette.len(), 3);
    for (b, a) in before.iter().zip(&after) {
        assert!((b - a).abs() < 1e-9, "{before:?} vs {after:?}");
    }
}

#[test]
fn test_first_color_takes_full_width() {
    let mut palette = Palette::new();
    palette.add_hex("#101010").unwrap();
    assert_eq!(palette.entries(), &[PaletteEntry::new(hex("#101010"), 100.0)]);
}

#[test]
fn test_two_colors_step_to_51_49() {
    let mut palette = Palette::new();
    palette.add_hex("#101010").unwrap();
    palette.add_hex("#F0F0F0").unwrap();
    palette.adjust_width(0, Direction::Up).unwrap();

    let widths: Vec<f64> = palette.entries().iter().map(|e| e.width).collect();
    assert!((widths[0] - 51.0).abs() < 1e-9);
    assert!((widths[1] - 49.0).abs() < 1e-9);
}

#[test]
fn test_sixth_color_is_rejected() {
    let mut palette = Palette::new();
    for color in ["#101010", "#202020", "#303030", "#404040", "#505050"] {
        palette.add_hex(color).unwrap();
    }
    let before = palette.clone();
    assert_eq!(palette.add_hex("#606060"), Err(PaletteError::CapacityExceeded));
    assert_eq!(palette, before);
}

#[test]
fn test_invalid_hex_is_rejected_without_change() {
    let mut palette = Palette::new();
    palette.add_hex("#101010").unwrap();
    let before = palette.clone();
    assert!(matches!(palette.add_hex("101010"), Err(PaletteError::InvalidColor(_))));
    assert!(matches!(palette.add_hex("#10101G"), Err(PaletteError::InvalidColor(_))));
    assert_eq!(palette, before);
}
