//! Integration tests for palette generation.

use ecopalette::color::Color;
use ecopalette::generate::{GenerationPolicy, Generator, ScoreThreshold};
use ecopalette::harmony::{HarmonyStrategy, HARMONY_SIZE};
use ecopalette::palette::{Palette, MIN_WIDTH};
use ecopalette::score::palette_sustainability;
use std::collections::HashSet;

fn assert_well_formed(palette: &Palette) {
    assert_eq!(palette.len(), HARMONY_SIZE);
    let unique: HashSet<Color> = palette.colors().collect();
    assert_eq!(unique.len(), HARMONY_SIZE, "duplicate colors in {palette:?}");
    assert!((palette.total_width() - 100.0).abs() <= 0.1);
    assert!(palette.entries().iter().all(|e| e.width >= MIN_WIDTH && !e.locked));
}

#[test]
fn test_monochromatic_hundred_runs() {
    let mut generator = Generator::seeded(2024, GenerationPolicy::default());
    for _ in 0..100 {
        let generated = generator.generate(HarmonyStrategy::Monochromatic);
        assert_well_formed(&generated.palette);
        assert_eq!(generated.strategy, HarmonyStrategy::Monochromatic);
        assert_eq!(generated.sustainability, palette_sustainability(&generated.palette));
        if !generated.fallback {
            assert!(generated.sustainability >= 75);
            assert!(generated.base.is_some());
        }
    }
}

#[test]
fn test_every_strategy_produces_valid_palettes() {
    for (seed, strategy) in HarmonyStrategy::ALL.into_iter().enumerate() {
        let mut generator = Generator::seeded(seed as u64, GenerationPolicy::default());
        for _ in 0..20 {
            let generated = generator.generate(strategy);
            assert_well_formed(&generated.palette);
            assert!(generated.attempts >= 1 && generated.attempts <= 100);
        }
    }
}

#[test]
fn test_random_strategy_has_no_base() {
    let mut generator = Generator::seeded(5, GenerationPolicy::default());
    let generated = generator.generate(HarmonyStrategy::Random);
    assert_well_formed(&generated.palette);
    assert_eq!(generated.base, None);
}

#[test]
fn test_widths_follow_score_order() {
    let mut generator = Generator::seeded(11, GenerationPolicy::default());
    for _ in 0..20 {
        let generated = generator.generate(HarmonyStrategy::Analogous);
        let scores: Vec<u8> = generated.palette.colors().map(|c| c.sustainability()).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]), "not sorted: {scores:?}");
    }
}

#[test]
fn test_rejecting_gate_falls_back() {
    let policy = GenerationPolicy { max_attempts: 7, ..GenerationPolicy::default() };
    let mut generator = Generator::seeded(3, policy);
    let generated = generator.generate_with_gate(HarmonyStrategy::Triad, &|_: &Palette, _: u8| false);

    assert!(generated.fallback);
    assert_eq!(generated.attempts, 7);
    assert_eq!(generated.base, None);
    assert_well_formed(&generated.palette);
}

#[test]
fn test_unreachable_threshold_falls_back() {
    let policy = GenerationPolicy { max_attempts: 10, min_palette_score: 100, ..GenerationPolicy::default() };
    let mut generator = Generator::seeded(8, policy);
    let generated = generator.generate(HarmonyStrategy::Complementary);
    assert!(generated.fallback);
    assert_well_formed(&generated.palette);
}

#[test]
fn test_zero_threshold_accepts_first_usable_attempt() {
    let policy = GenerationPolicy { min_base_score: 0, min_palette_score: 0, ..GenerationPolicy::default() };
    let mut generator = Generator::seeded(1, policy);
    let generated = generator.generate_with_gate(HarmonyStrategy::Monochromatic, &ScoreThreshold(0));
    assert!(!generated.fallback);
    assert_well_formed(&generated.palette);
}

#[test]
fn test_seeded_generation_is_reproducible() {
    let mut a = Generator::seeded(77, GenerationPolicy::default());
    let mut b = Generator::seeded(77, GenerationPolicy::default());
    for strategy in HarmonyStrategy::ALL {
        assert_eq!(a.generate(strategy), b.generate(strategy));
    }
}
