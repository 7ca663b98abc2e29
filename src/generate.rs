//! Palette generation with a sustainability gate
//!
//! The generator samples dark-ish base colors, expands each into a harmony
//! set, allocates widths and keeps the first palette whose aggregate score
//! clears the configured threshold. When no attempt succeeds it falls back
//! to an unconstrained random palette, so generation always produces five
//! colors.

use crate::allocate::allocate_widths;
use crate::color::Color;
use crate::harmony::{harmony_colors, insert_at_random, HarmonyStrategy, HARMONY_SIZE};
use crate::palette::Palette;
use crate::score::palette_sustainability;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Tuning values for the retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationPolicy {
    /// Attempts before falling back to a random palette
    pub max_attempts: u32,
    /// Base colors scoring below this are skipped without building a set
    pub min_base_score: u8,
    /// Aggregate score a palette needs to be accepted
    pub min_palette_score: u8,
}

impl Default for GenerationPolicy {
    fn default() -> Self {
        Self { max_attempts: 100, min_base_score: 60, min_palette_score: 75 }
    }
}

/// Decides whether a candidate palette is good enough.
pub trait AcceptanceGate {
    fn accepts(&self, palette: &Palette, score: u8) -> bool;
}

/// Accepts palettes whose aggregate score is at least the threshold.
#[derive(Debug, Clone, Copy)]
pub struct ScoreThreshold(pub u8);

impl AcceptanceGate for ScoreThreshold {
    fn accepts(&self, _palette: &Palette, score: u8) -> bool {
        score >= self.0
    }
}

impl<F> AcceptanceGate for F
where
    F: Fn(&Palette, u8) -> bool,
{
    fn accepts(&self, palette: &Palette, score: u8) -> bool {
        self(palette, score)
    }
}

/// Outcome of a generation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Generated {
    pub palette: Palette,
    pub strategy: HarmonyStrategy,
    /// Base color of the accepted harmony set, `None` for random palettes
    pub base: Option<Color>,
    /// Attempts consumed, including the accepted one
    pub attempts: u32,
    /// True when every attempt failed and the random fallback was used
    pub fallback: bool,
    pub sustainability: u8,
}

/// Random palette generator.
#[derive(Debug, Clone)]
pub struct Generator<R = StdRng> {
    rng: R,
    policy: GenerationPolicy,
}

impl Generator<StdRng> {
    /// Reproducible generator.
    pub fn seeded(seed: u64, policy: GenerationPolicy) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), policy)
    }

    /// Generator seeded from the operating system.
    pub fn from_entropy(policy: GenerationPolicy) -> Self {
        Self::with_rng(StdRng::from_entropy(), policy)
    }
}

impl<R: Rng> Generator<R> {
    pub fn with_rng(rng: R, policy: GenerationPolicy) -> Self {
        Self { rng, policy }
    }

    pub fn policy(&self) -> &GenerationPolicy {
        &self.policy
    }

    pub fn set_policy(&mut self, policy: GenerationPolicy) {
        self.policy = policy;
    }

    /// Generate a palette gated on the policy's score threshold.
    pub fn generate(&mut self, strategy: HarmonyStrategy) -> Generated {
        let gate = ScoreThreshold(self.policy.min_palette_score);
        self.generate_with_gate(strategy, &gate)
    }

    /// Generate a palette, accepting the first candidate `gate` approves.
    pub fn generate_with_gate(&mut self, strategy: HarmonyStrategy, gate: &dyn AcceptanceGate) -> Generated {
        for attempt in 1..=self.policy.max_attempts {
            let base = self.random_color();
            let base_score = base.sustainability();
            if base_score < self.policy.min_base_score {
                debug!(attempt, %base, base_score, "base color too light, skipping");
                continue;
            }

            let colors = match harmony_colors(base, strategy, &mut self.rng) {
                Some(colors) => colors,
                None => self.random_colors(),
            };
            let Some(palette) = build_palette(&colors) else {
                debug!(attempt, %base, "harmony set has duplicate colors, skipping");
                continue;
            };

            let score = palette_sustainability(&palette);
            if gate.accepts(&palette, score) {
                info!(attempt, %base, score, %strategy, "accepted palette");
                let base = (strategy != HarmonyStrategy::Random).then_some(base);
                return Generated { palette, strategy, base, attempts: attempt, fallback: false, sustainability: score };
            }
            debug!(attempt, %base, score, "palette rejected by gate");
        }

        warn!(attempts = self.policy.max_attempts, %strategy, "no palette passed the gate, using random fallback");
        let palette = self.random_palette();
        let sustainability = palette_sustainability(&palette);
        Generated {
            palette,
            strategy,
            base: None,
            attempts: self.policy.max_attempts,
            fallback: true,
            sustainability,
        }
    }

    /// Sample a dark-leaning color: each channel is below a random cap in
    /// `[50, 150)`.
    pub fn random_color(&mut self) -> Color {
        let cap = self.rng.gen_range(50..150u8);
        Color::new(self.rng.gen_range(0..cap), self.rng.gen_range(0..cap), self.rng.gen_range(0..cap))
    }

    /// Sample a light color with every channel in `[180, 255)`.
    pub fn light_color(&mut self) -> Color {
        self.channel_range_color(180, 255)
    }

    /// Sample a mid-light color with every channel in `[140, 200)`.
    pub fn mid_light_color(&mut self) -> Color {
        self.channel_range_color(140, 200)
    }

    /// Unconstrained random palette: three sampled colors plus a light and a
    /// mid-light color at random positions, with allocated widths.
    pub fn random_palette(&mut self) -> Palette {
        loop {
            let colors = self.random_colors();
            if let Some(palette) = build_palette(&colors) {
                return palette;
            }
        }
    }

    fn random_colors(&mut self) -> Vec<Color> {
        let mut colors: Vec<Color> = Vec::with_capacity(HARMONY_SIZE);
        while colors.len() < HARMONY_SIZE - 2 {
            let color = self.random_color();
            if !colors.contains(&color) {
                colors.push(color);
            }
        }

        let light = self.light_color();
        let mid_light = loop {
            let candidate = self.mid_light_color();
            if candidate != light && !colors.contains(&candidate) {
                break candidate;
            }
        };
        insert_at_random(&mut colors, light, &mut self.rng);
        insert_at_random(&mut colors, mid_light, &mut self.rng);
        colors
    }

    fn channel_range_color(&mut self, low: u8, high: u8) -> Color {
        Color::new(
            self.rng.gen_range(low..high),
            self.rng.gen_range(low..high),
            self.rng.gen_range(low..high),
        )
    }
}

/// Allocate widths for `colors`; `None` if the colors are not unique.
fn build_palette(colors: &[Color]) -> Option<Palette> {
    Palette::from_entries(allocate_widths(colors)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_valid(palette: &Palette) {
        assert_eq!(palette.len(), HARMONY_SIZE);
        assert!(palette.validate().is_ok(), "{palette:?}");
        assert!((palette.total_width() - 100.0).abs() <= 0.1);
    }

    #[test]
    fn test_random_color_is_dark_leaning() {
        let mut generator = Generator::seeded(1, GenerationPolicy::default());
        for _ in 0..500 {
            let c = generator.random_color();
            assert!(c.r < 150 && c.g < 150 && c.b < 150, "{c}");
        }
    }

    #[test]
    fn test_light_and_mid_light_ranges() {
        let mut generator = Generator::seeded(2, GenerationPolicy::default());
        for _ in 0..200 {
            let light = generator.light_color();
            assert!([light.r, light.g, light.b].iter().all(|v| (180..255).contains(v)));
            let mid = generator.mid_light_color();
            assert!([mid.r, mid.g, mid.b].iter().all(|v| (140..200).contains(v)));
        }
    }

    #[test]
    fn test_random_palette_is_valid() {
        let mut generator = Generator::seeded(3, GenerationPolicy::default());
        for _ in 0..50 {
            assert_valid(&generator.random_palette());
        }
    }

    #[test]
    fn test_generate_accepts_above_threshold() {
        let mut generator = Generator::seeded(4, GenerationPolicy::default());
        for strategy in HarmonyStrategy::ALL {
            let result = generator.generate(strategy);
            assert_valid(&result.palette);
            assert_eq!(result.strategy, strategy);
            if !result.fallback {
                assert!(result.sustainability >= 75);
                assert!(result.attempts >= 1 && result.attempts <= 100);
            }
        }
    }

    #[test]
    fn test_base_reported_for_harmony_strategies() {
        let policy = GenerationPolicy { min_palette_score: 0, ..GenerationPolicy::default() };
        let mut generator = Generator::seeded(5, policy);
        let result = generator.generate(HarmonyStrategy::Triad);
        assert!(!result.fallback);
        let base = result.base.unwrap();
        assert!(base.sustainability() >= 60);

        let random = generator.generate(HarmonyStrategy::Random);
        assert!(random.base.is_none());
    }

    #[test]
    fn test_rejecting_gate_falls_back() {
        let mut generator = Generator::seeded(6, GenerationPolicy::default());
        let reject_all = |_: &Palette, _: u8| false;
        let result = generator.generate_with_gate(HarmonyStrategy::Analogous, &reject_all);
        assert!(result.fallback);
        assert_eq!(result.attempts, 100);
        assert!(result.base.is_none());
        assert_valid(&result.palette);
    }

    #[test]
    fn test_zero_attempts_goes_straight_to_fallback() {
        let policy = GenerationPolicy { max_attempts: 0, ..GenerationPolicy::default() };
        let mut generator = Generator::seeded(7, policy);
        let result = generator.generate(HarmonyStrategy::Complementary);
        assert!(result.fallback);
        assert_valid(&result.palette);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = Generator::seeded(42, GenerationPolicy::default()).generate(HarmonyStrategy::Analogous);
        let b = Generator::seeded(42, GenerationPolicy::default()).generate(HarmonyStrategy::Analogous);
        assert_eq!(a, b);
    }
}
