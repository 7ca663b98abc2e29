//! Interactive editing session
//!
//! A session owns the live palette together with the state that only matters
//! while someone is editing it: which entry is selected and whether a resize
//! drag is in progress. Front ends translate their events into [`Edit`]
//! commands (or call the methods directly) and read the palette back.

use crate::color::Color;
use crate::generate::{GenerationPolicy, Generated, Generator};
use crate::harmony::HarmonyStrategy;
use crate::palette::{Direction, Palette, PaletteError};
use crate::score::palette_sustainability;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A single editing command.
///
/// Serialized with an `op` tag, e.g. `{"op": "adjust", "index": 0, "direction": "up"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Edit {
    /// Replace the palette with a freshly generated one
    Generate {
        #[serde(default)]
        harmony: Option<HarmonyStrategy>,
    },
    Add { color: Color },
    Remove { color: Color },
    Swap { a: Color, b: Color },
    /// Toggle the lock flag
    Lock { index: usize },
    Adjust { index: usize, direction: Direction },
    /// A whole drag gesture: begin, one move per delta, end
    Resize { index: usize, deltas: Vec<f64> },
    Select { index: usize },
    Deselect,
    /// Change the color of the selected entry
    Recolor { color: Color },
    Reset,
}

/// An active resize drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeDrag {
    pub index: usize,
    /// Width of the entry when the drag began
    pub start_width: f64,
}

/// Editing session around a single palette.
#[derive(Debug, Clone)]
pub struct Session<R = StdRng> {
    palette: Palette,
    selected: Option<usize>,
    resize: Option<ResizeDrag>,
    generator: Generator<R>,
    default_harmony: HarmonyStrategy,
}

impl Session<StdRng> {
    /// Session with a seeded generator, for reproducible runs.
    pub fn seeded(seed: u64, policy: GenerationPolicy) -> Self {
        Self::with_generator(Generator::seeded(seed, policy))
    }

    /// Session with an OS-seeded generator.
    pub fn from_entropy(policy: GenerationPolicy) -> Self {
        Self::with_generator(Generator::from_entropy(policy))
    }
}

impl<R: Rng> Session<R> {
    pub fn with_generator(generator: Generator<R>) -> Self {
        Self {
            palette: Palette::new(),
            selected: None,
            resize: None,
            generator,
            default_harmony: HarmonyStrategy::default(),
        }
    }

    /// Strategy used by [`Edit::Generate`] when none is given.
    pub fn with_default_harmony(mut self, harmony: HarmonyStrategy) -> Self {
        self.default_harmony = harmony;
        self
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn active_resize(&self) -> Option<ResizeDrag> {
        self.resize
    }

    pub fn generator_mut(&mut self) -> &mut Generator<R> {
        &mut self.generator
    }

    /// Aggregate sustainability of the current palette.
    pub fn sustainability(&self) -> u8 {
        palette_sustainability(&self.palette)
    }

    /// Replace the palette with a generated one and clear selection.
    pub fn generate(&mut self, strategy: HarmonyStrategy) -> Generated {
        let generated = self.generator.generate(strategy);
        self.replace_palette(generated.palette.clone());
        generated
    }

    /// Install an existing palette, as after generation.
    pub fn replace_palette(&mut self, palette: Palette) {
        self.palette = palette;
        self.selected = None;
        self.resize = None;
    }

    pub fn reset(&mut self) {
        self.replace_palette(Palette::new());
    }

    pub fn add(&mut self, color: Color) -> Result<(), PaletteError> {
        self.resize = None;
        self.palette.add(color)
    }

    /// Remove `color`, keeping the selection pointed at the same entry.
    pub fn remove(&mut self, color: Color) -> Result<(), PaletteError> {
        self.resize = None;
        let removed = self.palette.remove(color)?;
        self.selected = match self.selected {
            Some(s) if s == removed => None,
            Some(s) if s > removed => Some(s - 1),
            other => other,
        };
        Ok(())
    }

    pub fn swap(&mut self, a: Color, b: Color) -> Result<(), PaletteError> {
        self.resize = None;
        self.palette.swap(a, b)
    }

    pub fn toggle_lock(&mut self, index: usize) -> Result<bool, PaletteError> {
        self.resize = None;
        self.palette.toggle_lock(index)
    }

    pub fn adjust_width(&mut self, index: usize, direction: Direction) -> Result<(), PaletteError> {
        self.resize = None;
        self.palette.adjust_width(index, direction)
    }

    pub fn select(&mut self, index: usize) -> Result<Color, PaletteError> {
        let entry = self
            .palette
            .get(index)
            .ok_or(PaletteError::IndexOutOfRange { index, len: self.palette.len() })?;
        self.resize = None;
        self.selected = Some(index);
        Ok(entry.color)
    }

    pub fn deselect(&mut self) {
        self.resize = None;
        self.selected = None;
    }

    /// Change the color of the selected entry.
    pub fn recolor_selected(&mut self, color: Color) -> Result<(), PaletteError> {
        let index = self.selected.ok_or(PaletteError::NoSelection)?;
        self.resize = None;
        self.palette.recolor(index, color)
    }

    /// Start dragging the edge of the entry at `index`.
    pub fn begin_resize(&mut self, index: usize) -> Result<(), PaletteError> {
        let entry = self
            .palette
            .get(index)
            .ok_or(PaletteError::IndexOutOfRange { index, len: self.palette.len() })?;
        if entry.locked {
            return Err(PaletteError::Locked(index));
        }
        self.resize = Some(ResizeDrag { index, start_width: entry.width });
        Ok(())
    }

    /// Apply one pointer move of `delta` percentage points since the previous
    /// move. Each move commits or is rejected on its own.
    pub fn continue_resize(&mut self, delta: f64) -> Result<(), PaletteError> {
        let drag = self.resize.ok_or(PaletteError::NoActiveResize)?;
        self.palette.resize(drag.index, delta)
    }

    /// Finish the drag and return the resulting palette.
    pub fn end_resize(&mut self) -> Result<&Palette, PaletteError> {
        let drag = self.resize.take().ok_or(PaletteError::NoActiveResize)?;
        debug!(
            index = drag.index,
            from = drag.start_width,
            to = self.palette.get(drag.index).map(|e| e.width),
            "resize finished"
        );
        Ok(&self.palette)
    }

    /// Apply an [`Edit`].
    ///
    /// A resize edit runs a whole drag; individual rejected moves inside it
    /// are skipped and the first rejection is reported once the drag ends.
    pub fn apply(&mut self, edit: &Edit) -> Result<(), PaletteError> {
        match edit {
            Edit::Generate { harmony } => {
                self.generate(harmony.unwrap_or(self.default_harmony));
                Ok(())
            }
            Edit::Add { color } => self.add(*color),
            Edit::Remove { color } => self.remove(*color),
            Edit::Swap { a, b } => self.swap(*a, *b),
            Edit::Lock { index } => self.toggle_lock(*index).map(|_| ()),
            Edit::Adjust { index, direction } => self.adjust_width(*index, *direction),
            Edit::Resize { index, deltas } => {
                self.begin_resize(*index)?;
                let mut first_error = None;
                for delta in deltas {
                    if let Err(e) = self.continue_resize(*delta) {
                        first_error.get_or_insert(e);
                    }
                }
                self.end_resize()?;
                first_error.map_or(Ok(()), Err)
            }
            Edit::Select { index } => self.select(*index).map(|_| ()),
            Edit::Deselect => {
                self.deselect();
                Ok(())
            }
            Edit::Recolor { color } => self.recolor_selected(*color),
            Edit::Reset => {
                self.reset();
                Ok(())
            }
        }
    }
}
