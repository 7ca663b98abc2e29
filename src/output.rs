//! Text and JSON reports for palettes and colors

use crate::color::{Color, Hsl, TextTone};
use crate::generate::Generated;
use crate::harmony::HarmonyStrategy;
use crate::palette::Palette;
use crate::score::{palette_sustainability, PaletteRating, Rating};
use serde::Serialize;
use std::io::{self, Write};

/// Error type for output operations
#[derive(Debug)]
pub enum OutputError {
    /// IO error while writing the report
    Io(io::Error),
    /// JSON encoding error
    Json(serde_json::Error),
}

impl std::fmt::Display for OutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputError::Io(e) => write!(f, "IO error: {}", e),
            OutputError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::Io(e) => Some(e),
            OutputError::Json(e) => Some(e),
        }
    }
}

impl From<io::Error> for OutputError {
    fn from(e: io::Error) -> Self {
        OutputError::Io(e)
    }
}

impl From<serde_json::Error> for OutputError {
    fn from(e: serde_json::Error) -> Self {
        OutputError::Json(e)
    }
}

/// Everything a front end needs to show about one color.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorReport {
    pub color: Color,
    pub rgb: [u8; 3],
    pub hsl: Hsl,
    pub sustainability: u8,
    pub rating: Rating,
    pub text: TextTone,
}

impl ColorReport {
    pub fn new(color: Color) -> Self {
        let sustainability = color.sustainability();
        Self {
            color,
            rgb: [color.r, color.g, color.b],
            hsl: color.hsl(),
            sustainability,
            rating: Rating::from_score(sustainability),
            text: color.text_tone(),
        }
    }
}

/// One palette entry with its derived scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryReport {
    pub color: Color,
    pub width: f64,
    pub locked: bool,
    pub sustainability: u8,
    pub rating: Rating,
    pub text: TextTone,
}

/// A palette with its aggregate score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaletteReport {
    pub sustainability: u8,
    pub rating: PaletteRating,
    pub entries: Vec<EntryReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub harmony: Option<HarmonyStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
}

impl PaletteReport {
    pub fn new(palette: &Palette) -> Self {
        let sustainability = palette_sustainability(palette);
        let entries = palette
            .entries()
            .iter()
            .map(|e| {
                let score = e.color.sustainability();
                EntryReport {
                    color: e.color,
                    width: e.width,
                    locked: e.locked,
                    sustainability: score,
                    rating: Rating::from_score(score),
                    text: e.color.text_tone(),
                }
            })
            .collect();

        Self {
            sustainability,
            rating: PaletteRating::from_score(sustainability),
            entries,
            harmony: None,
            base: None,
            attempts: None,
            fallback: false,
        }
    }

    /// Report for a generation result, including how it was found.
    pub fn from_generated(generated: &Generated) -> Self {
        Self {
            harmony: Some(generated.strategy),
            base: generated.base,
            attempts: Some(generated.attempts),
            fallback: generated.fallback,
            ..Self::new(&generated.palette)
        }
    }
}

/// Write a palette report as an aligned text table.
pub fn write_palette_text<W: Write>(out: &mut W, report: &PaletteReport) -> Result<(), OutputError> {
    if let Some(harmony) = report.harmony {
        write!(out, "Harmony: {}", harmony.display_name())?;
        if let Some(base) = report.base {
            write!(out, " (base {})", base)?;
        }
        if report.fallback {
            write!(out, " [random fallback]")?;
        }
        writeln!(out)?;
    }

    if report.entries.is_empty() {
        writeln!(out, "Palette is empty")?;
        return Ok(());
    }

    writeln!(out, "{:>3}  {:<8} {:>7} {:>12}  {}", "#", "COLOR", "USAGE", "SUSTAINABLE", "")?;
    for (i, entry) in report.entries.iter().enumerate() {
        writeln!(
            out,
            "{:>3}  {:<8} {:>6.1}% {:>5}% {:<6} {}",
            i,
            entry.color,
            entry.width,
            entry.sustainability,
            entry.rating.label(),
            if entry.locked { "locked" } else { "" }
        )?;
    }
    writeln!(out, "Palette sustainability: {}% ({})", report.sustainability, report.rating)?;
    Ok(())
}

/// Write a color report as text.
pub fn write_color_text<W: Write>(out: &mut W, report: &ColorReport) -> Result<(), OutputError> {
    let [r, g, b] = report.rgb;
    writeln!(
        out,
        "{}  rgb({}, {}, {})  hsl({:.0}, {:.0}%, {:.0}%)  {}% sustainable ({})",
        report.color,
        r,
        g,
        b,
        report.hsl.h,
        report.hsl.s,
        report.hsl.l,
        report.sustainability,
        report.rating
    )?;
    Ok(())
}

/// Write any report as pretty JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<(), OutputError> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
