//! Ecopalette - energy-aware colour palette generation
//!
//! This library provides functionality to:
//! - Score colors by how cheap they are to show on emissive displays
//! - Derive harmony palettes from a base color and allocate usage widths
//! - Edit palettes (add, remove, swap, lock, resize) while keeping the
//!   widths summing to 100
//! - Drive an editing session from JSONL edit scripts

pub mod allocate;
pub mod cli;
pub mod color;
pub mod config;
pub mod generate;
pub mod harmony;
pub mod output;
pub mod palette;
pub mod parser;
pub mod score;
pub mod session;
