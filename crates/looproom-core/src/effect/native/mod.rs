//! Native Rust effects
//!
//! The four section effects, in the order the section chain runs them:
//! reverb, bass boost, high boost, lo-fi.

mod bass;
mod highs;
mod lofi;
mod reverb;

pub use bass::{bass_boost, BassBoostEffect};
pub use highs::{high_boost, HighBoostEffect};
pub use lofi::{lofi, LofiEffect};
pub use reverb::{reverb, ReverbEffect};
