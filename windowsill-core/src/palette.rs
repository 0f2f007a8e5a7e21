//! The fixed swatches offered by the capture tool.
//!
//! Sketches only ever carry these colors unless the record was produced elsewhere,
//! which makes this handy for defaults and for generating test data.

use crate::color::Rgb;

/// Number of hued swatches in each row.
pub const HUES: usize = 8;
const SATURATION: f32 = 0.55;
const BACKGROUND_LIGHTNESS: f32 = 0.20;
const PEN_LIGHTNESS: f32 = 0.65;

/// The hue, in whole degrees, of swatch `index`.
#[must_use]
pub fn hue_of(index: usize) -> f32 {
    // Degrees are floored like the tool does, which is a no-op for 8 hues
    ((index % HUES) * (360 / HUES)) as f32
}

/// Background swatches: black, followed by the dark hues.
#[must_use]
pub fn backgrounds() -> [Rgb; HUES + 1] {
    let mut swatches = [Rgb::BLACK; HUES + 1];
    for (index, swatch) in swatches.iter_mut().skip(1).enumerate() {
        *swatch = Rgb::from_hsl(hue_of(index), SATURATION, BACKGROUND_LIGHTNESS);
    }
    swatches
}

/// Pen swatches: the light hues, followed by white.
#[must_use]
pub fn pens() -> [Rgb; HUES + 1] {
    let mut swatches = [Rgb::WHITE; HUES + 1];
    for (index, swatch) in swatches.iter_mut().take(HUES).enumerate() {
        *swatch = Rgb::from_hsl(hue_of(index), SATURATION, PEN_LIGHTNESS);
    }
    swatches
}
