//! Color strings as produced by the capture tool, and their normalized RGB form.
//!
//! The tool stores whatever its canvas normalized a fill style to, which is a
//! hex string in practice, but older records carry the `hsl(..)` form the palette is defined in.

/// A straight (non-premultiplied) RGB color, each channel in `[0, 1]`.
#[repr(C)]
#[derive(Copy, Clone, PartialEq, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Rgb(pub [f32; 3]);

impl Rgb {
    pub const BLACK: Self = Self([0.0; 3]);
    pub const WHITE: Self = Self([1.0; 3]);
    #[must_use]
    pub fn r(self) -> f32 {
        self.0[0]
    }
    #[must_use]
    pub fn g(self) -> f32 {
        self.0[1]
    }
    #[must_use]
    pub fn b(self) -> f32 {
        self.0[2]
    }
    /// A gray with every channel at `level`.
    #[must_use]
    pub const fn gray(level: f32) -> Self {
        Self([level; 3])
    }
    /// Attach an alpha channel, for use as a vertex color.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> [f32; 4] {
        let [r, g, b] = self.0;
        [r, g, b, crate::util::clamp(alpha, 0.0, 1.0)]
    }
    /// Convert from hue (degrees, any range), saturation and lightness (both `[0, 1]`).
    /// This is the CSS mapping.
    #[must_use]
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let s = crate::util::clamp(saturation, 0.0, 1.0);
        let l = crate::util::clamp(lightness, 0.0, 1.0);
        let h = hue.rem_euclid(360.0);
        let a = s * l.min(1.0 - l);
        let channel = |n: f32| {
            let k = (n + h / 30.0).rem_euclid(12.0);
            l - a * (k - 3.0).min(9.0 - k).clamp(-1.0, 1.0)
        };
        Self([channel(0.0), channel(8.0), channel(4.0)])
    }
    /// Format as a 6-digit lowercase hex string, as the capture tool stores colors.
    #[must_use]
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.0.map(|c| (crate::util::clamp(c, 0.0, 1.0) * 255.0).round() as u8);
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("empty color string")]
    Empty,
    #[error("hex color must have 3, 4, 6, or 8 digits, found {0}")]
    HexLength(usize),
    #[error("invalid hex digit in {0:?}")]
    HexDigit(String),
    #[error("malformed {0}() color")]
    Functional(&'static str),
    #[error("unrecognized color format")]
    Unrecognized,
}

impl std::str::FromStr for Rgb {
    type Err = ColorParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ColorParseError::Empty);
        }
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        let lower = s.to_ascii_lowercase();
        if let Some(args) = functional_args(&lower, "hsla").or_else(|| functional_args(&lower, "hsl")) {
            return parse_hsl(args);
        }
        if let Some(args) = functional_args(&lower, "rgba").or_else(|| functional_args(&lower, "rgb")) {
            return parse_rgb(args);
        }
        Err(ColorParseError::Unrecognized)
    }
}

fn parse_hex(hex: &str) -> Result<Rgb, ColorParseError> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ColorParseError::HexDigit(hex.to_owned()));
    }
    // All ascii by now, byte slicing is fine.
    let digit = |i: usize, width: usize| -> Result<f32, ColorParseError> {
        let value = u8::from_str_radix(&hex[i..i + width], 16)
            .map_err(|_| ColorParseError::HexDigit(hex.to_owned()))?;
        // Short form `f` means `ff`
        let value = if width == 1 { value * 17 } else { value };
        Ok(f32::from(value) / 255.0)
    };
    match hex.len() {
        // Alpha is dropped, the record only has use for opaque colors.
        3 | 4 => Ok(Rgb([digit(0, 1)?, digit(1, 1)?, digit(2, 1)?])),
        6 | 8 => Ok(Rgb([digit(0, 2)?, digit(2, 2)?, digit(4, 2)?])),
        len => Err(ColorParseError::HexLength(len)),
    }
}

/// Strip `name(` .. `)`, returning the argument list split on commas, slashes or whitespace.
fn functional_args<'a>(s: &'a str, name: &str) -> Option<Vec<&'a str>> {
    let inner = s.strip_prefix(name)?.trim_start().strip_prefix('(')?.strip_suffix(')')?;
    Some(
        inner
            .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
            .filter(|arg| !arg.is_empty())
            .collect(),
    )
}

fn parse_percent(arg: &str, kind: &'static str) -> Result<f32, ColorParseError> {
    let value: f32 = arg
        .strip_suffix('%')
        .ok_or(ColorParseError::Functional(kind))?
        .parse()
        .map_err(|_| ColorParseError::Functional(kind))?;
    Ok(value / 100.0)
}

fn parse_hue(arg: &str) -> Result<f32, ColorParseError> {
    let err = || ColorParseError::Functional("hsl");
    let (number, scale) = if let Some(deg) = arg.strip_suffix("deg") {
        (deg, 1.0)
    } else if let Some(turn) = arg.strip_suffix("turn") {
        (turn, 360.0)
    } else if let Some(rad) = arg.strip_suffix("rad") {
        (rad, 180.0 / std::f32::consts::PI)
    } else {
        (arg, 1.0)
    };
    let value: f32 = number.parse().map_err(|_| err())?;
    Ok(value * scale)
}

fn parse_hsl(args: Vec<&str>) -> Result<Rgb, ColorParseError> {
    // Optional trailing alpha is ignored.
    let [h, s, l, ..] = args.as_slice() else {
        return Err(ColorParseError::Functional("hsl"));
    };
    Ok(Rgb::from_hsl(
        parse_hue(*h)?,
        parse_percent(*s, "hsl")?,
        parse_percent(*l, "hsl")?,
    ))
}

fn parse_rgb(args: Vec<&str>) -> Result<Rgb, ColorParseError> {
    let [r, g, b, ..] = args.as_slice() else {
        return Err(ColorParseError::Functional("rgb"));
    };
    let channel = |arg: &str| -> Result<f32, ColorParseError> {
        if arg.ends_with('%') {
            parse_percent(arg, "rgb")
        } else {
            let value: f32 = arg.parse().map_err(|_| ColorParseError::Functional("rgb"))?;
            Ok(value / 255.0)
        }
    };
    Ok(Rgb([channel(*r)?, channel(*g)?, channel(*b)?].map(|c| crate::util::clamp(c, 0.0, 1.0))))
}
