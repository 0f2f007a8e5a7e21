//! # Sketches
//!
//! A [`SketchRecord`] is the raw shape pushed to the store by the capture tool.
//! It is validated once on ingestion into an immutable [`Sketch`].

use std::sync::Arc;

use crate::{
    color::{ColorParseError, Rgb},
    id::SketchKey,
};

/// Fewer vertices than this cannot form a line, and are never shown.
pub const MIN_DISPLAY_VERTICES: usize = 2;

/// One stored record, exactly as it appears on the wire.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SketchRecord {
    /// Flat `x, y` pairs in capture canvas coordinates.
    #[serde(default)]
    pub points: Vec<f32>,
    pub pen_color: String,
    pub background_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MalformedSketch {
    #[error("point list has odd length {0}")]
    OddPointCount(usize),
    #[error("non-finite coordinate at index {0}")]
    NonFinite(usize),
    #[error("bad {field} color {value:?}: {source}")]
    BadColor {
        field: &'static str,
        value: String,
        #[source]
        source: ColorParseError,
    },
}

/// A validated, immutable sketch.
#[derive(Clone, Debug, PartialEq)]
pub struct Sketch {
    key: SketchKey,
    points: Arc<[f32]>,
    pen: Rgb,
    background: Rgb,
    caption: Option<String>,
    location: Option<String>,
}

impl Sketch {
    /// Validate a record.
    ///
    /// # Errors
    /// If the point list is not made of whole, finite pairs or either color does not parse.
    pub fn from_record(key: SketchKey, record: SketchRecord) -> Result<Self, MalformedSketch> {
        if record.points.len() % 2 != 0 {
            return Err(MalformedSketch::OddPointCount(record.points.len()));
        }
        if let Some(index) = record.points.iter().position(|p| !p.is_finite()) {
            return Err(MalformedSketch::NonFinite(index));
        }
        let parse = |field: &'static str, value: String| {
            value
                .parse::<Rgb>()
                .map_err(|source| MalformedSketch::BadColor {
                    field,
                    value,
                    source,
                })
        };
        let pen = parse("pen", record.pen_color)?;
        let background = parse("background", record.background_color)?;

        // Blank text is as good as none, the overlay shouldn't flash an empty box.
        let non_blank = |text: Option<String>| text.filter(|t| !t.trim().is_empty());
        Ok(Self {
            key,
            points: record.points.into(),
            pen,
            background,
            caption: non_blank(record.caption),
            location: non_blank(record.location),
        })
    }
    #[must_use]
    pub fn key(&self) -> &SketchKey {
        &self.key
    }
    /// Flat `x, y` pairs.
    #[must_use]
    pub fn points(&self) -> &[f32] {
        &self.points
    }
    /// Number of vertices, half the length of [`Self::points`]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.points.len() / 2
    }
    /// Whether the sketch draws anything at all.
    #[must_use]
    pub fn is_displayable(&self) -> bool {
        self.vertex_count() >= MIN_DISPLAY_VERTICES
    }
    #[must_use]
    pub fn pen(&self) -> Rgb {
        self.pen
    }
    #[must_use]
    pub fn background(&self) -> Rgb {
        self.background
    }
    #[must_use]
    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}
