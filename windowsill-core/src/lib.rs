//! Core of the windowsill installation: sketches flowing in from a store, and the animation
//! that draws them one by one into an endless wall of windows.

pub mod color;
pub mod geometry;
pub mod id;
pub mod ingest;
pub mod palette;
pub mod pool;
pub mod render;
pub mod sim;
pub mod sketch;
pub mod source;
pub mod tiler;
pub mod util;
pub mod view;

pub use id::SketchKey;
pub use sketch::{Sketch, SketchRecord};
