//! # Render queue
//!
//! Each tick the simulator produces a [`Frame`]: the projection, an ordered list of draw commands,
//! and any overlay text changes. Frames are consumed once by a [`RenderSink`] and discarded.

use std::sync::Arc;

use crate::{
    color::Rgb,
    geometry::{ColoredVertex, Vertex},
    id::SketchKey,
    view::ViewBounds,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::AsRefStr)]
pub enum Topology {
    TriangleList,
    LineStrip,
}

/// Vertex data referenced by a command.
#[derive(Clone, Debug)]
pub enum VertexBuffer {
    /// Per-vertex color, the command's color acts as a multiplier.
    Colored(Arc<[ColoredVertex]>),
    /// Positions only, drawn with the command's color.
    Plain(Arc<[Vertex]>),
}
impl VertexBuffer {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Colored(v) => v.len(),
            Self::Plain(v) => v.len(),
        }
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Position of vertex `idx`.
    #[must_use]
    pub fn position(&self, idx: usize) -> Option<[f32; 2]> {
        match self {
            Self::Colored(v) => v.get(idx).map(|v| v.position),
            Self::Plain(v) => v.get(idx).map(|v| v.position),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RenderCommand {
    pub vertices: VertexBuffer,
    pub color: Rgb,
    pub alpha: f32,
    /// Number of leading vertices to draw. Never more than `vertices.len()`.
    pub count: usize,
    /// Model-view transform.
    pub transform: cgmath::Matrix4<f32>,
    pub topology: Topology,
}
impl RenderCommand {
    /// A triangle list with per-vertex color, drawn whole and untransformed.
    #[must_use]
    pub fn triangles(vertices: Arc<[ColoredVertex]>) -> Self {
        Self {
            count: vertices.len(),
            vertices: VertexBuffer::Colored(vertices),
            color: Rgb::WHITE,
            alpha: 1.0,
            transform: cgmath::SquareMatrix::identity(),
            topology: Topology::TriangleList,
        }
    }
    /// A line strip of the first `count` vertices, with a single color.
    #[must_use]
    pub fn line_strip(
        vertices: Arc<[Vertex]>,
        count: usize,
        color: Rgb,
        alpha: f32,
        transform: cgmath::Matrix4<f32>,
    ) -> Self {
        Self {
            count: count.min(vertices.len()),
            vertices: VertexBuffer::Plain(vertices),
            color,
            alpha,
            transform,
            topology: Topology::LineStrip,
        }
    }
}

pub type RenderQueue = Vec<RenderCommand>;

/// Changes to the caption text shown over the view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OverlayEvent {
    Show {
        sketch: SketchKey,
        caption: Option<String>,
        location: Option<String>,
    },
    Hide,
}

/// Everything produced by one tick.
#[derive(Clone, Debug)]
pub struct Frame {
    pub view: ViewBounds,
    /// Shared by every command of the queue.
    pub projection: cgmath::Matrix4<f32>,
    pub queue: RenderQueue,
    pub overlay: smallvec::SmallVec<[OverlayEvent; 2]>,
}
impl Frame {
    #[must_use]
    pub fn new(view: ViewBounds) -> Self {
        Self {
            view,
            projection: view.projection(),
            queue: RenderQueue::new(),
            overlay: smallvec::SmallVec::new(),
        }
    }
    /// The revealed sketch stroke of this frame, if any.
    #[must_use]
    pub fn line_strip(&self) -> Option<&RenderCommand> {
        self.queue
            .iter()
            .find(|command| command.topology == Topology::LineStrip)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RenderSinkError {
    #[error("no rendering surface available: {0}")]
    NoSurface(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Executes render queues against some surface.
pub trait RenderSink {
    /// Draw a frame. Commands are executed in queue order.
    fn submit(&mut self, frame: &Frame) -> Result<(), RenderSinkError>;
}

/// A sink that keeps every frame, for inspection.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingSink {
    pub frames: Vec<Frame>,
}
#[cfg(test)]
impl RenderSink for RecordingSink {
    fn submit(&mut self, frame: &Frame) -> Result<(), RenderSinkError> {
        self.frames.push(frame.clone());
        Ok(())
    }
}
