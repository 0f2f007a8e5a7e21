//! # Geometry
//!
//! Renderer-ready vertex data. Sketch vertex buffers are built lazily and memoized, the window frame
//! mesh is a constant.

use std::sync::Arc;

use crate::{color::Rgb, id::SketchKey, sketch::Sketch};

/// A bare position, drawn with a uniform color.
#[repr(C)]
#[derive(Copy, Clone, PartialEq, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
}

/// A position with straight RGBA color.
#[repr(C)]
#[derive(Copy, Clone, PartialEq, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ColoredVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}
impl ColoredVertex {
    #[must_use]
    pub fn translated(self, [dx, dy]: [f32; 2]) -> Self {
        let [x, y] = self.position;
        Self {
            position: [x + dx, y + dy],
            ..self
        }
    }
}

/// Half the width of the window pane, in world units.
pub const PANE_HALF_WIDTH: f32 = 200.0;
/// Half the height of the window pane, in world units.
pub const PANE_HALF_HEIGHT: f32 = 300.0;
/// Leg length of the corner gussets.
pub const GUSSET: f32 = 40.0;

pub const PANE_SHADE: f32 = 0.15;
pub const LOWER_GUSSET_SHADE: f32 = 0.20;
pub const UPPER_GUSSET_SHADE: f32 = 0.30;

/// Vertices of one window frame cell.
pub const FRAME_VERTICES: usize = 18;
/// Leading vertices of [`window_frame_mesh`] covering the pane, two triangles.
pub const PANE_VERTICES: usize = 6;

const fn frame_vertex(x: f32, y: f32, shade: f32) -> ColoredVertex {
    let Rgb([r, g, b]) = Rgb::gray(shade);
    ColoredVertex {
        position: [x, y],
        color: [r, g, b, 1.0],
    }
}

// World Y points down, so "upper" gussets have negative Y.
const L: f32 = -PANE_HALF_WIDTH;
const R: f32 = PANE_HALF_WIDTH;
const T: f32 = -PANE_HALF_HEIGHT;
const B: f32 = PANE_HALF_HEIGHT;
const WINDOW_FRAME: [ColoredVertex; FRAME_VERTICES] = [
    // Pane
    frame_vertex(L, T, PANE_SHADE),
    frame_vertex(R, T, PANE_SHADE),
    frame_vertex(L, B, PANE_SHADE),
    frame_vertex(R, T, PANE_SHADE),
    frame_vertex(R, B, PANE_SHADE),
    frame_vertex(L, B, PANE_SHADE),
    // Upper left
    frame_vertex(L, T, UPPER_GUSSET_SHADE),
    frame_vertex(L + GUSSET, T, UPPER_GUSSET_SHADE),
    frame_vertex(L, T + GUSSET, UPPER_GUSSET_SHADE),
    // Upper right
    frame_vertex(R, T, UPPER_GUSSET_SHADE),
    frame_vertex(R, T + GUSSET, UPPER_GUSSET_SHADE),
    frame_vertex(R - GUSSET, T, UPPER_GUSSET_SHADE),
    // Lower left
    frame_vertex(L, B, LOWER_GUSSET_SHADE),
    frame_vertex(L, B - GUSSET, LOWER_GUSSET_SHADE),
    frame_vertex(L + GUSSET, B, LOWER_GUSSET_SHADE),
    // Lower right
    frame_vertex(R, B, LOWER_GUSSET_SHADE),
    frame_vertex(R - GUSSET, B, LOWER_GUSSET_SHADE),
    frame_vertex(R, B - GUSSET, LOWER_GUSSET_SHADE),
];

/// One decorative window frame, centered at the origin: the pane followed by four corner gussets.
#[must_use]
pub fn window_frame_mesh() -> &'static [ColoredVertex; FRAME_VERTICES] {
    &WINDOW_FRAME
}

/// The pane triangles of the window frame, recolored.
#[must_use]
pub fn pane_overlay(color: [f32; 4]) -> [ColoredVertex; PANE_VERTICES] {
    let mut pane = [ColoredVertex::default(); PANE_VERTICES];
    for (into, from) in pane.iter_mut().zip(&WINDOW_FRAME[..PANE_VERTICES]) {
        *into = ColoredVertex { color, ..*from };
    }
    pane
}

/// Size of the canvas sketches were captured on, fit into the window pane when drawn.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SketchFit {
    pub canvas_width: f32,
    pub canvas_height: f32,
}
impl Default for SketchFit {
    fn default() -> Self {
        Self {
            canvas_width: 2.0 * PANE_HALF_WIDTH,
            canvas_height: 2.0 * PANE_HALF_HEIGHT,
        }
    }
}
impl SketchFit {
    /// Model-view transform from canvas space into the pane of the origin cell, preserving aspect.
    ///
    /// A degenerate canvas is only centered, never scaled.
    #[must_use]
    pub fn transform(&self) -> cgmath::Matrix4<f32> {
        let scale = (2.0 * PANE_HALF_WIDTH / self.canvas_width)
            .min(2.0 * PANE_HALF_HEIGHT / self.canvas_height);
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        cgmath::Matrix4::from_scale(scale)
            * cgmath::Matrix4::from_translation(cgmath::Vector3::new(
                -self.canvas_width / 2.0,
                -self.canvas_height / 2.0,
                0.0,
            ))
    }
}

/// Prepared vertex data for a sketch.
#[derive(Debug)]
pub struct GeometryHandle {
    key: SketchKey,
    vertices: Arc<[Vertex]>,
    pen: Rgb,
    background: Rgb,
}
impl GeometryHandle {
    fn new(sketch: &Sketch) -> Self {
        let vertices: Arc<[Vertex]> = sketch
            .points()
            .chunks_exact(2)
            .map(|xy| Vertex {
                position: [xy[0], xy[1]],
            })
            .collect();
        Self {
            key: sketch.key().clone(),
            vertices,
            pen: sketch.pen(),
            background: sketch.background(),
        }
    }
    #[must_use]
    pub fn key(&self) -> &SketchKey {
        &self.key
    }
    #[must_use]
    pub fn vertices(&self) -> &Arc<[Vertex]> {
        &self.vertices
    }
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
    #[must_use]
    pub fn pen(&self) -> Rgb {
        self.pen
    }
    #[must_use]
    pub fn background(&self) -> Rgb {
        self.background
    }
}

/// Memoizes [`GeometryHandle`]s by sketch key.
#[derive(Default)]
pub struct GeometryCache {
    handles: hashbrown::HashMap<SketchKey, Arc<GeometryHandle>>,
}
impl GeometryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Fetch the geometry of the sketch, building it on first use.
    pub fn prepare(&mut self, sketch: &Sketch) -> Arc<GeometryHandle> {
        self.handles
            .entry(sketch.key().clone())
            .or_insert_with(|| {
                log::trace!("Preparing geometry for {}", sketch.key());
                Arc::new(GeometryHandle::new(sketch))
            })
            .clone()
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sketch::test::sketch;

    #[test]
    fn memoized_per_key() {
        let mut cache = GeometryCache::new();
        let line = sketch("1", &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        let first = cache.prepare(&line);
        let second = cache.prepare(&line);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert_eq!(first.vertex_count(), 3);
        assert_eq!(first.vertices()[2].position, [4.0, 5.0]);
        assert_eq!(first.pen(), Rgb::WHITE);
        assert_eq!(first.background(), Rgb::BLACK);
    }
    #[test]
    fn frame_mesh_shape() {
        let mesh = window_frame_mesh();
        assert_eq!(mesh.len(), 18);
        assert_eq!(mesh[0].color, Rgb::gray(PANE_SHADE).with_alpha(1.0));
        // Everything lies within the pane rectangle.
        for vertex in mesh {
            let [x, y] = vertex.position;
            assert!(x.abs() <= PANE_HALF_WIDTH && y.abs() <= PANE_HALF_HEIGHT);
            assert_eq!(vertex.color[3], 1.0);
        }
        // Pane triangles cover the full rect: area of 2 triangles == rect area.
        let area: f32 = mesh[..PANE_VERTICES]
            .chunks_exact(3)
            .map(|tri| {
                let [a, b, c] = [tri[0].position, tri[1].position, tri[2].position];
                ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])).abs() / 2.0
            })
            .sum();
        assert_eq!(area, 4.0 * PANE_HALF_WIDTH * PANE_HALF_HEIGHT);
    }
    #[test]
    fn fit_centers_canvas_in_pane() {
        use cgmath::Vector4;
        let fit = SketchFit::default().transform();
        let corner = fit * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!([corner.x, corner.y], [-PANE_HALF_WIDTH, -PANE_HALF_HEIGHT]);

        // Twice as large, and wider than the pane. Width limits the scale.
        let wide = SketchFit {
            canvas_width: 1600.0,
            canvas_height: 1200.0,
        }
        .transform();
        let far = wide * Vector4::new(1600.0, 1200.0, 0.0, 1.0);
        assert!((far.x - PANE_HALF_WIDTH).abs() < 1e-4);
        assert!((far.y - 150.0).abs() < 1e-4);
    }
    #[test]
    fn overlay_matches_pane() {
        let overlay = pane_overlay([0.5, 0.25, 0.0, 0.5]);
        for (overlay, pane) in overlay.iter().zip(window_frame_mesh()) {
            assert_eq!(overlay.position, pane.position);
            assert_eq!(overlay.color, [0.5, 0.25, 0.0, 0.5]);
        }
    }
}
