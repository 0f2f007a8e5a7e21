//! # Headless renderer
//!
//! Executes render queues without a GPU: every vertex is taken through `projection * transform`
//! into surface pixels, and the result is tallied. Optionally, the frame on which a caption comes up is
//! written out as an SVG.

use std::{fmt::Write as _, path::PathBuf};

use cgmath::Vector4;
use windowsill_core::{
    color::Rgb,
    render::{
        Frame, OverlayEvent, RenderCommand, RenderSink, RenderSinkError, Topology, VertexBuffer,
    },
};

use crate::global::settings::SurfaceSize;

/// Frames between statistics reports.
const REPORT_EVERY: u64 = 600;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub frames: u64,
    pub commands: u64,
    pub triangles: u64,
    pub segments: u64,
}

/// A primitive in surface pixels.
struct Projected {
    points: Vec<[f32; 2]>,
    color: Rgb,
    alpha: f32,
}

pub struct HeadlessSink {
    surface: SurfaceSize,
    snapshot_dir: Option<PathBuf>,
    stats: Stats,
}
impl HeadlessSink {
    /// Open a surface of the given size.
    ///
    /// # Errors
    /// If the surface is empty, or the snapshot directory can't be created.
    pub fn open(
        surface: SurfaceSize,
        snapshot_dir: Option<PathBuf>,
    ) -> Result<Self, RenderSinkError> {
        if surface.width == 0 || surface.height == 0 {
            return Err(RenderSinkError::NoSurface(format!(
                "surface of {}x{} pixels",
                surface.width, surface.height
            )));
        }
        if let Some(dir) = &snapshot_dir {
            std::fs::create_dir_all(dir)?;
            log::info!("Writing snapshots to {}", dir.display());
        }
        Ok(Self {
            surface,
            snapshot_dir,
            stats: Stats::default(),
        })
    }
    #[must_use]
    pub fn stats(&self) -> Stats {
        self.stats
    }
    /// Clip space to pixels, y down.
    fn to_pixels(&self, clip: Vector4<f32>) -> [f32; 2] {
        let w = clip.w;
        [
            (clip.x / w + 1.0) / 2.0 * self.surface.width as f32,
            (1.0 - clip.y / w) / 2.0 * self.surface.height as f32,
        ]
    }
    fn project(&self, frame: &Frame, command: &RenderCommand) -> Vec<Projected> {
        let mvp = frame.projection * command.transform;
        let pixel = |idx: usize| {
            command.vertices.position(idx).map(|[x, y]| {
                self.to_pixels(mvp * Vector4::new(x, y, 0.0, 1.0))
            })
        };
        match command.topology {
            Topology::TriangleList => (0..command.count / 3)
                .filter_map(|tri| {
                    let points = (tri * 3..tri * 3 + 3).map(&pixel).collect::<Option<Vec<_>>>()?;
                    let (color, alpha) = match &command.vertices {
                        VertexBuffer::Colored(vertices) => {
                            let [r, g, b, a] = vertices[tri * 3].color;
                            (
                                Rgb([r * command.color.r(), g * command.color.g(), b * command.color.b()]),
                                a * command.alpha,
                            )
                        }
                        VertexBuffer::Plain(_) => {
                            (command.color, command.alpha)
                        }
                    };
                    Some(Projected {
                        points,
                        color,
                        alpha,
                    })
                })
                .collect(),
            Topology::LineStrip => {
                let points: Vec<_> = (0..command.count).filter_map(&pixel).collect();
                vec![Projected {
                    points,
                    color: command.color,
                    alpha: command.alpha,
                }]
            }
        }
    }
    fn snapshot(
        &self,
        frame: &Frame,
        caption: Option<&str>,
        location: Option<&str>,
    ) -> String {
        let SurfaceSize { width, height } = self.surface;
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
        svg.push('\n');
        let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="{}"/>"#, Rgb::BLACK.to_hex());
        for command in &frame.queue {
            for primitive in self.project(frame, command) {
                let points = primitive
                    .points
                    .iter()
                    .map(|[x, y]| format!("{x:.1},{y:.1}"))
                    .collect::<Vec<_>>()
                    .join(" ");
                let color = primitive.color.to_hex();
                let _ = match command.topology {
                    Topology::TriangleList => writeln!(
                        svg,
                        r#"<polygon points="{points}" fill="{color}" fill-opacity="{:.3}"/>"#,
                        primitive.alpha
                    ),
                    Topology::LineStrip => writeln!(
                        svg,
                        r#"<polyline points="{points}" fill="none" stroke="{color}" stroke-opacity="{:.3}" stroke-width="2"/>"#,
                        primitive.alpha
                    ),
                };
            }
        }
        let text = [caption, location]
            .into_iter()
            .flatten()
            .map(escape)
            .collect::<Vec<_>>();
        // Bottom left, caption above location. Lines that don't fit run off the top.
        for (line, content) in text.iter().enumerate() {
            let baseline = (height as usize).saturating_sub(16 + 28 * (text.len() - 1 - line));
            let _ = writeln!(
                svg,
                r#"<text x="16" y="{baseline}" fill="{}" font-family="sans-serif" font-size="20">{content}</text>"#,
                Rgb::WHITE.to_hex(),
            );
        }
        svg.push_str("</svg>\n");
        svg
    }
}

/// Escape text for use in XML content.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            c => escaped.push(c),
        }
    }
    escaped
}

impl RenderSink for HeadlessSink {
    fn submit(&mut self, frame: &Frame) -> Result<(), RenderSinkError> {
        self.stats.frames += 1;
        for command in &frame.queue {
            self.stats.commands += 1;
            match command.topology {
                Topology::TriangleList => self.stats.triangles += (command.count / 3) as u64,
                Topology::LineStrip => {
                    self.stats.segments += command.count.saturating_sub(1) as u64;
                }
            }
        }
        if self.stats.frames % REPORT_EVERY == 0 {
            let Stats {
                frames,
                commands,
                triangles,
                segments,
            } = self.stats;
            log::debug!("{frames} frames: {commands} commands, {triangles} triangles, {segments} segments");
        }

        for event in &frame.overlay {
            match event {
                OverlayEvent::Show {
                    sketch,
                    caption,
                    location,
                } => {
                    log::info!(
                        "Overlay: {:?} / {:?}",
                        caption.as_deref().unwrap_or_default(),
                        location.as_deref().unwrap_or_default()
                    );
                    if let Some(dir) = &self.snapshot_dir {
                        let name: String = sketch
                            .as_str()
                            .chars()
                            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
                            .collect();
                        let path = dir.join(format!("{name}-{}.svg", self.stats.frames));
                        std::fs::write(
                            &path,
                            self.snapshot(frame, caption.as_deref(), location.as_deref()),
                        )?;
                        log::debug!("Wrote snapshot {}", path.display());
                    }
                }
                OverlayEvent::Hide => log::info!("Overlay cleared"),
            }
        }
        Ok(())
    }
}
