//! # Tiler
//!
//! World space is an infinite grid of fixed-size cells, each holding one window frame centered in it.
//! Cell `(0, 0)` is centered at the world origin. Every cell's origin is a whole multiple of the cell
//! size, which is what keeps the grid seamless at any camera offset.

use crate::{
    color::Rgb,
    geometry::{self, ColoredVertex},
    view::ViewBounds,
};

pub const CELL_WIDTH: f32 = 600.0;
pub const CELL_HEIGHT: f32 = 800.0;
/// Extra cells emitted past each edge of the view.
pub const MARGIN_CELLS: i64 = 1;

/// Tint laid over the pane of the origin cell.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PaneTint {
    pub color: Rgb,
    pub alpha: f32,
}

/// The range of cells covering a view, margin included.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellSpan {
    pub first_column: i64,
    pub first_row: i64,
    pub columns: i64,
    pub rows: i64,
}
impl CellSpan {
    #[must_use]
    pub fn covering(view: &ViewBounds) -> Self {
        // One cell of margin on the leading edge is folded into the floor, as the cell *center*
        // is anchored to the floored multiple.
        let columns = (view.width() / CELL_WIDTH).ceil() as i64 + 2 * MARGIN_CELLS;
        let rows = (view.height() / CELL_HEIGHT).ceil() as i64 + 2 * MARGIN_CELLS;
        Self {
            first_column: (view.left / CELL_WIDTH).floor() as i64,
            first_row: (view.min_y() / CELL_HEIGHT).floor() as i64,
            columns: columns.max(0),
            rows: rows.max(0),
        }
    }
    #[must_use]
    pub fn len(&self) -> usize {
        usize::try_from(self.columns.saturating_mul(self.rows)).unwrap_or(0)
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Cell indices, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        (self.first_row..self.first_row + self.rows).flat_map(move |row| {
            (self.first_column..self.first_column + self.columns).map(move |column| (column, row))
        })
    }
}

/// World position of a cell's center.
#[must_use]
pub fn cell_center((column, row): (i64, i64)) -> [f32; 2] {
    [column as f32 * CELL_WIDTH, row as f32 * CELL_HEIGHT]
}

/// Emit the triangle list of every window frame covering the view.
///
/// If `tint` is given and visible, the origin cell's pane is overlaid with it whenever that cell is emitted.
#[must_use]
pub fn generate(view: &ViewBounds, tint: Option<PaneTint>) -> Vec<ColoredVertex> {
    let span = CellSpan::covering(view);
    let tint = tint.filter(|tint| tint.alpha > 0.0);
    let overlay_len = if tint.is_some() {
        geometry::PANE_VERTICES
    } else {
        0
    };
    let mut vertices = Vec::with_capacity(span.len() * geometry::FRAME_VERTICES + overlay_len);
    let mesh = geometry::window_frame_mesh();

    for cell in span.cells() {
        let center = cell_center(cell);
        vertices.extend(mesh.iter().map(|vertex| vertex.translated(center)));
        if let (Some(tint), (0, 0)) = (tint, cell) {
            vertices.extend(geometry::pane_overlay(tint.color.with_alpha(tint.alpha)));
        }
    }
    vertices
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{Rng, SeedableRng};

    #[test]
    fn settled_view_span() {
        let span = CellSpan::covering(&ViewBounds::SETTLED);
        assert_eq!(
            span,
            CellSpan {
                first_column: -1,
                first_row: -1,
                columns: 3,
                rows: 3
            }
        );
        let vertices = generate(&ViewBounds::SETTLED, None);
        assert_eq!(vertices.len(), 9 * geometry::FRAME_VERTICES);
    }
    #[test]
    fn view_is_covered() {
        let view = ViewBounds::EXPANDED.translated([-450.0, 1234.0]);
        let span = CellSpan::covering(&view);
        let [first_x, first_y] = cell_center((span.first_column, span.first_row));
        let [last_x, last_y] = cell_center((
            span.first_column + span.columns - 1,
            span.first_row + span.rows - 1,
        ));
        // Cell extents reach past every edge.
        assert!(first_x - CELL_WIDTH / 2.0 <= view.left);
        assert!(last_x + CELL_WIDTH / 2.0 >= view.right);
        assert!(first_y - CELL_HEIGHT / 2.0 <= view.min_y());
        assert!(last_y + CELL_HEIGHT / 2.0 >= view.min_y() + view.height());
    }
    #[test]
    fn tint_only_on_origin_cell() {
        let tint = PaneTint {
            color: Rgb([1.0, 0.0, 0.0]),
            alpha: 0.5,
        };
        let vertices = generate(&ViewBounds::SETTLED, Some(tint));
        assert_eq!(
            vertices.len(),
            9 * geometry::FRAME_VERTICES + geometry::PANE_VERTICES
        );
        let tinted: Vec<_> = vertices
            .iter()
            .filter(|v| v.color == [1.0, 0.0, 0.0, 0.5])
            .collect();
        assert_eq!(tinted.len(), geometry::PANE_VERTICES);
        assert!(tinted.iter().all(|v| v.position[0].abs() <= 200.0 && v.position[1].abs() <= 300.0));

        // Origin out of view, no tint.
        let far = ViewBounds::SETTLED.translated([6000.0, 0.0]);
        assert_eq!(
            generate(&far, Some(tint)).len(),
            9 * geometry::FRAME_VERTICES
        );
        // Invisible tint is skipped.
        let clear = PaneTint { alpha: 0.0, ..tint };
        assert_eq!(
            generate(&ViewBounds::SETTLED, Some(clear)).len(),
            9 * geometry::FRAME_VERTICES
        );
    }
    #[test]
    fn seamless_under_cell_translation() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0x5EA1);
        for _ in 0..200 {
            // Keep coordinates exactly representable and away from cell boundaries, so the
            // comparison below may be exact.
            let column: i32 = rng.gen_range(-20..20);
            let row: i32 = rng.gen_range(-20..20);
            let into_cell_x = f32::from(rng.gen_range(30u16..570)) + 0.5;
            let into_cell_y = f32::from(rng.gen_range(40u16..760)) + 0.25;
            let left = column as f32 * CELL_WIDTH + into_cell_x;
            let top = row as f32 * CELL_HEIGHT + into_cell_y;
            let view = ViewBounds {
                left,
                right: left + f32::from(rng.gen_range(100u16..2000)),
                top,
                bottom: top + f32::from(rng.gen_range(100u16..2000)),
            };
            let shift_columns: i32 = rng.gen_range(-15..15);
            let shift_rows: i32 = rng.gen_range(-15..15);
            let shift = [
                shift_columns as f32 * CELL_WIDTH,
                shift_rows as f32 * CELL_HEIGHT,
            ];

            let before = generate(&view, None);
            let after = generate(&view.translated(shift), None);
            assert_eq!(before.len(), after.len());
            for (before, after) in before.iter().zip(&after) {
                assert_eq!(before.translated(shift), *after);
            }
        }
    }
}
