//! The camera, as an orthographic extent in world units.

use crate::util::lerp;

/// Near clip plane of the projection.
pub const NEAR: f32 = -100.0;
/// Far clip plane of the projection.
pub const FAR: f32 = 100.0;

/// Orthographic camera extent.
///
/// World Y points down, so `top < bottom` for a camera in its usual orientation. Either vertical
/// order is allowed, but the extent must never collapse on either axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewBounds {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl ViewBounds {
    /// The resting extent, centered on the displayed window.
    pub const SETTLED: Self = Self {
        left: -300.0,
        right: 300.0,
        bottom: 400.0,
        top: -400.0,
    };
    /// The zoomed-out extent, double the settled size.
    pub const EXPANDED: Self = Self {
        left: -600.0,
        right: 600.0,
        bottom: 800.0,
        top: -800.0,
    };

    #[must_use]
    pub fn translated(self, [dx, dy]: [f32; 2]) -> Self {
        Self {
            left: self.left + dx,
            right: self.right + dx,
            bottom: self.bottom + dy,
            top: self.top + dy,
        }
    }
    /// Interpolate every edge independently.
    #[must_use]
    pub fn lerp(self, to: Self, t: f32) -> Self {
        Self {
            left: lerp(self.left, to.left, t),
            right: lerp(self.right, to.right, t),
            bottom: lerp(self.bottom, to.bottom, t),
            top: lerp(self.top, to.top, t),
        }
    }
    #[must_use]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }
    /// Unsigned height, regardless of vertical orientation.
    #[must_use]
    pub fn height(&self) -> f32 {
        (self.bottom - self.top).abs()
    }
    #[must_use]
    pub fn center(&self) -> [f32; 2] {
        [
            (self.left + self.right) / 2.0,
            (self.bottom + self.top) / 2.0,
        ]
    }
    /// The smaller of the two vertical edges.
    #[must_use]
    pub fn min_y(&self) -> f32 {
        self.top.min(self.bottom)
    }
    /// Whether this is usable as a projection.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let finite = [self.left, self.right, self.bottom, self.top]
            .iter()
            .all(|edge| edge.is_finite());
        finite && self.left < self.right && self.width() > 0.0 && self.height() > 0.0
    }
    /// Orthographic projection of this extent, with fixed near and far planes.
    #[must_use]
    pub fn projection(&self) -> cgmath::Matrix4<f32> {
        cgmath::ortho(self.left, self.right, self.bottom, self.top, NEAR, FAR)
    }
}

impl Default for ViewBounds {
    fn default() -> Self {
        Self::SETTLED
    }
}

#[cfg(test)]
mod test {
    use super::ViewBounds;
    use cgmath::{Matrix4, Vector4};

    #[test]
    fn expanded_is_double() {
        let expanded = ViewBounds::EXPANDED;
        assert_eq!(expanded.width(), 2.0 * ViewBounds::SETTLED.width());
        assert_eq!(expanded.height(), 2.0 * ViewBounds::SETTLED.height());
        assert_eq!(expanded.center(), [0.0, 0.0]);
        assert!(expanded.is_valid());
    }
    #[test]
    fn projection_maps_corners() {
        let view = ViewBounds::SETTLED.translated([600.0, -800.0]);
        let proj: Matrix4<f32> = view.projection();
        // Top left of the view lands at clip-space top left.
        let corner = proj * Vector4::new(view.left, view.top, 0.0, 1.0);
        assert!((corner.x + 1.0).abs() < 1e-5);
        assert!((corner.y - 1.0).abs() < 1e-5);
        let center = view.center();
        let center = proj * Vector4::new(center[0], center[1], 0.0, 1.0);
        assert!(center.x.abs() < 1e-5 && center.y.abs() < 1e-5);
    }
    #[test]
    fn degenerate_rejected() {
        let flat = ViewBounds {
            top: 5.0,
            bottom: 5.0,
            ..ViewBounds::SETTLED
        };
        assert!(!flat.is_valid());
        let inverted = ViewBounds {
            bottom: -400.0,
            top: 400.0,
            ..ViewBounds::SETTLED
        };
        assert!(inverted.is_valid());
    }
}
