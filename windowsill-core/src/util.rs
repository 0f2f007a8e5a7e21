//! Utility math, used throughout the crate.

/// Saturate `value` into `[lo, hi]`. NaN saturates to `lo`.
#[must_use]
pub fn clamp(value: f32, lo: f32, hi: f32) -> f32 {
    if value.is_nan() {
        lo
    } else {
        value.max(lo).min(hi)
    }
}

/// Progress of `elapsed` through `total`, clamped to `[0, 1]`.
///
/// A non-positive `total` is considered already complete.
#[must_use]
pub fn progress(elapsed: f32, total: f32) -> f32 {
    if total <= 0.0 {
        1.0
    } else {
        clamp(elapsed / total, 0.0, 1.0)
    }
}

/// Linearly interpolate from `from` to `to` by `t`. `t` is *not* clamped.
#[must_use]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    // Exact at both ends, unlike `from + (to - from) * t`
    from * (1.0 - t) + to * t
}

/// Map `t` from the sub-range `[start, end)` onto `[0, 1]`, clamped.
#[must_use]
pub fn remap(t: f32, start: f32, end: f32) -> f32 {
    progress(t - start, end - start)
}
