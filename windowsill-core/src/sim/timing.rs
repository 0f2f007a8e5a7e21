//! Phase durations, and conversion of frame timestamps into steps.

/// Durations, in milliseconds.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Timing {
    /// Time taken to reveal a sketch.
    pub draw_ms: f32,
    /// Time a fully revealed sketch is held.
    pub wait_ms: f32,
    /// Time taken to travel to the next window.
    pub move_ms: f32,
    /// Point during the hold at which the caption appears.
    pub caption_show_ms: f32,
    /// Point during the hold at which the caption disappears.
    pub caption_hide_ms: f32,
    /// Longest step taken in one tick. Longer gaps between frames are slowed down to this.
    pub max_frame_ms: f32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            draw_ms: 8000.0,
            wait_ms: 6000.0,
            move_ms: 6000.0,
            caption_show_ms: 500.0,
            caption_hide_ms: 5500.0,
            max_frame_ms: 100.0,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TimingError {
    #[error("{name} must be a positive duration, found {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("caption must be shown before it is hidden, and hidden before the hold ends")]
    CaptionOrder,
}

impl Timing {
    /// Check the durations are usable.
    pub fn validate(&self) -> Result<(), TimingError> {
        for (name, value) in [
            ("draw_ms", self.draw_ms),
            ("wait_ms", self.wait_ms),
            ("move_ms", self.move_ms),
            ("max_frame_ms", self.max_frame_ms),
        ] {
            // Negated to catch NaN too.
            if !(value > 0.0) || !value.is_finite() {
                return Err(TimingError::NotPositive { name, value });
            }
        }
        let ordered = self.caption_show_ms >= 0.0
            && self.caption_show_ms < self.caption_hide_ms
            && self.caption_hide_ms <= self.wait_ms;
        if ordered {
            Ok(())
        } else {
            Err(TimingError::CaptionOrder)
        }
    }
}

/// Turns monotonic frame timestamps into step sizes.
#[derive(Clone, Debug)]
pub struct FrameClock {
    last: Option<f64>,
    max_dt: f32,
}
impl FrameClock {
    #[must_use]
    pub fn new(max_dt: f32) -> Self {
        Self { last: None, max_dt }
    }
    /// Time since the previous timestamp, clamped to `[0, max_dt]`.
    ///
    /// The first call measures from zero, which also gets clamped.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let since = now_ms - self.last.unwrap_or(0.0);
        self.last = Some(now_ms);
        crate::util::clamp(since as f32, 0.0, self.max_dt)
    }
}
