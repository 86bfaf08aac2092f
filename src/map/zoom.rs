use crate::map::MapError;

/// Log-zoom increment per step.
pub const DEFAULT_ZOOM_STEP: i32 = 40;
/// Default log-zoom bounds; wide enough that every linear zoom in 1..=4000
/// fits between them.
pub const DEFAULT_MIN_ZOOM: i32 = 0;
pub const DEFAULT_MAX_ZOOM: i32 = 2400;
/// Initial linear zoom.
pub const DEFAULT_ZOOM: i32 = 1000;

/// Converts between the user-facing linear zoom and the internal logarithmic
/// representation, `log = 200 * ln(linear)`. The log scale makes equal steps
/// feel like equal zoom changes.
///
/// Step size and bounds are integer log units; the stored value keeps full
/// precision so that `set_zoom` followed by `zoom` round-trips exactly
/// instead of drifting by the log-grid resolution at high zoom.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomModel {
    log_zoom: f64,
    zoom_step: i32,
    min_zoom: i32,
    max_zoom: i32,
}

#[inline]
fn to_log_scale(linear: f64) -> f64 {
    200.0 * linear.ln()
}

#[inline]
fn from_log_scale(log: f64) -> f64 {
    (log / 200.0).exp()
}

impl ZoomModel {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_ZOOM_STEP, DEFAULT_MIN_ZOOM, DEFAULT_MAX_ZOOM)
    }

    /// Build a model with a custom step and log-zoom bounds.
    pub fn with_limits(zoom_step: i32, min_zoom: i32, max_zoom: i32) -> Self {
        let max_zoom = max_zoom.max(min_zoom);
        Self {
            log_zoom: to_log_scale(DEFAULT_ZOOM as f64).clamp(min_zoom as f64, max_zoom as f64),
            zoom_step,
            min_zoom,
            max_zoom,
        }
    }

    /// Set the linear zoom. Rejects non-positive values without changing
    /// state; values whose log representation leaves the bounds saturate
    /// silently at the limit.
    pub fn set_zoom(&mut self, linear: i32) -> Result<(), MapError> {
        if linear <= 0 {
            return Err(MapError::InvalidZoom { value: linear });
        }
        self.log_zoom =
            to_log_scale(linear as f64).clamp(self.min_zoom as f64, self.max_zoom as f64);
        Ok(())
    }

    /// Current linear zoom. Inverse of `set_zoom` within ±1.
    pub fn zoom(&self) -> i32 {
        from_log_scale(self.log_zoom).round() as i32
    }

    /// Linear zoom without rounding; the orthographic scale factor.
    pub fn linear_zoom(&self) -> f64 {
        from_log_scale(self.log_zoom)
    }

    pub fn log_zoom(&self) -> f64 {
        self.log_zoom
    }

    pub fn min_zoom(&self) -> i32 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> i32 {
        self.max_zoom
    }

    /// Increase zoom by one step, saturating at the upper bound.
    /// Returns whether the value changed.
    pub fn step_up(&mut self) -> bool {
        let next = (self.log_zoom + self.zoom_step as f64).min(self.max_zoom as f64);
        let changed = next != self.log_zoom;
        self.log_zoom = next;
        changed
    }

    /// Decrease zoom by one step, saturating at the lower bound.
    /// Returns whether the value changed.
    pub fn step_down(&mut self) -> bool {
        let next = (self.log_zoom - self.zoom_step as f64).max(self.min_zoom as f64);
        let changed = next != self.log_zoom;
        self.log_zoom = next;
        changed
    }
}

impl Default for ZoomModel {
    fn default() -> Self {
        Self::new()
    }
}
