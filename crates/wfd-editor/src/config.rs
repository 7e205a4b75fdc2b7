//! Designer configuration supplied by the host at construction.

use serde::{Deserialize, Serialize};
use wfd_core::layout::{
    DESIGNER_MAX_SCALE, DESIGNER_MIN_SCALE, DESIGNER_SCALE_STEP, SCROLL_DURATION_MS,
};

/// Lower bound for any configured minimum scale; model coordinates are
/// divided by the scale.
pub const SMALLEST_SCALE: f64 = 0.05;

/// Host-facing options. Missing JSON fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignerConfig {
    pub is_read_only: bool,
    /// `"light"` or `"dark"`.
    pub theme: String,
    pub min_scale: f64,
    pub max_scale: f64,
    pub scale_step: f64,
    pub scroll_duration_ms: f64,
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            is_read_only: false,
            theme: "light".into(),
            min_scale: DESIGNER_MIN_SCALE,
            max_scale: DESIGNER_MAX_SCALE,
            scale_step: DESIGNER_SCALE_STEP,
            scroll_duration_ms: SCROLL_DURATION_MS,
        }
    }
}

impl DesignerConfig {
    pub fn zoom(&self) -> ZoomLimits {
        let (min, max) = if self.min_scale <= self.max_scale {
            (self.min_scale, self.max_scale)
        } else {
            log::warn!(
                "CONFIG min_scale {} > max_scale {}; swapping",
                self.min_scale,
                self.max_scale
            );
            (self.max_scale, self.min_scale)
        };
        let (min, max) = if min >= SMALLEST_SCALE {
            (min, max)
        } else {
            log::warn!("CONFIG min_scale {min} not above zero; using {SMALLEST_SCALE}");
            (SMALLEST_SCALE, max.max(SMALLEST_SCALE))
        };
        ZoomLimits {
            min,
            max,
            step: self.scale_step,
        }
    }
}

/// Scale bounds and wheel step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        DesignerConfig::default().zoom()
    }
}

impl ZoomLimits {
    pub fn clamp(&self, scale: f64) -> f64 {
        scale.clamp(self.min, self.max)
    }
}
