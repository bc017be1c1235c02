//! Wavy Tunnel - steer a ball through an endless procedural tunnel
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tunnel, collision, game session)
//! - `input`: Scroll/touch/gamepad aggregation into a per-tick delta
//! - `driver`: Frame scheduler (aggregate -> tick -> present)
//! - `renderer`: Scene layout, tessellation and the WebGPU pipeline
//! - `settings`: Player-adjustable speed/sensitivity
//! - `submit`: Score submission capability

pub mod driver;
pub mod error;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod submit;

pub use driver::{Driver, Presenter};
pub use error::GameError;
pub use settings::Settings;

use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Horizontal width of one tunnel slot
    pub const SLOT_WIDTH: f32 = 10.0;
    /// Full tunnel thickness (walls at center ± half of this)
    pub const TUNNEL_WIDTH: f32 = 150.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    /// Ball sits at this fraction of the viewport width
    pub const BALL_X_FRACTION: f32 = 1.0 / 5.0;

    /// Drift: `sin(tick / DRIFT_PERIOD) * DRIFT_AMPLITUDE`
    pub const DRIFT_PERIOD: f32 = 10.0;
    pub const DRIFT_AMPLITUDE: f32 = 10.0;
    /// Per-tick random jitter, scaled from uniform(-0.5, 0.5)
    pub const JITTER_AMPLITUDE: f32 = 15.0;

    /// Player parameter defaults
    pub const DEFAULT_SPEED: f32 = 2.5;
    pub const DEFAULT_SENSITIVITY: f32 = 5.0;

    /// Raw wheel delta -> input units
    pub const WHEEL_SCALE: f32 = 0.1;
    /// Raw touch drag (pixels) -> input units
    pub const TOUCH_SCALE: f32 = 0.2;

    /// Score text anchor (top-left, baseline)
    pub const SCORE_ANCHOR: (f32, f32) = (10.0, 50.0);
    /// Game over banner offset left of the viewport center
    pub const BANNER_OFFSET_X: f32 = 100.0;
}

/// Drawable area in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Vertical midpoint, where the ball and a fresh tunnel start
    #[inline]
    pub fn mid_height(&self) -> f32 {
        self.height / 2.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1024.0, 768.0)
    }
}
