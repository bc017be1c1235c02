//! Error types shared by the simulation, driver and renderer

use thiserror::Error;

/// Failures that stop the frame loop
#[derive(Debug, Error)]
pub enum GameError {
    /// The ball's slot is outside the tunnel window. Points at a bug in
    /// resize/restart bookkeeping, never at player input.
    #[error("tunnel slot {slot} out of bounds (tunnel has {len} entries)")]
    SlotOutOfBounds { slot: usize, len: usize },
    /// Ball x is negative or not finite, so no slot lies under it
    #[error("ball x {x} is outside the playfield")]
    BallOffPlayfield { x: f32 },
    #[error("render failed: {0}")]
    Render(#[from] wgpu::SurfaceError),
    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported texture formats")]
    NoSurfaceFormat,
}

impl GameError {
    /// Whether the frame loop has to stop. A dropped frame is not fatal;
    /// broken simulation state is.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, GameError::Render(_))
    }
}
