//! Ball vs tunnel wall detection
//!
//! The tunnel only matters at one column: the slot under the ball's fixed x.
//! The ball is inside while its y lies within `center ± width / 2`
//! (boundaries inclusive).

use super::state::Ball;
use super::tunnel::TunnelGenerator;
use crate::error::GameError;

/// Slot index under a horizontal position; `None` left of the playfield
/// or for a non-finite `x`
#[inline]
pub fn slot_for(x: f32, slot_width: f32) -> Option<usize> {
    if x.is_finite() && x >= 0.0 {
        Some((x / slot_width).floor() as usize)
    } else {
        None
    }
}

/// Wall edges `(top, bottom)` around a centerline
#[inline]
pub fn wall_bounds(center: f32, tunnel_width: f32) -> (f32, f32) {
    let half = tunnel_width / 2.0;
    (center - half, center + half)
}

/// Returns true if the ball has left the tunnel at its slot.
///
/// An out-of-range slot is an invariant violation upstream (resize or
/// restart left the window short) and is reported, never clamped. The same
/// goes for a ball left of the playfield.
pub fn check(ball: &Ball, tunnel: &TunnelGenerator, tunnel_width: f32) -> Result<bool, GameError> {
    let slot = slot_for(ball.pos.x, tunnel.slot_width())
        .ok_or(GameError::BallOffPlayfield { x: ball.pos.x })?;
    let center = tunnel.center_at(slot).ok_or(GameError::SlotOutOfBounds {
        slot,
        len: tunnel.len(),
    })?;

    let (top, bottom) = wall_bounds(center, tunnel_width);
    Ok(ball.pos.y < top || ball.pos.y > bottom)
}
