//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, indexed by score
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;
pub mod tunnel;

pub use collision::{check, slot_for, wall_bounds};
pub use state::{Ball, GameOverCallback, GameSession, GameStatus, TunnelConfig};
pub use tick::{TickOutcome, tick};
pub use tunnel::{TunnelGenerator, capacity_for};
