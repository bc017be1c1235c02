//! Input aggregation
//!
//! Scroll, touch-drag and gamepad intent are folded into one vertical delta
//! per tick. Event handlers only ever add to the accumulator through an
//! [`InputHandle`]; the tick loop drains it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::consts::{TOUCH_SCALE, WHEEL_SCALE};

/// Something that can report a vertical stick position
pub trait GamepadSource {
    /// Vertical axis in `[-1, 1]`, or `None` when no pad is connected
    fn vertical_axis(&mut self) -> Option<f32>;
}

/// No pad attached; always contributes nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGamepad;

impl GamepadSource for NoGamepad {
    fn vertical_axis(&mut self) -> Option<f32> {
        None
    }
}

/// Fixed axis value, for scripted runs and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedAxis(pub Option<f32>);

impl GamepadSource for FixedAxis {
    fn vertical_axis(&mut self) -> Option<f32> {
        self.0
    }
}

/// f32 accumulator shared between producers and the tick loop
#[derive(Debug, Default)]
struct AtomicDelta(AtomicU32);

impl AtomicDelta {
    fn add(&self, delta: f32) {
        // fetch_update retries on contention; the closure never returns None
        let _ = self
            .0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                Some((f32::from_bits(bits) + delta).to_bits())
            });
    }

    fn take(&self) -> f32 {
        f32::from_bits(self.0.swap(0.0f32.to_bits(), Ordering::AcqRel))
    }

    fn peek(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Acquire))
    }
}

/// Cloneable producer side of the accumulator
#[derive(Debug, Clone, Default)]
pub struct InputHandle {
    pending: Arc<AtomicDelta>,
}

impl InputHandle {
    /// Add a raw (pre-sensitivity) vertical delta
    pub fn accumulate(&self, delta_y: f32) {
        if delta_y.is_finite() {
            self.pending.add(delta_y);
        }
    }

    /// Mouse wheel `deltaY`
    pub fn wheel(&self, delta_y: f32) {
        self.accumulate(delta_y * WHEEL_SCALE);
    }
}

/// Tracks one finger between `touchstart` and successive `touchmove`s
#[derive(Debug, Clone, Default)]
pub struct TouchTracker {
    last_y: Option<f32>,
    handle: InputHandle,
}

impl TouchTracker {
    pub fn new(handle: InputHandle) -> Self {
        Self { last_y: None, handle }
    }

    pub fn start(&mut self, y: f32) {
        self.last_y = Some(y);
    }

    /// Feed the drag distance since the last event
    pub fn moved(&mut self, y: f32) {
        if let Some(last) = self.last_y {
            self.handle.accumulate((y - last) * TOUCH_SCALE);
        }
        self.last_y = Some(y);
    }

    pub fn end(&mut self) {
        self.last_y = None;
    }
}

/// Consumer side: combines the accumulator with a polled gamepad
pub struct InputAggregator {
    handle: InputHandle,
    gamepad: Box<dyn GamepadSource>,
}

impl InputAggregator {
    pub fn new(gamepad: Box<dyn GamepadSource>) -> Self {
        Self {
            handle: InputHandle::default(),
            gamepad,
        }
    }

    /// Producer handle for event listeners
    pub fn handle(&self) -> InputHandle {
        self.handle.clone()
    }

    /// See [`InputHandle::accumulate`]
    pub fn accumulate(&self, delta_y: f32) {
        self.handle.accumulate(delta_y);
    }

    /// Poll the gamepad once; missing pads and junk values read as zero
    pub fn sample_gamepad_axis(&mut self) -> f32 {
        match self.gamepad.vertical_axis() {
            Some(axis) if axis.is_finite() => axis.clamp(-1.0, 1.0),
            _ => 0.0,
        }
    }

    /// Pending (unscaled) scroll/touch delta, without consuming it
    pub fn pending(&self) -> f32 {
        self.handle.pending.peek()
    }

    /// Drain this tick's delta, scaled by `sensitivity`.
    ///
    /// The accumulator is zero afterwards; the gamepad is polled once.
    pub fn take_delta(&mut self, sensitivity: f32) -> f32 {
        let axis = self.sample_gamepad_axis();
        let pending = self.handle.pending.take();
        pending * sensitivity + axis * sensitivity
    }

    /// Drop any pending scroll/touch delta
    pub fn clear(&self) {
        self.handle.pending.take();
    }

    /// Swap the gamepad source (pad connected/disconnected)
    pub fn set_gamepad(&mut self, gamepad: Box<dyn GamepadSource>) {
        self.gamepad = gamepad;
    }
}

impl Default for InputAggregator {
    fn default() -> Self {
        Self::new(Box::new(NoGamepad))
    }
}
