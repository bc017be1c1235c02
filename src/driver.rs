//! Frame driver
//!
//! The host calls [`Driver::frame`] once per animation frame. Each frame
//! drains input, ticks the session and presents a snapshot; the return value
//! says whether to schedule another frame.

use crate::error::GameError;
use crate::input::{InputAggregator, InputHandle};
use crate::renderer::Scene;
use crate::sim::{GameSession, collision};

/// Draws one frame from a snapshot
pub trait Presenter {
    fn present(&mut self, scene: &Scene) -> Result<(), GameError>;
}

/// Owns the session and input for one game page
pub struct Driver {
    session: GameSession,
    input: InputAggregator,
    /// Frames run since creation, dropped ones included
    frames: u64,
}

impl Driver {
    pub fn new(session: GameSession, input: InputAggregator) -> Self {
        Self {
            session,
            input,
            frames: 0,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn input_mut(&mut self) -> &mut InputAggregator {
        &mut self.input
    }

    /// Producer handle for scroll/touch listeners
    pub fn input_handle(&self) -> InputHandle {
        self.input.handle()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn start(&mut self) {
        self.input.clear();
        self.session.start();
    }

    /// Fresh run; input queued during the last one is dropped
    pub fn restart(&mut self) {
        self.input.clear();
        self.session.restart();
    }

    /// Run one frame: aggregate input, tick, present.
    ///
    /// Returns `Ok(false)` once the session is over; the frame presented at
    /// that point already carries the banner. A presenter error that is not
    /// [fatal](GameError::is_fatal) drops the frame and the loop goes on.
    pub fn frame<P: Presenter + ?Sized>(&mut self, presenter: &mut P) -> Result<bool, GameError> {
        let keep_going = if self.session.is_running() {
            let delta = self.input.take_delta(self.session.settings.sensitivity);
            self.session.tick(delta)?.should_continue()
        } else {
            false
        };

        match presenter.present(&self.session.snapshot()) {
            Ok(()) => {}
            Err(e) if !e.is_fatal() => log::warn!("Frame {} dropped: {}", self.frames, e),
            Err(e) => return Err(e),
        }
        self.frames += 1;
        Ok(keep_going)
    }
}

/// Demo steering: the raw input delta that lands the ball on the
/// centerline it will be tested against next tick.
///
/// Once the window is full, each advance shifts it left by one slot, so the
/// center that ends up under the ball is the one currently at `slot + 1`.
pub fn autopilot_delta(session: &GameSession) -> f32 {
    let sensitivity = session.settings.sensitivity;
    if sensitivity <= 0.0 {
        return 0.0;
    }
    let Some(slot) = collision::slot_for(session.ball.pos.x, session.config.slot_width) else {
        return 0.0;
    };
    let target = session
        .tunnel
        .center_at(slot + 1)
        .or_else(|| session.tunnel.center_at(slot));
    match target {
        Some(center) => (center - session.ball.pos.y) / sensitivity,
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Viewport;
    use crate::input::FixedAxis;
    use crate::sim::GameStatus;

    #[derive(Default)]
    struct Recorder {
        scenes: Vec<Scene>,
    }

    impl Presenter for Recorder {
        fn present(&mut self, scene: &Scene) -> Result<(), GameError> {
            self.scenes.push(scene.clone());
            Ok(())
        }
    }

    /// Fails on one chosen call, then recovers
    struct Flaky {
        calls: u32,
        fail_on: u32,
        error: fn() -> GameError,
    }

    impl Presenter for Flaky {
        fn present(&mut self, _scene: &Scene) -> Result<(), GameError> {
            self.calls += 1;
            if self.calls == self.fail_on {
                Err((self.error)())
            } else {
                Ok(())
            }
        }
    }

    fn driver(seed: u64) -> Driver {
        Driver::new(
            GameSession::new(Viewport::new(500.0, 400.0), seed),
            InputAggregator::default(),
        )
    }

    #[test]
    fn test_frame_ticks_then_presents() {
        let mut driver = driver(1);
        let mut recorder = Recorder::default();

        assert!(driver.frame(&mut recorder).unwrap());
        assert_eq!(recorder.scenes.len(), 1);
        // The presented snapshot already includes this frame's tick
        assert_eq!(recorder.scenes[0].score, 1);
        assert_eq!(driver.frames(), 1);
    }

    #[test]
    fn test_input_is_scaled_and_consumed() {
        let mut driver = driver(1);
        let mut recorder = Recorder::default();
        driver.input_handle().accumulate(2.0);

        driver.frame(&mut recorder).unwrap();
        // Default sensitivity is 5
        assert_eq!(driver.session().ball.pos.y, 200.0 + 10.0);
        driver.frame(&mut recorder).unwrap();
        assert_eq!(driver.session().ball.pos.y, 210.0);
    }

    #[test]
    fn test_loop_halts_on_game_over_with_banner() {
        let mut driver = driver(1);
        driver.input_mut().set_gamepad(Box::new(FixedAxis(Some(1.0))));
        let mut recorder = Recorder::default();

        let mut frames = 0;
        while driver.frame(&mut recorder).unwrap() {
            frames += 1;
            assert!(frames < 1000, "ball should hit a wall");
        }
        let last = recorder.scenes.last().unwrap();
        assert_eq!(last.status, GameStatus::Over);
        assert!(last.banner().is_some());

        // Further frames re-present the frozen state without ticking
        let score = driver.session().score;
        assert!(!driver.frame(&mut recorder).unwrap());
        assert_eq!(driver.session().score, score);
    }

    #[test]
    fn test_restart_drops_stale_input() {
        let mut driver = driver(1);
        let mut recorder = Recorder::default();
        driver.input_handle().accumulate(-500.0);
        assert!(!driver.frame(&mut recorder).unwrap());

        driver.input_handle().accumulate(3.0);
        driver.restart();
        assert!(driver.frame(&mut recorder).unwrap());
        assert_eq!(driver.session().ball.pos.y, 200.0);
        assert_eq!(driver.session().score, 1);
    }

    #[test]
    fn test_dropped_frame_keeps_loop_alive() {
        let mut driver = driver(1);
        let mut flaky = Flaky {
            calls: 0,
            fail_on: 3,
            error: || GameError::Render(wgpu::SurfaceError::Timeout),
        };

        for _ in 0..10 {
            assert!(driver.frame(&mut flaky).unwrap());
        }
        assert_eq!(flaky.calls, 10);
        assert_eq!(driver.session().score, 10);
        assert!(driver.session().is_running());
    }

    #[test]
    fn test_fatal_presenter_error_stops_loop() {
        let mut driver = driver(1);
        let mut flaky = Flaky {
            calls: 0,
            fail_on: 2,
            error: || GameError::SlotOutOfBounds { slot: 9, len: 3 },
        };

        assert!(driver.frame(&mut flaky).unwrap());
        assert!(matches!(
            driver.frame(&mut flaky),
            Err(GameError::SlotOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_autopilot_survives() {
        let mut driver = driver(2024);
        let mut recorder = Recorder::default();
        for _ in 0..2000 {
            let delta = autopilot_delta(driver.session());
            driver.input_handle().accumulate(delta);
            assert!(driver.frame(&mut recorder).unwrap());
        }
        assert_eq!(driver.session().score, 2000);
    }

    #[test]
    fn test_autopilot_delta_points_at_center() {
        let mut session = GameSession::new(Viewport::new(500.0, 400.0), 1);
        session.ball.pos.y = 150.0;
        assert_eq!(autopilot_delta(&session), 10.0);
        session.ball.pos.y = 210.0;
        assert_eq!(autopilot_delta(&session), -2.0);

        session.settings.sensitivity = 0.0;
        assert_eq!(autopilot_delta(&session), 0.0);
    }
}
