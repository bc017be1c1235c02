//! Game session state and lifecycle
//!
//! Everything a run needs lives in one `GameSession`; there are no globals.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::slot_for;
use super::tunnel::TunnelGenerator;
use crate::Viewport;
use crate::consts::*;
use crate::settings::Settings;
use crate::submit::{ScoreSubmission, SubmitError};

/// Whether ticks are still being simulated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Running,
    /// Ball touched a wall; terminal until `restart`
    Over,
}

/// The player's ball. `pos.x` only changes on restart/resize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            radius: BALL_RADIUS,
        }
    }

    /// Starting spot for a viewport: a fifth across, halfway down
    pub fn spawn(viewport: Viewport) -> Self {
        Self::new(Vec2::new(
            viewport.width * BALL_X_FRACTION,
            viewport.mid_height(),
        ))
    }
}

/// Tunnel geometry, fixed for the life of a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TunnelConfig {
    pub slot_width: f32,
    /// Full thickness; walls sit at `center ± tunnel_width / 2`
    pub tunnel_width: f32,
}

impl Default for TunnelConfig {
    fn default() -> Self {
        Self {
            slot_width: SLOT_WIDTH,
            tunnel_width: TUNNEL_WIDTH,
        }
    }
}

/// Callback fired once with the final score when a run ends
pub type GameOverCallback = Box<dyn FnMut(u64)>;

/// One player's run: ball, tunnel, score and status
pub struct GameSession {
    /// Run seed for reproducibility
    pub seed: u64,
    pub config: TunnelConfig,
    pub settings: Settings,
    pub viewport: Viewport,
    pub ball: Ball,
    pub tunnel: TunnelGenerator,
    /// Surviving ticks this run
    pub score: u64,
    pub status: GameStatus,
    /// Restarts since creation; offsets the jitter seed per run
    restarts: u64,
    game_over_callbacks: Vec<GameOverCallback>,
}

impl GameSession {
    /// Create a running session sized to `viewport`
    pub fn new(viewport: Viewport, seed: u64) -> Self {
        Self::with_config(viewport, seed, TunnelConfig::default(), Settings::default())
    }

    pub fn with_config(
        viewport: Viewport,
        seed: u64,
        config: TunnelConfig,
        settings: Settings,
    ) -> Self {
        Self {
            seed,
            config,
            settings,
            viewport,
            ball: Ball::spawn(viewport),
            tunnel: TunnelGenerator::new(viewport, config.slot_width, seed),
            score: 0,
            status: GameStatus::Running,
            restarts: 0,
            game_over_callbacks: Vec::new(),
        }
    }

    /// Begin the first run (from the play button)
    pub fn start(&mut self) {
        self.reset_run();
        log::info!("Game started with seed: {}", self.seed);
    }

    /// Throw away the current run and begin a fresh one.
    ///
    /// Settings and game over callbacks survive; the run state does not.
    pub fn restart(&mut self) {
        self.restarts += 1;
        self.reset_run();
        log::info!("Game restarted (run {})", self.restarts);
    }

    fn reset_run(&mut self) {
        self.ball = Ball::spawn(self.viewport);
        self.tunnel.reseed_rng(self.seed.wrapping_add(self.restarts));
        self.tunnel.reseed(self.viewport);
        self.score = 0;
        self.status = GameStatus::Running;
    }

    /// Re-derive ball position and tunnel capacity for a new viewport
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.ball.pos = Ball::spawn(viewport).pos;
        self.tunnel.resize(viewport);
        log::info!("Resized to {}x{}", viewport.width, viewport.height);
    }

    /// Register a listener for the end of each run
    pub fn on_game_over(&mut self, callback: impl FnMut(u64) + 'static) {
        self.game_over_callbacks.push(Box::new(callback));
    }

    pub(crate) fn finish(&mut self) {
        self.status = GameStatus::Over;
        log::info!("Game over, final score: {}", self.score);
        let score = self.score;
        for callback in &mut self.game_over_callbacks {
            callback(score);
        }
    }

    /// Restarts since creation; 0 during the first run
    pub fn restarts(&self) -> u64 {
        self.restarts
    }

    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    /// Slot the ball occupies, if it is on the playfield
    pub fn ball_slot(&self) -> Option<usize> {
        slot_for(self.ball.pos.x, self.config.slot_width)
    }

    /// Package the final score for submission.
    ///
    /// The score is frozen once the run is over, so this never changes the
    /// session. The name is trimmed and must not be empty.
    pub fn submission(&self, player_name: &str) -> Result<ScoreSubmission, SubmitError> {
        if self.status != GameStatus::Over {
            return Err(SubmitError::GameNotOver);
        }
        ScoreSubmission::new(player_name, self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn viewport() -> Viewport {
        Viewport::new(500.0, 400.0)
    }

    #[test]
    fn test_new_session_layout() {
        let session = GameSession::new(viewport(), 1);
        assert_eq!(session.status, GameStatus::Running);
        assert_eq!(session.score, 0);
        assert_eq!(session.ball.pos, Vec2::new(100.0, 200.0));
        assert_eq!(session.ball.radius, BALL_RADIUS);
        assert_eq!(session.tunnel.len(), 50);
        assert_eq!(session.ball_slot(), Some(10));
    }

    #[test]
    fn test_restart_from_over_resets_run() {
        let mut session = GameSession::new(viewport(), 1);
        session.score = 42;
        session.ball.pos.y = 5.0;
        session.finish();
        assert_eq!(session.status, GameStatus::Over);

        session.restart();
        assert_eq!(session.status, GameStatus::Running);
        assert_eq!(session.score, 0);
        assert_eq!(session.ball.pos.y, 200.0);
        assert!(session.tunnel.centers().all(|c| c == 200.0));
    }

    #[test]
    fn test_restart_keeps_player_settings() {
        let mut session = GameSession::new(viewport(), 1);
        session.settings.set_speed_slider(8.0);
        session.settings.set_sensitivity_slider(3.0);
        session.restart();
        assert_eq!(session.settings.speed, 4.0);
        assert_eq!(session.settings.sensitivity, 2.0);
    }

    #[test]
    fn test_game_over_callbacks_receive_score() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut session = GameSession::new(viewport(), 1);
        {
            let seen = seen.clone();
            session.on_game_over(move |score| seen.borrow_mut().push(score));
        }
        session.score = 17;
        session.finish();
        session.restart();
        session.score = 3;
        session.finish();

        assert_eq!(*seen.borrow(), vec![17, 3]);
    }

    #[test]
    fn test_resize_moves_ball_and_window() {
        let mut session = GameSession::new(viewport(), 1);
        session.resize(Viewport::new(1000.0, 800.0));
        assert_eq!(session.ball.pos, Vec2::new(200.0, 400.0));
        assert_eq!(session.tunnel.capacity(), 100);
        assert_eq!(session.tunnel.len(), 100);
        let slot = session.ball_slot().unwrap();
        assert!(session.tunnel.center_at(slot).is_some());
    }

    #[test]
    fn test_submission_requires_finished_run() {
        let mut session = GameSession::new(viewport(), 1);
        session.score = 9;
        assert!(matches!(session.submission("ada"), Err(SubmitError::GameNotOver)));

        session.finish();
        assert!(matches!(session.submission("   "), Err(SubmitError::EmptyName)));
        let submission = session.submission("  ada ").unwrap();
        assert_eq!(submission.name, "ada");
        assert_eq!(submission.score, 9);
        assert_eq!(session.status, GameStatus::Over);
    }
}
