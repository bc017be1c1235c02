//! Per-frame simulation tick
//!
//! One tick per rendered frame. Order matters for determinism: the tunnel
//! advances with the score as it stood before this tick's increment.

use super::collision;
use super::state::{GameSession, GameStatus};
use crate::error::GameError;

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Survived; score after the increment
    Running { score: u64 },
    /// Hit a wall this tick; final score
    GameOver { score: u64 },
    /// Session was already over, nothing simulated
    Halted,
}

impl TickOutcome {
    /// Whether the frame loop should schedule another tick
    pub fn should_continue(&self) -> bool {
        matches!(self, TickOutcome::Running { .. })
    }
}

/// Advance the session by one tick, moving the ball by `delta`
pub fn tick(session: &mut GameSession, delta: f32) -> Result<TickOutcome, GameError> {
    if session.status == GameStatus::Over {
        return Ok(TickOutcome::Halted);
    }

    session.tunnel.advance(session.score);
    session.ball.pos.y += delta;

    let collided = collision::check(&session.ball, &session.tunnel, session.config.tunnel_width)?;
    if collided {
        session.finish();
        return Ok(TickOutcome::GameOver {
            score: session.score,
        });
    }

    session.score += 1;
    Ok(TickOutcome::Running {
        score: session.score,
    })
}

impl GameSession {
    /// See [`tick`]
    pub fn tick(&mut self, delta: f32) -> Result<TickOutcome, GameError> {
        tick(self, delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Viewport;
    use crate::sim::TunnelGenerator;
    use proptest::prelude::*;

    fn session(seed: u64) -> GameSession {
        GameSession::new(Viewport::new(500.0, 400.0), seed)
    }

    #[test]
    fn test_tick_scores_while_inside() {
        let mut session = session(1);
        // The first few ticks drift at most a few dozen pixels; still inside
        for expected in 1..=3 {
            let outcome = session.tick(0.0).unwrap();
            assert_eq!(outcome, TickOutcome::Running { score: expected });
        }
        assert_eq!(session.tunnel.len(), session.tunnel.capacity());
    }

    #[test]
    fn test_tick_wall_hit_ends_game_and_freezes_score() {
        let mut session = session(1);
        session.tick(0.0).unwrap();
        session.tick(0.0).unwrap();

        let outcome = session.tick(1000.0).unwrap();
        assert_eq!(outcome, TickOutcome::GameOver { score: 2 });
        assert_eq!(session.status, GameStatus::Over);

        let ball_y = session.ball.pos.y;
        let centers: Vec<f32> = session.tunnel.centers().collect();
        assert_eq!(session.tick(0.0).unwrap(), TickOutcome::Halted);
        assert_eq!(session.score, 2);
        assert_eq!(session.ball.pos.y, ball_y);
        assert_eq!(session.tunnel.centers().collect::<Vec<_>>(), centers);
    }

    #[test]
    fn test_wall_hit_fires_game_over_once() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut session = session(3);
        {
            let seen = seen.clone();
            session.on_game_over(move |score| seen.borrow_mut().push(score));
        }

        session.tick(0.0).unwrap();
        assert!(seen.borrow().is_empty());
        session.tick(500.0).unwrap();
        for _ in 0..5 {
            assert_eq!(session.tick(0.0).unwrap(), TickOutcome::Halted);
        }
        assert_eq!(*seen.borrow(), vec![1]);

        // A fresh run reports its own end
        session.restart();
        session.tick(-500.0).unwrap();
        assert_eq!(*seen.borrow(), vec![1, 0]);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut session = session(5);
        session.tick(-1000.0).unwrap();
        assert_eq!(session.status, GameStatus::Over);

        session.restart();
        assert_eq!(session.status, GameStatus::Running);
        assert_eq!(session.score, 0);
        assert!(session.tick(0.0).unwrap().should_continue());
    }

    #[test]
    fn test_tunnel_generation_uses_pre_increment_score() {
        // Drive a bare generator with the same seed and tick indices the
        // session should be using: 0, 1, 2 ...
        let viewport = Viewport::new(500.0, 400.0);
        let mut session = GameSession::new(viewport, 11);
        let mut reference = TunnelGenerator::new(viewport, session.config.slot_width, 11);

        for tick_index in 0..20 {
            session.tick(0.0).unwrap();
            reference.advance(tick_index);
        }
        assert_eq!(
            session.tunnel.centers().collect::<Vec<_>>(),
            reference.centers().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_shrunk_window_reports_slot_error() {
        let mut session = session(1);
        // Deliberately break the window behind the session's back
        session.tunnel = TunnelGenerator::from_centers(&[200.0; 3], 10.0, 0);
        let result = session.tick(0.0);
        assert!(matches!(result, Err(GameError::SlotOutOfBounds { .. })));
    }

    #[test]
    fn test_determinism() {
        let mut a = session(99999);
        let mut b = session(99999);
        let deltas = [0.0, 3.5, -2.0, 1.25, 0.0, -4.0];

        for delta in deltas.iter().cycle().take(60) {
            let oa = a.tick(*delta).unwrap();
            let ob = b.tick(*delta).unwrap();
            assert_eq!(oa, ob);
        }
        assert_eq!(a.ball.pos, b.ball.pos);
        assert_eq!(
            a.tunnel.centers().collect::<Vec<_>>(),
            b.tunnel.centers().collect::<Vec<_>>()
        );
    }

    proptest! {
        #[test]
        fn prop_score_counts_surviving_ticks(
            seed in any::<u64>(),
            deltas in proptest::collection::vec(-20.0f32..20.0, 1..200),
        ) {
            let mut session = session(seed);
            let mut survived = 0u64;
            let mut over = false;

            for delta in deltas {
                let before = session.score;
                match session.tick(delta).unwrap() {
                    TickOutcome::Running { score } => {
                        prop_assert!(!over);
                        survived += 1;
                        prop_assert_eq!(score, before + 1);
                    }
                    TickOutcome::GameOver { score } => {
                        prop_assert!(!over);
                        over = true;
                        prop_assert_eq!(score, before);
                    }
                    TickOutcome::Halted => {
                        prop_assert!(over);
                        prop_assert_eq!(session.score, before);
                    }
                }
                prop_assert!(session.tunnel.len() <= session.tunnel.capacity());
            }
            prop_assert_eq!(session.score, survived);
        }

        #[test]
        fn prop_restart_always_resets(
            seed in any::<u64>(),
            deltas in proptest::collection::vec(-50.0f32..50.0, 0..50),
        ) {
            let mut session = session(seed);
            for delta in deltas {
                session.tick(delta).unwrap();
            }
            session.restart();
            prop_assert_eq!(session.score, 0);
            prop_assert_eq!(session.status, GameStatus::Running);
        }
    }
}
