//! Per-frame scene snapshot and layout
//!
//! A `Scene` is an owned copy of everything a frame draws, so presenters
//! never borrow the live session. Coordinates are screen pixels, y down.

use glam::Vec2;

use crate::Viewport;
use crate::consts::{BANNER_OFFSET_X, SCORE_ANCHOR};
use crate::sim::{Ball, GameSession, GameStatus, wall_bounds};

pub const GAME_OVER_TEXT: &str = "Game Over!";

/// Immutable snapshot handed to a presenter
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub viewport: Viewport,
    pub centers: Vec<f32>,
    pub slot_width: f32,
    pub tunnel_width: f32,
    pub ball: Ball,
    pub score: u64,
    pub status: GameStatus,
    /// Restarts before this run; 0 for the first
    pub restarts: u64,
}

/// Which page controls are visible around the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlay {
    pub restart_button: bool,
    pub score_submission: bool,
    /// Speed/sensitivity sliders
    pub controls: bool,
}

/// A line of text and its baseline-left anchor
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub pos: Vec2,
}

impl GameSession {
    /// Copy out what the next frame needs
    pub fn snapshot(&self) -> Scene {
        Scene {
            viewport: self.viewport,
            centers: self.tunnel.centers().collect(),
            slot_width: self.config.slot_width,
            tunnel_width: self.config.tunnel_width,
            ball: self.ball,
            score: self.score,
            status: self.status,
            restarts: self.restarts(),
        }
    }
}

impl Scene {
    /// Top wall left to right, out to the viewport edge
    pub fn top_boundary(&self) -> Vec<Vec2> {
        self.boundary(|c| wall_bounds(c, self.tunnel_width).0)
    }

    /// Bottom wall left to right, out to the viewport edge
    pub fn bottom_boundary(&self) -> Vec<Vec2> {
        self.boundary(|c| wall_bounds(c, self.tunnel_width).1)
    }

    fn boundary(&self, edge: impl Fn(f32) -> f32) -> Vec<Vec2> {
        let Some(&newest) = self.centers.last() else {
            return Vec::new();
        };
        let mut points: Vec<Vec2> = self
            .centers
            .iter()
            .enumerate()
            .map(|(i, &c)| Vec2::new(i as f32 * self.slot_width, edge(c)))
            .collect();
        points.push(Vec2::new(self.viewport.width, edge(newest)));
        points
    }

    /// Closed tunnel polygon: top wall left to right, then bottom wall
    /// right to left
    pub fn tunnel_outline(&self) -> Vec<Vec2> {
        let mut outline = self.top_boundary();
        outline.extend(self.bottom_boundary().into_iter().rev());
        outline
    }

    pub fn score_label(&self) -> TextItem {
        TextItem {
            text: self.score.to_string(),
            pos: Vec2::new(SCORE_ANCHOR.0, SCORE_ANCHOR.1),
        }
    }

    /// Sliders come up with the first run and with every game over; a
    /// restarted run plays without them.
    pub fn overlay(&self) -> Overlay {
        let over = self.status == GameStatus::Over;
        Overlay {
            restart_button: over,
            score_submission: over,
            controls: over || self.restarts == 0,
        }
    }

    /// Banner shown once the run is over
    pub fn banner(&self) -> Option<TextItem> {
        (self.status == GameStatus::Over).then(|| TextItem {
            text: GAME_OVER_TEXT.to_string(),
            pos: Vec2::new(
                self.viewport.width / 2.0 - BANNER_OFFSET_X,
                self.viewport.mid_height(),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(centers: Vec<f32>, status: GameStatus) -> Scene {
        Scene {
            viewport: Viewport::new(45.0, 200.0),
            centers,
            slot_width: 10.0,
            tunnel_width: 150.0,
            ball: Ball::new(Vec2::new(9.0, 100.0)),
            score: 12,
            status,
            restarts: 0,
        }
    }

    #[test]
    fn test_outline_order() {
        let scene = scene(vec![100.0, 110.0, 120.0, 130.0], GameStatus::Running);
        let outline = scene.tunnel_outline();

        assert_eq!(outline.len(), 10);
        // Top wall, left to right, extended to the viewport edge
        assert_eq!(outline[0], Vec2::new(0.0, 25.0));
        assert_eq!(outline[3], Vec2::new(30.0, 55.0));
        assert_eq!(outline[4], Vec2::new(45.0, 55.0));
        // Bottom wall, right to left
        assert_eq!(outline[5], Vec2::new(45.0, 205.0));
        assert_eq!(outline[6], Vec2::new(30.0, 205.0));
        assert_eq!(outline[9], Vec2::new(0.0, 175.0));
    }

    #[test]
    fn test_empty_tunnel_has_no_outline() {
        assert!(scene(Vec::new(), GameStatus::Running).tunnel_outline().is_empty());
    }

    #[test]
    fn test_labels() {
        let running = scene(vec![100.0], GameStatus::Running);
        assert_eq!(running.score_label().text, "12");
        assert_eq!(running.score_label().pos, Vec2::new(10.0, 50.0));
        assert!(running.banner().is_none());

        let over = scene(vec![100.0], GameStatus::Over);
        let banner = over.banner().unwrap();
        assert_eq!(banner.text, "Game Over!");
        assert_eq!(banner.pos, Vec2::new(22.5 - 100.0, 100.0));
    }

    #[test]
    fn test_overlay_follows_run_lifecycle() {
        let mut session = GameSession::new(Viewport::new(300.0, 200.0), 4);
        let first = session.snapshot().overlay();
        assert!(first.controls);
        assert!(!first.restart_button && !first.score_submission);

        session.tick(1000.0).unwrap();
        let over = session.snapshot().overlay();
        assert_eq!(
            over,
            Overlay {
                restart_button: true,
                score_submission: true,
                controls: true,
            }
        );

        session.restart();
        let replay = session.snapshot().overlay();
        assert!(!replay.controls && !replay.restart_button && !replay.score_submission);
    }

    #[test]
    fn test_snapshot_copies_session() {
        let session = GameSession::new(Viewport::new(300.0, 200.0), 4);
        let scene = session.snapshot();
        assert_eq!(scene.centers.len(), 30);
        assert_eq!(scene.ball, session.ball);
        assert_eq!(scene.status, GameStatus::Running);
    }
}
