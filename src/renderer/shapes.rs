//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::scene::Scene;
use super::vertex::{Vertex, colors};

/// Segments used for the ball's triangle fan
pub const BALL_SEGMENTS: u32 = 32;

/// Fill the band between two walls sampled at the same x positions.
///
/// Equivalent to filling the closed outline top left-to-right, bottom
/// right-to-left: each adjacent pair of samples becomes a quad.
pub fn tunnel_band(top: &[Vec2], bottom: &[Vec2], color: [f32; 4]) -> Vec<Vertex> {
    let samples = top.len().min(bottom.len());
    if samples < 2 {
        return Vec::new();
    }

    let mut vertices = Vec::with_capacity((samples - 1) * 6);
    for i in 0..samples - 1 {
        let (t1, t2) = (top[i], top[i + 1]);
        let (b1, b2) = (bottom[i], bottom[i + 1]);

        // Two triangles
        vertices.push(Vertex::new(t1.x, t1.y, color));
        vertices.push(Vertex::new(b1.x, b1.y, color));
        vertices.push(Vertex::new(t2.x, t2.y, color));

        vertices.push(Vertex::new(t2.x, t2.y, color));
        vertices.push(Vertex::new(b1.x, b1.y, color));
        vertices.push(Vertex::new(b2.x, b2.y, color));
    }

    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Everything drawn on the GPU for one frame, back to front, in screen
/// pixels. The background is the clear color; text goes to the HUD.
pub fn frame_vertices(scene: &Scene) -> Vec<Vertex> {
    let mut vertices = tunnel_band(
        &scene.top_boundary(),
        &scene.bottom_boundary(),
        colors::TUNNEL,
    );
    vertices.extend(circle(
        scene.ball.pos,
        scene.ball.radius,
        colors::BALL,
        BALL_SEGMENTS,
    ));
    vertices
}
