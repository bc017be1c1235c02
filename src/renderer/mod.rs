//! Rendering
//!
//! `scene` lays out a frame, `shapes` tessellates it and `pipeline` draws
//! the triangles with WebGPU. Score and banner text belong to the HUD.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{GAME_OVER_TEXT, Overlay, Scene, TextItem};
pub use vertex::Vertex;
