//! portal-view
//!
//! A small viewer for id-style `.proc` levels. A level is split into areas
//! joined by portals; each frame draws every area at most once, either all of
//! them or only those reachable through portals from the camera's area.
//!
//! High-level modules
//! - `camera`: camera, projection, uniform and keyboard controller
//! - `config`: viewer settings and their defaults
//! - `context`: window, surface, device, queue and camera GPU resources
//! - `data_structures`: vertices, textures, areas and the scene
//! - `error`: the library error type
//! - `flow`: the winit event loop and the per-frame driver
//! - `gfx`: the graphics interface areas draw through, and its wgpu implementation
//! - `math`: 3x3 matrices and 3D vectors
//! - `pipelines`: render pipelines and shaders
//! - `proc`: tokenizer for the `.proc` text format
//! - `render`: recorded draw commands and their replay
//! - `resources`: asset files and texture loading
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod error;
pub mod flow;
pub mod gfx;
pub mod math;
pub mod pipelines;
pub mod proc;
pub mod render;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use error::{Result, ViewerError};
pub use math::{Matrix3, Vector3};
