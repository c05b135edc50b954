//! Viewer configuration.
//!
//! The defaults start in the stock level looking down -Y, with Z up.

use crate::{data_structures::scene::Traversal, math::Vector3};

#[derive(Clone, Debug)]
pub struct ViewerConfig {
    /// Level file, relative to the `assets` directory.
    pub level: String,
    pub eye: Vector3,
    pub at: Vector3,
    pub up: Vector3,
    /// Vertical field of view in radians.
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
    pub move_step: f32,
    pub turn_step: f32,
    pub clear_colour: wgpu::Color,
    pub traversal: Traversal,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            level: "level.proc".to_string(),
            eye: Vector3::new(2558.0, -1759.0, 76.0),
            at: Vector3::new(2558.0, -1779.0, 76.0),
            up: Vector3::UNIT_Z,
            fovy: std::f32::consts::FRAC_PI_4,
            znear: 0.1,
            zfar: 5000.0,
            move_step: 3.0,
            turn_step: 0.01,
            clear_colour: wgpu::Color::BLACK,
            traversal: Traversal::AllAreas,
        }
    }
}

impl ViewerConfig {
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_camera(mut self, eye: Vector3, at: Vector3, up: Vector3) -> Self {
        self.eye = eye;
        self.at = at;
        self.up = up;
        self
    }

    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }
}
