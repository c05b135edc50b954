//! Camera, projection and the uniform that carries both to the shaders.
//!
//! The camera keeps an eye position and an orthonormal look basis. Turning
//! rotates the look direction with a [`Matrix3`]; the 4x4 view and projection
//! matrices handed to the GPU are built with `cgmath`.

use cgmath::{Matrix4, Rad, SquareMatrix};
use winit::keyboard::KeyCode;

use crate::math::{Matrix3, Vector3, mult_matrix_vector};

/// wgpu clips depth to `0..1` while `cgmath::perspective` targets OpenGL's `-1..1`.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vector3,
    forward: Vector3,
    up: Vector3,
}

impl Camera {
    /// Places the camera at `eye`, looking at `at`, with `up` as the vertical hint.
    ///
    /// `up` is re-orthogonalized against the look direction. If `eye == at`
    /// the camera looks along +X.
    pub fn look_at(eye: Vector3, at: Vector3, up: Vector3) -> Self {
        let mut forward = (at - eye).normalize();
        if forward == Vector3::ZERO {
            log::warn!("look_at with eye == at, defaulting to +X");
            forward = Vector3::UNIT_X;
        }
        let right = forward.cross(up).normalize();
        let up = right.cross(forward).normalize();
        Self { eye, forward, up }
    }

    pub fn forward(&self) -> Vector3 {
        self.forward
    }

    pub fn up(&self) -> Vector3 {
        self.up
    }

    pub fn right(&self) -> Vector3 {
        self.forward.cross(self.up)
    }

    /// Yaw about the camera's up axis. Positive angles turn right.
    pub fn rotate_yy(&mut self, angle: f32) {
        let rotation = Matrix3::from_axis_angle(-self.up, angle);
        let mut turned = Vector3::ZERO;
        mult_matrix_vector(&mut turned, &rotation, &self.forward);
        self.forward = turned.normalize();
    }

    pub fn move_forward(&mut self, distance: f32) {
        self.eye += self.forward * distance;
    }

    /// World-to-view rotation: rows are right, up and back (`-forward`).
    pub fn basis(&self) -> Matrix3 {
        let right = self.right();
        let back = -self.forward;
        Matrix3::from_rows(right.into(), self.up.into(), back.into())
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.eye.into(), self.forward.into(), self.up.into())
    }
}

#[derive(Clone, Debug)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * cgmath::perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// View and projection matrices as the shader sees them (`viewMatrix`, `projectionMatrix`).
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view: Matrix4::identity().into(),
            proj: Matrix4::identity().into(),
        }
    }

    pub fn update(&mut self, camera: &Camera, projection: &Projection) {
        self.view = camera.view_matrix().into();
        self.proj = projection.calc_matrix().into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Discrete keyboard camera control: arrows turn and walk.
#[derive(Clone, Debug)]
pub struct CameraController {
    move_step: f32,
    turn_step: f32,
}

impl CameraController {
    pub fn new(move_step: f32, turn_step: f32) -> Self {
        Self {
            move_step,
            turn_step,
        }
    }

    /// Applies the key to `camera`. Returns `false` for keys it doesn't handle.
    pub fn handle_key(&self, key: KeyCode, camera: &mut Camera) -> bool {
        match key {
            KeyCode::ArrowLeft => camera.rotate_yy(-self.turn_step),
            KeyCode::ArrowRight => camera.rotate_yy(self.turn_step),
            KeyCode::ArrowUp => camera.move_forward(self.move_step),
            KeyCode::ArrowDown => camera.move_forward(-self.move_step),
            _ => return false,
        }
        true
    }
}
