//! Minimal 3D linear algebra used by the camera and the level loader.
//!
//! - [`Vector3`] is a plain three component `f32` vector
//! - [`Matrix3`] is a row-major 3x3 matrix with named components `a00..a22`
//!
//! Besides the operator impls, every product has a variant that writes into a
//! caller supplied output and returns it, so hot paths can reuse storage.
//! The 4x4 view/projection matrices are built with `cgmath` in [`crate::camera`].

pub mod matrix;
pub mod vector;

pub use matrix::{
    Matrix3, add, add_into, invert, mult_matrix_vector, mult_vector_matrix, multiply, transpose,
    transpose_into,
};
pub use vector::Vector3;
