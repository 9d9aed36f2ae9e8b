//! Transform math for the orientation scene.
//!
//! Plain `f32` arrays with the same memory layout the GPU consumes. See
//! [`matrix`] for the column-major convention every builder follows.

pub mod matrix;
pub mod vector;

pub use matrix::Matrix4;
pub use vector::{cross, dot, normalize, normalized, sub, Vector3};
