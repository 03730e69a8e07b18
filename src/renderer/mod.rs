//! WebGPU rendering module
//!
//! CPU-projected point cloud: the particle buffers are projected through an
//! orbiting camera each frame and written into one vertex buffer.

pub mod pipeline;
pub mod vertex;

pub use pipeline::RenderState;
