//! The triangle drawn each frame and its transforms.

pub use crate::config::DEPTH_OFFSET;

/// Row-major 4x4 matrix, laid out the way the vertex shader's constant
/// buffer expects it.
pub type Matrix4 = [f32; 16];

/// Vertex layout matching the `POSITION` / `COLOR` input layout.
///
/// The color is a packed `u32`; the backend decides how its bytes map to
/// channels (D3D11 reads them in memory order as R8G8B8A8).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub color: u32,
}

impl Vertex {
    pub const fn new(x: f32, y: f32, z: f32, color: u32) -> Self {
        Self { x, y, z, color }
    }
}

/// Device-space colored triangle.
pub const TRIANGLE: [Vertex; 3] = [
    Vertex::new(-0.5, -0.25, 0.0, 0xFFff0000),
    Vertex::new(0.5, -0.25, 0.0, 0xFF00ff00),
    Vertex::new(0.0, 0.5, 0.0, 0xFF0000ff),
];

pub const IDENTITY: Matrix4 = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// Rotation about the view axis by `angle` radians, pushed back by
/// [`DEPTH_OFFSET`]. View and projection are identity, so this is the whole
/// transform.
pub fn world_matrix(angle: f32) -> Matrix4 {
    let (sin, cos) = angle.sin_cos();
    [
        cos, -sin, 0.0, 0.0, //
        sin, cos, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, DEPTH_OFFSET, 1.0,
    ]
}
