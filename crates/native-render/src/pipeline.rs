//! Backend-neutral descriptions of the buffers, vertex layout and fixed
//! render states the plugin creates.
//!
//! Backends translate these into their native descriptor structs.

use std::ffi::CStr;

use crate::config::{CONSTANT_BUFFER_SIZE, VERTEX_BUFFER_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    Vertex,
    Constant,
}

/// A GPU-only buffer updated from the CPU with subresource copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferDesc {
    pub size: u32,
    pub usage: BufferUsage,
}

pub const VERTEX_BUFFER: BufferDesc = BufferDesc {
    size: VERTEX_BUFFER_SIZE,
    usage: BufferUsage::Vertex,
};

pub const CONSTANT_BUFFER: BufferDesc = BufferDesc {
    size: CONSTANT_BUFFER_SIZE,
    usage: BufferUsage::Constant,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexFormat {
    /// Three 32-bit floats.
    Float3,
    /// Four normalized bytes.
    Unorm8x4,
}

/// One per-vertex attribute of the input layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputElement {
    pub semantic: &'static CStr,
    pub format: VertexFormat,
    pub offset: u32,
}

/// Layout of [`Vertex`](crate::geometry::Vertex).
pub const VERTEX_LAYOUT: [InputElement; 2] = [
    InputElement {
        semantic: c"POSITION",
        format: VertexFormat::Float3,
        offset: 0,
    },
    InputElement {
        semantic: c"COLOR",
        format: VertexFormat::Unorm8x4,
        offset: 12,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    Solid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterizerDesc {
    pub fill: FillMode,
    pub cull: CullMode,
    pub depth_clip: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareFunc {
    LessEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthStencilDesc {
    pub depth_test: bool,
    pub depth_write: bool,
    pub compare: CompareFunc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendDesc {
    pub enabled: bool,
    /// RGBA write mask, one bit per channel.
    pub write_mask: u8,
}

/// Whatever the host rendered before us, draw with culling off and solid
/// fill.
pub const DEFAULT_RASTERIZER: RasterizerDesc = RasterizerDesc {
    fill: FillMode::Solid,
    cull: CullMode::None,
    depth_clip: true,
};

/// Depth-tested against the host's depth buffer, never written.
pub const DEFAULT_DEPTH_STENCIL: DepthStencilDesc = DepthStencilDesc {
    depth_test: true,
    depth_write: false,
    compare: CompareFunc::LessEqual,
};

pub const DEFAULT_BLEND: BlendDesc = BlendDesc {
    enabled: false,
    write_mask: 0xF,
};
