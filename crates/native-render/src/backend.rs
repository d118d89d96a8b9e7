//! The seam between the platform-neutral plugin logic and a native graphics
//! API.
//!
//! [`GpuDevice`] is implemented by [`Dx11Device`](crate::dx11::Dx11Device) on
//! Windows and by [`NullDevice`](crate::null::NullDevice) everywhere else.
//! The host picks the variant at runtime through its renderer query; a
//! renderer the compiled backend does not support leaves the plugin in a
//! no-op state.

use anyhow::Result;
use unity_core::{TextureHandle, UnityGfxRenderer};

use crate::geometry::{Matrix4, Vertex};
use crate::pipeline::{BlendDesc, BufferDesc, DepthStencilDesc, InputElement, RasterizerDesc};
use crate::resources::GpuResourceSet;

/// Graphics API the host is running, as far as this plugin cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// No device (before Initialize, after Shutdown, or the null renderer).
    #[default]
    None,
    Direct3D11,
    /// Any other renderer, by raw host id.
    Unsupported(i32),
}

impl BackendKind {
    pub fn from_renderer(raw: i32) -> Self {
        match UnityGfxRenderer::from_raw(raw) {
            Some(UnityGfxRenderer::D3D11) => Self::Direct3D11,
            Some(UnityGfxRenderer::Null) => Self::None,
            _ => Self::Unsupported(raw),
        }
    }
}

/// A native device able to create the plugin's GPU objects and record its
/// draw commands on the immediate context.
///
/// Objects are released by dropping them.
pub trait GpuDevice: Sized {
    /// Sub-directory of `Shaders/` holding this backend's bytecode.
    const SHADER_DIR: &'static str;
    /// File extension of this backend's compiled shaders.
    const SHADER_EXT: &'static str;

    type Buffer;
    type VertexShader;
    type PixelShader;
    type InputLayout;
    type RasterizerState;
    type DepthStencilState;
    type BlendState;

    /// Whether this backend can drive the given host renderer.
    fn supports(kind: BackendKind) -> bool;

    fn create_buffer(&self, desc: &BufferDesc) -> Result<Self::Buffer>;
    fn create_vertex_shader(&self, bytecode: &[u8]) -> Result<Self::VertexShader>;
    fn create_pixel_shader(&self, bytecode: &[u8]) -> Result<Self::PixelShader>;
    fn create_input_layout(
        &self,
        elements: &[InputElement],
        vs_bytecode: &[u8],
    ) -> Result<Self::InputLayout>;
    fn create_rasterizer_state(&self, desc: &RasterizerDesc) -> Result<Self::RasterizerState>;
    fn create_depth_stencil_state(
        &self,
        desc: &DepthStencilDesc,
    ) -> Result<Self::DepthStencilState>;
    fn create_blend_state(&self, desc: &BlendDesc) -> Result<Self::BlendState>;

    /// Bind depth-stencil, rasterizer and blend state. Missing objects bind
    /// the API default.
    fn set_default_state(&self, resources: &GpuResourceSet<Self>);

    /// Upload `world` and `vertices`, bind the pipeline and draw one
    /// triangle list of three vertices.
    fn draw_triangle(
        &self,
        resources: &GpuResourceSet<Self>,
        world: &Matrix4,
        vertices: &[Vertex; 3],
    );

    /// Width and height of an external texture.
    fn texture_size(&self, texture: TextureHandle) -> Option<(u32, u32)>;

    /// Replace the full contents of an external RGBA8 texture.
    fn upload_texture(&self, texture: TextureHandle, pixels: &[u8], row_pitch: u32);
}
