//! Backend for targets without a native graphics API binding.
//!
//! It supports no host renderer, so a [`RenderingContext`] built on it never
//! holds a device and every event is a no-op.
//!
//! [`RenderingContext`]: crate::context::RenderingContext

use std::convert::Infallible;

use anyhow::{bail, Result};
use unity_core::TextureHandle;

use crate::backend::{BackendKind, GpuDevice};
use crate::geometry::{Matrix4, Vertex};
use crate::pipeline::{BlendDesc, BufferDesc, DepthStencilDesc, InputElement, RasterizerDesc};
use crate::resources::GpuResourceSet;

#[derive(Debug)]
pub struct NullDevice;

impl GpuDevice for NullDevice {
    const SHADER_DIR: &'static str = "";
    const SHADER_EXT: &'static str = "";

    type Buffer = Infallible;
    type VertexShader = Infallible;
    type PixelShader = Infallible;
    type InputLayout = Infallible;
    type RasterizerState = Infallible;
    type DepthStencilState = Infallible;
    type BlendState = Infallible;

    fn supports(_kind: BackendKind) -> bool {
        false
    }

    fn create_buffer(&self, _desc: &BufferDesc) -> Result<Infallible> {
        bail!("no graphics backend")
    }

    fn create_vertex_shader(&self, _bytecode: &[u8]) -> Result<Infallible> {
        bail!("no graphics backend")
    }

    fn create_pixel_shader(&self, _bytecode: &[u8]) -> Result<Infallible> {
        bail!("no graphics backend")
    }

    fn create_input_layout(
        &self,
        _elements: &[InputElement],
        _vs_bytecode: &[u8],
    ) -> Result<Infallible> {
        bail!("no graphics backend")
    }

    fn create_rasterizer_state(&self, _desc: &RasterizerDesc) -> Result<Infallible> {
        bail!("no graphics backend")
    }

    fn create_depth_stencil_state(&self, _desc: &DepthStencilDesc) -> Result<Infallible> {
        bail!("no graphics backend")
    }

    fn create_blend_state(&self, _desc: &BlendDesc) -> Result<Infallible> {
        bail!("no graphics backend")
    }

    fn set_default_state(&self, _resources: &GpuResourceSet<Self>) {}

    fn draw_triangle(
        &self,
        _resources: &GpuResourceSet<Self>,
        _world: &Matrix4,
        _vertices: &[Vertex; 3],
    ) {
    }

    fn texture_size(&self, _texture: TextureHandle) -> Option<(u32, u32)> {
        None
    }

    fn upload_texture(&self, _texture: TextureHandle, _pixels: &[u8], _row_pitch: u32) {}
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use unity_core::UnityGfxDeviceEventType;

    use super::*;
    use crate::context::{DeviceState, RenderingContext};
    use crate::lifecycle::GraphicsHost;

    struct D3D11Host;

    impl GraphicsHost<NullDevice> for D3D11Host {
        fn renderer(&self) -> BackendKind {
            BackendKind::Direct3D11
        }

        fn acquire_device(&self) -> Option<NullDevice> {
            Some(NullDevice)
        }
    }

    #[test]
    fn null_backend_never_holds_a_device() {
        let mut ctx = RenderingContext::<NullDevice>::new(Arc::default());
        ctx.on_device_event(&D3D11Host, UnityGfxDeviceEventType::Initialize);
        assert_eq!(ctx.backend(), BackendKind::Direct3D11);
        assert_eq!(ctx.state(), DeviceState::Uninitialized);

        ctx.on_render_event(1);
        ctx.on_device_event(&D3D11Host, UnityGfxDeviceEventType::Shutdown);
        assert_eq!(ctx.backend(), BackendKind::None);
    }
}
