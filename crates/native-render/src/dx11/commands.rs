//! Immediate-context commands for one frame.

use tracing::warn;
use unity_core::TextureHandle;
use windows::core::Interface;
use windows::Win32::Graphics::Direct3D::D3D_PRIMITIVE_TOPOLOGY_TRIANGLELIST;
use windows::Win32::Graphics::Direct3D11::*;

use super::Dx11Device;
use crate::bytes::AsBytes;
use crate::geometry::{Matrix4, Vertex};
use crate::resources::GpuResourceSet;

impl Dx11Device {
    pub(super) fn bind_fixed_state(&self, resources: &GpuResourceSet<Self>) {
        unsafe {
            self.context
                .OMSetDepthStencilState(resources.depth_stencil_state.as_ref(), 0);
            self.context.RSSetState(resources.rasterizer_state.as_ref());
            self.context
                .OMSetBlendState(resources.blend_state.as_ref(), None, 0xFFFF_FFFF);
        }
    }

    pub(super) fn draw(
        &self,
        resources: &GpuResourceSet<Self>,
        world: &Matrix4,
        vertices: &[Vertex; 3],
    ) {
        let ctx = &self.context;
        let stride = std::mem::size_of::<Vertex>() as u32;
        let offset = 0u32;

        unsafe {
            // Transform
            if let Some(cb) = &resources.constant_buffer {
                ctx.UpdateSubresource(cb, 0, None, world.as_bytes().as_ptr().cast(), 0, 0);
            }
            ctx.VSSetConstantBuffers(0, Some(&[resources.constant_buffer.clone()]));

            // Shaders
            ctx.VSSetShader(resources.vertex_shader.as_ref(), None);
            ctx.PSSetShader(resources.pixel_shader.as_ref(), None);

            // Input assembler
            if let Some(vb) = &resources.vertex_buffer {
                ctx.UpdateSubresource(vb, 0, None, vertices.as_bytes().as_ptr().cast(), 0, 0);
            }
            ctx.IASetInputLayout(resources.input_layout.as_ref());
            ctx.IASetPrimitiveTopology(D3D_PRIMITIVE_TOPOLOGY_TRIANGLELIST);
            ctx.IASetVertexBuffers(
                0,
                1,
                Some(&resources.vertex_buffer.clone()),
                Some(&stride),
                Some(&offset),
            );

            ctx.Draw(vertices.len() as u32, 0);
        }
    }

    pub(super) fn texture_desc(&self, texture: TextureHandle) -> Option<D3D11_TEXTURE2D_DESC> {
        let raw = texture.as_ptr();
        let tex = unsafe { ID3D11Texture2D::from_raw_borrowed(&raw) }?;
        let mut desc = D3D11_TEXTURE2D_DESC::default();
        unsafe { tex.GetDesc(&mut desc) };
        Some(desc)
    }

    pub(super) fn update_texture(&self, texture: TextureHandle, pixels: &[u8], row_pitch: u32) {
        let raw = texture.as_ptr();
        let Some(tex) = (unsafe { ID3D11Texture2D::from_raw_borrowed(&raw) }) else {
            return;
        };
        let mut desc = D3D11_TEXTURE2D_DESC::default();
        unsafe { tex.GetDesc(&mut desc) };
        if pixels.len() < row_pitch as usize * desc.Height as usize {
            warn!(
                "Texture upload of {} bytes does not cover {}x{}",
                pixels.len(),
                desc.Width,
                desc.Height
            );
            return;
        }
        unsafe {
            self.context
                .UpdateSubresource(tex, 0, None, pixels.as_ptr().cast(), row_pitch, 0);
        }
    }
}
