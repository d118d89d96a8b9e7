//! Borrowed D3D11 device and creation of the plugin's objects on it.

use std::ffi::c_void;

use anyhow::{anyhow, Result};
use tracing::{debug, error};
use unity_core::TextureHandle;
use windows::core::{Interface, PCSTR};
use windows::Win32::Graphics::Direct3D11::*;
use windows::Win32::Graphics::Dxgi::Common::*;

use crate::backend::{BackendKind, GpuDevice};
use crate::config::{D3D11_SHADER_DIR, D3D11_SHADER_EXT};
use crate::geometry::{Matrix4, Vertex};
use crate::pipeline::{
    BlendDesc, BufferDesc, BufferUsage, CompareFunc, CullMode, DepthStencilDesc, FillMode,
    InputElement, RasterizerDesc, VertexFormat,
};
use crate::resources::GpuResourceSet;

/// The host's D3D11 device with its immediate context.
///
/// Holding the interfaces keeps a reference on them; dropping releases it.
pub struct Dx11Device {
    pub(super) device: ID3D11Device,
    pub(super) context: ID3D11DeviceContext,
}

// Only touched from the host's render thread.
unsafe impl Send for Dx11Device {}

impl Dx11Device {
    /// Wrap the raw `ID3D11Device*` handed out by the host.
    ///
    /// Returns `None` for a null pointer or when the immediate context cannot
    /// be obtained.
    ///
    /// # Safety
    ///
    /// `raw` must be null or a live `ID3D11Device`.
    pub unsafe fn from_raw(raw: *mut c_void) -> Option<Self> {
        let device = unsafe { ID3D11Device::from_raw_borrowed(&raw) }?.clone();
        let context = match unsafe { device.GetImmediateContext() } {
            Ok(context) => context,
            Err(e) => {
                error!("Failed to get D3D11 immediate context: {e}");
                return None;
            }
        };
        debug!(
            "Using host D3D11 device at feature level {:#x}",
            unsafe { device.GetFeatureLevel() }.0
        );
        Some(Self { device, context })
    }
}

fn buffer_desc(desc: &BufferDesc) -> D3D11_BUFFER_DESC {
    let bind = match desc.usage {
        BufferUsage::Vertex => D3D11_BIND_VERTEX_BUFFER,
        BufferUsage::Constant => D3D11_BIND_CONSTANT_BUFFER,
    };
    D3D11_BUFFER_DESC {
        ByteWidth: desc.size,
        Usage: D3D11_USAGE_DEFAULT,
        BindFlags: bind.0 as u32,
        ..Default::default()
    }
}

fn input_element_desc(element: &InputElement) -> D3D11_INPUT_ELEMENT_DESC {
    let format = match element.format {
        VertexFormat::Float3 => DXGI_FORMAT_R32G32B32_FLOAT,
        VertexFormat::Unorm8x4 => DXGI_FORMAT_R8G8B8A8_UNORM,
    };
    D3D11_INPUT_ELEMENT_DESC {
        SemanticName: PCSTR(element.semantic.as_ptr().cast()),
        SemanticIndex: 0,
        Format: format,
        InputSlot: 0,
        AlignedByteOffset: element.offset,
        InputSlotClass: D3D11_INPUT_PER_VERTEX_DATA,
        InstanceDataStepRate: 0,
    }
}

fn rasterizer_desc(desc: &RasterizerDesc) -> D3D11_RASTERIZER_DESC {
    D3D11_RASTERIZER_DESC {
        FillMode: match desc.fill {
            FillMode::Solid => D3D11_FILL_SOLID,
        },
        CullMode: match desc.cull {
            CullMode::None => D3D11_CULL_NONE,
        },
        DepthClipEnable: desc.depth_clip.into(),
        ..Default::default()
    }
}

fn depth_stencil_desc(desc: &DepthStencilDesc) -> D3D11_DEPTH_STENCIL_DESC {
    D3D11_DEPTH_STENCIL_DESC {
        DepthEnable: desc.depth_test.into(),
        DepthWriteMask: if desc.depth_write {
            D3D11_DEPTH_WRITE_MASK_ALL
        } else {
            D3D11_DEPTH_WRITE_MASK_ZERO
        },
        DepthFunc: match desc.compare {
            CompareFunc::LessEqual => D3D11_COMPARISON_LESS_EQUAL,
        },
        StencilEnable: false.into(),
        ..Default::default()
    }
}

fn blend_desc(desc: &BlendDesc) -> D3D11_BLEND_DESC {
    let mut out = D3D11_BLEND_DESC::default();
    out.RenderTarget[0].BlendEnable = desc.enabled.into();
    out.RenderTarget[0].RenderTargetWriteMask = desc.write_mask;
    out
}

impl GpuDevice for Dx11Device {
    const SHADER_DIR: &'static str = D3D11_SHADER_DIR;
    const SHADER_EXT: &'static str = D3D11_SHADER_EXT;

    type Buffer = ID3D11Buffer;
    type VertexShader = ID3D11VertexShader;
    type PixelShader = ID3D11PixelShader;
    type InputLayout = ID3D11InputLayout;
    type RasterizerState = ID3D11RasterizerState;
    type DepthStencilState = ID3D11DepthStencilState;
    type BlendState = ID3D11BlendState;

    fn supports(kind: BackendKind) -> bool {
        kind == BackendKind::Direct3D11
    }

    fn create_buffer(&self, desc: &BufferDesc) -> Result<ID3D11Buffer> {
        let mut buffer = None;
        unsafe {
            self.device
                .CreateBuffer(&buffer_desc(desc), None, Some(&mut buffer as *mut _))
        }
        .map_err(|e| anyhow!("Failed to create D3D11 {:?} buffer: {e}", desc.usage))?;
        buffer.ok_or_else(|| anyhow!("D3D11 CreateBuffer returned null"))
    }

    fn create_vertex_shader(&self, bytecode: &[u8]) -> Result<ID3D11VertexShader> {
        let mut vs = None;
        unsafe {
            self.device
                .CreateVertexShader(bytecode, None, Some(&mut vs as *mut _))
        }
        .map_err(|e| anyhow!("Failed to create D3D11 vertex shader: {e}"))?;
        vs.ok_or_else(|| anyhow!("D3D11 CreateVertexShader returned null"))
    }

    fn create_pixel_shader(&self, bytecode: &[u8]) -> Result<ID3D11PixelShader> {
        let mut ps = None;
        unsafe {
            self.device
                .CreatePixelShader(bytecode, None, Some(&mut ps as *mut _))
        }
        .map_err(|e| anyhow!("Failed to create D3D11 pixel shader: {e}"))?;
        ps.ok_or_else(|| anyhow!("D3D11 CreatePixelShader returned null"))
    }

    fn create_input_layout(
        &self,
        elements: &[InputElement],
        vs_bytecode: &[u8],
    ) -> Result<ID3D11InputLayout> {
        let descs: Vec<_> = elements.iter().map(input_element_desc).collect();
        let mut layout = None;
        unsafe {
            self.device
                .CreateInputLayout(&descs, vs_bytecode, Some(&mut layout as *mut _))
        }
        .map_err(|e| anyhow!("Failed to create D3D11 input layout: {e}"))?;
        layout.ok_or_else(|| anyhow!("D3D11 CreateInputLayout returned null"))
    }

    fn create_rasterizer_state(&self, desc: &RasterizerDesc) -> Result<ID3D11RasterizerState> {
        let mut state = None;
        unsafe {
            self.device
                .CreateRasterizerState(&rasterizer_desc(desc), Some(&mut state as *mut _))
        }
        .map_err(|e| anyhow!("Failed to create D3D11 rasterizer state: {e}"))?;
        state.ok_or_else(|| anyhow!("D3D11 CreateRasterizerState returned null"))
    }

    fn create_depth_stencil_state(
        &self,
        desc: &DepthStencilDesc,
    ) -> Result<ID3D11DepthStencilState> {
        let mut state = None;
        unsafe {
            self.device
                .CreateDepthStencilState(&depth_stencil_desc(desc), Some(&mut state as *mut _))
        }
        .map_err(|e| anyhow!("Failed to create D3D11 depth-stencil state: {e}"))?;
        state.ok_or_else(|| anyhow!("D3D11 CreateDepthStencilState returned null"))
    }

    fn create_blend_state(&self, desc: &BlendDesc) -> Result<ID3D11BlendState> {
        let mut state = None;
        unsafe {
            self.device
                .CreateBlendState(&blend_desc(desc), Some(&mut state as *mut _))
        }
        .map_err(|e| anyhow!("Failed to create D3D11 blend state: {e}"))?;
        state.ok_or_else(|| anyhow!("D3D11 CreateBlendState returned null"))
    }

    fn set_default_state(&self, resources: &GpuResourceSet<Self>) {
        self.bind_fixed_state(resources);
    }

    fn draw_triangle(
        &self,
        resources: &GpuResourceSet<Self>,
        world: &Matrix4,
        vertices: &[Vertex; 3],
    ) {
        self.draw(resources, world, vertices);
    }

    fn texture_size(&self, texture: TextureHandle) -> Option<(u32, u32)> {
        let desc = self.texture_desc(texture)?;
        Some((desc.Width, desc.Height))
    }

    fn upload_texture(&self, texture: TextureHandle, pixels: &[u8], row_pitch: u32) {
        self.update_texture(texture, pixels, row_pitch);
    }
}
