//! Lazily created GPU objects tied to one device lifetime.

use std::path::Path;

use anyhow::{Context as _, Result};
use tracing::{debug, error, warn};

use crate::backend::GpuDevice;
use crate::config::ShaderPaths;
use crate::pipeline::{
    CONSTANT_BUFFER, DEFAULT_BLEND, DEFAULT_DEPTH_STENCIL, DEFAULT_RASTERIZER, VERTEX_BUFFER,
    VERTEX_LAYOUT,
};
use crate::shader::load_shader_blob;

/// Every object the plugin draws with. Members are created independently, so
/// any of them may be missing.
pub struct GpuResourceSet<D: GpuDevice> {
    pub vertex_buffer: Option<D::Buffer>,
    pub constant_buffer: Option<D::Buffer>,
    pub vertex_shader: Option<D::VertexShader>,
    pub pixel_shader: Option<D::PixelShader>,
    pub input_layout: Option<D::InputLayout>,
    pub rasterizer_state: Option<D::RasterizerState>,
    pub depth_stencil_state: Option<D::DepthStencilState>,
    pub blend_state: Option<D::BlendState>,
}

impl<D: GpuDevice> Default for GpuResourceSet<D> {
    fn default() -> Self {
        Self {
            vertex_buffer: None,
            constant_buffer: None,
            vertex_shader: None,
            pixel_shader: None,
            input_layout: None,
            rasterizer_state: None,
            depth_stencil_state: None,
            blend_state: None,
        }
    }
}

impl<D: GpuDevice> GpuResourceSet<D> {
    /// Both shaders exist. Buffers and states alone never make the set ready.
    pub fn is_ready(&self) -> bool {
        self.vertex_shader.is_some() && self.pixel_shader.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_buffer.is_none()
            && self.constant_buffer.is_none()
            && self.vertex_shader.is_none()
            && self.pixel_shader.is_none()
            && self.input_layout.is_none()
            && self.rasterizer_state.is_none()
            && self.depth_stencil_state.is_none()
            && self.blend_state.is_none()
    }
}

/// Owns the [`GpuResourceSet`] and creates it on demand.
pub struct ResourceManager<D: GpuDevice> {
    set: GpuResourceSet<D>,
}

impl<D: GpuDevice> Default for ResourceManager<D> {
    fn default() -> Self {
        Self {
            set: GpuResourceSet::default(),
        }
    }
}

impl<D: GpuDevice> ResourceManager<D> {
    pub fn resources(&self) -> &GpuResourceSet<D> {
        &self.set
    }

    pub fn is_ready(&self) -> bool {
        self.set.is_ready()
    }

    /// Create whatever is missing. Returns `true` once both shaders exist.
    ///
    /// Without an asset path nothing is touched. Failures are logged and the
    /// next call retries from where this one stopped.
    pub fn ensure_created(&mut self, device: &D, asset_path: Option<&Path>) -> bool {
        if self.set.vertex_shader.is_some() {
            return true;
        }
        let Some(root) = asset_path else {
            return false;
        };

        self.create_fixed_objects(device);

        let paths = ShaderPaths::new(root, D::SHADER_DIR, D::SHADER_EXT);
        let (vs_bytes, ps_bytes) =
            match (load_shader_blob(&paths.vertex), load_shader_blob(&paths.pixel)) {
                (Ok(vs), Ok(ps)) => (vs, ps),
                (Err(e), _) | (_, Err(e)) => {
                    warn!("{e:#}");
                    return false;
                }
            };

        match Self::create_shaders(device, &vs_bytes, &ps_bytes) {
            Ok((vs, ps)) => {
                self.set.vertex_shader = Some(vs);
                self.set.pixel_shader = Some(ps);
            }
            Err(e) => {
                error!("{e:#}");
                return false;
            }
        }

        if self.set.input_layout.is_none() {
            match device.create_input_layout(&VERTEX_LAYOUT, &vs_bytes) {
                Ok(layout) => self.set.input_layout = Some(layout),
                Err(e) => error!("Failed to create input layout: {e:#}"),
            }
        }

        debug!("GPU resources created from {}", root.display());
        true
    }

    /// Drop every owned object. Safe to call when nothing exists.
    pub fn release_all(&mut self) {
        self.set = GpuResourceSet::default();
    }

    fn create_fixed_objects(&mut self, device: &D) {
        fill(&mut self.set.vertex_buffer, "vertex buffer", || {
            device.create_buffer(&VERTEX_BUFFER)
        });
        fill(&mut self.set.constant_buffer, "constant buffer", || {
            device.create_buffer(&CONSTANT_BUFFER)
        });
        fill(&mut self.set.rasterizer_state, "rasterizer state", || {
            device.create_rasterizer_state(&DEFAULT_RASTERIZER)
        });
        fill(&mut self.set.depth_stencil_state, "depth-stencil state", || {
            device.create_depth_stencil_state(&DEFAULT_DEPTH_STENCIL)
        });
        fill(&mut self.set.blend_state, "blend state", || {
            device.create_blend_state(&DEFAULT_BLEND)
        });
    }

    /// Both or neither: a pixel shader alone is dropped here.
    fn create_shaders(
        device: &D,
        vs_bytes: &[u8],
        ps_bytes: &[u8],
    ) -> Result<(D::VertexShader, D::PixelShader)> {
        let vs = device
            .create_vertex_shader(vs_bytes)
            .context("Failed to create vertex shader")?;
        let ps = device
            .create_pixel_shader(ps_bytes)
            .context("Failed to create pixel shader")?;
        Ok((vs, ps))
    }
}

fn fill<T>(slot: &mut Option<T>, what: &str, create: impl FnOnce() -> Result<T>) {
    if slot.is_some() {
        return;
    }
    match create() {
        Ok(obj) => *slot = Some(obj),
        Err(e) => error!("Failed to create {what}: {e:#}"),
    }
}
