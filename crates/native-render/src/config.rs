//! Fixed layout of the plugin's assets and GPU allocations.

use std::path::{Path, PathBuf};

/// Directory under the streaming-assets root holding compiled shaders.
pub const SHADER_ROOT: &str = "Shaders";

/// Backend sub-directory for D3D11 bytecode (feature level 9.1 profile).
pub const D3D11_SHADER_DIR: &str = "DX11_9_1";

/// Extension of compiled D3D shader objects.
pub const D3D11_SHADER_EXT: &str = "cso";

pub const VERTEX_SHADER_NAME: &str = "SimpleVertexShader";
pub const PIXEL_SHADER_NAME: &str = "SimplePixelShader";

/// Vertex buffer capacity in bytes; room for far more than one triangle.
pub const VERTEX_BUFFER_SIZE: u32 = 1024;

/// Constant buffer size in bytes: one 4x4 float matrix.
pub const CONSTANT_BUFFER_SIZE: u32 = 64;

/// Depth offset applied by the world transform.
pub const DEPTH_OFFSET: f32 = 0.7;

/// Where a backend finds its compiled shader pair under an asset root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderPaths {
    pub vertex: PathBuf,
    pub pixel: PathBuf,
}

impl ShaderPaths {
    /// `<root>/Shaders/<dir>/SimpleVertexShader.<ext>` and its pixel twin.
    pub fn new(root: &Path, dir: &str, ext: &str) -> Self {
        let base = root.join(SHADER_ROOT).join(dir);
        Self {
            vertex: base.join(VERTEX_SHADER_NAME).with_extension(ext),
            pixel: base.join(PIXEL_SHADER_NAME).with_extension(ext),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn d3d11_paths_follow_asset_layout() {
        let paths = ShaderPaths::new(Path::new("assets"), D3D11_SHADER_DIR, D3D11_SHADER_EXT);
        assert_eq!(
            paths.vertex,
            Path::new("assets/Shaders/DX11_9_1/SimpleVertexShader.cso")
        );
        assert_eq!(
            paths.pixel,
            Path::new("assets/Shaders/DX11_9_1/SimplePixelShader.cso")
        );
    }
}
