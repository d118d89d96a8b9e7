//! Loading of precompiled shader bytecode from the streaming-assets folder.

use std::path::Path;

use anyhow::{bail, Context as _, Result};

/// Read a compiled shader blob fully into memory. Empty files are rejected.
pub fn load_shader_blob(path: &Path) -> Result<Vec<u8>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to find {}", path.display()))?;
    if bytes.is_empty() {
        bail!("Shader file {} is empty", path.display());
    }
    Ok(bytes)
}
