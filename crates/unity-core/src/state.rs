//! Values the script thread hands to the render thread.

use std::ffi::{c_char, c_void, CStr};
use std::path::{Path, PathBuf};
use std::ptr::NonNull;
use std::sync::atomic::{AtomicPtr, AtomicU32, Ordering};
use std::sync::{PoisonError, RwLock};

use anyhow::{bail, Context as _, Result};

/// Native texture pointer obtained from `Texture.GetNativeTexturePtr()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureHandle(NonNull<c_void>);

impl TextureHandle {
    pub fn from_raw(raw: *mut c_void) -> Option<Self> {
        NonNull::new(raw).map(Self)
    }

    pub fn as_ptr(&self) -> *mut c_void {
        self.0.as_ptr()
    }
}

/// Per-process values written by the host's script thread and read on the
/// render thread.
///
/// Time and texture are single-word atomics, so a reader never observes a
/// torn value; a read may be one frame stale. The asset path is set once at
/// startup and lives behind a lock.
#[derive(Debug, Default)]
pub struct SharedFrameState {
    time_bits: AtomicU32,
    texture: AtomicPtr<c_void>,
    asset_path: RwLock<Option<PathBuf>>,
}

impl SharedFrameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_time(&self, time: f32) {
        self.time_bits.store(time.to_bits(), Ordering::Relaxed);
    }

    pub fn time(&self) -> f32 {
        f32::from_bits(self.time_bits.load(Ordering::Relaxed))
    }

    /// Overwrite the texture pointer; null clears it. The pointer is not
    /// validated.
    pub fn set_texture(&self, raw: *mut c_void) {
        self.texture.store(raw, Ordering::Release);
    }

    pub fn clear_texture(&self) {
        self.set_texture(std::ptr::null_mut());
    }

    pub fn texture(&self) -> Option<TextureHandle> {
        TextureHandle::from_raw(self.texture.load(Ordering::Acquire))
    }

    pub fn set_asset_path(&self, path: Option<PathBuf>) {
        *self
            .asset_path
            .write()
            .unwrap_or_else(PoisonError::into_inner) = path;
    }

    pub fn asset_path(&self) -> Option<PathBuf> {
        self.asset_path
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Decode a host-provided, NUL-terminated UTF-8 path. An empty string means
/// "no path".
///
/// # Safety
///
/// `raw` must be null or point to a NUL-terminated string that stays valid
/// for the duration of the call.
pub unsafe fn path_from_c_str(raw: *const c_char) -> Result<Option<PathBuf>> {
    if raw.is_null() {
        bail!("host passed a null path");
    }
    let text = unsafe { CStr::from_ptr(raw) }
        .to_str()
        .context("host path is not valid UTF-8")?;
    if text.is_empty() {
        return Ok(None);
    }
    Ok(Some(Path::new(text).to_path_buf()))
}
