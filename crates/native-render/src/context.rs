//! Render-thread state: the active backend, its device and the GPU objects
//! created on it.
//!
//! One [`RenderingContext`] exists per process. Device events and render
//! events both take it by `&mut`, so they are serialized by whoever owns it.

use std::sync::Arc;

use unity_core::SharedFrameState;

use crate::backend::{BackendKind, GpuDevice};
use crate::resources::ResourceManager;

/// Where the device lifecycle currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    Uninitialized,
    Ready,
}

pub struct RenderingContext<D: GpuDevice> {
    pub(crate) shared: Arc<SharedFrameState>,
    pub(crate) backend: BackendKind,
    // Declared before `device`: resources drop first.
    pub(crate) resources: ResourceManager<D>,
    pub(crate) device: Option<D>,
    /// Plasma staging buffer, reused across frames.
    pub(crate) texture_scratch: Vec<u8>,
}

impl<D: GpuDevice> RenderingContext<D> {
    pub fn new(shared: Arc<SharedFrameState>) -> Self {
        Self {
            shared,
            backend: BackendKind::None,
            resources: ResourceManager::default(),
            device: None,
            texture_scratch: Vec::new(),
        }
    }

    pub fn shared(&self) -> &Arc<SharedFrameState> {
        &self.shared
    }

    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    pub fn device(&self) -> Option<&D> {
        self.device.as_ref()
    }

    pub fn resources(&self) -> &ResourceManager<D> {
        &self.resources
    }

    pub fn state(&self) -> DeviceState {
        if self.device.is_some() {
            DeviceState::Ready
        } else {
            DeviceState::Uninitialized
        }
    }

    /// Create missing GPU objects on the held device, if any.
    pub fn ensure_resources(&mut self) -> bool {
        let Some(device) = self.device.as_ref() else {
            return false;
        };
        let asset_path = self.shared.asset_path();
        self.resources.ensure_created(device, asset_path.as_deref())
    }

    /// Drop GPU objects, then the device.
    pub(crate) fn release_device(&mut self) {
        self.resources.release_all();
        self.device = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{write_shaders, MockDevice, Recorder};

    #[test]
    fn fresh_context_is_uninitialized() {
        let ctx = RenderingContext::<MockDevice>::new(Arc::default());
        assert_eq!(ctx.backend(), BackendKind::None);
        assert_eq!(ctx.state(), DeviceState::Uninitialized);
        assert!(ctx.device().is_none());
    }

    #[test]
    fn ensure_resources_reads_shared_asset_path() {
        let dir = tempfile::tempdir().unwrap();
        write_shaders(dir.path());
        let recorder = Recorder::new();
        let mut ctx = RenderingContext::<MockDevice>::new(Arc::default());
        ctx.device = Some(MockDevice::new(&recorder));

        assert!(!ctx.ensure_resources());
        ctx.shared().set_asset_path(Some(dir.path().to_path_buf()));
        assert!(ctx.ensure_resources());
    }

    #[test]
    fn dropping_context_releases_resources_before_device() {
        let dir = tempfile::tempdir().unwrap();
        write_shaders(dir.path());
        let recorder = Recorder::new();
        {
            let shared = Arc::new(SharedFrameState::default());
            shared.set_asset_path(Some(dir.path().to_path_buf()));
            let mut ctx = RenderingContext::<MockDevice>::new(shared);
            ctx.device = Some(MockDevice::new(&recorder));
            assert!(ctx.ensure_resources());
        }
        assert_eq!(recorder.live_devices(), 0);
        assert_eq!(recorder.released(), recorder.created());
    }
}
