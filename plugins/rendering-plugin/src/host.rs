//! The running Unity instance, as seen by the rendering core.

use native_render::{BackendKind, GraphicsHost};
use unity_core::{UnityGraphics, UnityInterfaces};

use crate::Backend;

/// Interfaces captured in `UnityPluginLoad`. Before that (and for a host
/// without `IUnityGraphics`) it reports no renderer and no device.
#[derive(Default, Clone, Copy)]
pub struct UnityHost {
    interfaces: Option<UnityInterfaces>,
    graphics: Option<UnityGraphics>,
}

impl UnityHost {
    pub fn new(interfaces: UnityInterfaces, graphics: UnityGraphics) -> Self {
        Self {
            interfaces: Some(interfaces),
            graphics: Some(graphics),
        }
    }

    pub fn graphics(&self) -> Option<UnityGraphics> {
        self.graphics
    }
}

impl GraphicsHost<Backend> for UnityHost {
    fn renderer(&self) -> BackendKind {
        self.graphics
            .map(|graphics| BackendKind::from_renderer(graphics.renderer()))
            .unwrap_or_default()
    }

    #[cfg(target_os = "windows")]
    fn acquire_device(&self) -> Option<Backend> {
        let raw = self.interfaces?.d3d11_device();
        unsafe { Backend::from_raw(raw) }
    }

    #[cfg(not(target_os = "windows"))]
    fn acquire_device(&self) -> Option<Backend> {
        self.interfaces.map(|_| native_render::null::NullDevice)
    }
}
