//! Safe views over the interface registry the host passes to the plugin.

use std::ffi::c_void;
use std::ptr::NonNull;

use crate::ffi::*;

/// An interface table that can be looked up in the registry by GUID.
pub trait UnityInterface: 'static {
    const GUID: UnityInterfaceGUID;
}

impl UnityInterface for IUnityGraphics {
    const GUID: UnityInterfaceGUID = IUNITY_GRAPHICS_GUID;
}

impl UnityInterface for IUnityGraphicsD3D11 {
    const GUID: UnityInterfaceGUID = IUNITY_GRAPHICS_D3D11_GUID;
}

/// Handle to the host's interface registry.
#[derive(Debug, Clone, Copy)]
pub struct UnityInterfaces {
    raw: NonNull<IUnityInterfaces>,
}

// SAFETY: The registry is owned by the host and outlives the plugin. Its
// entries are plain function pointers that Unity allows calling from any
// thread.
unsafe impl Send for UnityInterfaces {}
unsafe impl Sync for UnityInterfaces {}

impl UnityInterfaces {
    /// Wrap the pointer received in `UnityPluginLoad`.
    ///
    /// # Safety
    ///
    /// `raw` must be null or point to a registry that stays valid for the
    /// rest of the process.
    pub unsafe fn from_raw(raw: *mut IUnityInterfaces) -> Option<Self> {
        NonNull::new(raw).map(|raw| Self { raw })
    }

    /// Look up an interface table, `None` if the host does not provide it.
    pub fn get<T: UnityInterface>(&self) -> Option<&'static T> {
        let registry = unsafe { self.raw.as_ref() };
        let ptr = if let Some(get_split) = registry.GetInterfaceSplit {
            unsafe { get_split(T::GUID.m_GUIDHigh, T::GUID.m_GUIDLow) }
        } else if let Some(get) = registry.GetInterface {
            unsafe { get(T::GUID) }
        } else {
            return None;
        };
        unsafe { (ptr as *const T).as_ref() }
    }

    /// The graphics interface, used for renderer queries and device events.
    pub fn graphics(&self) -> Option<UnityGraphics> {
        self.get::<IUnityGraphics>().map(|raw| UnityGraphics { raw })
    }

    /// Native `ID3D11Device*` of the running D3D11 renderer, or null.
    pub fn d3d11_device(&self) -> *mut c_void {
        self.get::<IUnityGraphicsD3D11>()
            .and_then(|d3d11| d3d11.GetDevice)
            .map(|get_device| unsafe { get_device() })
            .unwrap_or(std::ptr::null_mut())
    }
}

/// Safe wrapper over `IUnityGraphics`.
#[derive(Clone, Copy)]
pub struct UnityGraphics {
    raw: &'static IUnityGraphics,
}

impl UnityGraphics {
    /// Raw renderer id; reports the null renderer if the entry is missing.
    pub fn renderer(&self) -> i32 {
        match self.raw.GetRenderer {
            Some(get_renderer) => unsafe { get_renderer() },
            None => UnityGfxRenderer::Null as i32,
        }
    }

    /// Returns `false` if the host table has no registration entry.
    pub fn register_device_event_callback(
        &self,
        callback: unsafe extern "system" fn(i32),
    ) -> bool {
        match self.raw.RegisterDeviceEventCallback {
            Some(register) => {
                unsafe { register(Some(callback)) };
                true
            }
            None => false,
        }
    }

    pub fn unregister_device_event_callback(
        &self,
        callback: unsafe extern "system" fn(i32),
    ) -> bool {
        match self.raw.UnregisterDeviceEventCallback {
            Some(unregister) => {
                unsafe { unregister(Some(callback)) };
                true
            }
            None => false,
        }
    }
}
