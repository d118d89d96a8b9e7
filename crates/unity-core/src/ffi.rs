//! Hardcoded Unity native plugin ABI: interface GUIDs, C-repr interface
//! tables and the enums they exchange.
//!
//! Layouts follow the Unity plugin API headers (IUnityInterface.h,
//! IUnityGraphics.h, IUnityGraphicsD3D11.h). `UNITY_INTERFACE_API` is
//! `__stdcall` on 32-bit Windows and the C convention everywhere else, which
//! is exactly what `extern "system"` selects.

#![allow(non_snake_case)]
#![allow(non_camel_case_types)]

use std::ffi::{c_char, c_void};

use num_derive::FromPrimitive;
use num_traits::FromPrimitive as _;

// =====================================================================
// Interface GUIDs
// =====================================================================

/// 128-bit interface identifier, split the way the registry expects it.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct UnityInterfaceGUID {
    pub m_GUIDHigh: u64,
    pub m_GUIDLow: u64,
}

impl UnityInterfaceGUID {
    pub const fn new(high: u64, low: u64) -> Self {
        Self {
            m_GUIDHigh: high,
            m_GUIDLow: low,
        }
    }
}

pub const IUNITY_GRAPHICS_GUID: UnityInterfaceGUID =
    UnityInterfaceGUID::new(0x7CBA0A9CA4DDB544, 0x8C5AD4926EB17B11);

pub const IUNITY_GRAPHICS_D3D11_GUID: UnityInterfaceGUID =
    UnityInterfaceGUID::new(0xAAB37EF87A87D748, 0xBF76967F07EFB177);

// =====================================================================
// Enums
// =====================================================================

/// Renderer reported by `IUnityGraphics::GetRenderer`.
///
/// Values that Unity has retired (D3D9, GLES2, ...) are left out; they decode
/// to `None` and are treated as unsupported.
#[repr(i32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, FromPrimitive)]
pub enum UnityGfxRenderer {
    D3D11 = 2,
    Null = 4,
    OpenGLES30 = 11,
    PS4 = 13,
    XboxOne = 14,
    Metal = 16,
    OpenGLCore = 17,
    D3D12 = 18,
    Vulkan = 21,
    Nvn = 22,
    XboxOneD3D12 = 23,
    GameCoreXboxOne = 24,
    GameCoreXboxSeries = 25,
    PS5 = 26,
    PS5NGGC = 27,
}

impl UnityGfxRenderer {
    pub fn from_raw(raw: i32) -> Option<Self> {
        Self::from_i32(raw)
    }
}

/// Device lifecycle events delivered to the registered device callback.
#[repr(i32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, FromPrimitive)]
pub enum UnityGfxDeviceEventType {
    Initialize = 0,
    Shutdown = 1,
    BeforeReset = 2,
    AfterReset = 3,
}

impl UnityGfxDeviceEventType {
    pub fn from_raw(raw: i32) -> Option<Self> {
        Self::from_i32(raw)
    }
}

// =====================================================================
// Callback types
// =====================================================================

/// Device lifecycle callback registered with `IUnityGraphics`.
pub type IUnityGraphicsDeviceEventCallback =
    Option<unsafe extern "system" fn(eventType: i32)>;

/// Render-thread callback handed out by `GetRenderEventFunc`.
pub type UnityRenderingEvent = unsafe extern "system" fn(eventId: i32);

/// Host log channel handed to `LinkDebug`.
pub type HostLogFn = unsafe extern "system" fn(message: *const c_char);

// =====================================================================
// C-repr interface tables
// =====================================================================

/// Opaque interface pointer returned by the registry.
pub type IUnityInterface = c_void;

/// The interface registry passed to `UnityPluginLoad`.
#[repr(C)]
pub struct IUnityInterfaces {
    pub GetInterface:
        Option<unsafe extern "system" fn(guid: UnityInterfaceGUID) -> *mut IUnityInterface>,
    pub RegisterInterface:
        Option<unsafe extern "system" fn(guid: UnityInterfaceGUID, ptr: *mut IUnityInterface)>,
    pub GetInterfaceSplit:
        Option<unsafe extern "system" fn(guidHigh: u64, guidLow: u64) -> *mut IUnityInterface>,
    pub RegisterInterfaceSplit: Option<
        unsafe extern "system" fn(guidHigh: u64, guidLow: u64, ptr: *mut IUnityInterface),
    >,
}

/// `IUnityGraphics`: renderer query and device-event registration.
#[repr(C)]
pub struct IUnityGraphics {
    pub GetRenderer: Option<unsafe extern "system" fn() -> i32>,
    pub RegisterDeviceEventCallback:
        Option<unsafe extern "system" fn(callback: IUnityGraphicsDeviceEventCallback)>,
    pub UnregisterDeviceEventCallback:
        Option<unsafe extern "system" fn(callback: IUnityGraphicsDeviceEventCallback)>,
    pub ReserveEventIDRange: Option<unsafe extern "system" fn(count: i32) -> i32>,
}

/// Leading entries of `IUnityGraphicsD3D11`. Only read through a pointer
/// handed out by the host, so the trailing entries can be omitted.
#[repr(C)]
pub struct IUnityGraphicsD3D11 {
    pub GetDevice: Option<unsafe extern "system" fn() -> *mut c_void>,
    pub TextureFromRenderBuffer: Option<unsafe extern "system" fn(buffer: *mut c_void) -> *mut c_void>,
    pub TextureFromNativeTexture: Option<unsafe extern "system" fn(texture: *mut c_void) -> *mut c_void>,
}
