#![allow(non_snake_case)]
//! Unity low-level native rendering plugin.
//!
//! Exposes the C entry points Unity looks up by name: the
//! `UnityPluginLoad`/`UnityPluginUnload` pair, the script-side setters and
//! `GetRenderEventFunc`. Each one forwards into the single process-wide
//! [`RenderingContext`] and never lets a panic cross the boundary.
//!
//! Log lines go to the debugger console until the host calls `LinkDebug`.
//! `RENDERING_PLUGIN_LOG` sets the filter (default `info`).

mod host;

use std::ffi::{c_char, c_void};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use native_render::RenderingContext;
use once_cell::sync::Lazy;
use tracing::{error, info, warn};
use unity_core::ffi::{HostLogFn, IUnityInterfaces, UnityRenderingEvent};
use unity_core::log::{self, HostCallbackSink};
use unity_core::state::path_from_c_str;
use unity_core::{SharedFrameState, UnityGfxDeviceEventType, UnityInterfaces};

pub use host::UnityHost;

#[cfg(target_os = "windows")]
pub type Backend = native_render::dx11::Dx11Device;
#[cfg(not(target_os = "windows"))]
pub type Backend = native_render::null::NullDevice;

/// State touched only from the host's render thread (plus the synthesized
/// Initialize in `UnityPluginLoad`).
struct RenderThreadState {
    context: RenderingContext<Backend>,
    host: UnityHost,
}

// GPU objects are created and used on the render thread only.
unsafe impl Send for RenderThreadState {}

struct Plugin {
    shared: Arc<SharedFrameState>,
    render: Mutex<RenderThreadState>,
}

impl Plugin {
    fn new() -> Self {
        let shared = Arc::new(SharedFrameState::new());
        Self {
            render: Mutex::new(RenderThreadState {
                context: RenderingContext::new(Arc::clone(&shared)),
                host: UnityHost::default(),
            }),
            shared,
        }
    }

    fn render(&self) -> MutexGuard<'_, RenderThreadState> {
        self.render.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn device_event(&self, raw: i32) {
        let mut state = self.render();
        let RenderThreadState { context, host } = &mut *state;
        context.on_device_event_raw(&*host, raw);
    }
}

static PLUGIN: Lazy<Plugin> = Lazy::new(|| {
    log::init();
    Plugin::new()
});

fn guarded(name: &str, body: impl FnOnce()) {
    if catch_unwind(AssertUnwindSafe(body)).is_err() {
        error!("{name} panicked");
    }
}

unsafe extern "system" fn on_graphics_device_event(event_type: i32) {
    guarded("OnGraphicsDeviceEvent", || PLUGIN.device_event(event_type));
}

unsafe extern "system" fn on_render_event(event_id: i32) {
    guarded("OnRenderEvent", || {
        PLUGIN.render().context.on_render_event(event_id)
    });
}

/// Called by the script once per frame with `Time.timeSinceLevelLoad`.
#[no_mangle]
pub extern "system" fn SetTimeFromUnity(time: f32) {
    guarded("SetTimeFromUnity", || PLUGIN.shared.set_time(time));
}

/// Native pointer of the texture the plasma is written into. Null clears
/// it; anything else is stored unchecked.
#[no_mangle]
pub extern "system" fn SetTextureFromUnity(texture: *mut c_void) {
    guarded("SetTextureFromUnity", || PLUGIN.shared.set_texture(texture));
}

/// # Safety
///
/// `path` must be null or a NUL-terminated string valid for the call.
#[no_mangle]
pub unsafe extern "system" fn SetUnityStreamingAssetsPath(path: *const c_char) {
    guarded("SetUnityStreamingAssetsPath", || {
        match unsafe { path_from_c_str(path) } {
            Ok(Some(path)) => {
                info!("Streaming assets path: {}", path.display());
                PLUGIN.shared.set_asset_path(Some(path));
            }
            Ok(None) => PLUGIN.shared.set_asset_path(None),
            Err(e) => warn!("Ignoring streaming assets path: {e:#}"),
        }
    });
}

/// Function the script passes to `GL.IssuePluginEvent`.
#[no_mangle]
pub extern "system" fn GetRenderEventFunc() -> UnityRenderingEvent {
    on_render_event
}

/// # Safety
///
/// `interfaces` must be null or the registry Unity passes at load time.
#[no_mangle]
pub unsafe extern "system" fn UnityPluginLoad(interfaces: *mut IUnityInterfaces) {
    guarded("UnityPluginLoad", || {
        let Some(interfaces) = (unsafe { UnityInterfaces::from_raw(interfaces) }) else {
            warn!("UnityPluginLoad received a null interface registry");
            return;
        };
        let Some(graphics) = interfaces.graphics() else {
            error!("Host does not provide IUnityGraphics");
            return;
        };

        PLUGIN.render().host = UnityHost::new(interfaces, graphics);
        // The host may call back while registering: the lock must be free.
        if !graphics.register_device_event_callback(on_graphics_device_event) {
            warn!("Host cannot deliver graphics device events");
        }
        // The device may already exist; run Initialize now.
        PLUGIN.device_event(UnityGfxDeviceEventType::Initialize as i32);
    });
}

#[no_mangle]
pub extern "system" fn UnityPluginUnload() {
    guarded("UnityPluginUnload", || {
        let graphics = PLUGIN.render().host.graphics();
        if let Some(graphics) = graphics {
            graphics.unregister_device_event_callback(on_graphics_device_event);
        }
    });
}

/// Route log output to host callbacks. Null channels fall back to the
/// console; all three null restores the console entirely.
#[no_mangle]
pub extern "system" fn LinkDebug(
    info: Option<HostLogFn>,
    warn: Option<HostLogFn>,
    error: Option<HostLogFn>,
) {
    guarded("LinkDebug", || {
        Lazy::force(&PLUGIN);
        match HostCallbackSink::new(info, warn, error) {
            Some(sink) => log::set_sink(Arc::new(sink)),
            None => log::reset_sink(),
        }
    });
}

#[cfg(test)]
mod tests {
    use std::ffi::CStr;
    use std::path::Path;
    use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};

    use native_render::{BackendKind, DeviceState};
    use serial_test::serial;
    use unity_core::ffi::{
        IUnityGraphics, IUnityGraphicsDeviceEventCallback, IUnityInterface, UnityGfxRenderer,
        IUNITY_GRAPHICS_GUID,
    };

    use super::*;

    static RENDERER: AtomicI32 = AtomicI32::new(UnityGfxRenderer::D3D11 as i32);
    static REGISTERED: AtomicUsize = AtomicUsize::new(0);
    static UNREGISTERED: AtomicUsize = AtomicUsize::new(0);
    static CALLBACK: Mutex<IUnityGraphicsDeviceEventCallback> = Mutex::new(None);

    unsafe extern "system" fn get_renderer() -> i32 {
        RENDERER.load(Ordering::SeqCst)
    }

    unsafe extern "system" fn register(callback: IUnityGraphicsDeviceEventCallback) {
        REGISTERED.fetch_add(1, Ordering::SeqCst);
        *CALLBACK.lock().unwrap() = callback;
    }

    unsafe extern "system" fn unregister(_callback: IUnityGraphicsDeviceEventCallback) {
        UNREGISTERED.fetch_add(1, Ordering::SeqCst);
        *CALLBACK.lock().unwrap() = None;
    }

    static GRAPHICS: IUnityGraphics = IUnityGraphics {
        GetRenderer: Some(get_renderer),
        RegisterDeviceEventCallback: Some(register),
        UnregisterDeviceEventCallback: Some(unregister),
        ReserveEventIDRange: None,
    };

    unsafe extern "system" fn get_interface_split(high: u64, low: u64) -> *mut IUnityInterface {
        if high == IUNITY_GRAPHICS_GUID.m_GUIDHigh && low == IUNITY_GRAPHICS_GUID.m_GUIDLow {
            &GRAPHICS as *const IUnityGraphics as *mut IUnityInterface
        } else {
            std::ptr::null_mut()
        }
    }

    fn registry() -> IUnityInterfaces {
        IUnityInterfaces {
            GetInterface: None,
            RegisterInterface: None,
            GetInterfaceSplit: Some(get_interface_split),
            RegisterInterfaceSplit: None,
        }
    }

    fn fire_device_event(event: UnityGfxDeviceEventType) {
        let callback = CALLBACK.lock().unwrap().expect("callback registered");
        unsafe { callback(event as i32) };
    }

    #[test]
    #[serial]
    fn time_setter_reaches_shared_state() {
        SetTimeFromUnity(2.5);
        assert_eq!(PLUGIN.shared.time(), 2.5);
    }

    #[test]
    #[serial]
    fn texture_setter_stores_and_clears() {
        SetTextureFromUnity(0x40 as *mut c_void);
        assert_eq!(
            PLUGIN.shared.texture().map(|t| t.as_ptr() as usize),
            Some(0x40)
        );
        SetTextureFromUnity(std::ptr::null_mut());
        assert!(PLUGIN.shared.texture().is_none());
    }

    #[test]
    #[serial]
    fn streaming_assets_path_rules() {
        unsafe { SetUnityStreamingAssetsPath(c"/data/StreamingAssets".as_ptr()) };
        assert_eq!(
            PLUGIN.shared.asset_path().as_deref(),
            Some(Path::new("/data/StreamingAssets"))
        );

        // Null is ignored.
        unsafe { SetUnityStreamingAssetsPath(std::ptr::null()) };
        assert!(PLUGIN.shared.asset_path().is_some());

        // Invalid UTF-8 is ignored.
        unsafe { SetUnityStreamingAssetsPath(c"\xff\xfe".as_ptr()) };
        assert_eq!(
            PLUGIN.shared.asset_path().as_deref(),
            Some(Path::new("/data/StreamingAssets"))
        );

        unsafe { SetUnityStreamingAssetsPath(c"".as_ptr()) };
        assert!(PLUGIN.shared.asset_path().is_none());
    }

    #[test]
    #[serial]
    fn render_event_without_device_is_harmless() {
        let render = GetRenderEventFunc();
        for event_id in [-1, 0, 1, 99] {
            unsafe { render(event_id) };
        }
        assert_eq!(PLUGIN.render().context.state(), DeviceState::Uninitialized);
    }

    #[test]
    #[serial]
    fn null_registry_is_ignored() {
        let before = REGISTERED.load(Ordering::SeqCst);
        unsafe { UnityPluginLoad(std::ptr::null_mut()) };
        assert_eq!(REGISTERED.load(Ordering::SeqCst), before);
    }

    #[test]
    #[serial]
    fn load_initializes_and_unload_unregisters() {
        let mut table = registry();
        RENDERER.store(UnityGfxRenderer::D3D11 as i32, Ordering::SeqCst);
        let registered = REGISTERED.load(Ordering::SeqCst);
        let unregistered = UNREGISTERED.load(Ordering::SeqCst);

        unsafe { UnityPluginLoad(&mut table) };
        assert_eq!(REGISTERED.load(Ordering::SeqCst), registered + 1);
        assert_eq!(PLUGIN.render().context.backend(), BackendKind::Direct3D11);
        // The fake host exposes no native device.
        assert_eq!(PLUGIN.render().context.state(), DeviceState::Uninitialized);

        fire_device_event(UnityGfxDeviceEventType::Shutdown);
        assert_eq!(PLUGIN.render().context.backend(), BackendKind::None);

        UnityPluginUnload();
        assert_eq!(UNREGISTERED.load(Ordering::SeqCst), unregistered + 1);
    }

    #[test]
    #[serial]
    fn null_renderer_maps_to_no_backend() {
        let mut table = registry();
        RENDERER.store(UnityGfxRenderer::Null as i32, Ordering::SeqCst);

        unsafe { UnityPluginLoad(&mut table) };
        assert_eq!(PLUGIN.render().context.backend(), BackendKind::None);

        UnityPluginUnload();
        RENDERER.store(UnityGfxRenderer::D3D11 as i32, Ordering::SeqCst);
    }

    static HOST_WARNINGS: Mutex<Vec<String>> = Mutex::new(Vec::new());

    unsafe extern "system" fn host_warn(message: *const c_char) {
        let text = unsafe { CStr::from_ptr(message) }.to_string_lossy().into_owned();
        HOST_WARNINGS.lock().unwrap().push(text);
    }

    #[test]
    #[serial]
    fn link_debug_redirects_warnings() {
        LinkDebug(None, Some(host_warn), None);
        unsafe { SetUnityStreamingAssetsPath(std::ptr::null()) };
        LinkDebug(None, None, None);
        unsafe { SetUnityStreamingAssetsPath(std::ptr::null()) };

        let warnings = HOST_WARNINGS.lock().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Ignoring streaming assets path"));
    }
}
