//! Device lifecycle: reacting to the host's Initialize/Shutdown/Reset
//! notifications.

use tracing::{info, warn};
use unity_core::UnityGfxDeviceEventType;

use crate::backend::{BackendKind, GpuDevice};
use crate::context::RenderingContext;

/// What the plugin needs from the host's graphics subsystem when a device
/// comes up.
pub trait GraphicsHost<D> {
    /// Renderer the host is currently running.
    fn renderer(&self) -> BackendKind;

    /// Borrow the host's native device, if it exposes one for this backend.
    fn acquire_device(&self) -> Option<D>;
}

impl<D: GpuDevice> RenderingContext<D> {
    /// Entry point for the raw id the host passes to the device callback.
    pub fn on_device_event_raw(&mut self, host: &impl GraphicsHost<D>, raw: i32) {
        match UnityGfxDeviceEventType::from_raw(raw) {
            Some(event) => self.on_device_event(host, event),
            None => warn!("Ignoring unknown graphics device event {raw}"),
        }
    }

    pub fn on_device_event(&mut self, host: &impl GraphicsHost<D>, event: UnityGfxDeviceEventType) {
        info!("OnGraphicsDeviceEvent({event:?}).");

        match event {
            UnityGfxDeviceEventType::Initialize => self.initialize(host),
            UnityGfxDeviceEventType::Shutdown => self.shutdown(),
            // D3D11 objects survive a device reset.
            UnityGfxDeviceEventType::BeforeReset | UnityGfxDeviceEventType::AfterReset => {}
        }
    }

    fn initialize(&mut self, host: &impl GraphicsHost<D>) {
        self.backend = host.renderer();
        self.release_device();
        if !D::supports(self.backend) {
            return;
        }

        self.device = host.acquire_device();
        if self.device.is_none() {
            warn!("Host did not provide a native device for {:?}", self.backend);
            return;
        }
        self.ensure_resources();
    }

    fn shutdown(&mut self) {
        self.backend = BackendKind::None;
        self.shared.clear_texture();
        self.release_device();
    }
}
