//! Per-frame work issued from the host's render-event callback.

use tracing::{trace, warn};

use crate::backend::{BackendKind, GpuDevice};
use crate::context::RenderingContext;
use crate::geometry::{world_matrix, TRIANGLE};
use crate::plasma::{fill_plasma, BYTES_PER_PIXEL};

impl<D: GpuDevice> RenderingContext<D> {
    /// Draw the rotating triangle and refresh the external texture.
    ///
    /// `event_id` is what the script passed to `IssuePluginEvent`; every id
    /// runs the same frame.
    pub fn on_render_event(&mut self, event_id: i32) {
        trace!("OnRenderEvent({event_id})");

        if matches!(self.backend, BackendKind::None | BackendKind::Unsupported(_)) {
            return;
        }
        if !self.resources.is_ready() && !self.ensure_resources() {
            return;
        }
        let Some(device) = self.device.as_ref() else {
            return;
        };
        let resources = self.resources.resources();
        let time = self.shared.time();

        device.set_default_state(resources);
        device.draw_triangle(resources, &world_matrix(time), &TRIANGLE);

        let Some(texture) = self.shared.texture() else {
            return;
        };
        let Some((width, height)) = device.texture_size(texture) else {
            warn!("Could not query external texture size");
            return;
        };
        if width == 0 || height == 0 {
            warn!("External texture is {width}x{height}; skipping fill");
            return;
        }
        let row_pitch = width as usize * BYTES_PER_PIXEL;
        self.texture_scratch.resize(row_pitch * height as usize, 0);
        fill_plasma(width, height, row_pitch, time, &mut self.texture_scratch);
        device.upload_texture(texture, &self.texture_scratch, row_pitch as u32);
    }
}
