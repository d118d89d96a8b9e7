//! Recording GPU backend for tests.
//!
//! Every created object carries a token whose `Drop` bumps the release
//! counter, so tests can compare creations against releases. Context calls
//! are appended to a command log instead of reaching a driver.

use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::Rc;

use anyhow::{bail, Result};
use unity_core::TextureHandle;

use crate::backend::{BackendKind, GpuDevice};
use crate::config::{
    D3D11_SHADER_DIR, D3D11_SHADER_EXT, PIXEL_SHADER_NAME, SHADER_ROOT, VERTEX_SHADER_NAME,
};
use crate::geometry::{Matrix4, Vertex};
use crate::lifecycle::GraphicsHost;
use crate::pipeline::{BlendDesc, BufferDesc, DepthStencilDesc, InputElement, RasterizerDesc};
use crate::resources::GpuResourceSet;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetDefaultState,
    DrawTriangle {
        world: Matrix4,
        vertices: [Vertex; 3],
    },
    QueryTextureSize,
    UploadTexture {
        len: usize,
        row_pitch: u32,
        first_pixel: [u8; 4],
    },
}

#[derive(Default)]
pub struct Recorder {
    created: Cell<usize>,
    released: Cell<usize>,
    live_devices: Cell<usize>,
    devices_acquired: Cell<usize>,
    fail_pixel_shader: Cell<bool>,
    fail_input_layout: Cell<bool>,
    texture_size: Cell<Option<(u32, u32)>>,
    commands: RefCell<Vec<Command>>,
}

impl Recorder {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn created(&self) -> usize {
        self.created.get()
    }

    pub fn released(&self) -> usize {
        self.released.get()
    }

    pub fn live_devices(&self) -> usize {
        self.live_devices.get()
    }

    pub fn devices_acquired(&self) -> usize {
        self.devices_acquired.get()
    }

    pub fn fail_pixel_shader(&self, fail: bool) {
        self.fail_pixel_shader.set(fail);
    }

    pub fn fail_input_layout(&self, fail: bool) {
        self.fail_input_layout.set(fail);
    }

    pub fn set_texture_size(&self, size: Option<(u32, u32)>) {
        self.texture_size.set(size);
    }

    pub fn commands(&self) -> Vec<Command> {
        self.commands.borrow().clone()
    }

    pub fn clear_commands(&self) {
        self.commands.borrow_mut().clear();
    }

    /// Number of calls that would have reached the GPU, creations included.
    pub fn gpu_calls(&self) -> usize {
        self.created() + self.commands.borrow().len()
    }

    fn record(&self, command: Command) {
        self.commands.borrow_mut().push(command);
    }
}

/// A created GPU object.
pub struct MockObject {
    recorder: Rc<Recorder>,
}

impl MockObject {
    fn new(recorder: &Rc<Recorder>) -> Self {
        recorder.created.set(recorder.created.get() + 1);
        Self {
            recorder: Rc::clone(recorder),
        }
    }
}

impl Drop for MockObject {
    fn drop(&mut self) {
        self.recorder.released.set(self.recorder.released.get() + 1);
    }
}

pub struct MockDevice {
    recorder: Rc<Recorder>,
}

impl MockDevice {
    pub fn new(recorder: &Rc<Recorder>) -> Self {
        recorder.live_devices.set(recorder.live_devices.get() + 1);
        recorder
            .devices_acquired
            .set(recorder.devices_acquired.get() + 1);
        Self {
            recorder: Rc::clone(recorder),
        }
    }
}

impl Drop for MockDevice {
    fn drop(&mut self) {
        self.recorder
            .live_devices
            .set(self.recorder.live_devices.get() - 1);
    }
}

impl GpuDevice for MockDevice {
    const SHADER_DIR: &'static str = D3D11_SHADER_DIR;
    const SHADER_EXT: &'static str = D3D11_SHADER_EXT;

    type Buffer = MockObject;
    type VertexShader = MockObject;
    type PixelShader = MockObject;
    type InputLayout = MockObject;
    type RasterizerState = MockObject;
    type DepthStencilState = MockObject;
    type BlendState = MockObject;

    fn supports(kind: BackendKind) -> bool {
        kind == BackendKind::Direct3D11
    }

    fn create_buffer(&self, _desc: &BufferDesc) -> Result<MockObject> {
        Ok(MockObject::new(&self.recorder))
    }

    fn create_vertex_shader(&self, _bytecode: &[u8]) -> Result<MockObject> {
        Ok(MockObject::new(&self.recorder))
    }

    fn create_pixel_shader(&self, _bytecode: &[u8]) -> Result<MockObject> {
        if self.recorder.fail_pixel_shader.get() {
            bail!("pixel shader rejected");
        }
        Ok(MockObject::new(&self.recorder))
    }

    fn create_input_layout(
        &self,
        elements: &[InputElement],
        _vs_bytecode: &[u8],
    ) -> Result<MockObject> {
        if self.recorder.fail_input_layout.get() || elements.is_empty() {
            bail!("input layout rejected");
        }
        Ok(MockObject::new(&self.recorder))
    }

    fn create_rasterizer_state(&self, _desc: &RasterizerDesc) -> Result<MockObject> {
        Ok(MockObject::new(&self.recorder))
    }

    fn create_depth_stencil_state(&self, _desc: &DepthStencilDesc) -> Result<MockObject> {
        Ok(MockObject::new(&self.recorder))
    }

    fn create_blend_state(&self, _desc: &BlendDesc) -> Result<MockObject> {
        Ok(MockObject::new(&self.recorder))
    }

    fn set_default_state(&self, _resources: &GpuResourceSet<Self>) {
        self.recorder.record(Command::SetDefaultState);
    }

    fn draw_triangle(
        &self,
        _resources: &GpuResourceSet<Self>,
        world: &Matrix4,
        vertices: &[Vertex; 3],
    ) {
        self.recorder.record(Command::DrawTriangle {
            world: *world,
            vertices: *vertices,
        });
    }

    fn texture_size(&self, _texture: TextureHandle) -> Option<(u32, u32)> {
        self.recorder.record(Command::QueryTextureSize);
        self.recorder.texture_size.get()
    }

    fn upload_texture(&self, _texture: TextureHandle, pixels: &[u8], row_pitch: u32) {
        let mut first_pixel = [0u8; 4];
        if let Some(src) = pixels.get(..4) {
            first_pixel.copy_from_slice(src);
        }
        self.recorder.record(Command::UploadTexture {
            len: pixels.len(),
            row_pitch,
            first_pixel,
        });
    }
}

/// Host stand-in answering the renderer query and handing out mock devices.
pub struct MockHost {
    pub renderer: Cell<BackendKind>,
    pub recorder: Rc<Recorder>,
}

impl MockHost {
    pub fn new(renderer: BackendKind) -> Self {
        Self {
            renderer: Cell::new(renderer),
            recorder: Recorder::new(),
        }
    }
}

impl GraphicsHost<MockDevice> for MockHost {
    fn renderer(&self) -> BackendKind {
        self.renderer.get()
    }

    fn acquire_device(&self) -> Option<MockDevice> {
        Some(MockDevice::new(&self.recorder))
    }
}

/// Write a placeholder shader pair under `root` in the D3D11 layout.
pub fn write_shaders(root: &Path) {
    let dir = root.join(SHADER_ROOT).join(D3D11_SHADER_DIR);
    std::fs::create_dir_all(&dir).unwrap();
    for name in [VERTEX_SHADER_NAME, PIXEL_SHADER_NAME] {
        let path = dir.join(name).with_extension(D3D11_SHADER_EXT);
        std::fs::write(path, b"DXBC\0\0\0\0").unwrap();
    }
}
