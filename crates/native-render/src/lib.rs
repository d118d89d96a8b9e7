//! Platform-neutral rendering core for the Unity native plugin.
//!
//! This crate holds everything between the exported C surface (in the
//! `rendering-plugin` cdylib) and the graphics driver.
//!
//! # Overview
//!
//! - [`RenderingContext`] is the render-thread state. It reacts to device
//!   lifecycle events ([`lifecycle`]) and draws each frame ([`frame`]).
//! - [`ResourceManager`] lazily creates the [`GpuResourceSet`] once shader
//!   bytecode can be found under the streaming-assets path.
//! - [`GpuDevice`] is the backend trait: [`dx11::Dx11Device`] on Windows,
//!   [`null::NullDevice`] elsewhere.
//! - [`plasma`] and [`geometry`] are the pure per-frame math.

pub mod backend;
pub mod bytes;
pub mod config;
pub mod context;
pub mod frame;
pub mod geometry;
pub mod lifecycle;
pub mod null;
pub mod pipeline;
pub mod plasma;
pub mod resources;
pub mod shader;

#[cfg(target_os = "windows")]
pub mod dx11;

#[cfg(test)]
mod mock;

pub use backend::{BackendKind, GpuDevice};
pub use bytes::AsBytes;
pub use context::{DeviceState, RenderingContext};
pub use lifecycle::GraphicsHost;
pub use resources::{GpuResourceSet, ResourceManager};
