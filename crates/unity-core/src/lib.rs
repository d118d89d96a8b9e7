//! Host-side building blocks for Unity low-level native rendering plugins.
//!
//! - [`ffi`] mirrors the Unity plugin API headers.
//! - [`interfaces`] gives safe access to the interface registry received in
//!   `UnityPluginLoad`.
//! - [`log`] routes `tracing` output to the console or to host callbacks.
//! - [`state`] holds the values the script thread shares with the render
//!   thread.

pub mod ffi;
pub mod interfaces;
pub mod log;
pub mod state;

pub use ffi::{UnityGfxDeviceEventType, UnityGfxRenderer};
pub use interfaces::{UnityGraphics, UnityInterfaces};
pub use state::{SharedFrameState, TextureHandle};
