//! Direct3D 11 backend, driving the device the host renders with.
//!
//! [`Dx11Device`] never creates a device of its own: it borrows the host's
//! `ID3D11Device` from `IUnityGraphicsD3D11::GetDevice` and records onto its
//! immediate context.

mod commands;
mod device;

pub use device::Dx11Device;
