//! Byte-slice views of vertex and matrix data for GPU upload.

use crate::geometry::Vertex;

/// Raw upload bytes for the constant buffer (`Matrix4`) and the vertex buffer
/// (`[Vertex; 3]`).
///
/// # Safety
///
/// Implementors must have no padding bytes and no pointer fields: `f32`,
/// the `#[repr(C)]` `Vertex` (three `f32` then a packed `u32` color), and
/// fixed arrays of those. Every byte of the value is then initialized.
pub unsafe trait AsBytes: Sized {
    fn as_bytes(&self) -> &[u8] {
        let len = std::mem::size_of::<Self>();
        let start = std::ptr::from_ref(self).cast::<u8>();
        // SAFETY: `start..start + len` is `self`, fully initialized per the trait contract.
        unsafe { std::slice::from_raw_parts(start, len) }
    }
}

unsafe impl AsBytes for f32 {}
unsafe impl AsBytes for Vertex {}
unsafe impl<T: AsBytes, const N: usize> AsBytes for [T; N] {}
