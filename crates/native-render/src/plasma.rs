//! Procedural "plasma" fill for the external texture.

/// Bytes per pixel of the texture we write (RGBA8).
pub const BYTES_PER_PIXEL: usize = 4;

/// Grayscale plasma value at `(x, y)` for animation time `time`.
///
/// Four sine waves over x, y, the diagonal and the distance from the origin,
/// each mapped to `0..=254`, summed, truncated and averaged.
pub fn plasma_value(x: u32, y: u32, time: f32) -> u8 {
    let t = time * 4.0;
    let (xf, yf) = (x as f32, y as f32);
    let (xw, yw) = (u64::from(x), u64::from(y));
    let radius = ((xw * xw + yw * yw) as f32).sqrt();

    let sum = (127.0 + 127.0 * (xf / 7.0 + t).sin())
        + (127.0 + 127.0 * (yf / 5.0 - t).sin())
        + (127.0 + 127.0 * ((xf + yf) / 6.0 - t).sin())
        + (127.0 + 127.0 * (radius / 4.0 - t).sin());

    (sum as i32 / 4) as u8
}

/// Recompute every pixel of a `width` x `height` RGBA8 image into `dst`,
/// rows `stride` bytes apart. All four channels get the same value.
pub fn fill_plasma(width: u32, height: u32, stride: usize, time: f32, dst: &mut [u8]) {
    let row_bytes = width as usize * BYTES_PER_PIXEL;
    if row_bytes == 0 || height == 0 {
        return;
    }
    debug_assert!(stride >= row_bytes);
    debug_assert!(dst.len() >= stride * height.saturating_sub(1) as usize + row_bytes);

    for (y, row) in dst.chunks_mut(stride).take(height as usize).enumerate() {
        for (x, pixel) in row[..row_bytes]
            .chunks_exact_mut(BYTES_PER_PIXEL)
            .enumerate()
        {
            pixel.fill(plasma_value(x as u32, y as u32, time));
        }
    }
}
