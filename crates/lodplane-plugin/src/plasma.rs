//! Animated "plasma" texture: four combined sine waves, greyscale RGBA8.

use crate::error::HostError;

/// Time multiplier applied before evaluating the waves.
pub const PLASMA_SPEED: f32 = 4.0;

const BYTES_PER_TEXEL: usize = 4;

/// Intensity of texel `(x, y)` at scaled time `t`.
pub fn plasma_value(x: u32, y: u32, t: f32) -> u8 {
    let (fx, fy) = (x as f32, y as f32);
    let wave = |phase: f32| 127.0 + 127.0 * phase.sin();
    let sum = wave(fx / 7.0 + t)
        + wave(fy / 5.0 - t)
        + wave((fx + fy) / 6.0 - t)
        + wave((fx * fx + fy * fy).sqrt() / 4.0 - t);
    // Each wave lies in [0, 254]; truncate the sum before averaging
    (sum as u32 / 4) as u8
}

/// Write a `width`×`height` plasma frame for `time` seconds into `dst`.
///
/// Rows are `stride` bytes apart; bytes past `width * 4` in each row are left
/// untouched. All four channels of a texel get the same value.
pub fn fill_plasma(
    width: u32,
    height: u32,
    stride: usize,
    time: f32,
    dst: &mut [u8],
) -> Result<(), HostError> {
    let row_bytes = width as usize * BYTES_PER_TEXEL;
    let needed = match height {
        0 => 0,
        h => stride * (h as usize - 1) + row_bytes,
    };
    if stride < row_bytes || dst.len() < needed {
        return Err(HostError::BufferTooSmall {
            actual: dst.len(),
            stride,
            height,
        });
    }

    let t = time * PLASMA_SPEED;
    for y in 0..height {
        let row_start = y as usize * stride;
        let row = &mut dst[row_start..row_start + row_bytes];
        for (x, texel) in row.chunks_exact_mut(BYTES_PER_TEXEL).enumerate() {
            texel.fill(plasma_value(x as u32, y, t));
        }
    }
    Ok(())
}

/// Tightly packed plasma frame.
pub fn generate_plasma(width: u32, height: u32, time: f32) -> Vec<u8> {
    let stride = width as usize * BYTES_PER_TEXEL;
    let mut pixels = vec![0; stride * height as usize];
    // A tightly packed buffer always fits
    if let Err(e) = fill_plasma(width, height, stride, time, &mut pixels) {
        log::error!("Plasma generation failed: {e}");
    }
    pixels
}
