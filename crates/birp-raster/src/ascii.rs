//! Four-bucket ASCII preview renderer.

use anyhow::{bail, Result};
use std::io::Write;

/// Render a row-major raster as an ASCII-art preview: one of `' '`, `'.'`,
/// `'*'`, `'@'` per pixel (buckets `0..=63`, `64..=127`, `128..=191`,
/// `192..=255`), with a newline after every `width` characters.
///
/// Both the PGM and BIRP conversion paths in the CLI share this same
/// bucketing loop via one renderer.
///
/// # Errors
/// Returns an error if `pixels.len() != width * height`, or on a write
/// failure.
pub fn render(mut w: impl Write, width: u32, height: u32, pixels: &[u8]) -> Result<()> {
    let expected = (width as usize) * (height as usize);
    if pixels.len() != expected {
        bail!(
            "pixel buffer length {} does not match {width}x{height} ({expected})",
            pixels.len()
        );
    }
    for (i, &v) in pixels.iter().enumerate() {
        let ch = bucket(v);
        w.write_all(&[ch])?;
        if width != 0 && i % (width as usize) == (width as usize) - 1 {
            w.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn bucket(v: u8) -> u8 {
    match v {
        0..=63 => b' ',
        64..=127 => b'.',
        128..=191 => b'*',
        192..=255 => b'@',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_match_ranges() {
        assert_eq!(bucket(0), b' ');
        assert_eq!(bucket(63), b' ');
        assert_eq!(bucket(64), b'.');
        assert_eq!(bucket(127), b'.');
        assert_eq!(bucket(128), b'*');
        assert_eq!(bucket(191), b'*');
        assert_eq!(bucket(192), b'@');
        assert_eq!(bucket(255), b'@');
    }

    #[test]
    fn newline_after_every_row() {
        let pixels = [0u8, 200, 0, 200];
        let mut out = Vec::new();
        render(&mut out, 2, 2, &pixels).unwrap();
        assert_eq!(out, b" @\n @\n");
    }
}
