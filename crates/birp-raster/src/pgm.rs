//! Binary PGM (`P5`) reader/writer.
//!
//! Marshals bytes to and from the row-major raster buffer that
//! `birp_core::from_raster`/`to_raster` consume.

use anyhow::{bail, Context, Result};
use std::io::{BufRead, Read, Write};

/// Maximum raster dimension the engine accepts (mirrors `birp_core::MAX_DIM`).
const MAX_DIM: u32 = birp_core::MAX_DIM;

/// Read a binary PGM (`P5`) image, returning `(width, height, pixels)`.
///
/// Accepts `#`-prefixed comments anywhere whitespace is allowed, per the
/// PGM grammar. Requires `maxval == 255` — any other maxval is rejected as
/// malformed, since this format only carries 8-bit grayscale.
///
/// # Errors
/// Returns an error if the magic number is wrong, a header field is
/// missing/unparsable, `maxval != 255`, the declared dimensions exceed
/// [`MAX_DIM`], or the pixel data is short.
pub fn read_pgm(mut r: impl BufRead) -> Result<(u32, u32, Vec<u8>)> {
    let magic = read_token(&mut r).context("reading PGM magic number")?;
    if magic != "P5" {
        bail!("not a binary PGM: expected magic \"P5\", got {magic:?}");
    }
    let width: u32 = read_token(&mut r)
        .context("reading PGM width")?
        .parse()
        .context("PGM width is not a number")?;
    let height: u32 = read_token(&mut r)
        .context("reading PGM height")?
        .parse()
        .context("PGM height is not a number")?;
    let maxval: u32 = read_token(&mut r)
        .context("reading PGM maxval")?
        .parse()
        .context("PGM maxval is not a number")?;
    if maxval != 255 {
        bail!("unsupported PGM maxval {maxval}: only 255 (8-bit grayscale) is supported");
    }
    if width == 0 || height == 0 || width > MAX_DIM || height > MAX_DIM {
        bail!("PGM dimensions {width}x{height} out of range (max {MAX_DIM}x{MAX_DIM})");
    }

    // Exactly one whitespace byte separates the header from raw pixel data.
    let mut sep = [0u8; 1];
    r.read_exact(&mut sep)
        .context("reading whitespace byte after PGM header")?;
    if !sep[0].is_ascii_whitespace() {
        bail!("expected a single whitespace byte after the PGM header");
    }

    let mut pixels = vec![0u8; (width as usize) * (height as usize)];
    r.read_exact(&mut pixels)
        .context("reading PGM pixel data (buffer shorter than width*height)")?;
    Ok((width, height, pixels))
}

/// Write a binary PGM (`P5`) image with `maxval = 255`.
///
/// # Errors
/// Returns an error if `pixels.len() != width * height`, or on a write
/// failure.
pub fn write_pgm(mut w: impl Write, width: u32, height: u32, pixels: &[u8]) -> Result<()> {
    let expected = (width as usize) * (height as usize);
    if pixels.len() != expected {
        bail!(
            "pixel buffer length {} does not match {width}x{height} ({expected})",
            pixels.len()
        );
    }
    write!(w, "P5\n{width} {height}\n255\n")?;
    w.write_all(pixels)?;
    Ok(())
}

/// Read one whitespace-delimited token, skipping `#`-to-end-of-line
/// comments, without pulling in any `ctype`-style classification beyond
/// `u8::is_ascii_whitespace`.
fn read_token(r: &mut impl BufRead) -> Result<String> {
    let mut token = String::new();
    let mut byte = [0u8; 1];
    let mut in_comment = false;
    loop {
        let n = r.read(&mut byte).context("reading PGM header byte")?;
        if n == 0 {
            if token.is_empty() {
                bail!("unexpected EOF reading PGM header token");
            }
            break;
        }
        let b = byte[0];
        if in_comment {
            if b == b'\n' {
                in_comment = false;
            }
            continue;
        }
        if b == b'#' {
            in_comment = true;
            continue;
        }
        if b.is_ascii_whitespace() {
            if token.is_empty() {
                continue;
            }
            break;
        }
        token.push(b as char);
    }
    Ok(token)
}
