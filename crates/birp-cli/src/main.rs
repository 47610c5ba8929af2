// crates/birp-cli/src/main.rs

//! BIRP reference CLI: converts between PGM, BIRP, and ASCII preview on
//! stdin/stdout, optionally applying one BDD transform along the way.

#![forbid(unsafe_code)]
#![deny(
    rust_2018_idioms,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo
)]

mod args;

use anyhow::{Context, Result};
use args::{Cli, InputFormat, OutputFormat, Transform};
use birp_core::{map, rotate, zoom, NodeStore};
use std::io::{self, Write};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "\
Usage: birp [-h] [-i {pgm|birp}] [-o {pgm|birp|ascii}] [TRANSFORM]

  -h              Print this message and exit.
  -i FORMAT       Input format: pgm or birp (default birp). Must precede TRANSFORM.
  -o FORMAT       Output format: pgm, birp, or ascii (default birp). Must precede TRANSFORM.

TRANSFORM (at most one, requires -i birp -o birp, which is the default):
  -n              Negative (255 - value).
  -t N            Threshold at N (0..=255): < N -> 0, >= N -> 255.
  -r              Rotate 180 degrees (point reflection).
  -z N            Zoom out by 2^N (1..=16).
  -Z N            Zoom in by 2^N (0..=16).

Reads from stdin, writes to stdout.\
";

fn main() -> std::process::ExitCode {
    init_tracing();
    let argv: Vec<String> = std::env::args().skip(1).collect();

    match args::parse(&argv) {
        Err(e) => {
            eprintln!("{USAGE}");
            eprintln!("error: {e:#}");
            std::process::ExitCode::FAILURE
        }
        Ok(Cli::Help) => {
            println!("{USAGE}");
            std::process::ExitCode::SUCCESS
        }
        Ok(Cli::Convert {
            input,
            output,
            transform,
        }) => match run(input, output, transform) {
            Ok(()) => std::process::ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {e:#}");
                std::process::ExitCode::FAILURE
            }
        },
    }
}

/// Initialize tracing with an env-driven filter (default INFO).
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .compact()
        .with_writer(io::stderr);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn run(input: InputFormat, output: OutputFormat, transform: Transform) -> Result<()> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let stdout = io::stdout();
    let mut writer = stdout.lock();

    match (input, output) {
        (InputFormat::Pgm, OutputFormat::Birp) => {
            info!("pgm -> birp");
            let (w, h, pixels) = birp_raster::read_pgm(&mut reader).context("reading PGM")?;
            let mut store = NodeStore::new();
            let root = birp_core::from_raster(&mut store, w, h, &pixels)
                .context("building BDD from raster")?;
            birp_raster::write_birp(&mut writer, &store, root, w, h).context("writing BIRP")?;
        }
        (InputFormat::Birp, OutputFormat::Pgm) => {
            info!("birp -> pgm");
            let (w, h, root, store) = birp_raster::read_birp(&mut reader).context("reading BIRP")?;
            let pixels = birp_core::to_raster(&store, root, w, h);
            birp_raster::write_pgm(&mut writer, w, h, &pixels).context("writing PGM")?;
        }
        (InputFormat::Birp, OutputFormat::Birp) => {
            info!(?transform, "birp -> birp");
            let (w, h, root, mut store) =
                birp_raster::read_birp(&mut reader).context("reading BIRP")?;
            let (out_root, out_w, out_h) =
                apply_transform(&mut store, root, w, h, transform).context("applying transform")?;
            birp_raster::write_birp(&mut writer, &store, out_root, out_w, out_h)
                .context("writing BIRP")?;
        }
        (InputFormat::Pgm, OutputFormat::Ascii) => {
            info!("pgm -> ascii");
            let (w, h, pixels) = birp_raster::read_pgm(&mut reader).context("reading PGM")?;
            birp_raster::ascii::render(&mut writer, w, h, &pixels).context("rendering ASCII")?;
        }
        (InputFormat::Birp, OutputFormat::Ascii) => {
            info!("birp -> ascii");
            let (w, h, root, store) = birp_raster::read_birp(&mut reader).context("reading BIRP")?;
            let pixels = birp_core::to_raster(&store, root, w, h);
            birp_raster::ascii::render(&mut writer, w, h, &pixels).context("rendering ASCII")?;
        }
        (InputFormat::Pgm, OutputFormat::Pgm) => {
            return Err(birp_core::BirpError::BadArg(
                "pgm input with pgm output is not a supported conversion".to_string(),
            )
            .into());
        }
    }

    writer.flush()?;
    Ok(())
}

/// Apply the (at most one) requested transform to a BIRP-to-BIRP
/// conversion, returning the resulting root and the dimensions to frame it
/// with.
fn apply_transform(
    store: &mut NodeStore,
    root: birp_core::NodeId,
    width: u32,
    height: u32,
    transform: Transform,
) -> Result<(birp_core::NodeId, u32, u32)> {
    match transform {
        Transform::None => Ok((root, width, height)),
        Transform::Negative => {
            let out = map(store, root, birp_core::map::negative)?;
            Ok((out, width, height))
        }
        Transform::Threshold(t) => {
            let out = map(store, root, birp_core::map::threshold(t))?;
            Ok((out, width, height))
        }
        Transform::Rotate => {
            let l = birp_core::min_level(width, height);
            let out = rotate(store, root, l)?;
            Ok((out, width, height))
        }
        Transform::ZoomOut(n) => {
            let l = birp_core::min_level(width, height);
            let factor = zoom_out_byte(n);
            let zoomed = zoom(store, root, l, factor)?;
            let side = 1u32 << (zoomed.level / 2);
            Ok((zoomed.node, side, side))
        }
        Transform::ZoomIn(n) => {
            let l = birp_core::min_level(width, height);
            let zoomed = zoom(store, root, l, n as i8)?;
            let side = 1u32 << (zoomed.level / 2);
            Ok((zoomed.node, side, side))
        }
    }
}

/// Encode a zoom-out magnitude `1..=16` as the two's-complement signed
/// byte `zoom` expects.
fn zoom_out_byte(n: u8) -> i8 {
    (!n).wrapping_add(1) as i8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_out_byte_uses_twos_complement() {
        // n=1 -> 0xFF (-1)
        assert_eq!(zoom_out_byte(1), -1);
        // n=16 -> 0xF0 (-16)
        assert_eq!(zoom_out_byte(16), -16);
    }
}
