//! Argument parsing for the BIRP CLI.
//!
//! `-i`/`-o` must precede the transform flag, a constraint a declarative
//! flag parser has no clean way to express, so this module hand-scans
//! `argv` directly and hands off a small typed [`Cli`] to the rest of the
//! program.

use anyhow::{bail, Result};

/// Resolved input format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Binary PGM (P5).
    Pgm,
    /// BIRP binary container.
    Birp,
}

/// Resolved output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Binary PGM (P5).
    Pgm,
    /// BIRP binary container.
    Birp,
    /// Four-bucket ASCII preview.
    Ascii,
}

/// The (at most one) pixel/geometry transform requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// No transform: pass the BDD through unchanged.
    None,
    /// `-n`: `255 - value`.
    Negative,
    /// `-t N`: `< N -> 0`, `>= N -> 255`.
    Threshold(u8),
    /// `-r`: point-reflection rotate.
    Rotate,
    /// `-z N`: zoom out by `2^N` (`1..=16`).
    ZoomOut(u8),
    /// `-Z N`: zoom in by `2^N` (`0..=16`).
    ZoomIn(u8),
}

/// Fully parsed CLI invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cli {
    /// `-h` was given (as the first argument): print usage and exit 0.
    Help,
    /// A normal conversion request.
    Convert {
        /// Selected input format.
        input: InputFormat,
        /// Selected output format.
        output: OutputFormat,
        /// Selected transform (only meaningful when both formats are BIRP).
        transform: Transform,
    },
}

/// Parse `argv` (excluding the program name) into a [`Cli`].
///
/// # Errors
/// Returns an error describing the first invalid flag, out-of-range
/// numeric argument, or ordering violation encountered.
pub fn parse(args: &[String]) -> Result<Cli> {
    if args.first().map(String::as_str) == Some("-h") {
        return Ok(Cli::Help);
    }

    let mut input_consumed = false;
    let mut output_consumed = false;
    let mut input_is_birp = true;
    let mut output_is_birp = true;
    let mut transform_consumed = false;

    let mut input = InputFormat::Birp;
    let mut output = OutputFormat::Birp;
    let mut transform = Transform::None;

    // 1-based count of argv tokens consumed so far.
    let mut i: usize = 0;
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        i += 1;
        match arg.as_str() {
            "-h" => bail!("-h must be the first argument"),
            "-i" => {
                if i > 3 || input_consumed || transform_consumed {
                    bail!("-i must appear at most once, before any transform flag");
                }
                let value = iter.next().ok_or_else(|| anyhow::anyhow!("-i requires a value"))?;
                i += 1;
                input_consumed = true;
                match value.as_str() {
                    "pgm" => {
                        input = InputFormat::Pgm;
                        input_is_birp = false;
                    }
                    "birp" => input = InputFormat::Birp,
                    other => bail!("unknown input format {other:?} (expected pgm or birp)"),
                }
            }
            "-o" => {
                if i > 3 || output_consumed || transform_consumed {
                    bail!("-o must appear at most once, before any transform flag");
                }
                let value = iter.next().ok_or_else(|| anyhow::anyhow!("-o requires a value"))?;
                i += 1;
                output_consumed = true;
                match value.as_str() {
                    "pgm" => {
                        output = OutputFormat::Pgm;
                        output_is_birp = false;
                    }
                    "birp" => output = OutputFormat::Birp,
                    "ascii" => {
                        output = OutputFormat::Ascii;
                        output_is_birp = false;
                    }
                    other => bail!("unknown output format {other:?} (expected pgm, birp, or ascii)"),
                }
            }
            "-n" => {
                require_birp_to_birp_transform(input_is_birp, output_is_birp, transform_consumed)?;
                transform = Transform::Negative;
                transform_consumed = true;
            }
            "-r" => {
                require_birp_to_birp_transform(input_is_birp, output_is_birp, transform_consumed)?;
                transform = Transform::Rotate;
                transform_consumed = true;
            }
            "-t" => {
                require_birp_to_birp_transform(input_is_birp, output_is_birp, transform_consumed)?;
                transform_consumed = true;
                let value = iter.next().ok_or_else(|| anyhow::anyhow!("-t requires a value"))?;
                i += 1;
                let n: u32 = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("-t expects an integer 0..=255, got {value:?}"))?;
                if n > 255 {
                    bail!("-t expects an integer 0..=255, got {n}");
                }
                transform = Transform::Threshold(n as u8);
            }
            "-z" => {
                require_birp_to_birp_transform(input_is_birp, output_is_birp, transform_consumed)?;
                transform_consumed = true;
                let value = iter.next().ok_or_else(|| anyhow::anyhow!("-z requires a value"))?;
                i += 1;
                let n: u32 = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("-z expects an integer 1..=16, got {value:?}"))?;
                if n == 0 || n > 16 {
                    bail!("-z expects an integer 1..=16, got {n}");
                }
                transform = Transform::ZoomOut(n as u8);
            }
            "-Z" => {
                require_birp_to_birp_transform(input_is_birp, output_is_birp, transform_consumed)?;
                transform_consumed = true;
                let value = iter.next().ok_or_else(|| anyhow::anyhow!("-Z requires a value"))?;
                i += 1;
                let n: u32 = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("-Z expects an integer 0..=16, got {value:?}"))?;
                if n > 16 {
                    bail!("-Z expects an integer 0..=16, got {n}");
                }
                transform = Transform::ZoomIn(n as u8);
            }
            other => bail!("unrecognized argument {other:?}"),
        }
    }

    Ok(Cli::Convert {
        input,
        output,
        transform,
    })
}

fn require_birp_to_birp_transform(
    input_is_birp: bool,
    output_is_birp: bool,
    transform_consumed: bool,
) -> Result<()> {
    if !input_is_birp || !output_is_birp || transform_consumed {
        bail!("transform flags require both -i and -o to be birp, and at most one transform");
    }
    Ok(())
}
