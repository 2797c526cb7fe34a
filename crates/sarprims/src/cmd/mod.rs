use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod assemble;
pub mod fcs;
pub mod fragment;
pub mod inspect;
pub mod version;

/// Default MTU when neither `--mtu` nor `SARPRIMS_MTU` is given.
pub const DEFAULT_MTU: &str = "672";

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Split a payload into frames.
    Fragment(FragmentArgs),
    /// Validate frames and rebuild the packet they carry.
    Assemble(AssembleArgs),
    /// Decode a single frame's header and check its integrity.
    Inspect(InspectArgs),
    /// Compute the frame check sequence of some bytes.
    Fcs(FcsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Fragment(args) => fragment::run(args, format),
        Command::Assemble(args) => assemble::run(args, format),
        Command::Inspect(args) => inspect::run(args, format),
        Command::Fcs(args) => fcs::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Parse a decimal or `0x`-prefixed hex integer.
pub fn parse_number<T>(input: &str) -> Result<T, String>
where
    T: TryFrom<u64>,
{
    let input = input.trim();
    let value = match input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => input.parse::<u64>(),
    }
    .map_err(|err| format!("invalid number {input:?}: {err}"))?;

    T::try_from(value).map_err(|_| format!("{input} is out of range"))
}

#[derive(Args, Debug)]
pub struct FragmentArgs {
    /// Destination channel ID (decimal or 0x-prefixed hex).
    #[arg(long, short = 'c', value_parser = parse_number::<u16>)]
    pub channel: u16,
    /// Raw string payload.
    #[arg(long, conflicts_with_all = ["hex", "file"])]
    pub data: Option<String>,
    /// Hex payload.
    #[arg(long, conflicts_with_all = ["data", "file"])]
    pub hex: Option<String>,
    /// Read payload from file.
    #[arg(long, conflicts_with_all = ["data", "hex"])]
    pub file: Option<PathBuf>,
    /// Maximum frame size in bytes, header and checksum included.
    #[arg(long, env = "SARPRIMS_MTU", default_value = DEFAULT_MTU)]
    pub mtu: usize,
    /// Raw sequence byte of the first frame.
    #[arg(long, default_value = "0", value_parser = parse_number::<u8>)]
    pub seq: u8,
    /// Ack-sequence value carried by every frame.
    #[arg(long, default_value = "0", value_parser = parse_number::<u8>)]
    pub ack: u8,
    /// Also write the frames back to back, in binary, to this file.
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct AssembleArgs {
    /// Frames as hex strings, in order.
    #[arg(conflicts_with_all = ["file", "stream"])]
    pub frames: Vec<String>,
    /// Read hex frames from a file, one per line (`-` for stdin).
    #[arg(long, conflicts_with_all = ["frames", "stream"])]
    pub file: Option<PathBuf>,
    /// Read binary frames written back to back.
    #[arg(long, conflicts_with_all = ["frames", "file"])]
    pub stream: Option<PathBuf>,
    /// Require continuation SAR bits on interior frames.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Frame as a hex string.
    pub frame: String,
    /// Treat the frame as the first of a segmented set (reads the total length).
    #[arg(long)]
    pub first: bool,
}

#[derive(Args, Debug)]
pub struct FcsArgs {
    /// Bytes as a hex string.
    pub hex: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_number_accepts_hex_and_decimal() {
        assert_eq!(parse_number::<u16>("0x0048").unwrap(), 0x48);
        assert_eq!(parse_number::<u16>("72").unwrap(), 72);
        assert_eq!(parse_number::<u8>("0X3f").unwrap(), 0x3F);
    }

    #[test]
    fn parse_number_rejects_out_of_range() {
        assert!(parse_number::<u8>("256").is_err());
        assert!(parse_number::<u16>("0x10000").is_err());
        assert!(parse_number::<u16>("nope").is_err());
    }
}
