use sarprims_frame::Frame;

use crate::cmd::InspectArgs;
use crate::exit::{frame_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::hex;
use crate::output::{print_inspection, OutputFormat};

/// Prints the decoded frame even when it fails its integrity checks; the
/// exit code reports whether it would pass them.
pub fn run(args: InspectArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes =
        hex::decode(&args.frame).map_err(|err| CliError::new(USAGE, format!("frame: {err}")))?;
    let frame = Frame::parse(&bytes, args.first).map_err(|err| frame_error("parse failed", err))?;

    print_inspection(&frame, format);

    if frame.is_length_consistent() && frame.has_valid_checksum() {
        Ok(SUCCESS)
    } else {
        tracing::warn!(
            length_consistent = frame.is_length_consistent(),
            checksum_valid = frame.has_valid_checksum(),
            "frame fails integrity checks"
        );
        Ok(DATA_INVALID)
    }
}
