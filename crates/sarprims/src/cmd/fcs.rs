use crate::cmd::FcsArgs;
use crate::exit::{CliError, CliResult, SUCCESS, USAGE};
use crate::hex;
use crate::output::{print_fcs, OutputFormat};

pub fn run(args: FcsArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes = hex::decode(&args.hex).map_err(|err| CliError::new(USAGE, err))?;
    print_fcs(bytes.len(), sarprims_frame::fcs(&bytes), format);
    Ok(SUCCESS)
}
