use sarprims_frame::{FIRST_FRAME_OVERHEAD, FRAME_OVERHEAD, MAX_FRAME_SIZE};
use sarprims_packet::MAX_PACKET_PAYLOAD;

use crate::cmd::{VersionArgs, DEFAULT_MTU};
use crate::exit::{CliResult, SUCCESS};

fn build_lines() -> Vec<(&'static str, String)> {
    vec![
        ("version", env!("CARGO_PKG_VERSION").to_string()),
        (
            "target",
            option_env!("SARPRIMS_BUILD_TARGET")
                .unwrap_or("unknown")
                .to_string(),
        ),
        ("default_mtu", DEFAULT_MTU.to_string()),
        ("max_frame_size", MAX_FRAME_SIZE.to_string()),
        ("max_packet_payload", MAX_PACKET_PAYLOAD.to_string()),
        ("frame_overhead", FRAME_OVERHEAD.to_string()),
        ("start_frame_overhead", FIRST_FRAME_OVERHEAD.to_string()),
    ]
}

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("sarprims {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    for (key, value) in build_lines() {
        println!("{key}: {value}");
    }
    Ok(SUCCESS)
}
