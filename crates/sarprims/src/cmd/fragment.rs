use std::fs::{self, File};
use std::io::BufWriter;

use sarprims_frame::FrameWriter;
use sarprims_packet::Packet;

use crate::cmd::FragmentArgs;
use crate::exit::{frame_error, io_error, packet_error, CliError, CliResult, SUCCESS, USAGE};
use crate::hex;
use crate::output::{print_frames, OutputFormat};

pub fn run(args: FragmentArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = resolve_payload(&args)?;
    let packet = Packet::new(args.channel, payload);

    let frames = packet
        .fragment(args.mtu, args.seq, args.ack)
        .map_err(|err| packet_error("fragment failed", err))?;
    tracing::info!(
        channel = args.channel,
        bytes = packet.len(),
        mtu = args.mtu,
        frames = frames.len(),
        "fragmented packet"
    );

    if let Some(path) = &args.out {
        let file = File::create(path)
            .map_err(|err| io_error(&format!("failed creating {}", path.display()), err))?;
        let mut writer = FrameWriter::new(BufWriter::new(file));
        writer
            .write_frames(&frames)
            .map_err(|err| frame_error("write failed", err))?;
    }

    print_frames(&frames, format);
    Ok(SUCCESS)
}

fn resolve_payload(args: &FragmentArgs) -> CliResult<Vec<u8>> {
    if let Some(data) = &args.data {
        return Ok(data.as_bytes().to_vec());
    }
    if let Some(text) = &args.hex {
        return hex::decode(text).map_err(|err| CliError::new(USAGE, format!("--hex: {err}")));
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    Ok(Vec::new())
}
