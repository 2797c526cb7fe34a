use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use sarprims_frame::FrameReader;
use sarprims_packet::{AssembleConfig, Packet};

use crate::cmd::AssembleArgs;
use crate::exit::{frame_error, io_error, packet_error, CliError, CliResult, SUCCESS, USAGE};
use crate::hex;
use crate::output::{print_packet, OutputFormat};

pub fn run(args: AssembleArgs, format: OutputFormat) -> CliResult<i32> {
    let frames = if let Some(path) = &args.stream {
        read_stream(path)?
    } else if let Some(path) = &args.file {
        read_hex_lines(path)?
    } else {
        decode_all(&args.frames)?
    };

    let config = AssembleConfig {
        strict_continuation: args.strict,
    };
    let packet = Packet::assemble_with_config(&frames, &config)
        .map_err(|err| packet_error("assemble failed", err))?;
    tracing::info!(
        channel = packet.channel_id(),
        bytes = packet.len(),
        frames = frames.len(),
        "assembled packet"
    );

    print_packet(&packet, format);
    Ok(SUCCESS)
}

fn decode_all(lines: &[String]) -> CliResult<Vec<Vec<u8>>> {
    lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            hex::decode(line).map_err(|err| CliError::new(USAGE, format!("frame {index}: {err}")))
        })
        .collect()
}

/// One hex frame per line. Blank lines and `#` comments are skipped.
fn read_hex_lines(path: &Path) -> CliResult<Vec<Vec<u8>>> {
    let reader: Box<dyn BufRead> = if path == Path::new("-") {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(path)
            .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?;
        Box::new(BufReader::new(file))
    };

    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|err| io_error("failed reading frames", err))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        lines.push(line.to_string());
    }
    decode_all(&lines)
}

fn read_stream(path: &Path) -> CliResult<Vec<Vec<u8>>> {
    let file = File::open(path)
        .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?;
    read_frames_until_eof(BufReader::new(file))
}

fn read_frames_until_eof<R: Read>(inner: R) -> CliResult<Vec<Vec<u8>>> {
    FrameReader::new(inner)
        .frames()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| frame_error("stream read failed", err))
}
