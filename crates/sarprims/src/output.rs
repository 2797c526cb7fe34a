use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use sarprims_frame::{channel_name, is_fixed, Frame};
use sarprims_packet::Packet;
use serde::Serialize;

use crate::hex;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct FrameOutput {
    index: usize,
    channel: u16,
    channel_name: &'static str,
    fixed_channel: bool,
    sequence: u8,
    tx_seq: u8,
    ack: u8,
    sar: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_length: Option<u16>,
    payload_size: usize,
    wire_size: usize,
    checksum: String,
    hex: String,
}

impl FrameOutput {
    fn new(index: usize, frame: &Frame) -> Self {
        Self {
            index,
            channel: frame.channel_id(),
            channel_name: channel_name(frame.channel_id()),
            fixed_channel: is_fixed(frame.channel_id()),
            sequence: frame.sequence(),
            tx_seq: frame.tx_seq(),
            ack: frame.ack(),
            sar: frame.sar().as_str(),
            total_length: frame.total_length(),
            payload_size: frame.payload().len(),
            wire_size: frame.wire_size(),
            checksum: format!("{:#06x}", frame.checksum()),
            hex: hex::encode(frame.as_bytes()),
        }
    }
}

#[derive(Serialize)]
struct FramesOutput {
    frame_count: usize,
    frames: Vec<FrameOutput>,
}

pub fn print_frames(frames: &[Frame], format: OutputFormat) {
    let rows: Vec<FrameOutput> = frames
        .iter()
        .enumerate()
        .map(|(index, frame)| FrameOutput::new(index, frame))
        .collect();

    match format {
        OutputFormat::Json => {
            let out = FramesOutput {
                frame_count: rows.len(),
                frames: rows,
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec![
                    "#", "CHANNEL", "SEQ", "ACK", "SAR", "TOTAL", "PAYLOAD", "FCS",
                ]);
            for row in &rows {
                table.add_row(vec![
                    row.index.to_string(),
                    channel_label(row.channel),
                    row.sequence.to_string(),
                    row.ack.to_string(),
                    row.sar.to_string(),
                    row.total_length.map(|t| t.to_string()).unwrap_or_default(),
                    row.payload_size.to_string(),
                    row.checksum.clone(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for row in &rows {
                println!(
                    "frame={} channel={:#06x} seq={} ack={} sar={} payload={} fcs={}",
                    row.index,
                    row.channel,
                    row.sequence,
                    row.ack,
                    row.sar,
                    row.payload_size,
                    row.checksum
                );
            }
        }
        OutputFormat::Raw => {
            for row in &rows {
                println!("{}", row.hex);
            }
        }
    }
}

#[derive(Serialize)]
struct PacketOutput {
    channel: u16,
    channel_name: &'static str,
    fixed_channel: bool,
    payload_size: usize,
    payload: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

pub fn print_packet(packet: &Packet, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = PacketOutput {
                channel: packet.channel_id(),
                channel_name: channel_name(packet.channel_id()),
                fixed_channel: is_fixed(packet.channel_id()),
                payload_size: packet.len(),
                payload: hex::encode(packet.payload()),
                text: std::str::from_utf8(packet.payload())
                    .ok()
                    .map(str::to_string),
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["CHANNEL", "SIZE", "PAYLOAD"])
                .add_row(vec![
                    channel_label(packet.channel_id()),
                    packet.len().to_string(),
                    payload_preview(packet.payload()),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "channel={} size={} payload={}",
                channel_label(packet.channel_id()),
                packet.len(),
                payload_preview(packet.payload())
            );
        }
        OutputFormat::Raw => print_raw(packet.payload()),
    }
}

#[derive(Serialize)]
struct InspectOutput {
    #[serde(flatten)]
    frame: FrameOutput,
    length_prefix: u16,
    length_consistent: bool,
    computed_checksum: String,
    checksum_valid: bool,
}

pub fn print_inspection(frame: &Frame, format: OutputFormat) {
    let out = InspectOutput {
        frame: FrameOutput::new(0, frame),
        length_prefix: frame.payload_length(),
        length_consistent: frame.is_length_consistent(),
        computed_checksum: format!("{:#06x}", frame.compute_checksum()),
        checksum_valid: frame.has_valid_checksum(),
    };

    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("frame\n");
            println!("  Channel:      {}", channel_label(out.frame.channel));
            println!(
                "  Length:       {} ({})",
                out.length_prefix,
                if out.length_consistent { "ok" } else { "MISMATCH" }
            );
            println!(
                "  Sequence:     {} (TxSeq {})",
                out.frame.sequence, out.frame.tx_seq
            );
            println!("  Ack:          {}", out.frame.ack);
            println!("  SAR:          {}", out.frame.sar);
            if let Some(total) = out.frame.total_length {
                println!("  Total length: {total}");
            }
            println!("  Payload:      {} bytes", out.frame.payload_size);
            println!(
                "  FCS:          {} (computed {}, {})",
                out.frame.checksum,
                out.computed_checksum,
                if out.checksum_valid { "ok" } else { "MISMATCH" }
            );
        }
        OutputFormat::Raw => print_raw(frame.payload()),
    }
}

#[derive(Serialize)]
struct FcsOutput {
    length: usize,
    fcs: String,
}

pub fn print_fcs(length: usize, fcs: u16, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&FcsOutput {
            length,
            fcs: format!("{fcs:#06x}"),
        }),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("fcs={fcs:#06x} bytes={length} wire={}", hex::encode(&fcs.to_le_bytes()));
        }
        OutputFormat::Raw => println!("{}", hex::encode(&fcs.to_le_bytes())),
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

/// `0x0004 (ATT, fixed)` or `0x0040 (DYNAMIC)`.
fn channel_label(id: u16) -> String {
    if is_fixed(id) {
        format!("{id:#06x} ({}, fixed)", channel_name(id))
    } else {
        format!("{id:#06x} ({})", channel_name(id))
    }
}

fn payload_preview(payload: &[u8]) -> String {
    match std::str::from_utf8(payload) {
        Ok(text) => text.to_string(),
        Err(_) => format!("<binary {} bytes>", payload.len()),
    }
}
