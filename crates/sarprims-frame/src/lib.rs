//! Frame-level codec for segmentation and reassembly.
//!
//! Every frame on the wire carries:
//! - A 2-byte little-endian length prefix (frame size minus 4)
//! - A 2-byte little-endian channel ID
//! - A control word: sequence byte, then SAR bits + ack sequence
//! - A 2-byte total length, on the first frame of a segmented set only
//! - The payload, followed by a 2-byte CRC-16 frame check sequence
//!
//! Reassembly across frames lives in `sarprims-packet`.

pub mod channel;
pub mod config;
pub mod error;
pub mod fcs;
pub mod frame;
pub mod reader;
pub mod view;
pub mod writer;

pub use channel::{
    channel_name, is_fixed, ATT, CONNECTIONLESS, DYNAMIC_START, LE_SIGNALING, NULL, SIGNALING,
    SMP,
};
pub use config::FrameConfig;
pub use error::{FrameError, Result};
pub use fcs::{fcs, Fcs};
pub use frame::{
    next_sequence, Frame, FrameHeader, Sar, ACK_MASK, BASIC_HEADER_SIZE, FCS_SIZE,
    FIRST_FRAME_OVERHEAD, FIRST_HEADER_SIZE, FRAME_OVERHEAD, HEADER_SIZE, MAX_FRAME_SIZE,
    SAR_MASK, SEQUENCE_MODULUS,
};
pub use reader::{split_frame, FrameReader, Frames};
pub use view::ByteView;
pub use writer::FrameWriter;
