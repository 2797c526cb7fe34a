use std::fmt;

use bytes::BufMut;

use crate::error::{FrameError, Result};
use crate::fcs::fcs;
use crate::view::ByteView;

/// Length prefix (2) + channel id (2).
pub const BASIC_HEADER_SIZE: usize = 4;

/// Basic header (4) + control word (2).
pub const HEADER_SIZE: usize = 6;

/// Header of the first frame of a segmented set: adds the 2-byte total length.
pub const FIRST_HEADER_SIZE: usize = 8;

/// Trailing checksum size.
pub const FCS_SIZE: usize = 2;

/// Smallest possible frame: header + checksum, no payload.
pub const FRAME_OVERHEAD: usize = HEADER_SIZE + FCS_SIZE;

/// Overhead of the first frame of a segmented set.
pub const FIRST_FRAME_OVERHEAD: usize = FIRST_HEADER_SIZE + FCS_SIZE;

/// Largest frame the 16-bit length prefix can describe.
pub const MAX_FRAME_SIZE: usize = u16::MAX as usize + 4;

/// Bits of the control word holding the SAR indicator.
pub const SAR_MASK: u16 = 0xC000;

/// Bits of the ack/SAR byte holding the ack-sequence value.
pub const ACK_MASK: u8 = 0x3F;

/// Raw sequence bytes wrap at this value.
pub const SEQUENCE_MODULUS: u8 = 64;

/// Raw sequence increment between consecutive frames.
pub const SEQUENCE_STEP: u8 = 2;

/// Raw sequence byte that follows `sequence`.
pub fn next_sequence(sequence: u8) -> u8 {
    ((u16::from(sequence) + u16::from(SEQUENCE_STEP)) % u16::from(SEQUENCE_MODULUS)) as u8
}

/// Segmentation-and-reassembly indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Sar {
    #[default]
    Unsegmented,
    Start,
    End,
    Continuation,
}

impl Sar {
    /// Decode the SAR field from a control word.
    pub fn from_controls(controls: u16) -> Self {
        match controls & SAR_MASK {
            0x0000 => Sar::Unsegmented,
            0x4000 => Sar::Start,
            0x8000 => Sar::End,
            _ => Sar::Continuation,
        }
    }

    /// The two SAR bits, right-aligned.
    pub fn bits(self) -> u8 {
        match self {
            Sar::Unsegmented => 0b00,
            Sar::Start => 0b01,
            Sar::End => 0b10,
            Sar::Continuation => 0b11,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Sar::Unsegmented => "unsegmented",
            Sar::Start => "start",
            Sar::End => "end",
            Sar::Continuation => "continuation",
        }
    }
}

impl fmt::Display for Sar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Header fields for [`Frame::build`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameHeader {
    pub channel_id: u16,
    /// Raw sequence byte (TxSeq << 1).
    pub sequence: u8,
    /// Ack-sequence value; only the low six bits are encoded.
    pub ack: u8,
    pub sar: Sar,
    /// Present only on the first frame of a segmented set.
    pub total_length: Option<u16>,
}

impl FrameHeader {
    fn header_len(&self) -> usize {
        if self.total_length.is_some() {
            FIRST_HEADER_SIZE
        } else {
            HEADER_SIZE
        }
    }

    fn ack_sar_byte(&self) -> u8 {
        (self.sar.bits() << 6) | (self.ack & ACK_MASK)
    }
}

/// One on-wire frame.
///
/// Wire format:
/// ```text
/// ┌──────────┬──────────┬─────┬─────────┬──────────────┬─────────┬──────────┐
/// │ Length   │ Channel  │ Seq │ SAR|Ack │ Total length │ Payload │ FCS      │
/// │ (2B LE)  │ (2B LE)  │ 1B  │ 1B      │ (2B LE, opt) │         │ (2B LE)  │
/// └──────────┴──────────┴─────┴─────────┴──────────────┴─────────┴──────────┘
/// ```
///
/// The length prefix counts every byte after itself except the checksum. The
/// total length field is present only on the first frame of a segmented set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Vec<u8>,
    payload_length: u16,
    channel_id: u16,
    controls: u16,
    total_length: Option<u16>,
    checksum: u16,
}

impl Frame {
    /// Decode the header fields of a raw frame.
    ///
    /// `first_of_set` tells the parser to also read the total-length field.
    /// Checksum and length-prefix consistency are not checked here; a frame
    /// on its own cannot tell whether it belongs to a larger set.
    pub fn parse(bytes: &[u8], first_of_set: bool) -> Result<Self> {
        let header_len = if first_of_set {
            FIRST_HEADER_SIZE
        } else {
            HEADER_SIZE
        };
        let needed = header_len + FCS_SIZE;
        let truncated = || FrameError::Truncated {
            needed,
            actual: bytes.len(),
        };
        if bytes.len() < needed {
            return Err(truncated());
        }

        let mut view = ByteView::new(bytes, 0);
        let payload_length = view.u16_le().ok_or_else(truncated)?;
        let channel_id = view.u16_le().ok_or_else(truncated)?;
        let controls = view.u16_le().ok_or_else(truncated)?;
        let total_length = if first_of_set {
            Some(view.u16_le().ok_or_else(truncated)?)
        } else {
            None
        };

        let checksum = ByteView::new(bytes, bytes.len() - FCS_SIZE)
            .u16_le()
            .ok_or_else(truncated)?;

        Ok(Self {
            bytes: bytes.to_vec(),
            payload_length,
            channel_id,
            controls,
            total_length,
            checksum,
        })
    }

    /// Build a complete frame with a freshly computed checksum.
    pub fn build(header: &FrameHeader, payload: &[u8]) -> Result<Self> {
        let header_len = header.header_len();
        let size = header_len + payload.len() + FCS_SIZE;
        if size > MAX_FRAME_SIZE {
            return Err(FrameError::PayloadTooLarge {
                size: payload.len(),
                max: MAX_FRAME_SIZE - header_len - FCS_SIZE,
            });
        }
        let payload_length = (size - BASIC_HEADER_SIZE) as u16;

        let mut bytes = Vec::with_capacity(size);
        bytes.put_u16_le(payload_length);
        bytes.put_u16_le(header.channel_id);
        bytes.put_u8(header.sequence);
        bytes.put_u8(header.ack_sar_byte());
        if let Some(total) = header.total_length {
            bytes.put_u16_le(total);
        }
        bytes.put_slice(payload);

        let checksum = fcs(&bytes);
        bytes.put_u16_le(checksum);

        Ok(Self {
            bytes,
            payload_length,
            channel_id: header.channel_id,
            controls: u16::from_le_bytes([header.sequence, header.ack_sar_byte()]),
            total_length: header.total_length,
            checksum,
        })
    }

    pub fn channel_id(&self) -> u16 {
        self.channel_id
    }

    /// The length prefix as stored on the wire.
    pub fn payload_length(&self) -> u16 {
        self.payload_length
    }

    /// The control word: sequence byte low, ack/SAR byte high.
    pub fn controls(&self) -> u16 {
        self.controls
    }

    /// Raw sequence byte.
    pub fn sequence(&self) -> u8 {
        self.controls.to_le_bytes()[0]
    }

    /// Logical TxSeq.
    pub fn tx_seq(&self) -> u8 {
        self.sequence() >> 1
    }

    /// Ack-sequence value from the low bits of byte 5.
    pub fn ack(&self) -> u8 {
        self.controls.to_le_bytes()[1] & ACK_MASK
    }

    pub fn sar(&self) -> Sar {
        Sar::from_controls(self.controls)
    }

    /// Total reassembled length; only read for the first frame of a segmented set.
    pub fn total_length(&self) -> Option<u16> {
        self.total_length
    }

    /// The trailing checksum as stored on the wire.
    pub fn checksum(&self) -> u16 {
        self.checksum
    }

    /// Recompute the checksum over every byte except the trailing two.
    pub fn compute_checksum(&self) -> u16 {
        fcs(&self.bytes[..self.bytes.len() - FCS_SIZE])
    }

    pub fn has_valid_checksum(&self) -> bool {
        self.checksum == self.compute_checksum()
    }

    /// Whether the length prefix agrees with the actual frame size.
    pub fn is_length_consistent(&self) -> bool {
        usize::from(self.payload_length) == self.bytes.len() - BASIC_HEADER_SIZE
    }

    pub fn is_unsegmented(&self) -> bool {
        self.sar() == Sar::Unsegmented
    }

    pub fn is_start(&self) -> bool {
        self.sar() == Sar::Start
    }

    pub fn is_end(&self) -> bool {
        self.sar() == Sar::End
    }

    pub fn is_continuation(&self) -> bool {
        self.sar() == Sar::Continuation
    }

    /// Bytes before the payload.
    pub fn header_len(&self) -> usize {
        if self.total_length.is_some() {
            FIRST_HEADER_SIZE
        } else {
            HEADER_SIZE
        }
    }

    /// The segment's share of the packet bytes.
    pub fn payload(&self) -> &[u8] {
        &self.bytes[self.header_len()..self.bytes.len() - FCS_SIZE]
    }

    /// The total wire size of this frame.
    pub fn wire_size(&self) -> usize {
        self.bytes.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
