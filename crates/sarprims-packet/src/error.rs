use sarprims_frame::{FrameError, Sar};

/// Errors that can occur while assembling or fragmenting a packet.
///
/// Per-frame variants carry the zero-based index of the offending frame.
#[derive(Debug, thiserror::Error)]
pub enum PacketError {
    /// No frames were supplied.
    #[error("no frames to assemble")]
    Empty,

    /// A frame could not be parsed at all.
    #[error("frame {index}: {source}")]
    Frame {
        index: usize,
        #[source]
        source: FrameError,
    },

    /// The length prefix disagrees with the frame size.
    #[error("frame {index}: length prefix {declared} does not match frame size ({expected} expected)")]
    LengthMismatch {
        index: usize,
        declared: u16,
        expected: usize,
    },

    /// The trailing checksum does not match the frame contents.
    #[error("frame {index}: checksum {stored:#06x} does not match computed {computed:#06x}")]
    ChecksumMismatch {
        index: usize,
        stored: u16,
        computed: u16,
    },

    /// A frame belongs to a different channel than the first frame.
    #[error("frame {index}: channel {actual:#06x} does not match {expected:#06x}")]
    ChannelMismatch {
        index: usize,
        expected: u16,
        actual: u16,
    },

    /// A frame's sequence byte does not follow the previous frame's.
    #[error("frame {index}: sequence {actual} out of order (expected {expected})")]
    SequenceMismatch { index: usize, expected: u8, actual: u8 },

    /// A frame's SAR bits are wrong for its position in the set.
    #[error("frame {index} of {count}: unexpected SAR {sar}")]
    BadSegmentation { index: usize, count: usize, sar: Sar },

    /// The reassembled payload length disagrees with the first frame's total length.
    #[error("reassembled {actual} bytes, first frame declared {declared}")]
    TotalLengthMismatch { declared: u16, actual: usize },

    /// The packet itself is inconsistent or cannot be represented on the wire.
    #[error("malformed packet: {0}")]
    Malformed(String),

    /// The maximum frame size leaves no room for payload.
    #[error("max frame size {mtu} too small (need at least {min})")]
    MtuTooSmall { mtu: usize, min: usize },
}

pub type Result<T> = std::result::Result<T, PacketError>;
