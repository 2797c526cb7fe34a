/// Errors that can occur while parsing, building, or streaming frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The buffer is too short to hold the frame header and checksum.
    #[error("frame truncated ({actual} bytes, need at least {needed})")]
    Truncated { needed: usize, actual: usize },

    /// The payload does not fit in the 16-bit length prefix.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// A length prefix read from a stream exceeds the configured maximum.
    #[error("frame too large ({size} bytes, max {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream reached its end, or stopped accepting bytes.
    #[error("stream closed")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
