use sarprims_frame::{next_sequence, Frame, Sar, BASIC_HEADER_SIZE};
use tracing::{debug, trace};

use crate::config::AssembleConfig;
use crate::error::{PacketError, Result};
use crate::packet::Packet;

impl Packet {
    /// Reassemble a packet from an ordered list of raw frames.
    ///
    /// Each frame is checked for a consistent length prefix, a valid
    /// checksum, a shared channel id, and a sequence byte advancing by 2
    /// modulo 64. A single frame must be unsegmented; a set must open with
    /// a start frame, close with an end frame, and carry a total length that
    /// matches the reassembled payload.
    pub fn assemble<B: AsRef<[u8]>>(frames: &[B]) -> Result<Self> {
        Self::assemble_with_config(frames, &AssembleConfig::default())
    }

    /// Like [`Packet::assemble`], with explicit validation settings.
    pub fn assemble_with_config<B: AsRef<[u8]>>(
        frames: &[B],
        config: &AssembleConfig,
    ) -> Result<Self> {
        let count = frames.len();
        if count == 0 {
            return Err(reject(PacketError::Empty));
        }
        let segmented = count > 1;

        let mut channel_id = 0u16;
        let mut previous_sequence = None;
        let mut total_length = None;
        let mut payload = Vec::new();

        for (index, raw) in frames.iter().enumerate() {
            let first = index == 0;
            let frame = Frame::parse(raw.as_ref(), first && segmented)
                .map_err(|source| reject(PacketError::Frame { index, source }))?;

            if !segmented && !frame.is_unsegmented() {
                return Err(reject(PacketError::BadSegmentation {
                    index,
                    count,
                    sar: frame.sar(),
                }));
            }

            check_integrity(index, &frame).map_err(reject)?;

            if first {
                channel_id = frame.channel_id();
            } else if frame.channel_id() != channel_id {
                return Err(reject(PacketError::ChannelMismatch {
                    index,
                    expected: channel_id,
                    actual: frame.channel_id(),
                }));
            }

            if let Some(previous) = previous_sequence {
                let expected = next_sequence(previous);
                if frame.sequence() != expected {
                    return Err(reject(PacketError::SequenceMismatch {
                        index,
                        expected,
                        actual: frame.sequence(),
                    }));
                }
            }
            previous_sequence = Some(frame.sequence());

            if segmented && !sar_fits_position(frame.sar(), index, count, config) {
                return Err(reject(PacketError::BadSegmentation {
                    index,
                    count,
                    sar: frame.sar(),
                }));
            }

            if let Some(total) = frame.total_length() {
                total_length = Some(total);
                payload.reserve(usize::from(total));
            }
            payload.extend_from_slice(frame.payload());
            trace!(
                index,
                sequence = frame.sequence(),
                bytes = frame.payload().len(),
                "accepted frame"
            );
        }

        if let Some(declared) = total_length {
            if payload.len() != usize::from(declared) {
                return Err(reject(PacketError::TotalLengthMismatch {
                    declared,
                    actual: payload.len(),
                }));
            }
        }

        Ok(Packet::new(channel_id, payload))
    }
}

fn check_integrity(index: usize, frame: &Frame) -> Result<()> {
    if !frame.is_length_consistent() {
        return Err(PacketError::LengthMismatch {
            index,
            declared: frame.payload_length(),
            expected: frame.wire_size() - BASIC_HEADER_SIZE,
        });
    }

    let computed = frame.compute_checksum();
    if frame.checksum() != computed {
        return Err(PacketError::ChecksumMismatch {
            index,
            stored: frame.checksum(),
            computed,
        });
    }

    Ok(())
}

/// SAR rules for a frame inside a set of `count > 1` frames.
fn sar_fits_position(sar: Sar, index: usize, count: usize, config: &AssembleConfig) -> bool {
    if index == 0 {
        sar == Sar::Start
    } else if index == count - 1 {
        sar == Sar::End
    } else if config.strict_continuation {
        sar == Sar::Continuation
    } else {
        sar != Sar::Start
    }
}

fn reject(err: PacketError) -> PacketError {
    debug!(error = %err, "rejecting frame set");
    err
}
