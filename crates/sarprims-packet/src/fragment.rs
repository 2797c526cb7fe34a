use sarprims_frame::{
    next_sequence, Frame, FrameHeader, Sar, FIRST_FRAME_OVERHEAD, FRAME_OVERHEAD, MAX_FRAME_SIZE,
    SEQUENCE_MODULUS,
};
use tracing::{debug, trace};

use crate::error::{PacketError, Result};
use crate::packet::Packet;

/// Number of frames needed to carry `payload_len` bytes in frames of at most
/// `max_frame_size` bytes.
///
/// Payloads that fit in one frame (including empty ones) travel unsegmented.
/// Otherwise the first frame loses two more bytes to the total-length field;
/// at the smallest segmentable size it carries no payload at all.
/// Sizes above [`MAX_FRAME_SIZE`] are clamped to it.
pub fn frames_needed(payload_len: usize, max_frame_size: usize) -> Result<usize> {
    if max_frame_size < FRAME_OVERHEAD {
        return Err(PacketError::MtuTooSmall {
            mtu: max_frame_size,
            min: FRAME_OVERHEAD,
        });
    }
    let mtu = max_frame_size.min(MAX_FRAME_SIZE);

    if payload_len <= mtu - FRAME_OVERHEAD {
        return Ok(1);
    }
    if mtu < FIRST_FRAME_OVERHEAD {
        return Err(PacketError::MtuTooSmall {
            mtu: max_frame_size,
            min: FIRST_FRAME_OVERHEAD,
        });
    }

    let first_capacity = mtu - FIRST_FRAME_OVERHEAD;
    let capacity = mtu - FRAME_OVERHEAD;
    Ok(1 + (payload_len - first_capacity).div_ceil(capacity))
}

impl Packet {
    /// Split this packet into frames of at most `max_frame_size` bytes.
    ///
    /// `max_frame_size` counts the whole frame, length prefix and checksum
    /// included. Frame `i` carries sequence byte
    /// `(start_sequence + 2 * i) % 64`; every frame carries `start_ack`.
    pub fn fragment(
        &self,
        max_frame_size: usize,
        start_sequence: u8,
        start_ack: u8,
    ) -> Result<Vec<Frame>> {
        let total_length = self.recorded_length().inspect_err(|err| {
            debug!(error = %err, "refusing to fragment packet");
        })?;
        let count = frames_needed(self.len(), max_frame_size).inspect_err(|err| {
            debug!(error = %err, payload = self.len(), "refusing to fragment packet");
        })?;

        let mut header = FrameHeader {
            channel_id: self.channel_id(),
            sequence: start_sequence % SEQUENCE_MODULUS,
            ack: start_ack,
            sar: Sar::Unsegmented,
            total_length: None,
        };

        if count == 1 {
            let frame = build(0, &header, self.payload())?;
            trace!(channel = header.channel_id, bytes = self.len(), "unsegmented frame");
            return Ok(vec![frame]);
        }

        let mtu = max_frame_size.min(MAX_FRAME_SIZE);
        let (head, rest) = self.payload().split_at(mtu - FIRST_FRAME_OVERHEAD);

        let mut frames = Vec::with_capacity(count);
        header.sar = Sar::Start;
        header.total_length = Some(total_length);
        frames.push(build(0, &header, head)?);

        header.total_length = None;
        for (offset, chunk) in rest.chunks(mtu - FRAME_OVERHEAD).enumerate() {
            let index = offset + 1;
            header.sequence = next_sequence(header.sequence);
            header.sar = if index == count - 1 {
                Sar::End
            } else {
                Sar::Continuation
            };
            frames.push(build(index, &header, chunk)?);
        }

        debug_assert_eq!(frames.len(), count);
        trace!(
            channel = header.channel_id,
            bytes = self.len(),
            frames = frames.len(),
            "fragmented packet"
        );
        Ok(frames)
    }
}

fn build(index: usize, header: &FrameHeader, payload: &[u8]) -> Result<Frame> {
    Frame::build(header, payload).map_err(|source| PacketError::Frame { index, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_needed_boundaries() {
        assert_eq!(frames_needed(0, 8).unwrap(), 1);
        assert_eq!(frames_needed(92, 100).unwrap(), 1);
        assert_eq!(frames_needed(93, 100).unwrap(), 2);
        // 90 bytes in the first frame, 92 in each following one.
        assert_eq!(frames_needed(90 + 92, 100).unwrap(), 2);
        assert_eq!(frames_needed(90 + 92 + 1, 100).unwrap(), 3);
    }

    #[test]
    fn frames_needed_rejects_tiny_mtu() {
        assert!(matches!(
            frames_needed(0, 7),
            Err(PacketError::MtuTooSmall { mtu: 7, min: 8 })
        ));
        assert!(matches!(
            frames_needed(5, 9),
            Err(PacketError::MtuTooSmall { mtu: 9, min: 10 })
        ));
        assert_eq!(frames_needed(1, 9).unwrap(), 1);
        assert_eq!(frames_needed(2, 10).unwrap(), 1);
        // Empty start frame, then 2 bytes per frame.
        assert_eq!(frames_needed(5, 10).unwrap(), 4);
        // 1 byte in the first frame, then 3 per frame.
        assert_eq!(frames_needed(5, 11).unwrap(), 3);
    }

    #[test]
    fn frames_needed_clamps_huge_mtu() {
        assert_eq!(frames_needed(u16::MAX as usize, usize::MAX).unwrap(), 2);
    }

    #[test]
    fn empty_payload_is_one_unsegmented_frame() {
        let frames = Packet::new(0x0040, Vec::new()).fragment(48, 6, 3).unwrap();

        assert_eq!(frames.len(), 1);
        let frame = &frames[0];
        assert!(frame.is_unsegmented());
        assert!(frame.payload().is_empty());
        assert_eq!(frame.sequence(), 6);
        assert_eq!(frame.ack(), 3);
        assert_eq!(frame.wire_size(), FRAME_OVERHEAD);
    }

    #[test]
    fn small_payload_is_one_frame() {
        let frames = Packet::new(0x0041, b"hello".to_vec())
            .fragment(64, 70, 0x45)
            .unwrap();

        assert_eq!(frames.len(), 1);
        assert!(frames[0].is_unsegmented());
        assert_eq!(frames[0].sequence(), 6);
        assert_eq!(frames[0].ack(), 0x05);
        assert_eq!(frames[0].total_length(), None);
        assert_eq!(frames[0].payload(), b"hello");
    }

    #[test]
    fn exact_fit_stays_unsegmented() {
        let frames = Packet::new(1, vec![7u8; 24]).fragment(32, 0, 0).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].wire_size(), 32);
    }

    #[test]
    fn segmented_layout() {
        let payload: Vec<u8> = (0..=255u8).collect();
        let frames = Packet::new(0x0050, payload.clone())
            .fragment(100, 0, 1)
            .unwrap();

        assert_eq!(frames.len(), 3);
        assert!(frames[0].is_start());
        assert_eq!(frames[0].total_length(), Some(256));
        assert_eq!(frames[0].payload(), &payload[..90]);
        assert!(frames[1].is_continuation());
        assert_eq!(frames[1].payload(), &payload[90..182]);
        assert!(frames[2].is_end());
        assert_eq!(frames[2].payload(), &payload[182..]);

        for frame in &frames {
            assert!(frame.wire_size() <= 100);
            assert!(frame.has_valid_checksum());
            assert!(frame.is_length_consistent());
            assert_eq!(frame.channel_id(), 0x0050);
            assert_eq!(frame.ack(), 1);
        }
        let sequences: Vec<u8> = frames.iter().map(Frame::sequence).collect();
        assert_eq!(sequences, vec![0, 2, 4]);
    }

    #[test]
    fn two_frame_set_has_no_continuation() {
        let frames = Packet::new(1, vec![0u8; 30]).fragment(24, 10, 0).unwrap();
        let sars: Vec<Sar> = frames.iter().map(Frame::sar).collect();
        assert_eq!(sars, vec![Sar::Start, Sar::End]);
    }

    #[test]
    fn sequence_wraps_during_fragmentation() {
        let frames = Packet::new(1, vec![0u8; 100]).fragment(20, 60, 0).unwrap();
        let sequences: Vec<u8> = frames.iter().map(Frame::sequence).collect();
        assert_eq!(&sequences[..4], &[60, 62, 0, 2]);
    }

    #[test]
    fn oversized_packet_is_malformed() {
        let packet = Packet::new(1, vec![0u8; u16::MAX as usize + 1]);
        assert!(matches!(
            packet.fragment(1000, 0, 0),
            Err(PacketError::Malformed(_))
        ));
    }

    #[test]
    fn mtu_too_small() {
        let packet = Packet::new(1, b"abc".to_vec());
        assert!(matches!(
            packet.fragment(4, 0, 0),
            Err(PacketError::MtuTooSmall { .. })
        ));
    }

    #[test]
    fn smallest_segmenting_mtu_sends_empty_start_frame() {
        let packet = Packet::new(0x40, vec![1u8; 5]);
        let frames = packet.fragment(FIRST_FRAME_OVERHEAD, 0, 0).unwrap();

        assert_eq!(frames.len(), 4);
        assert!(frames[0].is_start());
        assert!(frames[0].payload().is_empty());
        assert_eq!(frames[0].total_length(), Some(5));
        assert_eq!(frames[3].payload(), &[1]);
        assert!(frames[3].is_end());
        assert!(frames.iter().all(|f| f.wire_size() <= FIRST_FRAME_OVERHEAD));
        assert_eq!(Packet::assemble(&frames).unwrap(), packet);
    }

    #[test]
    fn does_not_mutate_packet() {
        let packet = Packet::new(9, vec![1u8; 500]);
        let before = packet.clone();
        let _ = packet.fragment(64, 0, 0).unwrap();
        assert_eq!(packet, before);
    }
}
