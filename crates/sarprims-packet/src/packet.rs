use bytes::BufMut;
use sarprims_frame::ByteView;

use crate::error::{PacketError, Result};

/// Basic header of a packet: payload length (2) + channel id (2).
pub const PACKET_HEADER_SIZE: usize = 4;

/// Largest payload a 16-bit length field can record.
pub const MAX_PACKET_PAYLOAD: usize = u16::MAX as usize;

/// A complete logical packet: a payload addressed to a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    channel_id: u16,
    payload: Vec<u8>,
}

impl Packet {
    /// Create a new packet.
    pub fn new(channel_id: u16, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            channel_id,
            payload: payload.into(),
        }
    }

    /// Parse the basic-header wire form: length, channel id, payload.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut view = ByteView::new(bytes, 0);
        let (Some(length), Some(channel_id)) = (view.u16_le(), view.u16_le()) else {
            return Err(PacketError::Malformed(format!(
                "{} bytes is shorter than the {PACKET_HEADER_SIZE}-byte header",
                bytes.len()
            )));
        };

        if usize::from(length) != view.remaining() {
            return Err(PacketError::Malformed(format!(
                "length field {length} does not match {} payload bytes",
                view.remaining()
            )));
        }

        Ok(Self::new(channel_id, view.rest()))
    }

    /// Serialize to the basic-header wire form.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let length = self.recorded_length()?;
        let mut out = Vec::with_capacity(PACKET_HEADER_SIZE + self.payload.len());
        out.put_u16_le(length);
        out.put_u16_le(self.channel_id);
        out.put_slice(&self.payload);
        Ok(out)
    }

    pub fn channel_id(&self) -> u16 {
        self.channel_id
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// The payload length as a 16-bit wire value.
    pub(crate) fn recorded_length(&self) -> Result<u16> {
        u16::try_from(self.payload.len()).map_err(|_| {
            PacketError::Malformed(format!(
                "payload of {} bytes exceeds {MAX_PACKET_PAYLOAD}",
                self.payload.len()
            ))
        })
    }
}
