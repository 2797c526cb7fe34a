//! Segmentation and reassembly of packets over SAR frames.
//!
//! A [`Packet`] is a payload addressed to a channel. [`Packet::fragment`]
//! splits it into an ordered list of frames no larger than a given maximum
//! frame size; [`Packet::assemble`] validates such a list and rebuilds the
//! packet.
//!
//! Both directions are pure functions of their inputs. Running sequence and
//! ack state across packets belongs to the caller and is passed in per call.

pub mod assemble;
pub mod config;
pub mod error;
pub mod fragment;
pub mod packet;

pub use config::AssembleConfig;
pub use error::{PacketError, Result};
pub use fragment::frames_needed;
pub use packet::{Packet, MAX_PACKET_PAYLOAD, PACKET_HEADER_SIZE};
