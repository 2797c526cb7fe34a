//! Segmentation and reassembly of channel packets into checksummed frames.
//!
//! sarprims turns one logical packet into an ordered list of L2CAP-style
//! frames no larger than a transport's MTU, and validates and rebuilds
//! packets from such lists.
//!
//! ```
//! use sarprims::Packet;
//!
//! let packet = Packet::new(0x0040, vec![7u8; 300]);
//! let frames = packet.fragment(128, 0, 0)?;
//! assert_eq!(frames.len(), 3);
//!
//! let rebuilt = Packet::assemble(&frames)?;
//! assert_eq!(rebuilt, packet);
//! # Ok::<(), sarprims::PacketError>(())
//! ```
//!
//! # Crate Structure
//!
//! - [`frame`]: byte cursor, FCS checksum, frame parse/build, stream delimiting
//! - [`packet`]: packet assembly and fragmentation

/// Re-export frame types.
pub mod frame {
    pub use sarprims_frame::*;
}

/// Re-export packet types.
pub mod packet {
    pub use sarprims_packet::*;
}

pub use sarprims_frame::{Frame, FrameError};
pub use sarprims_packet::{AssembleConfig, Packet, PacketError};
