//! Well-known channel IDs.
//!
//! Channels below 0x0040 are fixed, protocol-assigned channels.
//! Channels 0x0040-0xFFFF are dynamically allocated per connection.

/// Never used on the wire.
pub const NULL: u16 = 0x0000;

/// BR/EDR signaling.
pub const SIGNALING: u16 = 0x0001;

/// Connectionless data.
pub const CONNECTIONLESS: u16 = 0x0002;

/// Attribute protocol.
pub const ATT: u16 = 0x0004;

/// LE signaling.
pub const LE_SIGNALING: u16 = 0x0005;

/// Security manager protocol.
pub const SMP: u16 = 0x0006;

/// First dynamically allocated channel ID.
pub const DYNAMIC_START: u16 = 0x0040;

/// Returns a human-readable name for a channel ID.
pub fn channel_name(id: u16) -> &'static str {
    match id {
        NULL => "NULL",
        SIGNALING => "SIGNALING",
        CONNECTIONLESS => "CONNECTIONLESS",
        ATT => "ATT",
        LE_SIGNALING => "LE_SIGNALING",
        SMP => "SMP",
        0x0003 | 0x0007..=0x003F => "RESERVED",
        _ => "DYNAMIC",
    }
}

/// Returns true if the channel ID is in the fixed, protocol-assigned range.
pub fn is_fixed(id: u16) -> bool {
    id < DYNAMIC_START
}
