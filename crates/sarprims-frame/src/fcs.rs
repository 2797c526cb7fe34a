//! Frame check sequence: table-driven CRC-16, reflected polynomial 0xA001.
//!
//! Initial state 0, no final XOR. Processed one byte at a time:
//! `state = (state >> 8) ^ TABLE[(state ^ byte) & 0xFF]`.

const POLYNOMIAL: u16 = 0xA001;

/// Precomputed lookup table, one entry per byte value.
pub const TABLE: [u16; 256] = build_table();

const fn build_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u16;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ POLYNOMIAL
            } else {
                crc >> 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Incremental FCS computation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fcs {
    state: u16,
}

impl Fcs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            let index = usize::from((self.state ^ u16::from(byte)) & 0xFF);
            self.state = (self.state >> 8) ^ TABLE[index];
        }
    }

    pub fn finish(self) -> u16 {
        self.state
    }
}

/// Compute the FCS of `bytes` in one pass.
pub fn fcs(bytes: &[u8]) -> u16 {
    let mut hasher = Fcs::new();
    hasher.update(bytes);
    hasher.finish()
}
