/// Controls how strictly frame sets are validated during reassembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssembleConfig {
    /// When true, interior frames of a segmented set must carry the
    /// continuation SAR bits. By default only sequence continuity and the
    /// absence of a second start marker are enforced for them.
    pub strict_continuation: bool,
}

impl AssembleConfig {
    /// Configuration that also checks interior SAR bits.
    pub fn strict() -> Self {
        Self {
            strict_continuation: true,
        }
    }
}
