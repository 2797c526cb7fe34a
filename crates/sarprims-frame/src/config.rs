use crate::frame::MAX_FRAME_SIZE;

/// Configuration for streaming frames over a byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameConfig {
    /// Maximum wire size of a single frame. Default: [`MAX_FRAME_SIZE`].
    pub max_frame_size: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_frame_size: MAX_FRAME_SIZE,
        }
    }
}
