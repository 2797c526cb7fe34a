use std::io::{ErrorKind, Read};

use bytes::BytesMut;
use tracing::{debug, trace};

use crate::config::FrameConfig;
use crate::error::{FrameError, Result};
use crate::frame::BASIC_HEADER_SIZE;

const READ_CHUNK_SIZE: usize = 4 * 1024;

/// Wire size announced by the length prefix at the front of `src`.
fn announced_size(src: &[u8]) -> Option<usize> {
    match src {
        [lo, hi, ..] => Some(usize::from(u16::from_le_bytes([*lo, *hi])) + BASIC_HEADER_SIZE),
        _ => None,
    }
}

/// Split one complete raw frame off the front of `src`.
///
/// Frames are self-delimiting: the wire size is the length prefix plus 4.
/// Returns `Ok(None)` until the whole frame is buffered.
pub fn split_frame(src: &mut BytesMut, max_frame_size: usize) -> Result<Option<Vec<u8>>> {
    let Some(size) = announced_size(src) else {
        return Ok(None);
    };
    if size > max_frame_size {
        debug!(size, max = max_frame_size, "rejecting oversized frame");
        return Err(FrameError::FrameTooLarge {
            size,
            max: max_frame_size,
        });
    }
    if src.len() < size {
        return Ok(None);
    }

    let frame = src.split_to(size).to_vec();
    trace!(size, buffered = src.len(), "split frame");
    Ok(Some(frame))
}

/// Pulls raw frames out of a byte stream that carries them back to back.
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
}

impl<T: Read> FrameReader<T> {
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::new(),
            config,
        }
    }

    /// Read the next complete frame, blocking until it has arrived.
    ///
    /// End of stream is `FrameError::ConnectionClosed`; [`buffered_len`]
    /// then tells whether it fell between frames or inside one.
    ///
    /// [`buffered_len`]: FrameReader::buffered_len
    pub fn read_frame(&mut self) -> Result<Vec<u8>> {
        loop {
            if let Some(frame) = split_frame(&mut self.buf, self.config.max_frame_size)? {
                return Ok(frame);
            }
            if self.fill()? == 0 {
                return Err(FrameError::ConnectionClosed);
            }
        }
    }

    /// Iterate over frames until the stream ends.
    ///
    /// A clean end finishes the iteration. A stream that stops inside a frame
    /// yields one final `FrameError::Truncated`.
    pub fn frames(&mut self) -> Frames<'_, T> {
        Frames {
            reader: self,
            done: false,
        }
    }

    /// Bytes read from the stream but not yet returned as a frame.
    pub fn buffered_len(&self) -> usize {
        self.buf.len()
    }

    pub fn into_inner(self) -> T {
        self.inner
    }

    fn fill(&mut self) -> Result<usize> {
        let start = self.buf.len();
        self.buf.resize(start + READ_CHUNK_SIZE, 0);
        loop {
            match self.inner.read(&mut self.buf[start..]) {
                Ok(n) => {
                    self.buf.truncate(start + n);
                    return Ok(n);
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    self.buf.truncate(start);
                    return Err(FrameError::Io(err));
                }
            }
        }
    }
}

/// Iterator returned by [`FrameReader::frames`].
pub struct Frames<'a, T> {
    reader: &'a mut FrameReader<T>,
    done: bool,
}

impl<T: Read> Iterator for Frames<'_, T> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read_frame() {
            Ok(frame) => Some(Ok(frame)),
            Err(FrameError::ConnectionClosed) if self.reader.buffered_len() == 0 => {
                self.done = true;
                None
            }
            Err(FrameError::ConnectionClosed) => {
                self.done = true;
                let actual = self.reader.buffered_len();
                let needed = announced_size(&self.reader.buf).unwrap_or(2);
                Some(Err(FrameError::Truncated { needed, actual }))
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor};

    use super::*;
    use crate::frame::{Frame, FrameHeader, Sar};

    fn wire(sequence: u8, payload: &[u8]) -> Vec<u8> {
        Frame::build(
            &FrameHeader {
                channel_id: 0x0041,
                sequence,
                sar: Sar::Unsegmented,
                ..FrameHeader::default()
            },
            payload,
        )
        .unwrap()
        .into_bytes()
    }

    /// Hands out one byte per call, interrupting before each.
    struct Trickle {
        bytes: Vec<u8>,
        pos: usize,
        interrupt: bool,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::Error::from(ErrorKind::Interrupted));
            }
            match self.bytes.get(self.pos) {
                Some(&byte) => {
                    buf[0] = byte;
                    self.pos += 1;
                    Ok(1)
                }
                None => Ok(0),
            }
        }
    }

    #[test]
    fn frames_iterates_back_to_back_frames() {
        let set = [wire(0, b"one"), wire(2, b""), wire(4, b"three")];
        let mut reader = FrameReader::new(Cursor::new(set.concat()));

        let frames: Vec<Vec<u8>> = reader.frames().collect::<Result<_>>().unwrap();
        assert_eq!(frames, set);
        assert_eq!(reader.buffered_len(), 0);
    }

    #[test]
    fn trickled_interrupted_stream_still_splits() {
        let set = [wire(0, b"slow"), wire(2, b"er")];
        let mut reader = FrameReader::new(Trickle {
            bytes: set.concat(),
            pos: 0,
            interrupt: false,
        });

        assert_eq!(reader.read_frame().unwrap(), set[0]);
        assert_eq!(reader.read_frame().unwrap(), set[1]);
        assert!(matches!(reader.read_frame(), Err(FrameError::ConnectionClosed)));
    }

    #[test]
    fn stream_ending_inside_a_frame_is_truncated() {
        let whole = wire(0, b"abc");
        let mut stream = whole.clone();
        stream.extend_from_slice(&wire(2, b"partial")[..7]);

        let mut reader = FrameReader::new(Cursor::new(stream));
        let mut frames = reader.frames();
        assert_eq!(frames.next().unwrap().unwrap(), whole);
        assert!(matches!(
            frames.next(),
            Some(Err(FrameError::Truncated { needed: 15, actual: 7 }))
        ));
        assert!(frames.next().is_none());
    }

    #[test]
    fn single_stray_byte_is_truncated() {
        let mut reader = FrameReader::new(Cursor::new(vec![0x06]));
        assert!(matches!(
            reader.frames().next(),
            Some(Err(FrameError::Truncated { needed: 2, actual: 1 }))
        ));
    }

    #[test]
    fn empty_stream_has_no_frames() {
        let mut reader = FrameReader::new(io::empty());
        assert!(reader.frames().next().is_none());
        assert!(matches!(reader.read_frame(), Err(FrameError::ConnectionClosed)));
    }

    #[test]
    fn oversized_prefix_is_rejected_before_buffering_the_body() {
        let mut reader = FrameReader::with_config(
            Cursor::new(wire(0, &[0u8; 64])),
            FrameConfig { max_frame_size: 32 },
        );
        assert!(matches!(
            reader.read_frame(),
            Err(FrameError::FrameTooLarge { size: 72, max: 32 })
        ));
    }

    #[test]
    fn split_frame_waits_for_the_whole_frame() {
        let bytes = wire(0, b"abc");
        let mut buf = BytesMut::from(&bytes[..1]);
        assert!(split_frame(&mut buf, usize::MAX).unwrap().is_none());

        buf.extend_from_slice(&bytes[1..5]);
        assert!(split_frame(&mut buf, usize::MAX).unwrap().is_none());

        buf.extend_from_slice(&bytes[5..]);
        buf.extend_from_slice(&[0xEE]);
        assert_eq!(split_frame(&mut buf, usize::MAX).unwrap(), Some(bytes));
        assert_eq!(&buf[..], &[0xEE]);
    }
}
