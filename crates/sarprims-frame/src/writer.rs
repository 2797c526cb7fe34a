use std::io::{ErrorKind, Write};

use bytes::{BufMut, BytesMut};
use tracing::trace;

use crate::config::FrameConfig;
use crate::error::{FrameError, Result};
use crate::frame::Frame;

/// Writes frame sets back to back to any `Write` stream.
///
/// A set goes out as one contiguous buffer. Every frame is size-checked
/// first, so a rejected set leaves nothing on the stream.
pub struct FrameWriter<T> {
    inner: T,
    config: FrameConfig,
}

impl<T: Write> FrameWriter<T> {
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self { inner, config }
    }

    /// Write one frame and flush.
    pub fn write_frame(&mut self, frame: &Frame) -> Result<usize> {
        self.write_frames(std::slice::from_ref(frame))
    }

    /// Write a frame set and flush. Returns the number of bytes written.
    pub fn write_frames(&mut self, frames: &[Frame]) -> Result<usize> {
        let max = self.config.max_frame_size;
        let mut total = 0usize;
        for frame in frames {
            let size = frame.wire_size();
            if size > max {
                return Err(FrameError::FrameTooLarge { size, max });
            }
            total += size;
        }

        let mut wire = BytesMut::with_capacity(total);
        for frame in frames {
            wire.put_slice(frame.as_bytes());
        }

        self.inner
            .write_all(&wire)
            .and_then(|()| self.inner.flush())
            .map_err(|err| match err.kind() {
                ErrorKind::WriteZero => FrameError::ConnectionClosed,
                _ => FrameError::Io(err),
            })?;
        trace!(frames = frames.len(), bytes = total, "wrote frame set");
        Ok(total)
    }

    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::frame::{FrameHeader, Sar};
    use crate::reader::FrameReader;

    fn frame(sequence: u8, sar: Sar, payload: &[u8]) -> Frame {
        Frame::build(
            &FrameHeader {
                channel_id: 0x0040,
                sequence,
                sar,
                total_length: (sar == Sar::Start).then_some(4),
                ..FrameHeader::default()
            },
            payload,
        )
        .unwrap()
    }

    /// Accepts at most `chunk` bytes per call and fails every other call.
    struct Choppy {
        data: Vec<u8>,
        chunk: usize,
        fail_next: bool,
        failure: ErrorKind,
    }

    impl Write for Choppy {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.fail_next = !self.fail_next;
            if !self.fail_next {
                return Err(io::Error::from(self.failure));
            }
            let n = buf.len().min(self.chunk);
            self.data.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn written_set_reads_back_in_order() {
        let set = vec![
            frame(0, Sar::Start, b"ab"),
            frame(2, Sar::Continuation, b""),
            frame(4, Sar::End, b"cd"),
        ];
        let mut writer = FrameWriter::new(Vec::new());
        let written = writer.write_frames(&set).unwrap();
        assert_eq!(written, set.iter().map(Frame::wire_size).sum::<usize>());

        let bytes = writer.into_inner();
        let mut reader = FrameReader::new(bytes.as_slice());
        for expected in &set {
            assert_eq!(reader.read_frame().unwrap(), expected.as_bytes());
        }
    }

    #[test]
    fn rejected_set_leaves_stream_empty() {
        let set = vec![frame(0, Sar::Start, b"ab"), frame(2, Sar::End, &[9u8; 64])];
        let mut writer = FrameWriter::with_config(Vec::new(), FrameConfig { max_frame_size: 32 });

        let err = writer.write_frames(&set).unwrap_err();
        assert!(matches!(err, FrameError::FrameTooLarge { size: 72, max: 32 }));
        assert!(writer.get_ref().is_empty());
    }

    #[test]
    fn interrupted_partial_writes_complete() {
        let set = vec![frame(0, Sar::Start, b"ab"), frame(2, Sar::End, b"cd")];
        let mut writer = FrameWriter::new(Choppy {
            data: Vec::new(),
            chunk: 3,
            fail_next: false,
            failure: ErrorKind::Interrupted,
        });

        writer.write_frames(&set).unwrap();
        let expected: Vec<u8> = set.iter().flat_map(|f| f.as_bytes().to_vec()).collect();
        assert_eq!(writer.into_inner().data, expected);
    }

    #[test]
    fn other_write_errors_surface_as_io() {
        let mut writer = FrameWriter::new(Choppy {
            data: Vec::new(),
            chunk: 3,
            fail_next: false,
            failure: ErrorKind::BrokenPipe,
        });

        let err = writer.write_frame(&frame(0, Sar::Unsegmented, b"abcdef")).unwrap_err();
        assert!(matches!(err, FrameError::Io(ref e) if e.kind() == ErrorKind::BrokenPipe));
    }

    #[test]
    fn closed_stream_is_connection_closed() {
        let mut sink = [0u8; 4];
        let mut writer = FrameWriter::new(&mut sink[..]);

        let err = writer.write_frame(&frame(0, Sar::Unsegmented, b"abcd")).unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }
}
