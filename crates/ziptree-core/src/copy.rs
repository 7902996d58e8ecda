//! Chunked byte copy between files and archive entry streams.
//!
//! Every compress and extract operation moves data through [`copy_data`],
//! which reads at most [`CHUNK_SIZE`] bytes at a time and writes each chunk
//! in full before reading the next one.

use std::io;
use std::io::Read;
use std::io::Write;

/// Size of a single copy chunk in bytes.
pub const CHUNK_SIZE: usize = 4096;

/// Reusable fixed-size copy buffer.
///
/// Lives on the stack; batch operations create one and pass it to every
/// [`copy_data`] call of the batch.
#[derive(Debug)]
pub struct CopyBuffer {
    buf: [u8; CHUNK_SIZE],
}

impl CopyBuffer {
    /// Creates a zeroed copy buffer.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buf: [0u8; CHUNK_SIZE],
        }
    }

    /// Returns the buffer size in bytes.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        CHUNK_SIZE
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies `reader` into `writer` chunk by chunk until the reader is
/// exhausted.
///
/// Interrupted reads are retried. Any other read error aborts the copy, as
/// does a write that cannot be completed (`write_all` turns a zero-length
/// write into `ErrorKind::WriteZero`).
///
/// Returns the number of bytes copied.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
/// use ziptree_core::copy::{CopyBuffer, copy_data};
///
/// let mut buffer = CopyBuffer::new();
/// let mut input = Cursor::new(vec![7u8; 10_000]);
/// let mut output = Vec::new();
///
/// let copied = copy_data(&mut input, &mut output, &mut buffer)?;
/// assert_eq!(copied, 10_000);
/// assert_eq!(output.len(), 10_000);
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn copy_data<R, W>(reader: &mut R, writer: &mut W, buffer: &mut CopyBuffer) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut total: u64 = 0;

    loop {
        let read = match reader.read(&mut buffer.buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        writer.write_all(&buffer.buf[..read])?;
        total += read as u64;
    }

    Ok(total)
}
