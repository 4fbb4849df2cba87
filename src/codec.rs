//! Line codecs and line-oriented I/O helpers.

use std::borrow::Cow;
use std::io;
use std::io::prelude::*;

/// Line decoding strategy applied while a file is being split.
///
/// A decoder receives one raw line (terminator already stripped) exactly as it
/// was read from storage and returns the bytes to be written to the half file.
/// Decoding is applied unconditionally on every line during splitting and is
/// never applied on the direct sort or merge paths, which treat lines as
/// opaque text.
pub trait LineCodec {
    /// Decodes a single raw line into the canonical internal representation.
    fn decode<'a>(&self, raw: &'a [u8]) -> Cow<'a, [u8]>;
}

/// Re-interprets raw bytes as UTF-8, substituting U+FFFD for invalid
/// sequences. This repairs content that was written under a single-byte
/// encoding and read back as UTF-8. It is the identity on already-valid UTF-8
/// and it will corrupt content genuinely meant to stay in a single-byte
/// encoding, so it is a byte reinterpretation rather than a semantic
/// correction.
#[derive(Debug, Default, Clone, Copy)]
pub struct Utf8RepairCodec;

impl LineCodec for Utf8RepairCodec {
    fn decode<'a>(&self, raw: &'a [u8]) -> Cow<'a, [u8]> {
        match String::from_utf8_lossy(raw) {
            Cow::Borrowed(_) => Cow::Borrowed(raw),
            Cow::Owned(repaired) => Cow::Owned(repaired.into_bytes()),
        }
    }
}

/// No-op decoding strategy: every line is passed through byte-for-byte.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughCodec;

impl LineCodec for PassthroughCodec {
    fn decode<'a>(&self, raw: &'a [u8]) -> Cow<'a, [u8]> {
        Cow::Borrowed(raw)
    }
}

/// Reads the next `\n`-terminated line as text, with the terminator stripped.
/// Returns `None` at end of input. A line that is not valid UTF-8 surfaces as
/// an [`io::ErrorKind::InvalidData`] error.
pub fn read_text_line<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }

    match String::from_utf8(buf) {
        Ok(line) => Ok(Some(line)),
        Err(err) => Err(io::Error::new(io::ErrorKind::InvalidData, err)),
    }
}

/// Writes a line followed by the line terminator.
pub fn write_line<W: Write>(writer: &mut W, line: &str) -> io::Result<()> {
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\n")
}
