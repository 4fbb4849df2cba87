//! Byte-midpoint file splitting.

use std::fs;
use std::io;
use std::io::prelude::*;
use std::path::Path;

use log;
use tempfile::NamedTempFile;

use crate::codec::LineCodec;

/// Splits `input` into two half files at its byte midpoint, realigned to the
/// next line boundary at or after the midpoint.
///
/// Every line whose read began before the midpoint is appended to `left`, the
/// rest to `right`, so the two halves partition the input's lines with no
/// loss or duplication; they may differ in line count. Each line is passed
/// through `codec` on its way out — this is the only place decoding happens.
///
/// The half files are created and owned by the caller. On an I/O failure both
/// must be considered invalid and discarded.
pub fn split_file<C: LineCodec>(
    input: &Path,
    left: &NamedTempFile,
    right: &NamedTempFile,
    codec: &C,
) -> io::Result<()> {
    let midpoint = fs::metadata(input)?.len() / 2;

    let mut reader = io::BufReader::new(fs::File::open(input)?);
    let mut left_writer = io::BufWriter::new(left.as_file());
    let mut right_writer = io::BufWriter::new(right.as_file());

    let mut consumed = 0u64;
    let mut buf = Vec::new();

    while consumed < midpoint {
        match read_raw_line(&mut reader, &mut buf)? {
            Some(n) => {
                consumed += n;
                write_decoded(&mut left_writer, codec, &buf)?;
            }
            None => break,
        }
    }
    while read_raw_line(&mut reader, &mut buf)?.is_some() {
        write_decoded(&mut right_writer, codec, &buf)?;
    }

    left_writer.flush()?;
    right_writer.flush()?;

    log::debug!(
        "{} split into {} and {}",
        input.display(),
        left.path().display(),
        right.path().display()
    );

    Ok(())
}

/// Reads the next raw line into `buf` (terminator stripped) and returns the
/// number of bytes consumed from the reader, or `None` at end of input.
fn read_raw_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<Option<u64>> {
    buf.clear();
    let n = reader.read_until(b'\n', buf)?;
    if n == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }

    Ok(Some(n as u64))
}

fn write_decoded<W: Write, C: LineCodec>(writer: &mut W, codec: &C, raw: &[u8]) -> io::Result<()> {
    writer.write_all(&codec.decode(raw))?;
    writer.write_all(b"\n")
}
