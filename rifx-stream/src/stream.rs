use byteorder::{BigEndian, ByteOrder, LittleEndian};
use flate2::read::ZlibDecoder;
use std::io::Read;
use tracing::trace;

use crate::error::{Error, Result};
use crate::fourcc::FourCC;

/// Byte order applied to every multi-byte read of a [`ByteStream`].
///
/// Varints, single bytes and raw copies are endianness-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Big,
    Little,
}

/// Extra output allowance for zlib sub-streams. Declared uncompressed
/// lengths in the wild are occasionally a few bytes off, so the budget is
/// not exact; anything past the slack is treated as a hostile stream.
const INFLATE_SLACK: usize = 4096;

/// Endianness-aware seekable reader over an owned byte buffer.
///
/// Sub-streams produced by [`read_bytes`](Self::read_bytes) and
/// [`read_zlib`](Self::read_zlib) are self-contained owned buffers that
/// inherit the parent's endianness at the time of the call.
#[derive(Debug, Clone)]
pub struct ByteStream {
    data: Vec<u8>,
    pos: usize,
    endianness: Endianness,
}

impl ByteStream {
    pub fn new(data: Vec<u8>, endianness: Endianness) -> Self {
        Self {
            data,
            pos: 0,
            endianness,
        }
    }

    /// Total length of the underlying buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current byte position.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Whether the position has reached the end of the buffer.
    pub fn eof(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Bytes left from the current position.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    pub fn set_endianness(&mut self, endianness: Endianness) {
        self.endianness = endianness;
    }

    /// Reposition to an absolute offset. Seeking past the end is allowed;
    /// the next read reports the shortfall.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Skip `n` bytes forward.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }

    fn ensure(&self, n: usize) -> Result<()> {
        if self.remaining() < n {
            return Err(Error::UnexpectedEof {
                offset: self.pos,
                need: n,
                have: self.remaining(),
            });
        }
        Ok(())
    }

    fn take(&mut self, n: usize) -> Result<&[u8]> {
        self.ensure(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let endianness = self.endianness;
        let bytes = self.take(2)?;
        Ok(match endianness {
            Endianness::Big => BigEndian::read_u16(bytes),
            Endianness::Little => LittleEndian::read_u16(bytes),
        })
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.read_u16()? as i16)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let endianness = self.endianness;
        let bytes = self.take(4)?;
        Ok(match endianness {
            Endianness::Big => BigEndian::read_u32(bytes),
            Endianness::Little => LittleEndian::read_u32(bytes),
        })
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    /// Read a four-character tag under the current endianness.
    pub fn read_tag(&mut self) -> Result<FourCC> {
        Ok(FourCC(self.read_u32()?))
    }

    /// Read a variable-length unsigned integer: little-endian 7-bit groups,
    /// high bit set while another byte follows. Capped at five bytes.
    pub fn read_varint(&mut self) -> Result<u32> {
        let offset = self.pos;
        let mut value = 0u32;
        let mut shift = 0;
        for _ in 0..5 {
            let byte = self.read_u8()?;
            value |= u32::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
        }
        Err(Error::VarintOverflow { offset })
    }

    /// Length-prefixed string: a u8 length, then that many bytes.
    pub fn read_pascal_string(&mut self) -> Result<String> {
        let len = self.read_u8()? as usize;
        let bytes = self.take(len)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Copy the next `n` bytes out of the stream.
    pub fn copy_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        Ok(self.take(n)?.to_vec())
    }

    /// Detach the next `n` bytes as a fresh sub-stream over a copy.
    pub fn read_bytes(&mut self, n: usize) -> Result<ByteStream> {
        let endianness = self.endianness;
        let data = self.copy_bytes(n)?;
        Ok(ByteStream::new(data, endianness))
    }

    /// Consume exactly `n` compressed bytes and inflate them into a new
    /// sub-stream.
    ///
    /// Output is budgeted to `expected_len` plus a small slack; a stream
    /// expanding past the budget is an error rather than a truncation, so a
    /// lying header cannot smuggle a short read through. Callers compare the
    /// sub-stream's [`len`](Self::len) against `expected_len` to decide
    /// whether a mismatch matters.
    pub fn read_zlib(&mut self, n: usize, expected_len: u32) -> Result<ByteStream> {
        let offset = self.pos;
        let endianness = self.endianness;
        let budget = expected_len as usize + INFLATE_SLACK;
        let compressed = self.take(n)?;

        let mut inflated = Vec::with_capacity(expected_len as usize);
        let mut decoder = ZlibDecoder::new(compressed).take(budget as u64 + 1);
        decoder
            .read_to_end(&mut inflated)
            .map_err(|source| Error::Inflate { offset, source })?;
        if inflated.len() > budget {
            return Err(Error::InflateOverrun { offset, budget });
        }
        trace!(
            "inflated {n} bytes at offset {offset:#x} into {} bytes",
            inflated.len()
        );
        Ok(ByteStream::new(inflated, endianness))
    }
}
