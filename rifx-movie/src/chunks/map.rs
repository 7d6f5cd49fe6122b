//! Bootstrap map payloads (`imap`, `mmap`).

use rifx_stream::{ByteStream, FourCC};

use crate::error::Result;

/// `imap` payload. The leading field locates the memory map; the trailing
/// fields are carried along for completeness and are absent in some older
/// movies.
#[derive(Debug, Clone, Copy)]
pub struct InitialMapChunk {
    pub memory_map_offset: u32,
    pub map_version: u32,
    pub reserved: u32,
}

impl InitialMapChunk {
    pub(crate) fn read(stream: &mut ByteStream) -> Result<Self> {
        let memory_map_offset = stream.read_u32()?;
        let map_version = if stream.remaining() >= 4 {
            stream.read_u32()?
        } else {
            0
        };
        let reserved = if stream.remaining() >= 4 {
            stream.read_u32()?
        } else {
            0
        };
        Ok(Self {
            memory_map_offset,
            map_version,
            reserved,
        })
    }
}

/// One slot of the memory map's resource array.
#[derive(Debug, Clone, Copy)]
pub struct MemoryMapEntry {
    pub tag: FourCC,
    pub len: u32,
    pub offset: u32,
    pub flags: u16,
    pub unused: u16,
    pub next: i32,
}

/// `mmap` payload: a fixed header followed by the resource array. `free` and
/// `junk` slots stay in the array; the archive filters them when it builds
/// its directory.
#[derive(Debug, Clone)]
pub struct MemoryMapChunk {
    pub header_len: u16,
    pub entry_len: u16,
    pub max_count: u32,
    pub used_count: u32,
    pub junk_head: i32,
    pub junk_head2: i32,
    pub free_head: i32,
    pub entries: Vec<MemoryMapEntry>,
}

impl MemoryMapChunk {
    pub(crate) fn read(stream: &mut ByteStream) -> Result<Self> {
        let header_len = stream.read_u16()?;
        let entry_len = stream.read_u16()?;
        let max_count = stream.read_u32()?;
        let used_count = stream.read_u32()?;
        let junk_head = stream.read_i32()?;
        let junk_head2 = stream.read_i32()?;
        let free_head = stream.read_i32()?;

        let capacity = (used_count as usize).min(stream.remaining() / 20);
        let mut entries = Vec::with_capacity(capacity);
        for _ in 0..used_count {
            let tag = stream.read_tag()?;
            let len = stream.read_u32()?;
            let offset = stream.read_u32()?;
            let flags = stream.read_u16()?;
            let unused = stream.read_u16()?;
            let next = stream.read_i32()?;
            entries.push(MemoryMapEntry {
                tag,
                len,
                offset,
                flags,
                unused,
                next,
            });
        }

        Ok(Self {
            header_len,
            entry_len,
            max_count,
            used_count,
            junk_head,
            junk_head2,
            free_head,
            entries,
        })
    }
}
