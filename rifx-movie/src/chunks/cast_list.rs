//! The `MCsL` cast list, present in multi-cast movies.

use rifx_stream::{ByteStream, Endianness};

use crate::error::Result;

/// One cast named by the cast list.
#[derive(Debug, Clone)]
pub struct CastListEntry {
    pub name: String,
    /// Path of the external cast file; empty for internal casts.
    pub file_path: String,
    pub preload: u16,
    pub min_member: u16,
    pub max_member: u16,
    pub id: u32,
}

/// `MCsL` payload: a header locating the entry data, then one record per
/// cast. Big-endian regardless of the container's byte order.
#[derive(Debug, Clone)]
pub struct CastListChunk {
    pub data_offset: u32,
    pub cast_count: u16,
    pub items_per_cast: u16,
    pub entries: Vec<CastListEntry>,
}

impl CastListChunk {
    pub(crate) fn read(stream: &mut ByteStream) -> Result<Self> {
        stream.set_endianness(Endianness::Big);
        let data_offset = stream.read_u32()?;
        let _unused = stream.read_u16()?;
        let cast_count = stream.read_u16()?;
        let items_per_cast = stream.read_u16()?;
        let _unused2 = stream.read_u16()?;

        stream.seek(data_offset as usize);
        let mut entries = Vec::with_capacity(cast_count as usize);
        for _ in 0..cast_count {
            let name = stream.read_pascal_string()?;
            let file_path = stream.read_pascal_string()?;
            let preload = stream.read_u16()?;
            let min_member = stream.read_u16()?;
            let max_member = stream.read_u16()?;
            let id = stream.read_u32()?;
            entries.push(CastListEntry {
                name,
                file_path,
                preload,
                min_member,
                max_member,
                id,
            });
        }

        Ok(Self {
            data_offset,
            cast_count,
            items_per_cast,
            entries,
        })
    }
}
