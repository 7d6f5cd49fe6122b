//! The `KEY*` join table.

use rifx_stream::{ByteStream, FourCC};

use crate::error::Result;

/// One key table row, linking an owning cast id to the section that stores
/// its data for a particular tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyTableEntry {
    pub section_id: u32,
    pub cast_id: u32,
    pub tag: FourCC,
}

#[derive(Debug, Clone)]
pub struct KeyTableChunk {
    pub entry_size: u16,
    pub entry_size2: u16,
    pub max_count: u32,
    pub used_count: u32,
    pub entries: Vec<KeyTableEntry>,
}

impl KeyTableChunk {
    pub(crate) fn read(stream: &mut ByteStream) -> Result<Self> {
        let entry_size = stream.read_u16()?;
        let entry_size2 = stream.read_u16()?;
        let max_count = stream.read_u32()?;
        let used_count = stream.read_u32()?;

        let capacity = (used_count as usize).min(stream.remaining() / 12);
        let mut entries = Vec::with_capacity(capacity);
        for _ in 0..used_count {
            let section_id = stream.read_u32()?;
            let cast_id = stream.read_u32()?;
            let tag = stream.read_tag()?;
            entries.push(KeyTableEntry {
                section_id,
                cast_id,
                tag,
            });
        }

        Ok(Self {
            entry_size,
            entry_size2,
            max_count,
            used_count,
            entries,
        })
    }

    /// Section id of the first row matching `cast_id` and `tag`, if any.
    pub fn section_for(&self, cast_id: u32, tag: FourCC) -> Option<u32> {
        self.entries
            .iter()
            .find(|entry| entry.cast_id == cast_id && entry.tag == tag)
            .map(|entry| entry.section_id)
    }
}
