//! Indexed metadata for every resource in an archive.

use std::collections::HashMap;

use rifx_stream::FourCC;
use tracing::warn;

/// Directory metadata for a single resource.
///
/// In the uncompressed dialect `stored_len == uncompressed_len` and
/// `compression == 0`; the afterburner dialect records the compressed size,
/// the size after inflation and the compression selector from the `ABMP`
/// table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkInfo {
    pub id: u32,
    pub tag: FourCC,
    /// Length of the resource as stored on disk.
    pub stored_len: u32,
    /// Length after decompression.
    pub uncompressed_len: u32,
    /// Absolute offset in the uncompressed dialect; relative to the initial
    /// load segment body under the afterburner.
    pub offset: i32,
    pub compression: u32,
}

/// Map of resource id to [`ChunkInfo`], plus a tag index in discovery order.
#[derive(Debug, Default)]
pub struct ChunkDirectory {
    by_id: HashMap<u32, ChunkInfo>,
    ids_by_tag: HashMap<FourCC, Vec<u32>>,
}

impl ChunkDirectory {
    pub fn insert(&mut self, info: ChunkInfo) {
        let id = info.id;
        let tag = info.tag;
        if let Some(old) = self.by_id.insert(id, info) {
            warn!("resource id {id} appears twice (was '{}', now '{tag}')", old.tag);
            if let Some(ids) = self.ids_by_tag.get_mut(&old.tag) {
                ids.retain(|&other| other != id);
            }
        }
        self.ids_by_tag.entry(tag).or_default().push(id);
    }

    pub fn get(&self, id: u32) -> Option<&ChunkInfo> {
        self.by_id.get(&id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.by_id.contains_key(&id)
    }

    /// The entry for the earliest-discovered resource carrying `tag`.
    pub fn first(&self, tag: FourCC) -> Option<&ChunkInfo> {
        let id = *self.ids_by_tag.get(&tag)?.first()?;
        self.by_id.get(&id)
    }

    /// All ids carrying `tag`, in discovery order.
    pub fn ids_for(&self, tag: FourCC) -> &[u32] {
        self.ids_by_tag.get(&tag).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChunkInfo> {
        self.by_id.values()
    }
}
