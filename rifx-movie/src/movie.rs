//! The movie archive orchestrator.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use rifx_stream::{ByteStream, Endianness, FourCC};
use tracing::{debug, error, trace, warn};

use crate::chunk::Chunk;
use crate::chunks::{ConfigChunk, InitialMapChunk, KeyTableChunk, MemoryMapChunk, human_version};
use crate::directory::{ChunkDirectory, ChunkInfo};
use crate::error::{Error, Result};
use crate::tags;

/// Sentinel length passed while bootstrapping the map chunks, before any
/// directory entry exists to validate against; the framing's own length is
/// trusted instead.
pub(crate) const LEN_FROM_FRAMING: u32 = u32::MAX;

/// A cast enumerated from the archive, annotated with its directory entry
/// and eagerly populated members.
#[derive(Debug, Clone)]
pub struct Cast {
    pub name: String,
    pub id: u32,
    pub min_member: u16,
    /// Id of the cast's `CAS*` section.
    pub section_id: u32,
    /// Members keyed by member number (`min_member` plus slot index).
    pub members: BTreeMap<u32, Arc<Chunk>>,
}

/// A read-only movie archive.
///
/// Opened once over a seekable byte source; the directory, key table,
/// config and casts are resolved up front, and every other resource is
/// materialized on demand through [`chunk_by_id`](Self::chunk_by_id). The
/// caches only ever grow; a `Movie` is a snapshot, not a live handle.
///
/// The underlying stream is seek-shared across all chunk reads: any call to
/// `chunk_by_id` may reposition it, so raw [`stream_mut`](Self::stream_mut)
/// use must not be interleaved with chunk materialization.
#[derive(Debug)]
pub struct Movie {
    pub(crate) stream: ByteStream,
    pub(crate) codec: FourCC,
    pub(crate) afterburned: bool,
    pub(crate) version: u32,
    pub(crate) directory: ChunkDirectory,
    pub(crate) key_table: Option<Arc<Chunk>>,
    pub(crate) config: Option<Arc<Chunk>>,
    pub(crate) casts: Vec<Cast>,
    pub(crate) chunk_cache: HashMap<u32, Arc<Chunk>>,
    pub(crate) raw_cache: HashMap<u32, Vec<u8>>,
    pub(crate) ils_body_offset: usize,
    pub(crate) capital_x: bool,
}

impl Movie {
    /// Read a movie archive from a file on disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(data)
    }

    /// Read a movie archive from an in-memory buffer.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::open(ByteStream::new(data, Endianness::Big))
    }

    /// Parse the archive: detect endianness, build the directory for the
    /// container's dialect, then resolve the key table, config and casts.
    ///
    /// Fails on the first fatal problem and never yields a partially
    /// populated archive.
    pub fn open(stream: ByteStream) -> Result<Self> {
        let mut movie = Self {
            stream,
            codec: FourCC(0),
            afterburned: false,
            version: 0,
            directory: ChunkDirectory::default(),
            key_table: None,
            config: None,
            casts: Vec::new(),
            chunk_cache: HashMap::new(),
            raw_cache: HashMap::new(),
            ils_body_offset: 0,
            capital_x: false,
        };

        // The magic is read big-endian; only the reversed form flips the
        // byte order for the rest of the file.
        movie.stream.seek(0);
        movie.stream.set_endianness(Endianness::Big);
        let magic = movie.stream.read_tag()?;
        if magic == tags::XFIR {
            movie.stream.set_endianness(Endianness::Little);
        }
        movie.stream.read_i32()?; // container length, unused
        movie.codec = movie.stream.read_tag()?;
        debug!("container '{magic}', codec '{}'", movie.codec);

        match movie.codec {
            tags::MV93 => movie.read_memory_map()?,
            tags::FGDM => {
                movie.afterburned = true;
                movie.read_afterburner_map()?;
            }
            other => return Err(Error::UnsupportedCodec(other)),
        }

        movie.read_key_table()?;
        movie.read_config()?;
        movie.read_casts()?;
        Ok(movie)
    }

    fn read_memory_map(&mut self) -> Result<()> {
        let mut imap_stream = self.read_framed(tags::IMAP, LEN_FROM_FRAMING)?;
        let imap = InitialMapChunk::read(&mut imap_stream)?;

        self.stream.seek(imap.memory_map_offset as usize);
        let mut mmap_stream = self.read_framed(tags::MMAP, LEN_FROM_FRAMING)?;
        let mmap = MemoryMapChunk::read(&mut mmap_stream)?;
        debug!("memory map: {} entries", mmap.entries.len());

        for (index, entry) in mmap.entries.iter().enumerate() {
            if entry.tag == tags::FREE || entry.tag == tags::JUNK {
                continue;
            }
            self.directory.insert(ChunkInfo {
                id: index as u32,
                tag: entry.tag,
                stored_len: entry.len,
                uncompressed_len: entry.len,
                offset: entry.offset as i32,
                compression: 0,
            });
        }
        Ok(())
    }

    fn read_key_table(&mut self) -> Result<()> {
        let info = self
            .directory
            .first(tags::KEY_TABLE)
            .copied()
            .ok_or_else(|| {
                error!("no key table chunk");
                Error::MissingRequired("KEY*")
            })?;
        let chunk = self.chunk_by_id(info.tag, info.id)?;
        self.key_table = Some(chunk);
        Ok(())
    }

    fn read_config(&mut self) -> Result<()> {
        let info = self
            .directory
            .first(tags::CONFIG)
            .or_else(|| self.directory.first(tags::CONFIG_ALT))
            .copied()
            .ok_or_else(|| {
                error!("no config chunk");
                Error::MissingRequired("VWCF/DRCF")
            })?;
        let chunk = self.chunk_by_id(info.tag, info.id)?;
        if let Some(config) = chunk.as_config() {
            self.version = human_version(config.director_version);
            debug!("Director version: {}", self.version);
        }
        self.config = Some(chunk);
        Ok(())
    }

    fn read_casts(&mut self) -> Result<()> {
        if self.version >= 500 {
            let info = self
                .directory
                .first(tags::CAST_LIST)
                .copied()
                .ok_or_else(|| {
                    error!("no cast list chunk");
                    Error::MissingRequired("MCsL")
                })?;
            let chunk = self.chunk_by_id(info.tag, info.id)?;
            let entries = match chunk.as_cast_list() {
                Some(list) => list.entries.clone(),
                None => Vec::new(),
            };
            for entry in entries {
                trace!("cast '{}' (id {})", entry.name, entry.id);
                let section_id = self
                    .key_table()
                    .and_then(|table| table.section_for(entry.id, tags::CAST_DIRECTORY))
                    .unwrap_or(0);
                if section_id > 0 {
                    let cast =
                        self.populate_cast(section_id, entry.name, entry.id, entry.min_member)?;
                    self.casts.push(cast);
                } else {
                    warn!("cast '{}' has no CAS* section, skipping", entry.name);
                }
            }
            Ok(())
        } else {
            let info = self
                .directory
                .first(tags::CAST_DIRECTORY)
                .copied()
                .ok_or_else(|| {
                    error!("no cast chunk");
                    Error::MissingRequired("CAS*")
                })?;
            let min_member = self.config().map(|config| config.min_member).unwrap_or(0);
            let cast = self.populate_cast(info.id, "Internal".to_owned(), 1024, min_member)?;
            self.casts.push(cast);
            Ok(())
        }
    }

    /// Materialize a cast's `CAS*` section and every member it names.
    fn populate_cast(
        &mut self,
        section_id: u32,
        name: String,
        id: u32,
        min_member: u16,
    ) -> Result<Cast> {
        let chunk = self.chunk_by_id(tags::CAST_DIRECTORY, section_id)?;
        let member_ids = match chunk.as_cast_directory() {
            Some(directory) => directory.member_ids.clone(),
            None => Vec::new(),
        };

        let mut members = BTreeMap::new();
        for (index, &slot) in member_ids.iter().enumerate() {
            if slot == 0 {
                continue; // empty member position
            }
            let member = self.chunk_by_id(tags::CAST_MEMBER, slot)?;
            members.insert(u32::from(min_member) + index as u32, member);
        }
        debug!("cast '{name}': {} members", members.len());

        Ok(Cast {
            name,
            id,
            min_member,
            section_id,
            members,
        })
    }

    /// Materialize (or fetch the cached) chunk `id`, validated against
    /// `expected_tag`.
    ///
    /// The source bytes come from the initial-load cache when the resource
    /// was pre-decompressed, from an on-demand inflate under the afterburner
    /// dialect, or from a framed read at the resource's absolute offset in
    /// the uncompressed dialect. Everything except the bootstrap map chunks
    /// is cached, so repeated calls return the same object.
    pub fn chunk_by_id(&mut self, expected_tag: FourCC, id: u32) -> Result<Arc<Chunk>> {
        if let Some(chunk) = self.chunk_cache.get(&id) {
            return Ok(Arc::clone(chunk));
        }

        let info = self
            .directory
            .get(id)
            .copied()
            .ok_or(Error::UnknownChunk(id))?;
        if info.tag != expected_tag {
            return Err(Error::TagMismatch {
                id,
                expected: expected_tag,
                found: info.tag,
            });
        }

        let raw = self.raw_cache.get(&id).cloned();
        let mut payload = if let Some(raw) = raw {
            trace!("chunk {id}: serving '{}' from the initial load segment", info.tag);
            ByteStream::new(raw, self.stream.endianness())
        } else if self.afterburned {
            let offset = self.ils_body_offset as i64 + i64::from(info.offset);
            self.stream.seek(offset.max(0) as usize);
            let sub = self
                .stream
                .read_zlib(info.stored_len as usize, info.uncompressed_len)
                .map_err(|source| Error::InflateFailed { id, source })?;
            if sub.len() != info.uncompressed_len as usize {
                return Err(Error::InflateSizeMismatch {
                    id,
                    expected: info.uncompressed_len,
                    actual: sub.len() as u32,
                });
            }
            sub
        } else {
            self.stream.seek(info.offset.max(0) as usize);
            self.read_framed(expected_tag, info.stored_len)
                .map_err(|err| match err {
                    Error::FramingMismatch { found_tag, .. } if found_tag != expected_tag => {
                        Error::TagMismatch {
                            id,
                            expected: expected_tag,
                            found: found_tag,
                        }
                    }
                    other => other,
                })?
        };

        let chunk = Arc::new(self.make_chunk(expected_tag, &mut payload)?);
        // The map chunks are regenerated on demand instead of being cached.
        if expected_tag != tags::IMAP && expected_tag != tags::MMAP {
            self.chunk_cache.insert(id, Arc::clone(&chunk));
        }
        Ok(chunk)
    }

    /// Read and validate the 8-byte `(tag, len)` framing at the stream
    /// position, then detach the payload as a sub-stream. An `expected_len`
    /// of [`LEN_FROM_FRAMING`] trusts the framing's own length.
    pub(crate) fn read_framed(
        &mut self,
        expected_tag: FourCC,
        expected_len: u32,
    ) -> Result<ByteStream> {
        let offset = self.stream.pos();
        let found_tag = self.stream.read_tag()?;
        let found_len = self.stream.read_u32()?;
        let expected_len = if expected_len == LEN_FROM_FRAMING {
            found_len
        } else {
            expected_len
        };
        if found_tag != expected_tag || found_len != expected_len {
            return Err(Error::FramingMismatch {
                offset: offset as u32,
                expected_tag,
                expected_len,
                found_tag,
                found_len,
            });
        }
        trace!("at offset {offset} reading chunk '{found_tag}' with length {found_len}");
        Ok(self.stream.read_bytes(found_len as usize)?)
    }

    /// The underlying stream, for collaborators doing their own low-level
    /// reads. Not to be interleaved with chunk materialization.
    pub fn stream(&self) -> &ByteStream {
        &self.stream
    }

    pub fn stream_mut(&mut self) -> &mut ByteStream {
        &mut self.stream
    }

    pub fn endianness(&self) -> Endianness {
        self.stream.endianness()
    }

    pub fn codec(&self) -> FourCC {
        self.codec
    }

    pub fn afterburned(&self) -> bool {
        self.afterburned
    }

    /// Human-facing Director version derived from the config.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Whether a `LctX` script context has been materialized.
    pub fn capital_x(&self) -> bool {
        self.capital_x
    }

    pub fn directory(&self) -> &ChunkDirectory {
        &self.directory
    }

    /// Directory entry of the earliest-discovered resource carrying `tag`.
    pub fn directory_first(&self, tag: FourCC) -> Option<&ChunkInfo> {
        self.directory.first(tag)
    }

    pub fn key_table(&self) -> Option<&KeyTableChunk> {
        self.key_table.as_deref().and_then(Chunk::as_key_table)
    }

    pub fn config(&self) -> Option<&ConfigChunk> {
        self.config.as_deref().and_then(Chunk::as_config)
    }

    pub fn casts(&self) -> &[Cast] {
        &self.casts
    }

    /// Raw resources pre-decompressed from the initial load segment. Empty
    /// for the uncompressed dialect.
    pub fn initial_load(&self) -> &HashMap<u32, Vec<u8>> {
        &self.raw_cache
    }
}
