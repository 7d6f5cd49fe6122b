//! Reader for RIFX movie archives.
//!
//! A movie file is a chunk archive in one of two dialects: the uncompressed
//! memory-map form (`MV93` codec) addressed through an `imap`/`mmap` pair,
//! or the afterburner form (`FGDM` codec) whose directory and resources are
//! zlib-wrapped with varint framing. [`Movie::open`] detects the container
//! endianness, parses the directory for either dialect, resolves the key
//! table and config, and enumerates the movie's casts; everything else is
//! materialized lazily through [`Movie::chunk_by_id`] and cached for the
//! lifetime of the archive.

mod afterburner;
pub mod chunk;
pub mod chunks;
pub mod directory;
pub mod error;
pub mod movie;
pub mod tags;

pub use chunk::{Chunk, OpaqueChunk};
pub use chunks::{
    CastDirectoryChunk, CastListChunk, CastListEntry, CastMemberChunk, CastMemberInfo,
    ConfigChunk, InitialMapChunk, KeyTableChunk, KeyTableEntry, MemberType, MemoryMapChunk,
    MemoryMapEntry, ScriptChunk, ScriptContextChunk, ScriptNamesChunk, ScriptType,
    human_version,
};
pub use directory::{ChunkDirectory, ChunkInfo};
pub use error::{Error, Result};
pub use movie::{Cast, Movie};

pub use rifx_stream::{ByteStream, Endianness, FourCC};
