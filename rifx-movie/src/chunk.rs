//! The tagged sum of chunk variants and the factory that materializes them.

use rifx_stream::{ByteStream, FourCC};

use crate::chunks::{
    CastDirectoryChunk, CastListChunk, CastMemberChunk, ConfigChunk, InitialMapChunk,
    KeyTableChunk, MemoryMapChunk, ScriptChunk, ScriptContextChunk, ScriptNamesChunk,
};
use crate::error::Result;
use crate::movie::Movie;
use crate::tags;

/// A chunk whose tag has no dedicated parser; the payload is kept raw.
#[derive(Debug, Clone)]
pub struct OpaqueChunk {
    pub tag: FourCC,
    pub payload: Vec<u8>,
}

impl OpaqueChunk {
    fn read(tag: FourCC, stream: &mut ByteStream) -> Result<Self> {
        let payload = stream.copy_bytes(stream.remaining())?;
        Ok(Self { tag, payload })
    }
}

/// A materialized chunk, selected by its four-character tag.
#[derive(Debug)]
pub enum Chunk {
    InitialMap(InitialMapChunk),
    MemoryMap(MemoryMapChunk),
    CastDirectory(CastDirectoryChunk),
    CastMember(CastMemberChunk),
    KeyTable(KeyTableChunk),
    ScriptContext(ScriptContextChunk),
    ScriptNames(ScriptNamesChunk),
    Script(ScriptChunk),
    Config(ConfigChunk),
    CastList(CastListChunk),
    Opaque(OpaqueChunk),
}

impl Chunk {
    pub fn as_initial_map(&self) -> Option<&InitialMapChunk> {
        match self {
            Self::InitialMap(chunk) => Some(chunk),
            _ => None,
        }
    }

    pub fn as_memory_map(&self) -> Option<&MemoryMapChunk> {
        match self {
            Self::MemoryMap(chunk) => Some(chunk),
            _ => None,
        }
    }

    pub fn as_cast_directory(&self) -> Option<&CastDirectoryChunk> {
        match self {
            Self::CastDirectory(chunk) => Some(chunk),
            _ => None,
        }
    }

    pub fn as_cast_member(&self) -> Option<&CastMemberChunk> {
        match self {
            Self::CastMember(chunk) => Some(chunk),
            _ => None,
        }
    }

    pub fn as_key_table(&self) -> Option<&KeyTableChunk> {
        match self {
            Self::KeyTable(chunk) => Some(chunk),
            _ => None,
        }
    }

    pub fn as_script_context(&self) -> Option<&ScriptContextChunk> {
        match self {
            Self::ScriptContext(chunk) => Some(chunk),
            _ => None,
        }
    }

    pub fn as_script_names(&self) -> Option<&ScriptNamesChunk> {
        match self {
            Self::ScriptNames(chunk) => Some(chunk),
            _ => None,
        }
    }

    pub fn as_script(&self) -> Option<&ScriptChunk> {
        match self {
            Self::Script(chunk) => Some(chunk),
            _ => None,
        }
    }

    pub fn as_config(&self) -> Option<&ConfigChunk> {
        match self {
            Self::Config(chunk) => Some(chunk),
            _ => None,
        }
    }

    pub fn as_cast_list(&self) -> Option<&CastListChunk> {
        match self {
            Self::CastList(chunk) => Some(chunk),
            _ => None,
        }
    }

    pub fn as_opaque(&self) -> Option<&OpaqueChunk> {
        match self {
            Self::Opaque(chunk) => Some(chunk),
            _ => None,
        }
    }
}

impl Movie {
    /// Construct the concrete chunk variant for `tag` from its payload.
    pub(crate) fn make_chunk(&mut self, tag: FourCC, stream: &mut ByteStream) -> Result<Chunk> {
        Ok(match tag {
            tags::IMAP => Chunk::InitialMap(InitialMapChunk::read(stream)?),
            tags::MMAP => Chunk::MemoryMap(MemoryMapChunk::read(stream)?),
            tags::CAST_DIRECTORY => Chunk::CastDirectory(CastDirectoryChunk::read(stream)?),
            tags::CAST_MEMBER => Chunk::CastMember(CastMemberChunk::read(stream)?),
            tags::KEY_TABLE => Chunk::KeyTable(KeyTableChunk::read(stream)?),
            tags::SCRIPT_CONTEXT_CAPITAL => {
                self.capital_x = true;
                Chunk::ScriptContext(ScriptContextChunk::read(stream)?)
            }
            tags::SCRIPT_CONTEXT => Chunk::ScriptContext(ScriptContextChunk::read(stream)?),
            tags::SCRIPT_NAMES => Chunk::ScriptNames(ScriptNamesChunk::read(stream)?),
            tags::SCRIPT => Chunk::Script(ScriptChunk::read(stream)?),
            tags::CONFIG | tags::CONFIG_ALT => Chunk::Config(ConfigChunk::read(stream)?),
            tags::CAST_LIST => Chunk::CastList(CastListChunk::read(stream)?),
            other => Chunk::Opaque(OpaqueChunk::read(other, stream)?),
        })
    }
}
