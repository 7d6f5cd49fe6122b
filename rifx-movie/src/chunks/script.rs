//! Script-family chunk payloads (`Lctx`/`LctX`, `Lnam`, `Lscr`).
//!
//! Bytecode decompilation and context resolution are collaborators above
//! this crate; the context and script chunks keep their payload raw. The
//! name table is simple enough to parse in place.

use rifx_stream::ByteStream;

use crate::error::Result;

/// `Lctx`/`LctX` payload, retained raw.
#[derive(Debug, Clone)]
pub struct ScriptContextChunk {
    pub payload: Vec<u8>,
}

impl ScriptContextChunk {
    pub(crate) fn read(stream: &mut ByteStream) -> Result<Self> {
        let payload = stream.copy_bytes(stream.remaining())?;
        Ok(Self { payload })
    }
}

/// `Lscr` payload, retained raw.
#[derive(Debug, Clone)]
pub struct ScriptChunk {
    pub payload: Vec<u8>,
}

impl ScriptChunk {
    pub(crate) fn read(stream: &mut ByteStream) -> Result<Self> {
        let payload = stream.copy_bytes(stream.remaining())?;
        Ok(Self { payload })
    }
}

/// `Lnam` script name table.
#[derive(Debug, Clone)]
pub struct ScriptNamesChunk {
    pub names: Vec<String>,
}

impl ScriptNamesChunk {
    pub(crate) fn read(stream: &mut ByteStream) -> Result<Self> {
        let _unknown0 = stream.read_i32()?;
        let _unknown1 = stream.read_i32()?;
        let _len = stream.read_u32()?;
        let _len2 = stream.read_u32()?;
        let names_offset = stream.read_u16()?;
        let names_count = stream.read_u16()?;

        stream.seek(names_offset as usize);
        let capacity = (names_count as usize).min(stream.remaining());
        let mut names = Vec::with_capacity(capacity);
        for _ in 0..names_count {
            names.push(stream.read_pascal_string()?);
        }
        Ok(Self { names })
    }
}
