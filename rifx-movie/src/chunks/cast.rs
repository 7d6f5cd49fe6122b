//! Cast directory (`CAS*`) and cast member (`CASt`) payloads.
//!
//! Both are big-endian regardless of the container's byte order. Media
//! payload decoding (bitmaps, sounds, text runs) lives above this crate;
//! members keep their type-specific trailer raw.

use rifx_stream::{ByteStream, Endianness};

use crate::error::Result;

/// Cast member kind, as stored in the `CASt` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberType {
    Null,
    Bitmap,
    FilmLoop,
    Text,
    Palette,
    Picture,
    Sound,
    Button,
    Shape,
    Movie,
    DigitalVideo,
    Script,
    Rte,
    Unknown(u32),
}

impl From<u32> for MemberType {
    fn from(raw: u32) -> Self {
        match raw {
            0 => Self::Null,
            1 => Self::Bitmap,
            2 => Self::FilmLoop,
            3 => Self::Text,
            4 => Self::Palette,
            5 => Self::Picture,
            6 => Self::Sound,
            7 => Self::Button,
            8 => Self::Shape,
            9 => Self::Movie,
            10 => Self::DigitalVideo,
            11 => Self::Script,
            12 => Self::Rte,
            other => Self::Unknown(other),
        }
    }
}

/// Script member subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptType {
    Score,
    Movie,
    Parent,
    Unknown(u16),
}

impl From<u16> for ScriptType {
    fn from(raw: u16) -> Self {
        match raw {
            1 => Self::Score,
            3 => Self::Movie,
            7 => Self::Parent,
            other => Self::Unknown(other),
        }
    }
}

/// `CAS*` payload: the per-slot section ids of a cast's members. A slot of
/// zero marks an empty member position.
#[derive(Debug, Clone)]
pub struct CastDirectoryChunk {
    pub member_ids: Vec<u32>,
}

impl CastDirectoryChunk {
    pub(crate) fn read(stream: &mut ByteStream) -> Result<Self> {
        stream.set_endianness(Endianness::Big);
        let count = stream.remaining() / 4;
        let mut member_ids = Vec::with_capacity(count);
        for _ in 0..count {
            member_ids.push(stream.read_u32()?);
        }
        Ok(Self { member_ids })
    }
}

/// Common info block of a `CASt` payload: reserved words, then an offset
/// table of length-prefixed fields. Field 0 is the member name.
#[derive(Debug, Clone, Default)]
pub struct CastMemberInfo {
    pub fields: Vec<String>,
}

impl CastMemberInfo {
    fn read(stream: &mut ByteStream) -> Result<Self> {
        for _ in 0..16 {
            stream.read_i16()?;
        }
        let field_count = stream.read_u16()? as usize;
        for _ in 0..field_count {
            stream.read_u32()?; // field offset, implied by read order
        }
        let _field_data_len = stream.read_u32()?;
        let mut fields = Vec::with_capacity(field_count);
        for _ in 0..field_count {
            fields.push(stream.read_pascal_string()?);
        }
        Ok(Self { fields })
    }
}

/// `CASt` payload: member type, the common info block, and the raw
/// type-specific trailer.
#[derive(Debug, Clone)]
pub struct CastMemberChunk {
    pub member_type: MemberType,
    pub info: CastMemberInfo,
    /// Parsed from the trailer for script members only.
    pub script_type: Option<ScriptType>,
    pub specific: Vec<u8>,
}

impl CastMemberChunk {
    pub(crate) fn read(stream: &mut ByteStream) -> Result<Self> {
        stream.set_endianness(Endianness::Big);
        let member_type = MemberType::from(stream.read_u32()?);
        let info_len = stream.read_u32()?;
        let specific_len = stream.read_u32()?;

        let info = if info_len > 0 {
            let mut info_stream = stream.read_bytes(info_len as usize)?;
            CastMemberInfo::read(&mut info_stream)?
        } else {
            CastMemberInfo::default()
        };
        let specific = stream.copy_bytes(specific_len as usize)?;

        let script_type = match member_type {
            MemberType::Script if specific.len() >= 2 => {
                Some(ScriptType::from(u16::from_be_bytes([specific[0], specific[1]])))
            }
            _ => None,
        };

        Ok(Self {
            member_type,
            info,
            script_type,
            specific,
        })
    }

    /// Member name from the info block, if present.
    pub fn name(&self) -> &str {
        self.info.fields.first().map(String::as_str).unwrap_or("")
    }
}
