//! Typed payload parsers for the chunk variants.

pub mod cast;
pub mod cast_list;
pub mod config;
pub mod key_table;
pub mod map;
pub mod script;

pub use cast::{CastDirectoryChunk, CastMemberChunk, CastMemberInfo, MemberType, ScriptType};
pub use cast_list::{CastListChunk, CastListEntry};
pub use config::{ConfigChunk, Rect, human_version};
pub use key_table::{KeyTableChunk, KeyTableEntry};
pub use map::{InitialMapChunk, MemoryMapChunk, MemoryMapEntry};
pub use script::{ScriptChunk, ScriptContextChunk, ScriptNamesChunk};
