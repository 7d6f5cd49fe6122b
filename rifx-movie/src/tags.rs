//! Well-known four-character tags.

use rifx_stream::FourCC;

/// Big-endian container magic.
pub const RIFX: FourCC = FourCC::new(b"RIFX");
/// Little-endian container magic (`RIFX` byte-reversed on disk).
pub const XFIR: FourCC = FourCC::new(b"XFIR");

/// Uncompressed memory-map codec.
pub const MV93: FourCC = FourCC::new(b"MV93");
/// Afterburner compressed-envelope codec.
pub const FGDM: FourCC = FourCC::new(b"FGDM");

pub const IMAP: FourCC = FourCC::new(b"imap");
pub const MMAP: FourCC = FourCC::new(b"mmap");
pub const FREE: FourCC = FourCC::new(b"free");
pub const JUNK: FourCC = FourCC::new(b"junk");

pub const FVER: FourCC = FourCC::new(b"Fver");
pub const FCDR: FourCC = FourCC::new(b"Fcdr");
pub const ABMP: FourCC = FourCC::new(b"ABMP");
pub const FGEI: FourCC = FourCC::new(b"FGEI");

pub const KEY_TABLE: FourCC = FourCC::new(b"KEY*");
pub const CAST_DIRECTORY: FourCC = FourCC::new(b"CAS*");
pub const CAST_MEMBER: FourCC = FourCC::new(b"CASt");
pub const CONFIG: FourCC = FourCC::new(b"VWCF");
pub const CONFIG_ALT: FourCC = FourCC::new(b"DRCF");
pub const CAST_LIST: FourCC = FourCC::new(b"MCsL");
pub const SCRIPT_CONTEXT_CAPITAL: FourCC = FourCC::new(b"LctX");
pub const SCRIPT_CONTEXT: FourCC = FourCC::new(b"Lctx");
pub const SCRIPT_NAMES: FourCC = FourCC::new(b"Lnam");
pub const SCRIPT: FourCC = FourCC::new(b"Lscr");
