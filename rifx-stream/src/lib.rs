//! Byte-stream primitives for RIFX-family containers.
//!
//! Movie archives interleave endianness-dependent integers, 7-bit
//! variable-length integers and per-resource zlib streams. This crate
//! provides the one reader type that covers all of them: [`ByteStream`], a
//! seekable cursor over an owned buffer whose multi-byte reads follow a
//! runtime [`Endianness`] selector, plus the [`FourCC`] tag type every
//! chunk is keyed by.

pub mod error;
pub mod fourcc;
pub mod stream;

pub use error::{Error, Result};
pub use fourcc::FourCC;
pub use stream::{ByteStream, Endianness};
