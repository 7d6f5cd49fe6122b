use rifx_stream::FourCC;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("codec '{0}' is not supported")]
    UnsupportedCodec(FourCC),

    #[error("afterburner envelope: expected '{expected}' marker, found '{found}'")]
    MalformedEnvelope { expected: FourCC, found: FourCC },

    #[error("could not inflate the '{section}' envelope section")]
    EnvelopeInflate {
        section: FourCC,
        #[source]
        source: rifx_stream::Error,
    },

    #[error("could not inflate chunk {id}")]
    InflateFailed {
        id: u32,
        #[source]
        source: rifx_stream::Error,
    },

    #[error("chunk {id}: expected uncompressed length {expected} but inflated {actual} bytes")]
    InflateSizeMismatch { id: u32, expected: u32, actual: u32 },

    #[error("no chunk with id {0}")]
    UnknownChunk(u32),

    #[error("expected chunk {id} to be '{expected}', but it is '{found}'")]
    TagMismatch {
        id: u32,
        expected: FourCC,
        found: FourCC,
    },

    #[error(
        "at offset {offset} expected '{expected_tag}' chunk with length {expected_len}, \
         but got '{found_tag}' chunk with length {found_len}"
    )]
    FramingMismatch {
        offset: u32,
        expected_tag: FourCC,
        expected_len: u32,
        found_tag: FourCC,
        found_len: u32,
    },

    #[error("movie has no {0} chunk")]
    MissingRequired(&'static str),

    #[error(transparent)]
    Stream(#[from] rifx_stream::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
