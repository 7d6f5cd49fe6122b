use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unexpected end of data at offset {offset:#x} (need {need} bytes, have {have})")]
    UnexpectedEof {
        offset: usize,
        need: usize,
        have: usize,
    },

    #[error("variable-length integer at offset {offset:#x} does not fit in 32 bits")]
    VarintOverflow { offset: usize },

    #[error("zlib inflate failed at offset {offset:#x}")]
    Inflate {
        offset: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("inflated data at offset {offset:#x} exceeds the {budget}-byte budget")]
    InflateOverrun { offset: usize, budget: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
