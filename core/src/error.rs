use thiserror::Error;

/// Errors raised while building, saving or loading an index.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Also covers truncated files: a short read surfaces here.
    #[error("Corrupt index stream: {0}")]
    Codec(#[from] bincode::Error),

    #[error("Too many documents: {0} exceeds the 32-bit posting range")]
    TooManyDocuments(usize),
}

pub type Result<T> = std::result::Result<T, IndexError>;

impl IndexError {
    /// True when the stream ended before a declared length could be read.
    pub fn is_truncated(&self) -> bool {
        match self {
            IndexError::Codec(e) => matches!(
                e.as_ref(),
                bincode::ErrorKind::Io(io) if io.kind() == std::io::ErrorKind::UnexpectedEof
            ),
            IndexError::Io(io) => io.kind() == std::io::ErrorKind::UnexpectedEof,
            IndexError::TooManyDocuments(_) => false,
        }
    }
}
