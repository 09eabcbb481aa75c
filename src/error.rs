use crate::light::LighterError;

/// Errors raised while reading, writing or rebuilding a vertex buffer.
///
/// All of these are programmer errors surfaced immediately; nothing here is
/// worth retrying.
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    /// A vertex index past the end of the buffer.
    #[error("vertex index {index} out of bounds for buffer of {vertex_count} vertices")]
    OutOfBounds { index: usize, vertex_count: usize },

    /// The source buffer is not a whole number of records.
    #[error("buffer length {len} is not a multiple of the {stride}-byte vertex stride")]
    FormatMismatch { len: usize, stride: usize },

    /// The light sampling callback failed while processing a vertex.
    #[error("light sampling failed at vertex {index}")]
    Lighter {
        index: usize,
        #[source]
        source: LighterError,
    },
}

pub type BufferResult<T> = Result<T, BufferError>;
