use std::io;

/// Boxed error type used for request body read failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Reasons a gzip request body could not be decompressed.
///
/// The service never surfaces these to callers; they are logged and the
/// request continues with an empty body.
#[derive(Debug, thiserror::Error)]
pub enum DecompressionError {
    /// The stream is not valid gzip (bad header, corrupt data, checksum mismatch).
    #[error("invalid gzip stream: {0}")]
    Decode(#[from] io::Error),
    /// The stream ended before the gzip trailer was read.
    #[error("gzip stream is truncated")]
    Truncated,
    /// The decompressed output exceeded the configured limit.
    #[error("decompressed body exceeds {limit} bytes")]
    TooLarge {
        /// The configured maximum decompressed size.
        limit: usize,
    },
    /// Reading the request body failed.
    #[error("failed to read request body: {0}")]
    Body(#[source] BoxError),
}
