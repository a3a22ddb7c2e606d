use crate::error::DecompressionError;
use bytes::{Bytes, BytesMut};
use compression_codecs::{DecodeV2, gzip::GzipDecoder};
use compression_core::util::{PartialBuffer, WriteBuffer};
use http::{HeaderMap, header};

const OUTPUT_BUFFER_SIZE: usize = 8 * 1024; // 8KB output buffer

/// The only Content-Encoding value this middleware decodes.
pub const GZIP: &str = "gzip";

/// Returns true if the request declares a gzip-encoded body.
///
/// The header value must be exactly `gzip`. Other casings and encoding
/// lists such as `gzip, identity` are left alone.
pub(crate) fn is_gzip(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_ENCODING)
        .is_some_and(|v| v.as_bytes() == GZIP.as_bytes())
}

/// Decompresses a complete gzip stream held in memory.
///
/// Concatenated gzip members decode to the concatenation of their payloads.
/// When `max_size` is set, output beyond that many bytes is an error.
///
/// This is the decoding step the middleware applies to request bodies.
pub fn decompress(
    input: &[u8],
    max_size: Option<usize>,
) -> Result<Bytes, DecompressionError> {
    let total = input.len();
    let mut decoder = GzipDecoder::new();
    let mut input = PartialBuffer::new(input);
    let mut buffer = vec![0u8; OUTPUT_BUFFER_SIZE];
    let mut decoded = BytesMut::new();

    loop {
        let consumed = input.written_len();
        let mut output = WriteBuffer::new_initialized(buffer.as_mut_slice());
        let done = decoder.decode(&mut input, &mut output)?;

        let written = output.written_len();
        append(&mut decoded, &buffer[..written], max_size)?;

        if done {
            if input.written_len() >= total {
                break;
            }
            // Another member follows
            decoder.reinit()?;
        } else if written == 0 && input.written_len() == consumed {
            // Input exhausted mid-stream
            return Err(DecompressionError::Truncated);
        }
    }

    loop {
        let mut output = WriteBuffer::new_initialized(buffer.as_mut_slice());
        let done = decoder.finish(&mut output)?;

        let written = output.written_len();
        append(&mut decoded, &buffer[..written], max_size)?;

        if done {
            break;
        }
        if written == 0 {
            return Err(DecompressionError::Truncated);
        }
    }

    Ok(decoded.freeze())
}

/// Appends a decoded chunk, enforcing the size limit.
fn append(
    decoded: &mut BytesMut,
    chunk: &[u8],
    max_size: Option<usize>,
) -> Result<(), DecompressionError> {
    if let Some(limit) = max_size.filter(|&limit| decoded.len() + chunk.len() > limit) {
        return Err(DecompressionError::TooLarge { limit });
    }
    decoded.extend_from_slice(chunk);
    Ok(())
}
