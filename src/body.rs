use crate::error::BoxError;
use bytes::{Buf, Bytes};
use http_body::{Body, Frame, SizeHint};
use pin_project_lite::pin_project;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

pin_project! {
    /// A request body handed to the inner service.
    ///
    /// Either the original body, forwarded unchanged, or the fully buffered
    /// result of decompressing a gzip body.
    #[project = DecompressionBodyProj]
    #[allow(missing_docs)]
    pub enum DecompressionBody<B> {
        /// Decompressed bytes, yielded as a single data frame.
        Decompressed {
            data: Option<Bytes>,
        },
        /// Original body without decompression.
        Passthrough {
            #[pin]
            inner: B,
        },
    }
}

impl<B> DecompressionBody<B> {
    /// Creates a body holding already decompressed bytes.
    pub fn decompressed(data: Bytes) -> Self {
        Self::Decompressed { data: Some(data) }
    }

    /// Creates a body that yields nothing.
    pub fn empty() -> Self {
        Self::decompressed(Bytes::new())
    }

    /// Creates a passthrough body forwarding the original request body.
    pub fn passthrough(inner: B) -> Self {
        Self::Passthrough { inner }
    }

    /// Returns true if this body is the untouched original.
    pub fn is_passthrough(&self) -> bool {
        matches!(self, Self::Passthrough { .. })
    }
}

impl<B> Body for DecompressionBody<B>
where
    B: Body,
    B::Data: Buf,
    B::Error: Into<BoxError>,
{
    type Data = Bytes;
    type Error = io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match self.project() {
            DecompressionBodyProj::Decompressed { data } => {
                let frame = data.take().filter(|d| !d.is_empty()).map(Frame::data);
                Poll::Ready(frame.map(Ok))
            }
            DecompressionBodyProj::Passthrough { inner } => match inner.poll_frame(cx) {
                Poll::Pending => Poll::Pending,
                Poll::Ready(None) => Poll::Ready(None),
                Poll::Ready(Some(Ok(frame))) => {
                    let frame = frame.map_data(|mut data| data.copy_to_bytes(data.remaining()));
                    Poll::Ready(Some(Ok(frame)))
                }
                Poll::Ready(Some(Err(e))) => Poll::Ready(Some(Err(io::Error::other(e.into())))),
            },
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            DecompressionBody::Decompressed { data } => data.as_ref().is_none_or(Bytes::is_empty),
            DecompressionBody::Passthrough { inner } => inner.is_end_stream(),
        }
    }

    fn size_hint(&self) -> SizeHint {
        match self {
            DecompressionBody::Decompressed { data } => {
                SizeHint::with_exact(data.as_ref().map_or(0, |d| d.len() as u64))
            }
            DecompressionBody::Passthrough { inner } => inner.size_hint(),
        }
    }
}
