use crate::body::DecompressionBody;
use crate::codec;
use crate::error::{BoxError, DecompressionError};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use http::{HeaderValue, Request, header, request};
use http_body::Body;
use pin_project_lite::pin_project;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll, ready};
use tower::Service;

pin_project! {
    /// Future for decompression service responses.
    ///
    /// For gzip requests it first buffers and decodes the body, then calls
    /// the inner service. Otherwise it only drives the inner service's future.
    pub struct ResponseFuture<S: Service<Request<DecompressionBody<B>>>, B> {
        #[pin]
        state: State<S, B>,
    }
}

pin_project! {
    #[project = StateProj]
    enum State<S: Service<Request<DecompressionBody<B>>>, B> {
        /// Collecting the compressed request body.
        Buffering {
            #[pin]
            body: B,
            buffered: BytesMut,
            parts: Option<request::Parts>,
            service: Option<S>,
            max_size: Option<usize>,
        },
        /// Waiting on the inner service.
        Calling {
            #[pin]
            future: S::Future,
        },
    }
}

impl<S, B> ResponseFuture<S, B>
where
    S: Service<Request<DecompressionBody<B>>>,
{
    /// Wraps an inner call that needs no decompression.
    pub(crate) fn calling(future: S::Future) -> Self {
        Self {
            state: State::Calling { future },
        }
    }

    /// Buffers `body`, decompresses it, then calls `service`.
    ///
    /// `service` must already be ready.
    pub(crate) fn buffering(
        body: B,
        parts: request::Parts,
        service: S,
        max_size: Option<usize>,
    ) -> Self {
        Self {
            state: State::Buffering {
                body,
                buffered: BytesMut::new(),
                parts: Some(parts),
                service: Some(service),
                max_size,
            },
        }
    }
}

impl<S, B> Future for ResponseFuture<S, B>
where
    S: Service<Request<DecompressionBody<B>>>,
    B: Body,
    B::Data: Buf,
    B::Error: Into<BoxError>,
{
    type Output = Result<S::Response, S::Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.project().state;

        loop {
            let future = match state.as_mut().project() {
                StateProj::Calling { future } => return future.poll(cx),
                StateProj::Buffering {
                    body,
                    buffered,
                    parts,
                    service,
                    max_size,
                } => {
                    let collected = ready!(poll_collect(body, cx, buffered));
                    let decoded =
                        collected.and_then(|()| codec::decompress(buffered, *max_size));

                    let mut parts = parts.take().expect("future polled after completion");
                    let mut service = service.take().expect("future polled after completion");

                    let body = decoded_or_empty(decoded);
                    rewrite_headers(&mut parts.headers, body.len());

                    let request = Request::from_parts(parts, DecompressionBody::decompressed(body));
                    service.call(request)
                }
            };

            state.set(State::Calling { future });
        }
    }
}

/// Reads every data frame of `body` into `buffered`. Trailers are dropped.
fn poll_collect<B>(
    mut body: Pin<&mut B>,
    cx: &mut Context<'_>,
    buffered: &mut BytesMut,
) -> Poll<Result<(), DecompressionError>>
where
    B: Body,
    B::Data: Buf,
    B::Error: Into<BoxError>,
{
    loop {
        match ready!(body.as_mut().poll_frame(cx)) {
            None => return Poll::Ready(Ok(())),
            Some(Ok(frame)) => {
                if let Ok(data) = frame.into_data() {
                    buffered.put(data);
                }
            }
            Some(Err(e)) => return Poll::Ready(Err(DecompressionError::Body(e.into()))),
        }
    }
}

/// Falls back to an empty body when decompression failed.
fn decoded_or_empty(decoded: Result<Bytes, DecompressionError>) -> Bytes {
    match decoded {
        Ok(body) => {
            tracing::trace!(len = body.len(), "decompressed gzip request body");
            body
        }
        Err(error) => {
            tracing::debug!(%error, "replacing undecodable gzip request body with an empty body");
            Bytes::new()
        }
    }
}

/// Drops the gzip Content-Encoding and sets Content-Length to the new body size.
fn rewrite_headers(headers: &mut header::HeaderMap, len: usize) {
    headers.remove(header::CONTENT_ENCODING);
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
}
