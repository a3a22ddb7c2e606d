use crate::body::DecompressionBody;
use crate::codec;
use crate::error::BoxError;
use crate::excluded::ExcludedPaths;
use crate::future::ResponseFuture;
use bytes::Buf;
use http::Request;
use http_body::Body;
use std::task::{Context, Poll};
use tower::Service;

/// A Tower service that decompresses gzip HTTP request bodies.
#[derive(Debug, Clone)]
pub struct DecompressionService<S> {
    inner: S,
    excluded_paths: ExcludedPaths,
    max_size: Option<usize>,
}

impl<S> DecompressionService<S> {
    /// Creates a new decompression service wrapping the given inner service.
    pub fn new(inner: S, excluded_paths: ExcludedPaths, max_size: Option<usize>) -> Self {
        Self {
            inner,
            excluded_paths,
            max_size,
        }
    }

    /// Returns a reference to the inner service.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Returns a mutable reference to the inner service.
    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Consumes this service, returning the inner service.
    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Returns the shared set of paths that bypass decompression.
    pub fn excluded_paths(&self) -> &ExcludedPaths {
        &self.excluded_paths
    }
}

impl<S, B> Service<Request<B>> for DecompressionService<S>
where
    S: Service<Request<DecompressionBody<B>>> + Clone,
    B: Body,
    B::Data: Buf,
    B::Error: Into<BoxError>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = ResponseFuture<S, B>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        if self.excluded_paths.contains(req.uri().path()) {
            tracing::trace!(path = req.uri().path(), "skipping decompression for excluded path");
            let req = req.map(DecompressionBody::passthrough);
            return ResponseFuture::calling(self.inner.call(req));
        }

        if !codec::is_gzip(req.headers()) {
            let req = req.map(DecompressionBody::passthrough);
            return ResponseFuture::calling(self.inner.call(req));
        }

        // The ready service goes with the future; keep a clone for later calls
        let clone = self.inner.clone();
        let inner = std::mem::replace(&mut self.inner, clone);

        let (parts, body) = req.into_parts();
        ResponseFuture::buffering(body, parts, inner, self.max_size)
    }
}
