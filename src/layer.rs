use crate::excluded::ExcludedPaths;
use crate::service::DecompressionService;
use tower::Layer;

/// A Tower layer that decompresses gzip HTTP request bodies.
///
/// Requests with `Content-Encoding: gzip` have their body replaced by the
/// decompressed bytes before reaching the wrapped service, unless their path
/// is excluded.
#[derive(Debug, Clone, Default)]
pub struct DecompressionLayer {
    excluded_paths: ExcludedPaths,
    max_size: Option<usize>,
}

impl DecompressionLayer {
    /// Creates a new decompression layer with no excluded paths and no size limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a shared set of excluded paths.
    ///
    /// The set stays live: paths added to `paths` later also apply to
    /// services already built by this layer.
    pub fn excluded_paths(mut self, paths: ExcludedPaths) -> Self {
        self.excluded_paths = paths;
        self
    }

    /// Excludes a single path from decompression.
    pub fn exclude_path(self, path: impl Into<String>) -> Self {
        self.excluded_paths.add(path);
        self
    }

    /// Sets the maximum decompressed body size in bytes.
    ///
    /// Bodies that inflate past this limit are treated like malformed gzip
    /// and forwarded empty.
    pub fn max_size(mut self, size: usize) -> Self {
        self.max_size = Some(size);
        self
    }

    /// Returns the shared set of excluded paths.
    pub fn paths(&self) -> &ExcludedPaths {
        &self.excluded_paths
    }
}

impl<S> Layer<S> for DecompressionLayer {
    type Service = DecompressionService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        DecompressionService::new(inner, self.excluded_paths.clone(), self.max_size)
    }
}
