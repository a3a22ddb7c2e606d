//! HTTP request decompression middleware for Tower.
//!
//! This crate provides a Tower layer that transparently inflates gzip-encoded
//! request bodies before they reach the wrapped service.
//!
//! # Example
//!
//! ```ignore
//! use http_request_decompression::{DecompressionLayer, ExcludedPaths};
//! use tower::ServiceBuilder;
//!
//! let excluded = ExcludedPaths::new();
//! excluded.add("/webhooks/raw");
//!
//! let service = ServiceBuilder::new()
//!     .layer(DecompressionLayer::new().excluded_paths(excluded))
//!     .service(my_service);
//! ```
//!
//! # Decompression Rules
//!
//! The middleware forwards the request **unchanged** when:
//! - The request path is in the excluded path set (exact match)
//! - `Content-Encoding` is missing or is not exactly `gzip`
//!
//! Otherwise the whole body is buffered and decompressed.
//!
//! # Request Modifications
//!
//! When the body decompresses:
//! - The body is replaced with the decompressed bytes
//! - `Content-Encoding` header is removed
//! - `Content-Length` header is set to the decompressed size in bytes
//!
//! When the body is not valid gzip, is truncated, or inflates past the
//! configured `max_size`, the request is still forwarded, with an empty body,
//! no `Content-Encoding` header and `Content-Length: 0`. The failure is never
//! returned as an error.
//!
//! Responses are passed through untouched.

#![deny(missing_docs)]

mod body;
mod codec;
mod error;
mod excluded;
mod future;
mod layer;
mod service;

pub use body::DecompressionBody;
pub use codec::{GZIP, decompress};
pub use error::{BoxError, DecompressionError};
pub use excluded::ExcludedPaths;
pub use future::ResponseFuture;
pub use layer::DecompressionLayer;
pub use service::DecompressionService;
