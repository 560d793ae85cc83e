//! Clients - HTTP Clients for External APIs
//!
//! This module contains the platform API client and the HTTP transport it
//! sends requests through.

pub mod pvz_client;
pub mod transport;

// Re-export main types for convenience
pub use pvz_client::{ApiClient, ApiClientBuilder, BodyFormat};
pub use transport::{
    HttpMethod,
    HttpRequest,
    HttpResponse,
    HttpTransport,
    InterceptedTransport,
    RequestBody,
    RequestInterceptor,
    ReqwestTransport,
};
