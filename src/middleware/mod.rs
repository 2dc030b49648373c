//! Middleware layer - Cross-cutting request concerns

pub mod cors;
pub mod rate_limit;
pub mod security_headers;

pub use cors::CorsMiddleware;
pub use rate_limit::RateLimitMiddleware;
pub use security_headers::SecurityHeadersMiddleware;
