//! HTTP infrastructure module
//!
//! This module contains HTTP-related concerns including models,
//! server implementation, routes, utilities, responses, and handlers.

pub mod handlers;
pub mod models;
pub mod responses;
pub mod routes;
pub mod server;
pub mod utils;

pub use handlers::*;
pub use models::{ApiEnvelope, DepositVerifyQuery, RequestContext};
pub use responses::ResponseFormatter;
pub use server::HttpServer;
pub use utils::*;
