//! API Gateway
//!
//! Single process exposing a REST surface and a GraphQL surface over the
//! user and reunion gRPC services. Holds one client handle per backend,
//! constructed in the composition root and injected into handlers and
//! resolvers; no process-wide singletons.

pub mod error;
pub mod graphql;
pub mod rest;

pub use error::{GatewayError, GatewayResult};
pub use graphql::{build_schema, AppSchema};
pub use rest::AppState;
