//! HTTP API handlers for medicate-barcode

pub mod health;
pub mod resolve;

pub use health::health_routes;
pub use resolve::resolve_routes;
