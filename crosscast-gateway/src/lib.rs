//! crosscast-gateway - HTTP proxy between the composer and platform APIs
//!
//! Holds platform credentials server-side and exposes one thin POST
//! endpoint per platform, so composer frontends only ever speak the
//! envelope contract.

pub mod config;
pub mod server;

pub use config::GatewayConfig;
pub use server::{build_router, GatewayState};
