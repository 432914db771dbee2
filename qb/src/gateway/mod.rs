//! Remote gateway for Questboard
//!
//! Thin typed accessor to the external task/stats/analysis API.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod http;

pub use client::Gateway;
pub use error::GatewayError;
pub use http::HttpGateway;

use crate::config::Config;

/// Create the HTTP gateway described by the config
pub fn create_gateway(config: &Config) -> Result<Arc<dyn Gateway>, GatewayError> {
    debug!(base_url = %config.gateway.base_url, "create_gateway: called");
    Ok(Arc::new(HttpGateway::from_config(&config.gateway, &config.analysis)?))
}
