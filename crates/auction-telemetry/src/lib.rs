//! # Auction Telemetry
//!
//! Logging bootstrap for the Dutch auction service.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use auction_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env()).expect("telemetry");
//!     // auction calls now emit structured records
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `dutch-auction` | Service name on every record |
//! | `DA_LOG_LEVEL` / `RUST_LOG` | `info` | Filter directives |
//! | `DA_CONSOLE_OUTPUT` | `true` | Write records to stdout |
//! | `DA_JSON_LOGS` | `false` (`true` in containers) | JSON instead of pretty output |

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod logging;
mod subscriber;

pub use config::TelemetryConfig;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    /// A global subscriber could not be installed (usually one already is).
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    /// Filter directives or other settings are malformed.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Install the global subscriber.
///
/// Returns a guard that should be held for the lifetime of the process.
/// Fails with [`TelemetryError::SubscriberInit`] if called twice.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    subscriber::install(&config)?;

    tracing::info!(
        service = %config.service_name,
        level = %config.log_level,
        json = config.json_logs,
        "telemetry initialized"
    );

    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Guard that keeps telemetry active. Logs shutdown on drop.
#[derive(Debug)]
pub struct TelemetryGuard {
    service_name: String,
}

impl TelemetryGuard {
    /// Service name the subscriber was installed for.
    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "shutting down telemetry");
    }
}
