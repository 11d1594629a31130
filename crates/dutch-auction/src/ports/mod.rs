//! # Ports Layer
//!
//! - **Driving Port (Inbound)**: `DutchAuctionApi`
//! - **Driven Ports (Outbound)**: `AssetLedger`, `Clock`, `EventSink`, `AllowList`

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
