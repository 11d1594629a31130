//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-memory and tracing implementations of the outbound ports.

mod allow_list;
mod clock;
mod events;
mod ledger;

pub use allow_list::InMemoryAllowList;
pub use clock::{ManualClock, SystemClock};
pub use events::{FanoutEventSink, InMemoryEventLog, TracingEventSink};
pub use ledger::InMemoryLedger;
