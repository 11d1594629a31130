//! Structured logging macros.
//!
//! Records carry a consistent set of fields so a log pipeline can index them:
//! - `auction_id`: auction instance identifier
//! - `event`: snake_case event or operation name
//! - `participant`: account the record concerns, when there is one
//! - Additional context fields

/// Log an auction-level record with standard fields.
///
/// ```rust,ignore
/// log_auction_event!(info, service.id(), "auction_finalized", "settled", outcome = ?kind);
/// ```
#[macro_export]
macro_rules! log_auction_event {
    ($level:ident, $auction_id:expr, $event:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            target: "auction",
            auction_id = %$auction_id,
            event = $event,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a record about one participant's commitment, claim or refund.
#[macro_export]
macro_rules! log_participant_event {
    ($level:ident, $auction_id:expr, $event:expr, $participant:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            target: "auction",
            auction_id = %$auction_id,
            event = $event,
            participant = %$participant,
            $($($field)*,)?
            $msg
        )
    };
}
