//! Error types for the auctionkit engines.
//!
//! All errors use the `AK_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Sealed-bid (commit-reveal) protocol errors
//! - 2xx: Descending-price lifecycle errors
//! - 9xx: General / internal errors

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{BidderId, SealedBidPhase};

/// Central error enum for all auctionkit operations.
///
/// A descending-price bid that loses the race is **not** an error: it is
/// reported through [`crate::BidAcceptance::success`].
#[derive(Debug, Error)]
pub enum AuctionError {
    // =================================================================
    // Sealed-bid Errors (1xx)
    // =================================================================
    /// The operation was invoked in the wrong lifecycle phase.
    #[error("AK_ERR_100: Wrong auction phase: expected {expected}, got {actual}")]
    WrongPhase {
        expected: SealedBidPhase,
        actual: SealedBidPhase,
    },

    /// The bidder already has a sealed bid on file.
    #[error("AK_ERR_101: Bidder already submitted a sealed bid: {0}")]
    DuplicateBid(BidderId),

    /// Reveal for a bidder that never submitted a sealed bid.
    #[error("AK_ERR_102: No sealed bid found for bidder: {0}")]
    BidNotFound(BidderId),

    /// Reveal attempted twice for the same bidder.
    #[error("AK_ERR_103: Bid already revealed for bidder: {0}")]
    AlreadyRevealed(BidderId),

    /// The revealed `(amount, salt)` does not hash to the stored commitment.
    #[error("AK_ERR_104: Reveal does not match commitment for bidder: {0}")]
    HashMismatch(BidderId),

    /// Reveal attempted after the reveal deadline.
    #[error("AK_ERR_105: Reveal deadline {deadline} passed (now {now})")]
    DeadlineExceeded {
        deadline: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    /// A commitment string could not be parsed.
    #[error("AK_ERR_106: Invalid commitment: {reason}")]
    InvalidCommitment { reason: String },

    // =================================================================
    // Descending-price Errors (2xx)
    // =================================================================
    /// `start()` called while the decay timer is already active.
    #[error("AK_ERR_200: Auction is already running")]
    AlreadyRunning,

    /// `start()` called after a winner was accepted.
    #[error("AK_ERR_201: Auction is closed: winner already accepted")]
    AuctionClosed,

    /// `start()` called with the price already pinned at the reserve.
    #[error("AK_ERR_202: Price already at reserve, nothing left to decay")]
    DecayExhausted,

    // =================================================================
    // Setup (9xx)
    // =================================================================
    /// Configuration error (inconsistent prices, zero interval, etc.).
    #[error("AK_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// A timer-driven operation was invoked outside a tokio runtime.
    #[error("AK_ERR_903: No async runtime available to drive the timer")]
    NoRuntime,
}

impl AuctionError {
    /// Whether this error should be surfaced to operators as a potential
    /// integrity event rather than treated as a plain caller mistake.
    #[must_use]
    pub fn is_security_event(&self) -> bool {
        matches!(self, Self::HashMismatch(_))
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, AuctionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = AuctionError::DuplicateBid(BidderId::from("alice"));
        let msg = format!("{err}");
        assert!(msg.starts_with("AK_ERR_101"), "Got: {msg}");
        assert!(msg.contains("alice"));
    }

    #[test]
    fn wrong_phase_display() {
        let err = AuctionError::WrongPhase {
            expected: SealedBidPhase::Revealing,
            actual: SealedBidPhase::Bidding,
        };
        let msg = format!("{err}");
        assert!(msg.contains("AK_ERR_100"));
        assert!(msg.contains("REVEALING"));
        assert!(msg.contains("BIDDING"));
    }

    #[test]
    fn only_hash_mismatch_is_security_event() {
        assert!(AuctionError::HashMismatch(BidderId::from("x")).is_security_event());
        assert!(!AuctionError::BidNotFound(BidderId::from("x")).is_security_event());
        assert!(!AuctionError::AlreadyRunning.is_security_event());
    }

    #[test]
    fn all_errors_have_ak_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(AuctionError::AlreadyRunning),
            Box::new(AuctionError::AuctionClosed),
            Box::new(AuctionError::DecayExhausted),
            Box::new(AuctionError::NoRuntime),
            Box::new(AuctionError::Configuration("zero interval".into())),
            Box::new(AuctionError::HashMismatch(BidderId::from("x"))),
            Box::new(AuctionError::DeadlineExceeded {
                deadline: Utc::now(),
                now: Utc::now(),
            }),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("AK_ERR_"),
                "Error missing AK_ERR_ prefix: {msg}"
            );
        }
    }
}
