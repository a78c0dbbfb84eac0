//! Lifecycle phases of the sealed-bid auction.
//!
//! A sealed-bid auction moves through two phases, once and irreversibly:
//! **BIDDING → REVEALING**
//!
//! During BIDDING, bidders file hash commitments.
//! During REVEALING, bidders disclose `(amount, salt)` until the reveal deadline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two phases of a commit-reveal auction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SealedBidPhase {
    /// Accepting sealed commitments.
    Bidding,
    /// Commitments closed; accepting reveals until the deadline.
    Revealing,
}

impl fmt::Display for SealedBidPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bidding => write!(f, "BIDDING"),
            Self::Revealing => write!(f, "REVEALING"),
        }
    }
}

impl SealedBidPhase {
    /// Whether new sealed bids are accepted in this phase.
    #[must_use]
    pub fn accepts_commitments(self) -> bool {
        matches!(self, Self::Bidding)
    }

    /// Whether reveals are accepted in this phase (deadline aside).
    #[must_use]
    pub fn accepts_reveals(self) -> bool {
        matches!(self, Self::Revealing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_display() {
        assert_eq!(format!("{}", SealedBidPhase::Bidding), "BIDDING");
        assert_eq!(format!("{}", SealedBidPhase::Revealing), "REVEALING");
    }

    #[test]
    fn phase_gates() {
        assert!(SealedBidPhase::Bidding.accepts_commitments());
        assert!(!SealedBidPhase::Bidding.accepts_reveals());
        assert!(SealedBidPhase::Revealing.accepts_reveals());
        assert!(!SealedBidPhase::Revealing.accepts_commitments());
    }

    #[test]
    fn phase_serde_roundtrip() {
        let phase = SealedBidPhase::Revealing;
        let json = serde_json::to_string(&phase).unwrap();
        let back: SealedBidPhase = serde_json::from_str(&json).unwrap();
        assert_eq!(phase, back);
    }
}
