//! Results returned by the auction engines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::BidderId;

/// Result of a descending-price acceptance attempt.
///
/// A losing attempt is a value, not an error: callers branch on `success`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidAcceptance {
    /// Whether this call became the winner.
    pub success: bool,
    /// Price locked in for the winner; zero when `success` is false.
    pub price: Decimal,
}

impl BidAcceptance {
    #[must_use]
    pub fn accepted(price: Decimal) -> Self {
        Self {
            success: true,
            price,
        }
    }

    #[must_use]
    pub fn rejected() -> Self {
        Self {
            success: false,
            price: Decimal::ZERO,
        }
    }
}

/// Winner and clearing price of a closed auction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionOutcome {
    /// The winning bidder, if any bid was revealed.
    pub winner: Option<BidderId>,
    /// Price the winner pays; zero without a winner.
    pub price: Decimal,
}

impl AuctionOutcome {
    #[must_use]
    pub fn won(winner: BidderId, price: Decimal) -> Self {
        Self {
            winner: Some(winner),
            price,
        }
    }

    #[must_use]
    pub fn no_winner() -> Self {
        Self {
            winner: None,
            price: Decimal::ZERO,
        }
    }

    #[must_use]
    pub fn has_winner(&self) -> bool {
        self.winner.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_acceptance_is_zero_priced() {
        let r = BidAcceptance::rejected();
        assert!(!r.success);
        assert_eq!(r.price, Decimal::ZERO);
    }

    #[test]
    fn no_winner_outcome() {
        let o = AuctionOutcome::no_winner();
        assert!(!o.has_winner());
        assert_eq!(o.price, Decimal::ZERO);
    }

    #[test]
    fn outcome_serde_roundtrip() {
        let o = AuctionOutcome::won(BidderId::from("A"), Decimal::new(80, 0));
        let json = serde_json::to_string(&o).unwrap();
        let back: AuctionOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(o, back);
    }
}
