//! Bid events and the observer contract.
//!
//! Engines push every accepted or revealed bid, and every price step, to an
//! optional [`BidObserver`]. Observers are purely observational: nothing they
//! do or return can change an auction outcome.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AuctionId, BidderId};

/// A bid that an engine has accepted (Dutch) or verified (Vickrey reveal).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidEvent {
    pub bidder_id: BidderId,
    pub auction_id: AuctionId,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
}

/// A change of the asking price in a descending-price auction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTransition {
    pub auction_id: AuctionId,
    pub previous: Decimal,
    pub current: Decimal,
    pub timestamp: DateTime<Utc>,
}

/// Receives bid events from the engines.
///
/// Called after the engine has released its internal lock, so an observer
/// may safely query the engine that notified it.
pub trait BidObserver: Send + Sync {
    fn on_bid(&self, event: &BidEvent);

    fn on_price_transition(&self, _transition: &PriceTransition) {}
}
