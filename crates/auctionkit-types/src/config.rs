//! Configuration types for auctionkit engines and collaborators.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::{AuctionError, Result, constants};

/// Fixed configuration of a descending-price (Dutch) auction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutchAuctionConfig {
    /// Asking price when the auction is created.
    pub starting_price: Decimal,
    /// Floor below which the asking price never falls.
    pub reserve_price: Decimal,
    /// Amount removed from the asking price on every tick.
    pub price_decrement: Decimal,
    /// Time between ticks.
    pub decrement_interval: Duration,
}

impl DutchAuctionConfig {
    #[must_use]
    pub fn new(
        starting_price: Decimal,
        reserve_price: Decimal,
        price_decrement: Decimal,
        decrement_interval: Duration,
    ) -> Self {
        Self {
            starting_price,
            reserve_price,
            price_decrement,
            decrement_interval,
        }
    }

    /// Check the price ladder is well-formed.
    ///
    /// # Errors
    /// Returns [`AuctionError::Configuration`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.reserve_price.is_sign_negative() {
            return Err(AuctionError::Configuration(format!(
                "reserve price {} must not be negative",
                self.reserve_price
            )));
        }
        if self.reserve_price > self.starting_price {
            return Err(AuctionError::Configuration(format!(
                "reserve price {} exceeds starting price {}",
                self.reserve_price, self.starting_price
            )));
        }
        if self.price_decrement <= Decimal::ZERO {
            return Err(AuctionError::Configuration(format!(
                "price decrement {} must be positive",
                self.price_decrement
            )));
        }
        if self.decrement_interval.is_zero() {
            return Err(AuctionError::Configuration(
                "decrement interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of ticks needed to walk from `price` down to the reserve.
    ///
    /// Saturates at `u64::MAX` when the count is not representable.
    #[must_use]
    pub fn ticks_to_reserve_from(&self, price: Decimal) -> u64 {
        if self.price_decrement <= Decimal::ZERO || price <= self.reserve_price {
            return 0;
        }
        price
            .checked_sub(self.reserve_price)
            .and_then(|span| span.checked_div(self.price_decrement))
            .and_then(|ticks| ticks.ceil().to_u64())
            .unwrap_or(u64::MAX)
    }
}

impl Default for DutchAuctionConfig {
    fn default() -> Self {
        Self {
            starting_price: Decimal::from(constants::DEFAULT_DUTCH_STARTING_PRICE),
            reserve_price: Decimal::from(constants::DEFAULT_DUTCH_RESERVE_PRICE),
            price_decrement: Decimal::from(constants::DEFAULT_DUTCH_DECREMENT),
            decrement_interval: Duration::from_millis(constants::DEFAULT_DUTCH_INTERVAL_MS),
        }
    }
}

/// Timing configuration of a sealed-bid (Vickrey) auction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedBidConfig {
    /// Scheduled end of the bidding phase.
    pub bidding_end_time: DateTime<Utc>,
    /// Length of the reveal window that follows `bidding_end_time`.
    pub reveal_duration: Duration,
}

impl SealedBidConfig {
    #[must_use]
    pub fn new(bidding_end_time: DateTime<Utc>, reveal_duration: Duration) -> Self {
        Self {
            bidding_end_time,
            reveal_duration,
        }
    }

    /// Config with the default reveal window.
    #[must_use]
    pub fn with_default_reveal(bidding_end_time: DateTime<Utc>) -> Self {
        Self::new(
            bidding_end_time,
            Duration::from_millis(constants::DEFAULT_REVEAL_DURATION_MS),
        )
    }

    /// Absolute reveal deadline: `bidding_end_time + reveal_duration`.
    ///
    /// # Errors
    /// Returns [`AuctionError::Configuration`] if the sum is not representable.
    pub fn reveal_deadline(&self) -> Result<DateTime<Utc>> {
        let window = chrono::Duration::from_std(self.reveal_duration).map_err(|e| {
            AuctionError::Configuration(format!("reveal duration out of range: {e}"))
        })?;
        self.bidding_end_time
            .checked_add_signed(window)
            .ok_or_else(|| AuctionError::Configuration("reveal deadline overflows".to_string()))
    }
}

/// Tuning knobs for the fraud/risk detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Score at or above which an alert is generated.
    pub alert_threshold: f64,
    /// Lookback window for rapid-bid detection.
    pub rapid_bid_window: Duration,
    /// Prior bids inside the window that count as rapid bidding.
    pub rapid_bid_threshold: usize,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            alert_threshold: constants::DEFAULT_ALERT_THRESHOLD,
            rapid_bid_window: Duration::from_millis(constants::DEFAULT_RAPID_BID_WINDOW_MS),
            rapid_bid_threshold: constants::DEFAULT_RAPID_BID_THRESHOLD,
        }
    }
}
