//! Pure descending-price state machine.
//!
//! [`PriceLadder`] holds everything a Dutch auction mutates: the asking
//! price, the winner, and whether decay is active. It has no clock and no
//! locking; [`crate::DescendingPriceAuction`] drives it from a timer under a
//! mutex.
//!
//! Invariants:
//! - `reserve_price <= current_price <= starting_price`
//! - `current_price` never increases
//! - `winner` is set at most once
//! - decay is inactive once a winner exists or the reserve is reached

use auctionkit_types::{AuctionError, BidAcceptance, BidderId, DutchAuctionConfig, Result};
use rust_decimal::Decimal;

/// Price, winner and run flag of one descending-price auction.
#[derive(Debug, Clone)]
pub struct PriceLadder {
    config: DutchAuctionConfig,
    current_price: Decimal,
    winner: Option<BidderId>,
    running: bool,
}

impl PriceLadder {
    /// Create a ladder at the starting price, not yet running.
    ///
    /// # Errors
    /// Returns [`AuctionError::Configuration`] if the config is inconsistent.
    pub fn new(config: DutchAuctionConfig) -> Result<Self> {
        config.validate()?;
        let current_price = config.starting_price;
        Ok(Self {
            config,
            current_price,
            winner: None,
            running: false,
        })
    }

    #[must_use]
    pub fn config(&self) -> &DutchAuctionConfig {
        &self.config
    }

    #[must_use]
    pub fn current_price(&self) -> Decimal {
        self.current_price
    }

    #[must_use]
    pub fn winner(&self) -> Option<&BidderId> {
        self.winner.as_ref()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn at_reserve(&self) -> bool {
        self.current_price == self.config.reserve_price
    }

    /// Begin decay.
    ///
    /// # Errors
    /// - `AlreadyRunning` if decay is active
    /// - `AuctionClosed` if a winner was accepted
    /// - `DecayExhausted` if the price already sits at the reserve
    pub fn begin(&mut self) -> Result<()> {
        if self.running {
            return Err(AuctionError::AlreadyRunning);
        }
        if self.winner.is_some() {
            return Err(AuctionError::AuctionClosed);
        }
        if self.at_reserve() {
            return Err(AuctionError::DecayExhausted);
        }
        self.running = true;
        Ok(())
    }

    /// Halt decay. Returns whether decay was active.
    pub fn halt(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    /// Apply one decrement, floored at the reserve.
    ///
    /// Returns `(previous, current)` when the price moved. Reaching the
    /// reserve halts decay. A halted ladder never moves.
    pub fn tick(&mut self) -> Option<(Decimal, Decimal)> {
        if !self.running {
            return None;
        }
        let previous = self.current_price;
        self.current_price = (previous - self.config.price_decrement).max(self.config.reserve_price);
        if self.at_reserve() {
            self.running = false;
        }
        (self.current_price != previous).then_some((previous, self.current_price))
    }

    /// Accept `bidder` at the current price if nobody has won yet.
    pub fn accept(&mut self, bidder: &BidderId) -> BidAcceptance {
        if self.winner.is_some() {
            return BidAcceptance::rejected();
        }
        self.winner = Some(bidder.clone());
        self.running = false;
        BidAcceptance::accepted(self.current_price)
    }
}
