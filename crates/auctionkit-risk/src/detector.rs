//! Fraud detector: heuristic risk scoring over observed bids.
//!
//! Three independent detectors each produce a sub-score in `[0, 1]`:
//!
//! - **Rapid bidding**: one bidder placing many bids in one auction inside a
//!   short window
//! - **Price manipulation**: a bid far from the auction's last observed price
//! - **Bid shilling**: the same few bidders dominating the recent bid list
//!
//! The overall score is their mean. History is kept per `(bidder, auction)`
//! and per auction behind one mutex, so a detector can be shared across
//! engines and threads.

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use auctionkit_types::{
    AuctionContext, AuctionId, BidEvent, BidObserver, BidderId, FraudAlert, PriceTransition,
    RiskConfig, RiskScore, constants,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

#[derive(Debug, Clone, Copy)]
struct BidRecord {
    amount: Decimal,
    timestamp: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct History {
    bids: HashMap<(BidderId, AuctionId), Vec<BidRecord>>,
    auctions: HashMap<AuctionId, AuctionContext>,
    alerts: Vec<FraudAlert>,
}

/// Scores bid events and collects alerts.
#[derive(Debug)]
pub struct FraudDetector {
    config: RiskConfig,
    history: Mutex<History>,
}

impl FraudDetector {
    /// Create a detector with default thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RiskConfig::default())
    }

    #[must_use]
    pub fn with_config(config: RiskConfig) -> Self {
        Self {
            config,
            history: Mutex::new(History::default()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    fn history(&self) -> MutexGuard<'_, History> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Rapid-bidding sub-score for `bidder` in `auction` as of `now`.
    ///
    /// Counts previously recorded bids no older than the configured window.
    #[must_use]
    pub fn detect_rapid_bidding(
        &self,
        bidder: &BidderId,
        auction: AuctionId,
        now: DateTime<Utc>,
    ) -> f64 {
        self.rapid_score(&self.history(), bidder, auction, now)
    }

    fn rapid_score(
        &self,
        history: &History,
        bidder: &BidderId,
        auction: AuctionId,
        now: DateTime<Utc>,
    ) -> f64 {
        let recent = history
            .bids
            .get(&(bidder.clone(), auction))
            .map_or(0, |records| {
                records
                    .iter()
                    .filter(|r| within_window(r.timestamp, now, self.config.rapid_bid_window))
                    .count()
            });

        if recent >= self.config.rapid_bid_threshold {
            constants::RAPID_BID_SCORE
        } else {
            0.0
        }
    }

    /// Price-manipulation sub-score: the relative jump from `previous`.
    ///
    /// A zero or negative baseline scores 0. A jump too large to represent
    /// scores as severe.
    #[must_use]
    pub fn detect_price_manipulation(current: Decimal, previous: Decimal) -> f64 {
        if previous <= Decimal::ZERO {
            return 0.0;
        }
        let Some(jump) = current
            .checked_sub(previous)
            .and_then(|diff| diff.abs().checked_div(previous))
        else {
            return constants::PRICE_JUMP_SEVERE_SCORE;
        };
        let jump = jump.to_f64().unwrap_or(f64::MAX);

        if jump > constants::PRICE_JUMP_SEVERE {
            constants::PRICE_JUMP_SEVERE_SCORE
        } else if jump > constants::PRICE_JUMP_MODERATE {
            constants::PRICE_JUMP_MODERATE_SCORE
        } else {
            0.0
        }
    }

    /// Shilling sub-score: `1 - unique / total` over `bidders`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn detect_bid_shilling(bidders: &[BidderId]) -> f64 {
        if bidders.is_empty() {
            return 0.0;
        }
        let unique = bidders.iter().collect::<HashSet<_>>().len();
        let repetition = 1.0 - unique as f64 / bidders.len() as f64;

        if repetition > constants::SHILLING_SEVERE {
            constants::SHILLING_SEVERE_SCORE
        } else if repetition > constants::SHILLING_MODERATE {
            constants::SHILLING_MODERATE_SCORE
        } else {
            0.0
        }
    }

    /// Overall score for `event` against `context`.
    ///
    /// The shilling check runs over the context's recent bidders plus the
    /// event's own bidder; the price check compares against
    /// `context.last_price`.
    #[must_use]
    pub fn calculate_risk_score(&self, event: &BidEvent, context: &AuctionContext) -> RiskScore {
        self.score_with(&self.history(), event, context)
    }

    fn score_with(
        &self,
        history: &History,
        event: &BidEvent,
        context: &AuctionContext,
    ) -> RiskScore {
        let rapid = self.rapid_score(history, &event.bidder_id, event.auction_id, event.timestamp);
        let manipulation = context
            .last_price
            .map_or(0.0, |prev| Self::detect_price_manipulation(event.amount, prev));

        let mut bidders = context.recent_bidders.clone();
        bidders.push(event.bidder_id.clone());
        let shilling = Self::detect_bid_shilling(&bidders);

        RiskScore::new((rapid + manipulation + shilling) / 3.0)
    }

    /// An alert for `score` if it meets the configured threshold.
    #[must_use]
    pub fn generate_alert(
        &self,
        bidder: &BidderId,
        auction: AuctionId,
        score: RiskScore,
        timestamp: DateTime<Utc>,
    ) -> Option<FraudAlert> {
        if score.value() < self.config.alert_threshold {
            return None;
        }
        Some(FraudAlert {
            bidder_id: bidder.clone(),
            auction_id: auction,
            risk_score: score,
            reason: score.level().reason().to_string(),
            timestamp,
        })
    }

    /// Add `event` to the bidder's history and the auction's context.
    ///
    /// Bids older than the rapid-bid window are pruned from the bidder's
    /// history; the recent bidder list is capped at
    /// [`constants::MAX_RECENT_BIDDERS`].
    pub fn record_bid(&self, event: &BidEvent) {
        self.record_into(&mut self.history(), event);
    }

    fn record_into(&self, history: &mut History, event: &BidEvent) {
        let window = self.config.rapid_bid_window;
        let records = history
            .bids
            .entry((event.bidder_id.clone(), event.auction_id))
            .or_default();
        records.retain(|r| within_window(r.timestamp, event.timestamp, window));
        records.push(BidRecord {
            amount: event.amount,
            timestamp: event.timestamp,
        });

        let context = history.auctions.entry(event.auction_id).or_default();
        context.last_price = Some(event.amount);
        context.recent_bidders.push(event.bidder_id.clone());
        let len = context.recent_bidders.len();
        if len > constants::MAX_RECENT_BIDDERS {
            context
                .recent_bidders
                .drain(..len - constants::MAX_RECENT_BIDDERS);
        }
    }

    /// Snapshot of what the detector knows about `auction`.
    #[must_use]
    pub fn context_for(&self, auction: AuctionId) -> AuctionContext {
        self.history()
            .auctions
            .get(&auction)
            .cloned()
            .unwrap_or_default()
    }

    /// Amounts of the bids still held for `bidder` in `auction`, oldest first.
    #[must_use]
    pub fn bid_amounts(&self, bidder: &BidderId, auction: AuctionId) -> Vec<Decimal> {
        self.history()
            .bids
            .get(&(bidder.clone(), auction))
            .map(|records| records.iter().map(|r| r.amount).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn alerts(&self) -> Vec<FraudAlert> {
        self.history().alerts.clone()
    }

    /// Take all alerts raised so far.
    pub fn drain_alerts(&self) -> Vec<FraudAlert> {
        std::mem::take(&mut self.history().alerts)
    }

    /// Drop everything held for a finished auction: bidder histories, its
    /// context, and any undrained alerts it raised.
    pub fn forget_auction(&self, auction: AuctionId) {
        let mut history = self.history();
        history.bids.retain(|(_, id), _| *id != auction);
        history.auctions.remove(&auction);
        history.alerts.retain(|a| a.auction_id != auction);
        tracing::debug!(auction = %auction, "Risk history released");
    }

    /// Number of `(bidder, auction)` histories currently held.
    #[must_use]
    pub fn tracked_histories(&self) -> usize {
        self.history().bids.len()
    }
}

impl Default for FraudDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl BidObserver for FraudDetector {
    fn on_bid(&self, event: &BidEvent) {
        let (score, alert) = {
            let mut history = self.history();
            let context = history
                .auctions
                .get(&event.auction_id)
                .cloned()
                .unwrap_or_default();
            let score = self.score_with(&history, event, &context);
            self.record_into(&mut history, event);
            let alert =
                self.generate_alert(&event.bidder_id, event.auction_id, score, event.timestamp);
            if let Some(alert) = &alert {
                history.alerts.push(alert.clone());
            }
            (score, alert)
        };

        tracing::debug!(
            auction = %event.auction_id,
            bidder = %event.bidder_id,
            amount = %event.amount,
            score = %score,
            "Bid scored"
        );

        if let Some(alert) = alert {
            tracing::warn!(
                auction = %alert.auction_id,
                bidder = %alert.bidder_id,
                score = %alert.risk_score,
                level = %alert.risk_score.level(),
                "Fraud alert raised"
            );
        }
    }

    fn on_price_transition(&self, transition: &PriceTransition) {
        self.history()
            .auctions
            .entry(transition.auction_id)
            .or_default()
            .last_price = Some(transition.current);
    }
}

/// Whether `at` is no more than `window` before `now`. Timestamps after
/// `now` count as inside.
fn within_window(at: DateTime<Utc>, now: DateTime<Utc>, window: Duration) -> bool {
    match (now - at).to_std() {
        Ok(age) => age <= window,
        Err(_) => true,
    }
}
