//! Timer-driven descending-price auction.
//!
//! One tokio task per running auction ticks the [`PriceLadder`] every
//! `decrement_interval`. The task and [`DescendingPriceAuction::accept_bid`]
//! take the same mutex, so the price an acceptance reads is exactly the
//! price decay stops at.
//!
//! # Timer ownership
//!
//! - At most one decay task is live per auction; `start()` on a running
//!   auction fails with [`AuctionError::AlreadyRunning`].
//! - Every `start()` bumps a run generation. A task whose generation is stale
//!   exits at its next tick without touching the price, so once `stop()`
//!   returns the price is frozen even if the aborted task was mid-wakeup.
//! - The task holds only a weak reference; dropping the auction ends it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use auctionkit_types::{
    AuctionError, AuctionId, BidAcceptance, BidEvent, BidObserver, BidderId, DutchAuctionConfig,
    PriceTransition, Result,
};
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use crate::PriceLadder;

/// Mutable state shared between callers and the decay task.
struct Inner {
    ladder: PriceLadder,
    timer: Option<JoinHandle<()>>,
    generation: u64,
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A descending-price auction with a cancellable decay timer.
///
/// Share across threads with `Arc<DescendingPriceAuction>`.
pub struct DescendingPriceAuction {
    auction_id: AuctionId,
    config: DutchAuctionConfig,
    observer: Option<Arc<dyn BidObserver>>,
    inner: Arc<Mutex<Inner>>,
}

impl DescendingPriceAuction {
    /// Create an idle auction at the starting price.
    ///
    /// # Errors
    /// Returns [`AuctionError::Configuration`] if the config is inconsistent.
    pub fn new(config: DutchAuctionConfig) -> Result<Self> {
        let ladder = PriceLadder::new(config.clone())?;
        Ok(Self {
            auction_id: AuctionId::new(),
            config,
            observer: None,
            inner: Arc::new(Mutex::new(Inner {
                ladder,
                timer: None,
                generation: 0,
            })),
        })
    }

    /// Attach an observer for price transitions and the winning bid.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn BidObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Use a caller-chosen auction id (e.g. assigned by an auction house).
    #[must_use]
    pub fn with_auction_id(mut self, auction_id: AuctionId) -> Self {
        self.auction_id = auction_id;
        self
    }

    #[must_use]
    pub fn auction_id(&self) -> AuctionId {
        self.auction_id
    }

    #[must_use]
    pub fn config(&self) -> &DutchAuctionConfig {
        &self.config
    }

    /// Start price decay on the current tokio runtime.
    ///
    /// The first decrement happens one full interval after this call.
    ///
    /// # Errors
    /// - `NoRuntime` outside a tokio runtime
    /// - `AlreadyRunning`, `AuctionClosed`, `DecayExhausted` per [`PriceLadder::begin`]
    pub fn start(&self) -> Result<()> {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| AuctionError::NoRuntime)?;

        let mut inner = lock(&self.inner);
        inner.ladder.begin()?;
        inner.generation += 1;

        let task = runtime.spawn(run_decay(
            Arc::downgrade(&self.inner),
            inner.generation,
            self.auction_id,
            self.config.decrement_interval,
            self.observer.clone(),
        ));
        inner.timer = Some(task);

        tracing::info!(
            auction = %self.auction_id,
            price = %inner.ladder.current_price(),
            reserve = %self.config.reserve_price,
            interval_ms = self.config.decrement_interval.as_millis(),
            ticks_to_reserve = self.config.ticks_to_reserve_from(inner.ladder.current_price()),
            "Dutch auction started"
        );
        Ok(())
    }

    /// Try to buy at the current price.
    ///
    /// Exactly one call per auction succeeds; every later call returns
    /// [`BidAcceptance::rejected`]. Success stops decay.
    pub fn accept_bid(&self, bidder: impl Into<BidderId>) -> BidAcceptance {
        let bidder = bidder.into();

        let result = {
            let mut inner = lock(&self.inner);
            let result = inner.ladder.accept(&bidder);
            if result.success {
                inner.generation += 1;
                if let Some(task) = inner.timer.take() {
                    task.abort();
                }
            }
            result
        };

        if !result.success {
            tracing::debug!(
                auction = %self.auction_id,
                bidder = %bidder,
                "Bid rejected: winner already accepted"
            );
            return result;
        }

        tracing::info!(
            auction = %self.auction_id,
            bidder = %bidder,
            price = %result.price,
            "Dutch auction sold"
        );

        if let Some(observer) = &self.observer {
            observer.on_bid(&BidEvent {
                bidder_id: bidder,
                auction_id: self.auction_id,
                amount: result.price,
                timestamp: Utc::now(),
            });
        }
        result
    }

    /// Stop decay. Idempotent; a stopped auction never decays again unless
    /// restarted with [`Self::start`].
    pub fn stop(&self) {
        let mut inner = lock(&self.inner);
        let was_running = inner.ladder.halt();
        inner.generation += 1;
        if let Some(task) = inner.timer.take() {
            task.abort();
        }
        if was_running {
            tracing::info!(
                auction = %self.auction_id,
                price = %inner.ladder.current_price(),
                "Dutch auction stopped"
            );
        }
    }

    #[must_use]
    pub fn current_price(&self) -> Decimal {
        lock(&self.inner).ladder.current_price()
    }

    #[must_use]
    pub fn winner(&self) -> Option<BidderId> {
        lock(&self.inner).ladder.winner().cloned()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        lock(&self.inner).ladder.is_running()
    }
}

impl Drop for DescendingPriceAuction {
    fn drop(&mut self) {
        if let Some(task) = lock(&self.inner).timer.take() {
            task.abort();
        }
    }
}

/// Decay loop: one ladder tick per interval until stale, halted, or dropped.
async fn run_decay(
    inner: Weak<Mutex<Inner>>,
    generation: u64,
    auction_id: AuctionId,
    period: std::time::Duration,
    observer: Option<Arc<dyn BidObserver>>,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    // After a stall, resume one decrement per full interval instead of catching up.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;

        let Some(shared) = inner.upgrade() else {
            return;
        };

        let (moved, finished) = {
            let mut guard = lock(&shared);
            if guard.generation != generation || !guard.ladder.is_running() {
                return;
            }
            let moved = guard.ladder.tick();
            let finished = !guard.ladder.is_running();
            if finished {
                guard.timer = None;
            }
            (moved, finished)
        };

        if let Some((previous, current)) = moved {
            tracing::debug!(auction = %auction_id, %previous, %current, "Price reduced");
            if let Some(observer) = &observer {
                observer.on_price_transition(&PriceTransition {
                    auction_id,
                    previous,
                    current,
                    timestamp: Utc::now(),
                });
            }
        }

        if finished {
            tracing::info!(auction = %auction_id, "Reserve price reached, decay stopped");
            return;
        }
    }
}
