//! Sealed-bid second-price (Vickrey) auction with commit-reveal.
//!
//! # Protocol
//!
//! ```text
//! BIDDING    submit_sealed_bid(bidder, H(amount ‖ salt))   one per bidder
//!    │
//!    │ end_bidding_phase()                                 one-way
//!    ▼
//! REVEALING  reveal_bid(bidder, amount, salt)              until reveal_deadline
//!    │
//!    ▼
//! determine_winner()   highest revealed amount wins, pays the second-highest
//! ```
//!
//! Phase and bid book live under one `RwLock`: a submit or reveal racing
//! `end_bidding_phase` sees either phase in full, never a mix. Every
//! operation validates completely before mutating, so a failed call leaves
//! the book untouched.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use auctionkit_types::{
    AuctionError, AuctionId, AuctionOutcome, BidEvent, BidObserver, BidderId, Clock, Result,
    SealedBidConfig, SealedBidPhase, SystemClock,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::Commitment;

/// A revealed bid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reveal {
    pub amount: Decimal,
    pub salt: String,
}

/// One bidder's entry in the book.
#[derive(Debug, Clone)]
pub struct SealedBid {
    /// The hash filed during bidding.
    pub commitment: Commitment,
    /// Set once by a matching reveal, never cleared.
    pub reveal: Option<Reveal>,
    /// Submission order, used to break ties between equal amounts.
    pub sequence: u64,
}

#[derive(Debug)]
struct Book {
    phase: SealedBidPhase,
    bids: HashMap<BidderId, SealedBid>,
    next_sequence: u64,
}

/// A sealed-bid second-price auction.
pub struct SealedBidAuction {
    auction_id: AuctionId,
    config: SealedBidConfig,
    reveal_deadline: DateTime<Utc>,
    clock: Arc<dyn Clock>,
    observer: Option<Arc<dyn BidObserver>>,
    book: RwLock<Book>,
}

impl SealedBidAuction {
    /// Create an auction in the bidding phase.
    ///
    /// # Errors
    /// Returns [`AuctionError::Configuration`] if the reveal deadline overflows.
    pub fn new(config: SealedBidConfig) -> Result<Self> {
        let reveal_deadline = config.reveal_deadline()?;
        Ok(Self {
            auction_id: AuctionId::new(),
            config,
            reveal_deadline,
            clock: Arc::new(SystemClock),
            observer: None,
            book: RwLock::new(Book {
                phase: SealedBidPhase::Bidding,
                bids: HashMap::new(),
                next_sequence: 0,
            }),
        })
    }

    /// Replace the time source used for the reveal deadline.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Attach an observer notified of every successful reveal.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn BidObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Use a caller-chosen auction id.
    #[must_use]
    pub fn with_auction_id(mut self, auction_id: AuctionId) -> Self {
        self.auction_id = auction_id;
        self
    }

    fn read(&self) -> RwLockReadGuard<'_, Book> {
        self.book.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Book> {
        self.book.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// File a sealed bid.
    ///
    /// # Errors
    /// - `WrongPhase` if bidding has ended
    /// - `DuplicateBid` if this bidder already filed one (the first is kept)
    pub fn submit_sealed_bid(
        &self,
        bidder: impl Into<BidderId>,
        commitment: Commitment,
    ) -> Result<bool> {
        let bidder = bidder.into();
        let mut book = self.write();

        if !book.phase.accepts_commitments() {
            return Err(AuctionError::WrongPhase {
                expected: SealedBidPhase::Bidding,
                actual: book.phase,
            });
        }
        if book.bids.contains_key(&bidder) {
            return Err(AuctionError::DuplicateBid(bidder));
        }

        let sequence = book.next_sequence;
        book.next_sequence += 1;
        tracing::debug!(
            auction = %self.auction_id,
            bidder = %bidder,
            commitment = %commitment.short(),
            sequence,
            "Sealed bid filed"
        );
        book.bids.insert(
            bidder,
            SealedBid {
                commitment,
                reveal: None,
                sequence,
            },
        );
        Ok(true)
    }

    /// Close bidding and open the reveal phase. Irreversible; repeat calls
    /// are no-ops.
    pub fn end_bidding_phase(&self) {
        let mut book = self.write();
        if book.phase == SealedBidPhase::Revealing {
            return;
        }
        book.phase = SealedBidPhase::Revealing;
        tracing::info!(
            auction = %self.auction_id,
            sealed_bids = book.bids.len(),
            reveal_deadline = %self.reveal_deadline,
            "Bidding closed, reveal phase open"
        );
    }

    /// Disclose the amount and salt behind a sealed bid.
    ///
    /// # Errors
    /// Checked in this order:
    /// - `WrongPhase` while still bidding
    /// - `DeadlineExceeded` strictly after the reveal deadline
    /// - `BidNotFound` if the bidder never filed a sealed bid
    /// - `AlreadyRevealed` on a second reveal
    /// - `HashMismatch` if `(amount, salt)` does not open the commitment
    pub fn reveal_bid(
        &self,
        bidder: impl Into<BidderId>,
        amount: Decimal,
        salt: &str,
    ) -> Result<bool> {
        let bidder = bidder.into();
        let now = {
            let mut book = self.write();

            if !book.phase.accepts_reveals() {
                return Err(AuctionError::WrongPhase {
                    expected: SealedBidPhase::Revealing,
                    actual: book.phase,
                });
            }

            let now = self.clock.now();
            if now > self.reveal_deadline {
                return Err(AuctionError::DeadlineExceeded {
                    deadline: self.reveal_deadline,
                    now,
                });
            }

            let Some(bid) = book.bids.get_mut(&bidder) else {
                return Err(AuctionError::BidNotFound(bidder));
            };
            if bid.reveal.is_some() {
                return Err(AuctionError::AlreadyRevealed(bidder));
            }
            if !bid.commitment.verify(amount, salt) {
                tracing::warn!(
                    auction = %self.auction_id,
                    bidder = %bidder,
                    commitment = %bid.commitment.short(),
                    "Reveal does not open commitment: possible bid substitution"
                );
                return Err(AuctionError::HashMismatch(bidder));
            }

            bid.reveal = Some(Reveal {
                amount,
                salt: salt.to_string(),
            });
            now
        };

        tracing::info!(
            auction = %self.auction_id,
            bidder = %bidder,
            amount = %amount,
            "Bid revealed"
        );

        if let Some(observer) = &self.observer {
            observer.on_bid(&BidEvent {
                bidder_id: bidder,
                auction_id: self.auction_id,
                amount,
                timestamp: now,
            });
        }
        Ok(true)
    }

    /// Second-price winner over all revealed bids.
    ///
    /// Highest amount wins; ties go to the earliest sealed submission. The
    /// winner pays the second-highest revealed amount, or its own amount
    /// when it is the only reveal. No reveals yields `{None, 0}`.
    #[must_use]
    pub fn determine_winner(&self) -> AuctionOutcome {
        let book = self.read();
        let mut revealed: Vec<(&BidderId, Decimal, u64)> = book
            .bids
            .iter()
            .filter_map(|(bidder, bid)| {
                bid.reveal
                    .as_ref()
                    .map(|r| (bidder, r.amount, bid.sequence))
            })
            .collect();

        revealed.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        let Some(&(winner, top, _)) = revealed.first() else {
            return AuctionOutcome::no_winner();
        };
        let price = revealed.get(1).map_or(top, |&(_, second, _)| second);
        AuctionOutcome::won(winner.clone(), price)
    }

    #[must_use]
    pub fn auction_id(&self) -> AuctionId {
        self.auction_id
    }

    #[must_use]
    pub fn config(&self) -> &SealedBidConfig {
        &self.config
    }

    #[must_use]
    pub fn reveal_deadline(&self) -> DateTime<Utc> {
        self.reveal_deadline
    }

    #[must_use]
    pub fn phase(&self) -> SealedBidPhase {
        self.read().phase
    }

    /// Number of sealed bids on file.
    #[must_use]
    pub fn bid_count(&self) -> usize {
        self.read().bids.len()
    }

    /// Number of sealed bids that have been revealed.
    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.read()
            .bids
            .values()
            .filter(|b| b.reveal.is_some())
            .count()
    }

    #[must_use]
    pub fn commitment_of(&self, bidder: &BidderId) -> Option<Commitment> {
        self.read().bids.get(bidder).map(|b| b.commitment)
    }

    #[must_use]
    pub fn revealed_amount_of(&self, bidder: &BidderId) -> Option<Decimal> {
        self.read()
            .bids
            .get(bidder)
            .and_then(|b| b.reveal.as_ref().map(|r| r.amount))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use auctionkit_types::ManualClock;
    use chrono::TimeZone;

    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    fn bidding_end() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    fn auction() -> SealedBidAuction {
        let clock = Arc::new(ManualClock::new(bidding_end()));
        SealedBidAuction::new(SealedBidConfig::new(bidding_end(), Duration::from_secs(60)))
            .unwrap()
            .with_clock(clock)
    }

    fn sealed(bidders: &[(&str, i64)]) -> SealedBidAuction {
        let a = auction();
        for (bidder, amount) in bidders {
            let salt = format!("salt-{bidder}");
            a.submit_sealed_bid(*bidder, Commitment::compute(dec(*amount), &salt))
                .unwrap();
        }
        a.end_bidding_phase();
        for (bidder, amount) in bidders {
            let salt = format!("salt-{bidder}");
            a.reveal_bid(*bidder, dec(*amount), &salt).unwrap();
        }
        a
    }

    #[test]
    fn starts_in_bidding() {
        let a = auction();
        assert_eq!(a.phase(), SealedBidPhase::Bidding);
        assert_eq!(a.bid_count(), 0);
        assert_eq!(a.reveal_deadline(), bidding_end() + chrono::Duration::seconds(60));
    }

    #[test]
    fn duplicate_submission_keeps_first() {
        let a = auction();
        let first = Commitment::compute(dec(10), "x");
        assert!(a.submit_sealed_bid("alice", first).unwrap());

        let err = a
            .submit_sealed_bid("alice", Commitment::compute(dec(99), "y"))
            .unwrap_err();
        assert!(matches!(err, AuctionError::DuplicateBid(ref b) if b.as_str() == "alice"));
        assert_eq!(a.commitment_of(&BidderId::from("alice")), Some(first));
        assert_eq!(a.bid_count(), 1);
    }

    #[test]
    fn submit_after_bidding_rejected() {
        let a = auction();
        a.end_bidding_phase();
        let err = a
            .submit_sealed_bid("late", Commitment::compute(dec(1), "s"))
            .unwrap_err();
        assert!(matches!(
            err,
            AuctionError::WrongPhase {
                expected: SealedBidPhase::Bidding,
                actual: SealedBidPhase::Revealing,
            }
        ));
        assert_eq!(a.bid_count(), 0);
    }

    #[test]
    fn reveal_during_bidding_rejected() {
        let a = auction();
        a.submit_sealed_bid("alice", Commitment::compute(dec(42), "abc"))
            .unwrap();
        let err = a.reveal_bid("alice", dec(42), "abc").unwrap_err();
        assert!(matches!(err, AuctionError::WrongPhase { .. }));
        assert_eq!(a.revealed_count(), 0);
    }

    #[test]
    fn end_bidding_is_idempotent() {
        let a = auction();
        a.end_bidding_phase();
        a.end_bidding_phase();
        assert_eq!(a.phase(), SealedBidPhase::Revealing);
    }

    #[test]
    fn reveal_unknown_bidder() {
        let a = auction();
        a.end_bidding_phase();
        let err = a.reveal_bid("ghost", dec(1), "s").unwrap_err();
        assert!(matches!(err, AuctionError::BidNotFound(_)));
    }

    #[test]
    fn reveal_twice_rejected_and_amount_kept() {
        let a = sealed(&[("alice", 42)]);
        let err = a.reveal_bid("alice", dec(42), "salt-alice").unwrap_err();
        assert!(matches!(err, AuctionError::AlreadyRevealed(_)));
        assert_eq!(a.revealed_amount_of(&BidderId::from("alice")), Some(dec(42)));
    }

    #[test]
    fn mismatched_reveal_leaves_record_unrevealed() {
        let a = auction();
        a.submit_sealed_bid("alice", Commitment::compute(dec(42), "abc"))
            .unwrap();
        a.end_bidding_phase();

        let err = a.reveal_bid("alice", dec(43), "abc").unwrap_err();
        assert!(err.is_security_event());
        assert!(a.revealed_amount_of(&BidderId::from("alice")).is_none());

        // A corrected reveal before the deadline still succeeds.
        assert!(a.reveal_bid("alice", dec(42), "abc").unwrap());
    }

    #[test]
    fn second_price_rule() {
        let a = sealed(&[("A", 100), ("B", 80), ("C", 60)]);
        assert_eq!(
            a.determine_winner(),
            AuctionOutcome::won(BidderId::from("A"), dec(80))
        );
    }

    #[test]
    fn single_reveal_pays_own_amount() {
        let a = sealed(&[("A", 100)]);
        assert_eq!(
            a.determine_winner(),
            AuctionOutcome::won(BidderId::from("A"), dec(100))
        );
    }

    #[test]
    fn no_reveals_no_winner() {
        let a = auction();
        a.submit_sealed_bid("A", Commitment::compute(dec(5), "s"))
            .unwrap();
        a.end_bidding_phase();
        assert_eq!(a.determine_winner(), AuctionOutcome::no_winner());
    }

    #[test]
    fn unrevealed_bids_are_ignored() {
        let a = auction();
        a.submit_sealed_bid("A", Commitment::compute(dec(500), "a"))
            .unwrap();
        a.submit_sealed_bid("B", Commitment::compute(dec(70), "b"))
            .unwrap();
        a.submit_sealed_bid("C", Commitment::compute(dec(40), "c"))
            .unwrap();
        a.end_bidding_phase();
        a.reveal_bid("B", dec(70), "b").unwrap();
        a.reveal_bid("C", dec(40), "c").unwrap();
        assert_eq!(
            a.determine_winner(),
            AuctionOutcome::won(BidderId::from("B"), dec(40))
        );
    }

    #[test]
    fn tie_goes_to_earliest_submission() {
        let a = sealed(&[("low", 1), ("X", 90), ("Y", 90), ("Z", 50)]);
        assert_eq!(
            a.determine_winner(),
            AuctionOutcome::won(BidderId::from("X"), dec(90))
        );
    }
}
