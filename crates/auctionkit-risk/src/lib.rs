//! # auctionkit-risk
//!
//! **Observational fraud scoring for auction bid streams.**
//!
//! [`FraudDetector`] plugs into either engine as a
//! [`BidObserver`](auctionkit_types::BidObserver). It scores every reported
//! bid against the auction's recent history and raises a
//! [`FraudAlert`](auctionkit_types::FraudAlert) when the score crosses the
//! configured threshold. Scores are advisory: nothing here can reject a bid
//! or change an outcome.

pub mod detector;

pub use detector::FraudDetector;
