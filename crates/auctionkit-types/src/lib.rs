//! # auctionkit-types
//!
//! Shared types, errors, and configuration for the **auctionkit** engines.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`BidderId`], [`AuctionId`]
//! - **Lifecycle**: [`SealedBidPhase`]
//! - **Outcomes**: [`BidAcceptance`], [`AuctionOutcome`]
//! - **Events**: [`BidEvent`], [`PriceTransition`], [`BidObserver`]
//! - **Risk model**: [`AuctionContext`], [`RiskScore`], [`FraudAlert`]
//! - **Time**: [`Clock`], [`SystemClock`]
//! - **Configuration**: [`DutchAuctionConfig`], [`SealedBidConfig`], [`RiskConfig`]
//! - **Errors**: [`AuctionError`] with `AK_ERR_` prefix codes
//! - **Constants**: defaults and detector thresholds

pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod outcome;
pub mod phase;
pub mod risk;

// Re-export all primary types at crate root for ergonomic imports:
//   use auctionkit_types::{BidderId, AuctionError, DutchAuctionConfig, ...};

pub use clock::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use outcome::*;
pub use phase::*;
pub use risk::*;

// Constants are accessed via `auctionkit_types::constants::FOO`
// (not re-exported to avoid name collisions).
