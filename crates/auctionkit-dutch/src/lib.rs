//! # auctionkit-dutch
//!
//! **Descending-price (Dutch) auction engine.**
//!
//! The asking price starts high and drops by a fixed decrement on every
//! timer tick until it reaches the reserve price or a bidder accepts it.
//! The first acceptance wins at the price current at that instant.
//!
//! ## Architecture
//!
//! - [`PriceLadder`]: pure, synchronous state machine (price, winner, running)
//! - [`DescendingPriceAuction`]: wraps the ladder in a mutex shared with a
//!   tokio decay task, so a tick and an acceptance can never interleave
//!
//! ```text
//! start() ──▶ [Running] ──tick──▶ price -= decrement (floored at reserve)
//!                │  │                 │
//!                │  └── stop() ──▶ [Stopped] (restartable if unsold)
//!                │                    │
//!                └── accept_bid() ──▶ [Sold]   price at reserve ──▶ [Exhausted]
//! ```

pub mod auction;
pub mod ladder;

pub use auction::DescendingPriceAuction;
pub use ladder::PriceLadder;
