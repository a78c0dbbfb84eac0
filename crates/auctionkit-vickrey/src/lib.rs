//! # auctionkit-vickrey
//!
//! **Sealed-bid second-price (Vickrey) auction with commit-reveal.**
//!
//! Bidders first file a hash [`Commitment`] to `amount ‖ salt`, so no
//! party can read a bid before the reveal. After bidding closes they
//! disclose `(amount, salt)`; the engine recomputes the hash and records the
//! amount only on an exact match. The highest revealed bid wins and pays the
//! second-highest revealed amount.
//!
//! - [`commitment`]: SHA-256 commitment scheme plus client-side sealing helpers
//! - [`SealedBidAuction`]: the two-phase engine

pub mod auction;
pub mod commitment;

pub use auction::{Reveal, SealedBid, SealedBidAuction};
pub use commitment::{Commitment, canonical_amount, generate_salt, seal};
