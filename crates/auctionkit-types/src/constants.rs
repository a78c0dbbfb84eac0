//! System-wide constants for the auctionkit engines.

/// Default starting price of a descending-price auction.
pub const DEFAULT_DUTCH_STARTING_PRICE: i64 = 100;

/// Default reserve (floor) price of a descending-price auction.
pub const DEFAULT_DUTCH_RESERVE_PRICE: i64 = 50;

/// Default amount removed from the asking price on every tick.
pub const DEFAULT_DUTCH_DECREMENT: i64 = 10;

/// Default interval between price decrements in milliseconds.
pub const DEFAULT_DUTCH_INTERVAL_MS: u64 = 1000;

/// Default reveal window after bidding ends, in milliseconds.
pub const DEFAULT_REVEAL_DURATION_MS: u64 = 60_000;

/// Length of a commitment digest in bytes (SHA-256).
pub const COMMITMENT_LEN: usize = 32;

/// Number of random bytes in a generated salt (hex-encoded to twice this).
pub const SALT_LEN: usize = 32;

/// Risk score at or above which an alert is raised.
pub const DEFAULT_ALERT_THRESHOLD: f64 = 0.7;

/// Lookback window for rapid-bid detection in milliseconds.
pub const DEFAULT_RAPID_BID_WINDOW_MS: u64 = 5000;

/// Prior bids inside the window that mark a bidder as rapid-firing.
pub const DEFAULT_RAPID_BID_THRESHOLD: usize = 3;

/// Score contributed by a rapid-bidding pattern.
pub const RAPID_BID_SCORE: f64 = 0.6;

/// Relative price jump above which manipulation is considered severe.
pub const PRICE_JUMP_SEVERE: f64 = 0.5;

/// Relative price jump above which manipulation is considered moderate.
pub const PRICE_JUMP_MODERATE: f64 = 0.25;

/// Score for a severe price jump.
pub const PRICE_JUMP_SEVERE_SCORE: f64 = 0.8;

/// Score for a moderate price jump.
pub const PRICE_JUMP_MODERATE_SCORE: f64 = 0.5;

/// Bidder repetition rate above which shilling is considered severe.
pub const SHILLING_SEVERE: f64 = 0.6;

/// Bidder repetition rate above which shilling is considered moderate.
pub const SHILLING_MODERATE: f64 = 0.4;

/// Score for severe shilling.
pub const SHILLING_SEVERE_SCORE: f64 = 0.85;

/// Score for moderate shilling.
pub const SHILLING_MODERATE_SCORE: f64 = 0.6;

/// Maximum bidder ids kept per auction for shilling detection.
pub const MAX_RECENT_BIDDERS: usize = 256;
