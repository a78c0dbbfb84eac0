//! Risk scoring types shared between the engines and the fraud detector.
//!
//! # Scoring Model
//!
//! ```text
//! Engine emits BidEvent
//!   → FraudDetector.calculate_risk_score(event, context)
//!     → rapid bidding    (bids per bidder per window)
//!     → price manipulation (jump vs. last price)
//!     → bid shilling     (bidder repetition rate)
//!     → mean of the three, clamped to [0, 1]
//!   → IF score >= threshold → FraudAlert
//! ```
//!
//! Scores never feed back into auction outcomes.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AuctionId, BidderId};

/// The facts about an auction a risk score is computed against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionContext {
    /// Last observed clearing or asking price, if any.
    pub last_price: Option<Decimal>,
    /// Bidder ids of recent bids in this auction, oldest first.
    pub recent_bidders: Vec<BidderId>,
}

/// A risk score in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct RiskScore(f64);

impl RiskScore {
    pub const ZERO: Self = Self(0.0);

    /// Build a score, clamping into `[0, 1]`. NaN maps to zero.
    #[must_use]
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 1.0))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn level(self) -> RiskLevel {
        if self.0 > 0.85 {
            RiskLevel::Critical
        } else if self.0 > 0.7 {
            RiskLevel::High
        } else if self.0 > 0.5 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

/// Coarse severity band of a [`RiskScore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Operator-facing explanation.
    #[must_use]
    pub fn reason(self) -> &'static str {
        match self {
            Self::Critical => "Critical fraud pattern detected",
            Self::High => "High fraud risk - suspicious bidding behavior",
            Self::Medium => "Medium fraud risk - unusual bid pattern",
            Self::Low => "Low fraud risk",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Raised when a bid's risk score crosses the alert threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudAlert {
    pub bidder_id: BidderId,
    pub auction_id: AuctionId,
    pub risk_score: RiskScore,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}
