//! Hash commitments for sealed bids.
//!
//! A commitment is `SHA-256(amount ‖ salt)` where `amount` is the
//! normalized decimal string (`42`, not `42.00`) and `salt` is the bidder's
//! secret string. Without the salt nobody, the auctioneer included, can
//! recover the amount before the reveal; with it anyone can check the
//! reveal against the stored digest.
//!
//! The wire form is 64 lowercase hex characters.

use std::fmt;
use std::str::FromStr;

use auctionkit_types::{AuctionError, constants};
use rand::RngCore;
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

/// A SHA-256 commitment to a bid amount and salt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Commitment(pub [u8; constants::COMMITMENT_LEN]);

impl Commitment {
    /// Commit to `amount` with `salt`.
    #[must_use]
    pub fn compute(amount: Decimal, salt: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(canonical_amount(amount).as_bytes());
        hasher.update(salt.as_bytes());
        Self(hasher.finalize().into())
    }

    /// Whether `(amount, salt)` opens this commitment.
    #[must_use]
    pub fn verify(&self, amount: Decimal, salt: &str) -> bool {
        Self::compute(amount, salt) == *self
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Shortened hex prefix for logs.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Commitment {
    type Err = AuctionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s.trim()).map_err(|e| AuctionError::InvalidCommitment {
            reason: e.to_string(),
        })?;
        let digest: [u8; constants::COMMITMENT_LEN] =
            bytes
                .try_into()
                .map_err(|b: Vec<u8>| AuctionError::InvalidCommitment {
                    reason: format!(
                        "expected {} bytes, got {}",
                        constants::COMMITMENT_LEN,
                        b.len()
                    ),
                })?;
        Ok(Self(digest))
    }
}

/// The decimal string hashed into a commitment.
///
/// Trailing fractional zeros are dropped so that equal amounts always
/// commit identically regardless of scale.
#[must_use]
pub fn canonical_amount(amount: Decimal) -> String {
    amount.normalize().to_string()
}

/// A fresh random salt: `SALT_LEN` bytes, hex-encoded.
pub fn generate_salt<R: RngCore + ?Sized>(rng: &mut R) -> String {
    let mut bytes = [0u8; constants::SALT_LEN];
    rng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Client-side helper: pick a salt and commit to `amount`.
///
/// The returned salt must be kept secret until the reveal.
pub fn seal<R: RngCore + ?Sized>(amount: Decimal, rng: &mut R) -> (Commitment, String) {
    let salt = generate_salt(rng);
    (Commitment::compute(amount, &salt), salt)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    #[test]
    fn known_vector_42abc() {
        let c = Commitment::compute(dec(42), "abc");
        assert_eq!(
            c.to_hex(),
            "53b6b18ede445bb214aa36420e93f247b029a81c5208a381ca1eba8789b3393e"
        );
    }

    #[test]
    fn fractional_amount_vector() {
        let c = Commitment::compute(Decimal::new(4250, 2), "pepper");
        assert_eq!(
            c.to_hex(),
            "38d5664c9851bd7d3272ce7cefe54a3e784fad8a0c8db03a3c0f02a9eaeef53d"
        );
    }

    #[test]
    fn scale_does_not_change_commitment() {
        let a = Commitment::compute(Decimal::new(42, 0), "s");
        let b = Commitment::compute(Decimal::new(4200, 2), "s");
        assert_eq!(a, b);
        assert_eq!(canonical_amount(Decimal::new(4200, 2)), "42");
    }

    #[test]
    fn verify_accepts_only_the_opening() {
        let c = Commitment::compute(dec(42), "abc");
        assert!(c.verify(dec(42), "abc"));
        assert!(!c.verify(dec(43), "abc"));
        assert!(!c.verify(dec(42), "abd"));
        // "4" + "2abc" hashes the same bytes as "42" + "abc".
        assert!(c.verify(dec(4), "2abc"));
    }

    #[test]
    fn hex_roundtrip() {
        let c = Commitment::compute(dec(100), "salt-a");
        let parsed: Commitment = c.to_hex().parse().unwrap();
        assert_eq!(parsed, c);
        let upper: Commitment = c.to_hex().to_uppercase().parse().unwrap();
        assert_eq!(upper, c);
    }

    #[test]
    fn malformed_hex_rejected() {
        let err = "zz".parse::<Commitment>().unwrap_err();
        assert!(matches!(err, AuctionError::InvalidCommitment { .. }));

        let err = "abcd".parse::<Commitment>().unwrap_err();
        assert!(matches!(err, AuctionError::InvalidCommitment { .. }));
    }

    #[test]
    fn generated_salts_differ() {
        let mut rng = rand::thread_rng();
        let a = generate_salt(&mut rng);
        let b = generate_salt(&mut rng);
        assert_eq!(a.len(), constants::SALT_LEN * 2);
        assert_ne!(a, b);
    }

    #[test]
    fn seal_opens_with_returned_salt() {
        let mut rng = rand::thread_rng();
        let (c, salt) = seal(dec(75), &mut rng);
        assert!(c.verify(dec(75), &salt));
        assert!(!c.verify(dec(76), &salt));
    }

    #[test]
    fn short_is_prefix() {
        let c = Commitment::compute(dec(1), "x");
        assert!(c.to_hex().starts_with(&c.short()));
        assert_eq!(c.short().len(), 8);
    }
}
