use crate::error::{CryptoflipError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const NANOTONS_PER_TON: u64 = 1_000_000_000;

/// One inbound transaction observed on the deposit address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxRecord {
    /// Logical time of the transaction, strictly increasing per address.
    pub lt: u64,
    /// Transferred amount in nanotons.
    pub value: u64,
    /// Memo text attached by the payer.
    pub message: String,
}

/// A balance credit applied by the top-up watcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credit {
    pub coins: u64,
    pub lt: u64,
    pub credited_at: DateTime<Utc>,
}

/// Coins for a transferred amount: floor(nanotons * rate / 1 TON).
pub fn coins_for_nanotons(nanotons: u64, rate: u64) -> u64 {
    ((nanotons as u128 * rate as u128) / NANOTONS_PER_TON as u128) as u64
}

/// Parse a decimal TON amount ("1.5") into nanotons without going through
/// floating point.
pub fn parse_ton(input: &str) -> Result<u64> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CryptoflipError::invalid_amount("amount is empty"));
    }

    let (whole, frac) = match input.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (input, ""),
    };

    if frac.len() > 9 {
        return Err(CryptoflipError::invalid_amount(format!(
            "'{}' has more than 9 decimal places",
            input
        )));
    }

    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| CryptoflipError::invalid_amount(format!("'{}' is not a number", input)))?
    };

    let frac_nanotons: u64 = if frac.is_empty() {
        0
    } else {
        let padded = format!("{:0<9}", frac);
        padded
            .parse()
            .map_err(|_| CryptoflipError::invalid_amount(format!("'{}' is not a number", input)))?
    };

    whole
        .checked_mul(NANOTONS_PER_TON)
        .and_then(|n| n.checked_add(frac_nanotons))
        .ok_or_else(|| CryptoflipError::invalid_amount(format!("'{}' is too large", input)))
}

/// Render nanotons as a decimal TON string, trimming trailing zeros.
pub fn format_ton(nanotons: u64) -> String {
    let whole = nanotons / NANOTONS_PER_TON;
    let frac = nanotons % NANOTONS_PER_TON;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{:09}", frac);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}
