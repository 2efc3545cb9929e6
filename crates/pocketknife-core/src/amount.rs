// crates/pocketknife-core/src/amount.rs
//
// Token amounts and the denomination used to display them.
//
// Chain state reports balances in the smallest unit (upokt on Pocket Network).
// All internal accounting stays in integer base units; conversion to the
// display denomination (POKT, 2 decimal places) happens only when rendering.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use crate::error::TreasuryError;

/// Default number of base units in one display unit (1 POKT = 10^6 upokt).
pub const DEFAULT_BASE_UNITS_PER_TOKEN: u128 = 1_000_000;

/// An amount in base units (e.g. upokt).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Amount {
    /// Amount in the chain's smallest denomination.
    pub base_units: u128,
}

impl Amount {
    /// Create an amount from base units.
    pub fn from_base_units(base_units: u128) -> Self {
        Self { base_units }
    }

    /// Returns a zero amount.
    pub fn zero() -> Self {
        Self { base_units: 0 }
    }

    pub fn is_zero(&self) -> bool {
        self.base_units == 0
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            base_units: self.base_units.saturating_add(rhs.base_units),
        }
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::zero(), |acc, a| acc + a)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base_units)
    }
}

/// How base units map onto the human-facing token.
///
/// Injected from configuration rather than hard-coded, so the same engine
/// works against any network with a different base-unit scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Denomination {
    /// On-chain denom of the base unit, e.g. "upokt".
    pub base_denom: String,
    /// Display symbol, e.g. "POKT".
    pub display: String,
    /// Base units per display unit, e.g. 1_000_000.
    pub base_units_per_token: u128,
}

impl Default for Denomination {
    fn default() -> Self {
        Self {
            base_denom: "upokt".to_string(),
            display: "POKT".to_string(),
            base_units_per_token: DEFAULT_BASE_UNITS_PER_TOKEN,
        }
    }
}

impl Denomination {
    /// Build a denomination, rejecting a zero scale factor or empty names.
    pub fn new(
        base_denom: &str,
        display: &str,
        base_units_per_token: u128,
    ) -> Result<Self, TreasuryError> {
        if base_units_per_token == 0 {
            return Err(TreasuryError::Config(
                "base_units_per_token must be at least 1".to_string(),
            ));
        }
        if base_denom.trim().is_empty() || display.trim().is_empty() {
            return Err(TreasuryError::Config(
                "denomination names must not be empty".to_string(),
            ));
        }
        Ok(Self {
            base_denom: base_denom.to_string(),
            display: display.to_string(),
            base_units_per_token,
        })
    }

    /// Convert to display hundredths, rounding half up.
    fn to_cents(&self, amount: Amount) -> u128 {
        let scale = self.base_units_per_token;
        amount
            .base_units
            .saturating_mul(100)
            .saturating_add(scale / 2)
            / scale
    }

    /// Format with 2 decimals and no separators, e.g. "1234.50".
    pub fn format_plain(&self, amount: Amount) -> String {
        let cents = self.to_cents(amount);
        format!("{}.{:02}", cents / 100, cents % 100)
    }

    /// Format with 2 decimals and thousands separators, e.g. "1,234.50".
    pub fn format(&self, amount: Amount) -> String {
        let cents = self.to_cents(amount);
        format!("{}.{:02}", group_thousands(cents / 100), cents % 100)
    }

    /// Format with separators and the display symbol, e.g. "1,234.50 POKT".
    pub fn format_with_symbol(&self, amount: Amount) -> String {
        format!("{} {}", self.format(amount), self.display)
    }
}

fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pokt(whole: u128) -> Amount {
        Amount::from_base_units(whole * DEFAULT_BASE_UNITS_PER_TOKEN)
    }

    #[test]
    fn test_add_and_sum() {
        let total: Amount = vec![pokt(1), pokt(2), Amount::from_base_units(500_000)]
            .into_iter()
            .sum();
        assert_eq!(total.base_units, 3_500_000);
    }

    #[test]
    fn test_add_saturates() {
        let a = Amount::from_base_units(u128::MAX);
        let b = Amount::from_base_units(1);
        assert_eq!((a + b).base_units, u128::MAX);
    }

    #[test]
    fn test_format_whole() {
        let denom = Denomination::default();
        assert_eq!(denom.format(pokt(1035)), "1,035.00");
        assert_eq!(denom.format_plain(pokt(1035)), "1035.00");
    }

    #[test]
    fn test_format_rounds_half_up() {
        let denom = Denomination::default();
        // 0.005 POKT -> 0.01
        assert_eq!(denom.format(Amount::from_base_units(5_000)), "0.01");
        // 0.004999 POKT -> 0.00
        assert_eq!(denom.format(Amount::from_base_units(4_999)), "0.00");
        // 12.345678 POKT -> 12.35
        assert_eq!(denom.format(Amount::from_base_units(12_345_678)), "12.35");
    }

    #[test]
    fn test_format_large_groups() {
        let denom = Denomination::default();
        assert_eq!(denom.format(pokt(1_234_567_890)), "1,234,567,890.00");
        assert_eq!(denom.format(Amount::zero()), "0.00");
    }

    #[test]
    fn test_format_with_symbol() {
        let denom = Denomination::default();
        assert_eq!(denom.format_with_symbol(pokt(100)), "100.00 POKT");
    }

    #[test]
    fn test_custom_scale() {
        let denom = Denomination::new("uatom", "ATOM", 1_000).unwrap();
        assert_eq!(denom.format(Amount::from_base_units(1_500)), "1.50");
    }

    #[test]
    fn test_zero_scale_rejected() {
        assert!(matches!(
            Denomination::new("upokt", "POKT", 0),
            Err(TreasuryError::Config(_))
        ));
    }
}
