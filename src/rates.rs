//! Fixed currency-pair conversion used when an entry moves money across
//! accounts held in different currencies. The table is intentionally static:
//! only the three account currencies exist and each pair records which side
//! the quoted rate is expressed in.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Mnt,
    Rub,
    Usdt,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Mnt => "MNT",
            Currency::Rub => "RUB",
            Currency::Usdt => "USDT",
        }
    }
}

/// Whether the entry brings money into the account or sends it out. The
/// flow direction decides which side of a rate pair the account sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum FlowDirection {
    Income,
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatePair {
    pub from: Currency,
    pub to: Currency,
    /// True when the quoted rate converts `from` to `to` by multiplication.
    pub multiply: bool,
}

pub const RATE_PAIRS: [RatePair; 6] = [
    RatePair { from: Currency::Mnt, to: Currency::Usdt, multiply: false },
    RatePair { from: Currency::Mnt, to: Currency::Rub, multiply: false },
    RatePair { from: Currency::Rub, to: Currency::Mnt, multiply: true },
    RatePair { from: Currency::Rub, to: Currency::Usdt, multiply: false },
    RatePair { from: Currency::Usdt, to: Currency::Mnt, multiply: true },
    RatePair { from: Currency::Usdt, to: Currency::Rub, multiply: true },
];

/// The pairs applicable to an account: income arrives in the account's
/// currency, so the account sits on the `to` side; an expense leaves in it,
/// so the account sits on the `from` side.
pub fn pairs_for(direction: FlowDirection, account: Currency) -> Vec<&'static RatePair> {
    RATE_PAIRS
        .iter()
        .filter(|p| match direction {
            FlowDirection::Income => p.to == account,
            FlowDirection::Expense => p.from == account,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    pub amount: f64,
    pub currency: Currency,
}

/// Converts an entry amount across a rate pair. Income flips the pair's
/// multiply flag because the quoted rate is stated for the outgoing
/// direction. Returns `None` for non-positive inputs.
pub fn convert(
    pair: &RatePair,
    direction: FlowDirection,
    amount: f64,
    rate: f64,
) -> Option<Conversion> {
    if amount <= 0.0 || rate <= 0.0 {
        return None;
    }
    let (multiply, currency) = match direction {
        FlowDirection::Income => (!pair.multiply, pair.from),
        FlowDirection::Expense => (pair.multiply, pair.to),
    };
    let converted = if multiply { amount * rate } else { amount / rate };
    Some(Conversion {
        amount: converted,
        currency,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(from: Currency, to: Currency) -> &'static RatePair {
        RATE_PAIRS
            .iter()
            .find(|p| p.from == from && p.to == to)
            .unwrap()
    }

    #[test]
    fn test_pairs_for_income() {
        let pairs = pairs_for(FlowDirection::Income, Currency::Mnt);
        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|p| p.to == Currency::Mnt));
    }

    #[test]
    fn test_pairs_for_expense() {
        let pairs = pairs_for(FlowDirection::Expense, Currency::Usdt);
        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|p| p.from == Currency::Usdt));
    }

    #[test]
    fn test_expense_usdt_to_mnt_multiplies() {
        let p = pair(Currency::Usdt, Currency::Mnt);
        let conv = convert(p, FlowDirection::Expense, 100.0, 3450.0).unwrap();
        assert_eq!(conv.currency, Currency::Mnt);
        assert!((conv.amount - 345_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_income_flips_the_multiply_flag() {
        // The USDT -> MNT pair multiplies on the expense side. Income into
        // an MNT account flips that: the received tugrik amount divides by
        // the rate to recover the USDT source figure.
        let p = pair(Currency::Usdt, Currency::Mnt);
        let conv = convert(p, FlowDirection::Income, 345_000.0, 3450.0).unwrap();
        assert_eq!(conv.currency, Currency::Usdt);
        assert!((conv.amount - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_positive_inputs_rejected() {
        let p = pair(Currency::Rub, Currency::Mnt);
        assert!(convert(p, FlowDirection::Expense, 0.0, 42.0).is_none());
        assert!(convert(p, FlowDirection::Expense, 10.0, 0.0).is_none());
        assert!(convert(p, FlowDirection::Expense, -5.0, 42.0).is_none());
    }
}
