//! Dashboard presentation helpers.

use crate::types::Portfolio;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};


/// Formats an amount as US currency, e.g. `100000.0` as `"$100,000.00"`.
///
/// Rounds half away from zero to cents. Negative amounts carry a leading
/// `-` before the dollar sign. Non-finite amounts render as `$0.00`.
#[must_use]
pub fn format_money(amount: f64) -> String {
    let mut value = Decimal::from_f64(amount)
        .unwrap_or_default()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = value.is_sign_negative() && !value.is_zero();

    value.set_sign_positive(true);
    value.rescale(2);
    let rendered = value.to_string();
    let (whole, cents) = rendered.split_once('.').unwrap_or((rendered.as_str(), "00"));

    let sign = if negative { "-" } else { "" };
    format!("{sign}${}.{cents}", group_thousands(whole))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Text shown in the dashboard header for the active portfolio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    /// Contents of the `portfolio-name` element.
    pub portfolio_name: String,
    /// Contents of the `portfolio-value` element.
    pub portfolio_value: String,
}

impl Dashboard {
    /// Builds the dashboard text for a portfolio.
    #[must_use]
    pub fn from_portfolio(portfolio: &Portfolio) -> Self {
        Self {
            portfolio_name: portfolio.name.clone(),
            portfolio_value: format_money(portfolio.value),
        }
    }
}
