use std::num::NonZeroU32;

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::types::{Money, Percent, Rate};

/// Decimal places every reported amount is rounded to.
pub const CURRENCY_DP: u32 = 2;

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Round to whole cents, midpoint to even. The result always carries two
/// decimal places, so `10000` is reported as `10000.00`.
pub fn round_money(amount: Money) -> Money {
    let mut rounded = amount.round_dp(CURRENCY_DP);
    rounded.rescale(CURRENCY_DP);
    rounded
}

/// Monthly rate from an annual percentage (7.5 -> 0.00625).
pub fn monthly_rate(annual_rate_percent: Percent) -> Rate {
    annual_rate_percent / dec!(100) / MONTHS_PER_YEAR
}

/// Level payment that fully amortises `principal` over `nper` periods, unrounded.
///
/// Evaluates `P * r(1+r)^n / ((1+r)^n - 1)` in its discount form
/// `P * r / (1 - (1+r)^-n)`: the discount factor shrinks towards zero
/// instead of growing, so long terms at high rates stay inside the
/// decimal range. A zero rate degenerates to even division.
pub fn annuity_payment(principal: Money, rate: Rate, nper: NonZeroU32) -> Money {
    let periods = Decimal::from(nper.get());
    if rate.is_zero() {
        return principal / periods;
    }

    let discount = Decimal::ONE / (Decimal::ONE + rate);
    let annuity_factor = Decimal::ONE - discount.powu(u64::from(nper.get()));

    // Rates below decimal resolution leave nothing to discount.
    if annuity_factor.is_zero() {
        return principal / periods;
    }

    principal * rate / annuity_factor
}
