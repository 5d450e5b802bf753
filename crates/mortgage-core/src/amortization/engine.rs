//! Level-payment amortization of a fixed-rate loan.
//!
//! Every query recomputes from the immutable [`LoanTerms`]; nothing is
//! cached, so the engine can be shared freely and repeated calls return
//! identical results. All amounts are `rust_decimal::Decimal`, reported to
//! whole cents.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::terms::LoanTerms;
use crate::time_value::{self, round_money};
use crate::types::{Money, Percent};
use crate::MortgageResult;

/// One month of the amortization schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// 1-based month index.
    pub month: u32,
    /// Amount paid this month.
    pub payment: Money,
    /// Portion of the payment that reduces the balance.
    pub principal: Money,
    /// Portion of the payment that is interest.
    pub interest: Money,
    /// Outstanding balance after the payment.
    pub balance: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AmortizationEngine {
    terms: LoanTerms,
}

impl AmortizationEngine {
    /// Validate the inputs and build an engine for them.
    pub fn new(
        principal: Money,
        annual_rate_percent: Percent,
        term_months: u32,
    ) -> MortgageResult<Self> {
        LoanTerms::new(principal, annual_rate_percent, term_months).map(Self::from_terms)
    }

    pub fn from_terms(terms: LoanTerms) -> Self {
        Self { terms }
    }

    pub fn terms(&self) -> &LoanTerms {
        &self.terms
    }

    /// Level monthly payment, rounded to cents.
    pub fn monthly_payment(&self) -> Money {
        round_money(time_value::annuity_payment(
            self.terms.principal(),
            self.terms.monthly_rate(),
            self.terms.periods(),
        ))
    }

    /// Rounded monthly payment times the term. Differs from the schedule's
    /// actual total by the accumulated rounding drift.
    pub fn total_payment(&self) -> Money {
        round_money(self.monthly_payment() * Decimal::from(self.terms.term_months()))
    }

    /// Total paid above the principal.
    pub fn overpayment(&self) -> Money {
        round_money(self.total_payment() - self.terms.principal())
    }

    /// Month-by-month breakdown of every payment.
    ///
    /// Months `1..n` apply the level payment to the running, unrounded
    /// balance. Month `n` pays off whatever that recurrence left, plus its
    /// interest, so the last balance is exactly zero however the rounded
    /// payments drifted.
    pub fn payment_schedule(&self) -> Vec<PaymentRecord> {
        let term_months = self.terms.term_months();
        let rate = self.terms.monthly_rate();
        let payment = self.monthly_payment();

        let mut schedule = Vec::with_capacity(term_months as usize);
        let mut balance = self.terms.principal();

        for month in 1..term_months {
            let interest = balance * rate;
            let principal_portion = payment - interest;
            balance -= principal_portion;

            schedule.push(PaymentRecord {
                month,
                payment,
                principal: round_money(principal_portion),
                interest: round_money(interest),
                balance: round_money(balance),
            });
        }

        let interest = balance * rate;
        schedule.push(PaymentRecord {
            month: term_months,
            payment: round_money(balance + interest),
            principal: round_money(balance),
            interest: round_money(interest),
            balance: Decimal::new(0, time_value::CURRENCY_DP),
        });

        schedule
    }
}
