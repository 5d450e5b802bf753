//! Fixed-rate amortizing loans: validated terms, the amortization engine
//! and the analysis envelope served to callers.

pub mod analysis;
pub mod engine;
pub mod terms;

pub use engine::{AmortizationEngine, PaymentRecord};
pub use terms::LoanTerms;
