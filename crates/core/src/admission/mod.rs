//! Spend gate for budget-bearing advertising entities.
//!
//! Before a campaign (or any other budget-bearing creative) may enter an
//! active, bid-eligible state, this module checks that its funding account
//! can sustain it:
//! - Daily budget floor validation
//! - Available-credits admission on activation
//! - Read-only serving checks for dashboards and schedulers

pub mod error;
pub mod service;
pub mod types;

pub use error::AdmissionError;
pub use service::AdmissionService;
pub use types::{EntityStatus, SpendProfile};
