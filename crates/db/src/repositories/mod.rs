//! Repository abstractions for data access.

pub mod account;
pub mod campaign;
pub mod ledger;

pub use account::AccountRepository;
pub use campaign::CampaignRepository;
pub use ledger::LedgerRepository;
