//! Durable token revocation.

pub mod ledger;

pub use ledger::RevocationLedger;
