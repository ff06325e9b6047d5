//! Application layer: the seller-facing quoting session and checkout handoff.

pub mod checkout;
pub mod replay;
pub mod session;
