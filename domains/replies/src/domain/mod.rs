//! Replies domain logic

pub mod entities;
pub mod ledger;
pub mod state;
