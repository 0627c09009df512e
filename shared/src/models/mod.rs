//! Domain models for the fish ledger

mod movement;
mod report;
mod stock;

pub use movement::*;
pub use report::*;
pub use stock::*;
