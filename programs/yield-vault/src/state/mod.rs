pub mod fees;
pub mod gate;
pub mod share_ledger;
pub mod strategy;
pub mod vault;

pub use fees::*;
pub use gate::*;
pub use share_ledger::*;
pub use strategy::*;
pub use vault::*;
