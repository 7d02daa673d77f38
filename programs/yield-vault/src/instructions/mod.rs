pub mod configure_fees;
pub mod custody;
pub mod deposit;
pub mod gate_admin;
pub mod harvest;
pub mod initialize_vault;
pub mod invest;
pub mod redeem;
pub mod set_invest_ratio;
pub mod set_strategy;
pub mod strategy_admin;
pub mod view;

#[allow(ambiguous_glob_reexports)]
pub use configure_fees::*;
pub use custody::*;
#[allow(ambiguous_glob_reexports)]
pub use deposit::*;
pub use gate_admin::*;
#[allow(ambiguous_glob_reexports)]
pub use harvest::*;
#[allow(ambiguous_glob_reexports)]
pub use initialize_vault::*;
#[allow(ambiguous_glob_reexports)]
pub use invest::*;
#[allow(ambiguous_glob_reexports)]
pub use redeem::*;
#[allow(ambiguous_glob_reexports)]
pub use set_invest_ratio::*;
#[allow(ambiguous_glob_reexports)]
pub use set_strategy::*;
pub use strategy_admin::*;
#[allow(ambiguous_glob_reexports)]
pub use view::*;
