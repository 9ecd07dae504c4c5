//! Domain module
//!
//! Core domain types and business rules. Nothing here touches I/O.

pub mod account;
pub mod amount;
pub mod context;
pub mod error;
pub mod fate;
pub mod params;

pub use account::{Account, BalanceError, DEFAULT_BANK, DEFAULT_WALLET};
pub use amount::{Amount, AmountError};
pub use context::{CommandContext, CommandEvent};
pub use error::{CommandError, UNKNOWN_ACCOUNT_REPLY};
pub use fate::Fate;
pub use params::{Params, Token};
