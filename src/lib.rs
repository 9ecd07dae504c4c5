//! chat_economy Library
//!
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod handlers;
pub mod identity;
pub mod ledger;
pub mod middleware;
pub mod store;

mod error;

pub use config::Config;
pub use dispatch::{CommandKind, Dispatched, Dispatcher, Outcome, RouteSettings};
pub use domain::{Account, Amount, AmountError, CommandContext, CommandError, CommandEvent};
pub use error::{AppError, AppResult, INTERNAL_FAILURE_REPLY};
pub use handlers::EconomyHandler;
pub use ledger::{Ledger, LedgerError};
