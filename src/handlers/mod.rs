//! Command Handlers module
//!
//! The bodies of the economy commands. Each handler receives the parsed
//! parameters and the identities resolved by the account guard, runs one
//! ledger transaction, and returns the reply text. Rejections come back as
//! `AppError::Command` and have written nothing.

mod account_handler;
mod admin_handler;
mod games_handler;
mod transfer_handler;


use std::ops::RangeInclusive;
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::{Amount, CommandContext, CommandError, Fate, Params};
use crate::error::{AppError, AppResult};
use crate::identity::{confirm_exists, UserDirectory};
use crate::ledger::Ledger;

/// Shared state for all economy commands
pub struct EconomyHandler {
    ledger: Arc<Ledger>,
    directory: Arc<dyn UserDirectory>,
    bot_username: String,
    rng: Mutex<StdRng>,
}

impl EconomyHandler {
    pub fn new(ledger: Arc<Ledger>, directory: Arc<dyn UserDirectory>, bot_username: &str) -> Self {
        Self {
            ledger,
            directory,
            bot_username: bot_username.to_lowercase(),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic randomness
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    fn roll(&self, range: RangeInclusive<i64>) -> i64 {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen_range(range)
    }

    fn draw_fate(&self) -> Fate {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        Fate::draw(&mut *rng)
    }

    /// Fail with UnknownAccount unless the directory knows `username`.
    async fn require_platform_user(&self, username: &str) -> AppResult<()> {
        if confirm_exists(self.directory.as_ref(), username).await {
            Ok(())
        } else {
            Err(CommandError::unknown_account(username).into())
        }
    }
}

fn require_executor(context: &CommandContext) -> AppResult<&str> {
    context
        .executor
        .as_deref()
        .ok_or_else(|| AppError::Internal("route does not resolve the executor".to_string()))
}

/// Parse the sole parameter as an amount.
fn parse_amount(params: &Params, missing: &str, invalid: &str) -> AppResult<Amount> {
    if params.is_empty() {
        return Err(CommandError::validation(missing).into());
    }
    params
        .sole_amount()
        .ok_or_else(|| CommandError::validation(invalid).into())
}

/// Canonical name as shown in replies
fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn amount(value: i64) -> AppResult<Amount> {
    Amount::new(value).map_err(|e| AppError::Internal(e.to_string()))
}
