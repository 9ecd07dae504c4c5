//! Balance, deposit and withdraw

use crate::domain::{BalanceError, CommandContext, CommandError, Params};
use crate::error::AppResult;

use super::{parse_amount, require_executor, EconomyHandler};

impl EconomyHandler {
    /// `balance [@user]`
    pub async fn balance(&self, params: &Params, context: &CommandContext) -> AppResult<String> {
        let executor = require_executor(context)?;

        let subject = if params.is_empty() {
            executor
        } else {
            let target = context.target.as_deref().ok_or_else(|| {
                CommandError::validation("You have to mention a user with @ to check their balance.")
            })?;
            self.require_platform_user(target).await?;
            target
        };

        let account = self.ledger.account(subject).await?.unwrap_or_default();
        let currency = self.ledger.currency().await?;
        Ok(format!(
            "Wallet: {} {currency} | Bank: {} {currency}",
            account.wallet, account.bank
        ))
    }

    /// `deposit <amount>`: wallet to bank
    pub async fn deposit(&self, params: &Params, context: &CommandContext) -> AppResult<String> {
        let executor = require_executor(context)?;
        let amount = parse_amount(
            params,
            "You have to provide an amount to deposit.",
            "Please provide a valid number to deposit.",
        )?;

        let tx = self.ledger.begin(&[executor]).await;
        let account = tx.account(executor).await?;
        let updated = match account.deposit(amount) {
            Ok(updated) => updated,
            Err(BalanceError::Insufficient { available, .. }) => {
                let currency = self.ledger.currency().await?;
                return Err(CommandError::insufficient_funds(format!(
                    "You cannot deposit {amount} {currency}, you only have {available} {currency} in your wallet."
                ))
                .into());
            }
            Err(e) => return Err(e.into()),
        };
        tx.commit(vec![(executor.to_string(), updated)]).await?;

        let currency = self.ledger.currency().await?;
        Ok(format!(
            "You have deposited {amount} {currency} into your bank account."
        ))
    }

    /// `withdraw <amount>`: bank to wallet
    pub async fn withdraw(&self, params: &Params, context: &CommandContext) -> AppResult<String> {
        let executor = require_executor(context)?;
        let amount = parse_amount(
            params,
            "You have to provide an amount to withdraw.",
            "Please provide a valid number to withdraw.",
        )?;

        let tx = self.ledger.begin(&[executor]).await;
        let account = tx.account(executor).await?;
        let updated = match account.withdraw(amount) {
            Ok(updated) => updated,
            Err(BalanceError::Insufficient { available, .. }) => {
                let currency = self.ledger.currency().await?;
                return Err(CommandError::insufficient_funds(format!(
                    "You cannot withdraw {amount} {currency}, you only have {available} {currency} in your bank."
                ))
                .into());
            }
            Err(e) => return Err(e.into()),
        };
        tx.commit(vec![(executor.to_string(), updated)]).await?;

        let currency = self.ledger.currency().await?;
        Ok(format!("You have withdrawn {amount} {currency} into your wallet."))
    }
}
