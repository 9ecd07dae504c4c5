//! Transfer Handler
//!
//! Moves wallet funds between two chatters with full validation.

use crate::domain::{CommandContext, CommandError, Params};
use crate::error::AppResult;

use super::{display_name, require_executor, EconomyHandler};

impl EconomyHandler {
    /// `transfer <amount> @user`
    pub async fn transfer(&self, params: &Params, context: &CommandContext) -> AppResult<String> {
        let executor = require_executor(context)?;

        if params.is_empty() {
            return Err(CommandError::validation(
                "You have to specify a user and an amount to transfer.",
            )
            .into());
        }
        if params.len() != 2 {
            return Err(CommandError::validation(
                "You have to specify an amount and the user you're transferring to.",
            )
            .into());
        }
        let amount = params.amount_at(0).ok_or_else(|| {
            CommandError::validation("You have to specify a valid integer amount to transfer.")
        })?;
        let invalid_target =
            || CommandError::validation("You have to provide a valid mentioned user to transfer to.");
        params.mention_at(1).ok_or_else(invalid_target)?;
        let target = context.target.as_deref().ok_or_else(invalid_target)?;

        if target == executor {
            return Err(CommandError::policy("You can't transfer to yourself.").into());
        }

        // Network lookup before any lock is taken.
        self.require_platform_user(target).await?;

        let tx = self.ledger.begin(&[executor, target]).await;
        let sender = tx.account(executor).await?;
        let recipient = tx.account(target).await?;

        if !sender.can_spend(amount) {
            let currency = self.ledger.currency().await?;
            return Err(CommandError::insufficient_funds(format!(
                "You don't have enough {currency} to transfer."
            ))
            .into());
        }

        let sender = sender.debit_wallet(amount)?;
        let recipient = recipient.credit_wallet(amount)?;
        tx.commit(vec![
            (executor.to_string(), sender),
            (target.to_string(), recipient),
        ])
        .await?;

        tracing::info!(
            from = %executor,
            to = %target,
            amount = amount.value(),
            correlation_id = %context.correlation_id,
            "Transfer committed"
        );

        let currency = self.ledger.currency().await?;
        Ok(format!(
            "{} transferred {amount} {currency} to {}!",
            display_name(executor),
            display_name(target)
        ))
    }
}
