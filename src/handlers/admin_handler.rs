//! Operator commands: currency rename and direct balance setters

use crate::domain::{Account, Amount, CommandContext, CommandError, Params};
use crate::error::AppResult;

use super::{display_name, EconomyHandler};

/// Which balance a setter overwrites
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Wallet,
    Bank,
}

impl Field {
    fn label(&self) -> &'static str {
        match self {
            Field::Wallet => "wallet",
            Field::Bank => "bank",
        }
    }

    fn apply(&self, account: Account, amount: Amount) -> Account {
        match self {
            Field::Wallet => account.with_wallet(amount),
            Field::Bank => account.with_bank(amount),
        }
    }
}

impl EconomyHandler {
    /// `currency <name>`
    pub async fn set_currency(&self, params: &Params, _context: &CommandContext) -> AppResult<String> {
        let name = params.raw();
        if name.is_empty() {
            return Err(CommandError::validation("You have to specify a new currency name.").into());
        }
        self.ledger.set_currency(name).await?;
        tracing::info!(currency = %name, "Currency renamed");
        Ok(format!("Currency name is set to: {name}"))
    }

    /// `set_wallet @user <amount>`
    pub async fn set_wallet(&self, params: &Params, context: &CommandContext) -> AppResult<String> {
        self.set_field(Field::Wallet, params, context).await
    }

    /// `set_bank @user <amount>`
    pub async fn set_bank(&self, params: &Params, context: &CommandContext) -> AppResult<String> {
        self.set_field(Field::Bank, params, context).await
    }

    async fn set_field(
        &self,
        field: Field,
        params: &Params,
        context: &CommandContext,
    ) -> AppResult<String> {
        let usage = || {
            CommandError::validation(format!(
                "You have to provide a user and an amount to set their {} to.",
                field.label()
            ))
        };

        if params.len() != 2 || params.mention_at(0).is_none() {
            return Err(usage().into());
        }
        let value = params.amount_at(1).ok_or_else(usage)?;
        let target = context.target.as_deref().ok_or_else(usage)?;

        self.require_platform_user(target).await?;

        let tx = self.ledger.begin(&[target]).await;
        let account = tx.account(target).await?;
        tx.commit(vec![(target.to_string(), field.apply(account, value))])
            .await?;

        tracing::info!(
            target = %target,
            field = field.label(),
            value = value.value(),
            correlation_id = %context.correlation_id,
            "Balance overwritten by operator"
        );

        let currency = self.ledger.currency().await?;
        Ok(format!(
            "{}'s {} has been set to: {value} {currency}.",
            display_name(target),
            field.label()
        ))
    }
}
