//! Work, gamble and rob

use crate::domain::{Amount, CommandContext, CommandError, Fate, Params};
use crate::error::AppResult;

use super::{amount, display_name, parse_amount, require_executor, EconomyHandler};

/// Cap on what a single rob can move
const ROB_CAP: i64 = 100;

fn times(stake: Amount, factor: i64) -> AppResult<Amount> {
    stake
        .checked_mul(factor)
        .map_err(|_| CommandError::Overflow.into())
}

impl EconomyHandler {
    /// `work`: earn 1..=100 into the wallet
    pub async fn work(&self, _params: &Params, context: &CommandContext) -> AppResult<String> {
        let executor = require_executor(context)?;
        let earnings = amount(self.roll(1..=100))?;

        let tx = self.ledger.begin(&[executor]).await;
        let account = tx.account(executor).await?;
        let updated = account.credit_wallet(earnings)?;
        tx.commit(vec![(executor.to_string(), updated)]).await?;

        let currency = self.ledger.currency().await?;
        Ok(format!("You worked and earned {earnings} {currency}."))
    }

    /// `gamble <amount>`
    pub async fn gamble(&self, params: &Params, context: &CommandContext) -> AppResult<String> {
        let executor = require_executor(context)?;
        let stake = parse_amount(
            params,
            "You have to provide an amount to gamble.",
            "Please provide a valid number to gamble.",
        )?;

        let tx = self.ledger.begin(&[executor]).await;
        let account = tx.account(executor).await?;
        if !account.can_spend(stake) {
            let currency = self.ledger.currency().await?;
            return Err(CommandError::insufficient_funds(format!(
                "You don't have enough {currency} to gamble the amount you wanted."
            ))
            .into());
        }

        let fate = self.draw_fate();
        // `shown` is the payout including the returned stake.
        let (updated, shown) = match fate {
            Fate::Fail => (account.debit_wallet(stake)?, stake),
            Fate::Success => (account.credit_wallet(stake)?, times(stake, 2)?),
            Fate::Lucky => (account.credit_wallet(times(stake, 3)?)?, times(stake, 4)?),
        };
        tx.commit(vec![(executor.to_string(), updated)]).await?;

        tracing::debug!(user = %executor, stake = stake.value(), fate = fate.as_str(), "Gamble settled");

        let currency = self.ledger.currency().await?;
        Ok(match fate {
            Fate::Fail => format!("You lost {shown} {currency}!"),
            Fate::Success | Fate::Lucky => format!("You won {shown} {currency}!"),
        })
    }

    /// `rob @user`
    pub async fn rob(&self, params: &Params, context: &CommandContext) -> AppResult<String> {
        let executor = require_executor(context)?;
        let missing = || CommandError::validation("You have to specify a user to try and rob.");

        if params.is_empty() || !params.has_mention() {
            return Err(missing().into());
        }
        let target = context.target.as_deref().ok_or_else(missing)?;

        if target == executor {
            return Err(CommandError::policy("Robbing yourself? Really? Get some help...").into());
        }
        if target == self.bot_username {
            return Err(CommandError::policy("Skill issue...I'm sorry, it's fatal.").into());
        }

        // Network lookup before any lock is taken.
        self.require_platform_user(target).await?;

        let tx = self.ledger.begin(&[executor, target]).await;
        let robber = tx.account(executor).await?;
        let victim = tx.account(target).await?;

        if victim.wallet <= 0 {
            return Err(CommandError::policy(format!(
                "You cannot rob {} because they have no money!",
                display_name(target)
            ))
            .into());
        }

        let fate = self.draw_fate();
        let taken = match fate {
            Fate::Fail => {
                let loss = amount(self.roll(0..=robber.wallet.clamp(0, ROB_CAP)))?;
                tx.commit(vec![(executor.to_string(), robber.debit_wallet(loss)?)])
                    .await?;
                let currency = self.ledger.currency().await?;
                return Ok(format!(
                    "You lost {loss} {currency} while trying to rob {}!",
                    display_name(target)
                ));
            }
            Fate::Success if victim.wallet >= ROB_CAP => amount(self.roll(1..=ROB_CAP))?,
            Fate::Success => amount(self.roll(0..=victim.wallet))?,
            Fate::Lucky => amount(self.roll(1..=victim.wallet))?,
        };

        tx.commit(vec![
            (target.to_string(), victim.debit_wallet(taken)?),
            (executor.to_string(), robber.credit_wallet(taken)?),
        ])
        .await?;

        tracing::debug!(
            user = %executor,
            target = %target,
            fate = fate.as_str(),
            taken = taken.value(),
            "Rob settled"
        );

        let currency = self.ledger.currency().await?;
        Ok(match fate {
            Fate::Lucky => format!("You got lucky and got {taken} {currency}!"),
            _ => format!("You succeeded and got {taken} {currency}!"),
        })
    }
}
