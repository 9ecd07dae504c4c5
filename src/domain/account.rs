//! Account
//!
//! The two balances held for every chatter. All arithmetic is checked and
//! returns a new value; the caller decides whether to commit it.

use serde::{Deserialize, Serialize};

use super::Amount;

/// Wallet balance given to a freshly created account
pub const DEFAULT_WALLET: i64 = 0;

/// Bank balance given to a freshly created account
pub const DEFAULT_BANK: i64 = 500;

/// Reasons a balance operation cannot produce a new account state
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BalanceError {
    #[error("Insufficient balance: required {required}, available {available}")]
    Insufficient { required: i64, available: i64 },

    #[error("Balance overflow")]
    Overflow,
}

/// Wallet and bank balances of one canonical username.
///
/// Stored on disk as a two-element array `[wallet, bank]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(i64, i64)", into = "(i64, i64)")]
pub struct Account {
    pub wallet: i64,
    pub bank: i64,
}

impl Default for Account {
    fn default() -> Self {
        Self {
            wallet: DEFAULT_WALLET,
            bank: DEFAULT_BANK,
        }
    }
}

impl From<(i64, i64)> for Account {
    fn from((wallet, bank): (i64, i64)) -> Self {
        Self { wallet, bank }
    }
}

impl From<Account> for (i64, i64) {
    fn from(account: Account) -> Self {
        (account.wallet, account.bank)
    }
}

impl Account {
    pub fn new(wallet: i64, bank: i64) -> Self {
        Self { wallet, bank }
    }

    pub fn can_spend(&self, amount: Amount) -> bool {
        self.wallet >= amount.value()
    }

    /// Take `amount` out of the wallet
    pub fn debit_wallet(&self, amount: Amount) -> Result<Account, BalanceError> {
        if !self.can_spend(amount) {
            return Err(BalanceError::Insufficient {
                required: amount.value(),
                available: self.wallet,
            });
        }
        Ok(Self {
            wallet: self.wallet - amount.value(),
            bank: self.bank,
        })
    }

    /// Add `amount` to the wallet
    pub fn credit_wallet(&self, amount: Amount) -> Result<Account, BalanceError> {
        let wallet = self
            .wallet
            .checked_add(amount.value())
            .ok_or(BalanceError::Overflow)?;
        Ok(Self {
            wallet,
            bank: self.bank,
        })
    }

    /// Move `amount` from wallet to bank
    pub fn deposit(&self, amount: Amount) -> Result<Account, BalanceError> {
        let debited = self.debit_wallet(amount)?;
        let bank = debited
            .bank
            .checked_add(amount.value())
            .ok_or(BalanceError::Overflow)?;
        Ok(Self {
            wallet: debited.wallet,
            bank,
        })
    }

    /// Move `amount` from bank to wallet
    pub fn withdraw(&self, amount: Amount) -> Result<Account, BalanceError> {
        if self.bank < amount.value() {
            return Err(BalanceError::Insufficient {
                required: amount.value(),
                available: self.bank,
            });
        }
        let wallet = self
            .wallet
            .checked_add(amount.value())
            .ok_or(BalanceError::Overflow)?;
        Ok(Self {
            wallet,
            bank: self.bank - amount.value(),
        })
    }

    pub fn with_wallet(&self, amount: Amount) -> Account {
        Self {
            wallet: amount.value(),
            bank: self.bank,
        }
    }

    pub fn with_bank(&self, amount: Amount) -> Account {
        Self {
            wallet: self.wallet,
            bank: amount.value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amt(v: i64) -> Amount {
        Amount::new(v).unwrap()
    }

    #[test]
    fn test_default_account() {
        assert_eq!(Account::default(), Account::new(0, 500));
    }

    #[test]
    fn test_deposit_moves_funds() {
        let account = Account::new(200, 500).deposit(amt(50)).unwrap();
        assert_eq!(account, Account::new(150, 550));
    }

    #[test]
    fn test_deposit_insufficient() {
        let result = Account::default().deposit(amt(100));
        assert_eq!(
            result,
            Err(BalanceError::Insufficient {
                required: 100,
                available: 0
            })
        );
    }

    #[test]
    fn test_withdraw_insufficient() {
        let result = Account::new(150, 550).withdraw(amt(600));
        assert!(matches!(result, Err(BalanceError::Insufficient { .. })));
    }

    #[test]
    fn test_withdraw_full_bank() {
        let account = Account::new(0, 500).withdraw(amt(500)).unwrap();
        assert_eq!(account, Account::new(500, 0));
    }

    #[test]
    fn test_credit_overflow() {
        let result = Account::new(i64::MAX, 0).credit_wallet(amt(1));
        assert_eq!(result, Err(BalanceError::Overflow));
    }

    #[test]
    fn test_serializes_as_pair() {
        let json = serde_json::to_string(&Account::new(7, 9)).unwrap();
        assert_eq!(json, "[7,9]");
        let back: Account = serde_json::from_str("[0,500]").unwrap();
        assert_eq!(back, Account::default());
    }
}
