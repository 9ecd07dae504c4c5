//! Command Integration Tests
//!
//! Chat lines in, replies and ledger state out, through the full
//! middleware / guard / handler pipeline.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use chat_economy::domain::UNKNOWN_ACCOUNT_REPLY;
use chat_economy::identity::StaticDirectory;
use chat_economy::middleware::{COOLDOWN_REPLY, DEFAULT_BLOCKED_REPLY};
use chat_economy::store::{LedgerStore, MemoryStore, StoreError, StoredValue};
use chat_economy::{Account, Dispatcher, EconomyHandler, Ledger, Outcome, RouteSettings};

mod common;
use common::{account, say, seed_account, setup_dispatcher, setup_with_directory, BOT, OPERATOR};

// =========================================================================
// Accounts
// =========================================================================

#[tokio::test]
async fn test_first_command_creates_account() {
    let dispatcher = setup_dispatcher(1);
    assert!(account(&dispatcher, "alice").await.is_none());

    let dispatched = say(&dispatcher, "Alice", ">balance").await;

    assert_eq!(dispatched.outcome, Outcome::Executed);
    assert_eq!(dispatched.reply, "Wallet: 0 BrainCells | Bank: 500 BrainCells");
    assert_eq!(account(&dispatcher, "alice").await, Some(Account::new(0, 500)));
}

#[tokio::test]
async fn test_deposit_then_withdraw() {
    let dispatcher = setup_dispatcher(1);
    seed_account(&dispatcher, "alice", 300, 0).await;

    let dispatched = say(&dispatcher, "alice", ">deposit 200").await;
    assert_eq!(dispatched.reply, "You have deposited 200 BrainCells into your bank account.");
    assert_eq!(account(&dispatcher, "alice").await, Some(Account::new(100, 200)));

    let dispatched = say(&dispatcher, "alice", ">withdraw 50").await;
    assert_eq!(dispatched.reply, "You have withdrawn 50 BrainCells into your wallet.");
    assert_eq!(account(&dispatcher, "alice").await, Some(Account::new(150, 150)));
}

#[tokio::test]
async fn test_overdraw_leaves_ledger_untouched() {
    let dispatcher = setup_dispatcher(1);
    seed_account(&dispatcher, "alice", 10, 0).await;

    let dispatched = say(&dispatcher, "alice", ">deposit 11").await;

    assert_eq!(dispatched.outcome, Outcome::Rejected);
    assert_eq!(
        dispatched.reply,
        "You cannot deposit 11 BrainCells, you only have 10 BrainCells in your wallet."
    );
    assert_eq!(account(&dispatcher, "alice").await, Some(Account::new(10, 0)));
}

#[tokio::test]
async fn test_balance_of_unknown_user() {
    let dispatcher = setup_dispatcher(1);

    let dispatched = say(&dispatcher, "alice", ">balance @nobody_here").await;

    assert_eq!(dispatched.outcome, Outcome::Rejected);
    assert_eq!(dispatched.reply, UNKNOWN_ACCOUNT_REPLY);
}

// =========================================================================
// Transfer
// =========================================================================

#[tokio::test]
async fn test_transfer_moves_wallet_money() {
    let dispatcher = setup_dispatcher(1);
    seed_account(&dispatcher, "alice", 100, 0).await;

    let dispatched = say(&dispatcher, "alice", ">transfer 40 @Bob").await;

    assert_eq!(dispatched.outcome, Outcome::Executed);
    assert_eq!(dispatched.reply, "Alice transferred 40 BrainCells to Bob!");
    assert_eq!(account(&dispatcher, "alice").await, Some(Account::new(60, 0)));
    assert_eq!(account(&dispatcher, "bob").await, Some(Account::new(40, 500)));
}

#[tokio::test]
async fn test_transfer_to_unknown_user_moves_nothing() {
    let dispatcher = setup_dispatcher(1);
    seed_account(&dispatcher, "alice", 100, 0).await;

    let dispatched = say(&dispatcher, "alice", ">transfer 40 @ghost").await;

    assert_eq!(dispatched.outcome, Outcome::Rejected);
    assert_eq!(dispatched.reply, UNKNOWN_ACCOUNT_REPLY);
    assert_eq!(account(&dispatcher, "alice").await, Some(Account::new(100, 0)));
}

#[tokio::test]
async fn test_transfer_argument_order_matters() {
    let dispatcher = setup_dispatcher(1);
    seed_account(&dispatcher, "alice", 100, 0).await;

    let dispatched = say(&dispatcher, "alice", ">transfer @bob 40").await;

    assert_eq!(dispatched.outcome, Outcome::Rejected);
    assert_eq!(
        dispatched.reply,
        "You have to specify a valid integer amount to transfer."
    );
}

// =========================================================================
// Middleware
// =========================================================================

#[tokio::test]
async fn test_operator_commands_restricted() {
    let dispatcher = setup_dispatcher(1);

    let blocked = say(&dispatcher, "alice", ">set_wallet @bob 1000").await;
    assert_eq!(blocked.outcome, Outcome::Blocked);
    assert_eq!(blocked.reply, DEFAULT_BLOCKED_REPLY);
    // Blocked before the guard: no record created.
    assert!(account(&dispatcher, "bob").await.is_none());

    let allowed = say(&dispatcher, OPERATOR, ">set_wallet @bob 1000").await;
    assert_eq!(allowed.outcome, Outcome::Executed);
    assert_eq!(allowed.reply, "Bob's wallet has been set to: 1000 BrainCells.");
    assert_eq!(account(&dispatcher, "bob").await, Some(Account::new(1000, 500)));
}

#[tokio::test]
async fn test_currency_rename_shows_up_in_replies() {
    let dispatcher = setup_dispatcher(1);

    let renamed = say(&dispatcher, OPERATOR, ">currency Gold Coins").await;
    assert_eq!(renamed.reply, "Currency name is set to: Gold Coins");

    let balance = say(&dispatcher, "alice", ">balance").await;
    assert_eq!(balance.reply, "Wallet: 0 Gold Coins | Bank: 500 Gold Coins");
}

#[tokio::test(start_paused = true)]
async fn test_work_cooldown_per_user() {
    let dispatcher = setup_dispatcher(1);

    let first = say(&dispatcher, "alice", ">work").await;
    assert_eq!(first.outcome, Outcome::Executed);
    let earned = account(&dispatcher, "alice").await.unwrap().wallet;
    assert!((1..=100).contains(&earned));

    let again = say(&dispatcher, "alice", ">work").await;
    assert_eq!(again.outcome, Outcome::Blocked);
    assert_eq!(again.reply, COOLDOWN_REPLY);
    assert_eq!(account(&dispatcher, "alice").await.unwrap().wallet, earned);

    // Another user is unaffected.
    assert_eq!(say(&dispatcher, "bob", ">work").await.outcome, Outcome::Executed);

    tokio::time::advance(Duration::from_secs(60)).await;
    assert_eq!(say(&dispatcher, "alice", ">work").await.outcome, Outcome::Executed);
}

#[tokio::test(start_paused = true)]
async fn test_rob_cooldown_counts_rejected_attempts() {
    let dispatcher = setup_dispatcher(1);

    let refused = say(&dispatcher, "alice", ">rob @drunklockbot").await;
    assert_eq!(refused.outcome, Outcome::Rejected);
    assert_eq!(refused.reply, "Skill issue...I'm sorry, it's fatal.");

    let blocked = say(&dispatcher, "alice", ">rob @bob").await;
    assert_eq!(blocked.outcome, Outcome::Blocked);
    assert_eq!(blocked.reply, COOLDOWN_REPLY);
}

#[tokio::test]
async fn test_rob_victim_without_money() {
    let dispatcher = setup_dispatcher(1);
    seed_account(&dispatcher, "bob", 0, 900).await;

    let dispatched = say(&dispatcher, "alice", ">rob @bob").await;

    assert_eq!(dispatched.outcome, Outcome::Rejected);
    assert_eq!(dispatched.reply, "You cannot rob Bob because they have no money!");
    assert_eq!(account(&dispatcher, "bob").await, Some(Account::new(0, 900)));
}

#[tokio::test]
async fn test_directory_outage_is_unknown_user() {
    let dispatcher = setup_with_directory(StaticDirectory::new([BOT]).failing(), 1);
    seed_account(&dispatcher, "alice", 100, 0).await;

    let dispatched = say(&dispatcher, "alice", ">transfer 10 @bob").await;

    assert_eq!(dispatched.reply, UNKNOWN_ACCOUNT_REPLY);
    assert_eq!(account(&dispatcher, "alice").await, Some(Account::new(100, 0)));
}

// =========================================================================
// Persistence
// =========================================================================

/// Store whose disk is gone: live writes work, every save fails
#[derive(Default)]
struct DiskFullStore {
    live: MemoryStore,
}

#[async_trait]
impl LedgerStore for DiskFullStore {
    async fn get(&self, key: &str) -> Result<Option<StoredValue>, StoreError> {
        self.live.get(key).await
    }

    async fn set(&self, key: &str, value: StoredValue) -> Result<(), StoreError> {
        self.live.set(key, value).await
    }

    async fn set_many(&self, entries: Vec<(String, StoredValue)>) -> Result<(), StoreError> {
        self.live.set_many(entries).await
    }

    async fn save(&self) -> Result<(), StoreError> {
        Err(StoreError::Io {
            path: "storage.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "no space left on device"),
        })
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        self.live.keys().await
    }
}

#[tokio::test]
async fn test_failed_autosave_still_reports_success() {
    let ledger = Arc::new(Ledger::new(Arc::new(DiskFullStore::default())).with_autosave(true));
    let handler = EconomyHandler::new(
        ledger,
        Arc::new(StaticDirectory::new(common::KNOWN_USERS)),
        BOT,
    );
    let dispatcher = Dispatcher::with_economy_routes(
        ">",
        Arc::new(handler),
        &RouteSettings {
            operators: vec![OPERATOR.to_string()],
            cooldown: Duration::from_secs(60),
        },
    );
    seed_account(&dispatcher, "alice", 200, 500).await;

    let dispatched = say(&dispatcher, "alice", ">deposit 50").await;

    assert_eq!(dispatched.outcome, Outcome::Executed);
    assert_eq!(dispatched.reply, "You have deposited 50 BrainCells into your bank account.");
    assert_eq!(account(&dispatcher, "alice").await, Some(Account::new(150, 550)));
}

// =========================================================================
// Concurrency
// =========================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_transfers_cannot_overdraw() {
    let directory = StaticDirectory::new(["alice", "bob", "carol", "dave"])
        .with_latency(Duration::from_millis(5));
    let dispatcher = setup_with_directory(directory, 7);
    seed_account(&dispatcher, "alice", 100, 0).await;

    let mut tasks = Vec::new();
    for target in ["bob", "carol", "dave"].iter().cycle().take(10) {
        let dispatcher = dispatcher.clone();
        let message = format!(">transfer 30 @{target}");
        tasks.push(tokio::spawn(async move {
            dispatcher.handle_message("chan", "alice", &message).await
        }));
    }

    let mut executed = 0;
    for task in tasks {
        if task.await.unwrap().unwrap().outcome == Outcome::Executed {
            executed += 1;
        }
    }

    assert_eq!(executed, 3);
    let alice = account(&dispatcher, "alice").await.unwrap();
    assert_eq!(alice.wallet, 10);

    let mut received = 0;
    for name in ["bob", "carol", "dave"] {
        received += account(&dispatcher, name).await.map(|a| a.wallet).unwrap_or(0);
    }
    assert_eq!(received, 90);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_mixed_commands_conserve_money() {
    let users = ["alice", "bob", "carol", "dave"];
    let directory = StaticDirectory::new(users).with_latency(Duration::from_millis(1));
    let dispatcher = setup_with_directory(directory, 11);
    for user in users {
        seed_account(&dispatcher, user, 500, 500).await;
    }

    let mut tasks = Vec::new();
    for i in 0..200usize {
        let from = users[i % users.len()];
        let to = users[(i * 7 + 1) % users.len()];
        let message = match i % 3 {
            0 => format!(">transfer {} @{}", i % 90, to),
            1 => format!(">deposit {}", i % 70),
            _ => format!(">withdraw {}", i % 80),
        };
        let dispatcher = dispatcher.clone();
        tasks.push(tokio::spawn(async move {
            dispatcher.handle_message("chan", from, &message).await
        }));
    }
    for task in tasks {
        let dispatched = task.await.unwrap().unwrap();
        assert_ne!(dispatched.outcome, Outcome::Failed, "{}", dispatched.reply);
    }

    let mut total = 0;
    for user in users {
        let account = account(&dispatcher, user).await.unwrap();
        assert!(account.wallet >= 0 && account.bank >= 0, "{user}: {account:?}");
        total += account.wallet + account.bank;
    }
    assert_eq!(total, 4 * 1000);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_robs_never_overdraw_victim() {
    let robbers: Vec<String> = (0..16).map(|i| format!("robber{i}")).collect();
    let directory = StaticDirectory::new(robbers.iter().chain(["victim".to_string()].iter()))
        .with_latency(Duration::from_millis(2));
    let dispatcher = setup_with_directory(directory, 3);
    seed_account(&dispatcher, "victim", 150, 0).await;
    for robber in &robbers {
        seed_account(&dispatcher, robber, 50, 0).await;
    }
    let before = 150 + 50 * robbers.len() as i64;

    let mut tasks = Vec::new();
    for robber in robbers.clone() {
        let dispatcher = dispatcher.clone();
        tasks.push(tokio::spawn(async move {
            dispatcher.handle_message("chan", &robber, ">rob @victim").await
        }));
    }
    for task in tasks {
        let dispatched = task.await.unwrap().unwrap();
        assert_ne!(dispatched.outcome, Outcome::Failed, "{}", dispatched.reply);
    }

    let victim = account(&dispatcher, "victim").await.unwrap();
    assert!(victim.wallet >= 0);

    let mut after = victim.wallet;
    for robber in &robbers {
        let account = account(&dispatcher, robber).await.unwrap();
        assert!(account.wallet >= 0);
        after += account.wallet;
    }
    // Failed robs burn money; nothing creates it.
    assert!(after <= before);
}
