//! Common test utilities

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chat_economy::identity::StaticDirectory;
use chat_economy::store::MemoryStore;
use chat_economy::{Account, Dispatcher, EconomyHandler, Ledger, RouteSettings};

pub const BOT: &str = "drunklockbot";
pub const OPERATOR: &str = "rinonkaru";

/// Users the fixed directory knows about
pub const KNOWN_USERS: [&str; 6] = ["alice", "bob", "carol", "dave", OPERATOR, BOT];

/// Build an in-memory engine with the standard command table
pub fn setup_dispatcher(seed: u64) -> Arc<Dispatcher> {
    setup_with_directory(StaticDirectory::new(KNOWN_USERS), seed)
}

pub fn setup_with_directory(directory: StaticDirectory, seed: u64) -> Arc<Dispatcher> {
    let ledger = Arc::new(Ledger::new(Arc::new(MemoryStore::new())));
    let handler = Arc::new(EconomyHandler::new(ledger, Arc::new(directory), BOT).with_seed(seed));
    Arc::new(Dispatcher::with_economy_routes(
        ">",
        handler,
        &RouteSettings {
            operators: vec![OPERATOR.to_string()],
            cooldown: Duration::from_secs(60),
        },
    ))
}

/// Overwrite an account directly through the ledger
pub async fn seed_account(dispatcher: &Dispatcher, name: &str, wallet: i64, bank: i64) {
    let ledger = dispatcher.handler().ledger();
    let tx = ledger.begin(&[name]).await;
    tx.commit(vec![(name.to_string(), Account::new(wallet, bank))])
        .await
        .expect("Failed to seed account");
}

pub async fn account(dispatcher: &Dispatcher, name: &str) -> Option<Account> {
    dispatcher
        .handler()
        .ledger()
        .account(name)
        .await
        .expect("Failed to read account")
}

/// Send one chat line and return the reply, panicking if nothing answered
pub async fn say(dispatcher: &Dispatcher, user: &str, message: &str) -> chat_economy::Dispatched {
    dispatcher
        .handle_message("drunklockholmes", user, message)
        .await
        .unwrap_or_else(|| panic!("no reply to {message:?}"))
}
