//! Command dispatch
//!
//! Turns a chat message into a reply:
//!
//! ```text
//! parse prefix + name -> middleware chain -> account guard -> command body
//! ```
//!
//! Unknown commands and ordinary chat produce no reply. Every other path
//! produces exactly one reply, including failures.

mod guard;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{CommandContext, CommandEvent, Params};
use crate::error::{AppError, AppResult};
use crate::handlers::EconomyHandler;
use crate::middleware::{CommandMiddleware, UserCommandCooldown, UserRestriction};

pub use guard::{resolve, GuardSpec};

/// The command bodies a route can point at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Balance,
    Deposit,
    Withdraw,
    Work,
    Gamble,
    Transfer,
    Rob,
    Currency,
    SetWallet,
    SetBank,
}

impl CommandKind {
    pub const ALL: [CommandKind; 10] = [
        CommandKind::Currency,
        CommandKind::SetWallet,
        CommandKind::SetBank,
        CommandKind::Balance,
        CommandKind::Deposit,
        CommandKind::Withdraw,
        CommandKind::Gamble,
        CommandKind::Transfer,
        CommandKind::Work,
        CommandKind::Rob,
    ];

    /// Name typed after the prefix
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::Balance => "balance",
            CommandKind::Deposit => "deposit",
            CommandKind::Withdraw => "withdraw",
            CommandKind::Work => "work",
            CommandKind::Gamble => "gamble",
            CommandKind::Transfer => "transfer",
            CommandKind::Rob => "rob",
            CommandKind::Currency => "currency",
            CommandKind::SetWallet => "set_wallet",
            CommandKind::SetBank => "set_bank",
        }
    }

    /// Account guard configuration for this command
    pub fn guard(&self) -> GuardSpec {
        match self {
            CommandKind::Currency => GuardSpec::NONE,
            CommandKind::SetWallet | CommandKind::SetBank => GuardSpec::TARGET,
            CommandKind::Balance | CommandKind::Transfer | CommandKind::Rob => GuardSpec::BOTH,
            CommandKind::Deposit
            | CommandKind::Withdraw
            | CommandKind::Work
            | CommandKind::Gamble => GuardSpec::EXECUTOR,
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One registered command
#[derive(Clone)]
pub struct CommandRoute {
    pub kind: CommandKind,
    pub guard: GuardSpec,
    pub middleware: Vec<Arc<dyn CommandMiddleware>>,
}

impl CommandRoute {
    pub fn new(kind: CommandKind) -> Self {
        Self {
            kind,
            guard: kind.guard(),
            middleware: Vec::new(),
        }
    }

    pub fn with_middleware(mut self, middleware: Arc<dyn CommandMiddleware>) -> Self {
        self.middleware.push(middleware);
        self
    }
}

/// Middleware settings for the standard command table
#[derive(Debug, Clone)]
pub struct RouteSettings {
    /// Allow-set for currency / set_wallet / set_bank
    pub operators: Vec<String>,
    /// Window for work / rob
    pub cooldown: Duration,
}

/// How a dispatched command ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Body ran and committed
    Executed,
    /// Stopped by a middleware
    Blocked,
    /// Body refused the input or a business rule
    Rejected,
    /// Infrastructure failure
    Failed,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Executed => "executed",
            Outcome::Blocked => "blocked",
            Outcome::Rejected => "rejected",
            Outcome::Failed => "failed",
        }
    }
}

/// Result of handling one command event
#[derive(Debug, Clone, Serialize)]
pub struct Dispatched {
    pub correlation_id: Uuid,
    pub command: String,
    pub outcome: Outcome,
    pub reply: String,
}

pub struct Dispatcher {
    prefix: String,
    handler: Arc<EconomyHandler>,
    routes: HashMap<String, CommandRoute>,
}

impl Dispatcher {
    /// Dispatcher with no routes registered
    pub fn new(prefix: impl Into<String>, handler: Arc<EconomyHandler>) -> Self {
        Self {
            prefix: prefix.into(),
            handler,
            routes: HashMap::new(),
        }
    }

    /// Dispatcher with every economy command registered
    pub fn with_economy_routes(
        prefix: impl Into<String>,
        handler: Arc<EconomyHandler>,
        settings: &RouteSettings,
    ) -> Self {
        let mut dispatcher = Self::new(prefix, handler);
        let restriction: Arc<dyn CommandMiddleware> =
            Arc::new(UserRestriction::new(&settings.operators));

        for kind in CommandKind::ALL {
            let route = match kind {
                CommandKind::Currency | CommandKind::SetWallet | CommandKind::SetBank => {
                    CommandRoute::new(kind).with_middleware(restriction.clone())
                }
                CommandKind::Work | CommandKind::Rob => CommandRoute::new(kind)
                    .with_middleware(Arc::new(UserCommandCooldown::new(settings.cooldown))),
                _ => CommandRoute::new(kind),
            };
            dispatcher.register(route);
        }
        dispatcher
    }

    pub fn register(&mut self, route: CommandRoute) {
        self.routes.insert(route.kind.name().to_string(), route);
    }

    pub fn handler(&self) -> &Arc<EconomyHandler> {
        &self.handler
    }

    /// Recognise a command in a chat message.
    ///
    /// `>Deposit  100` becomes command `deposit` with parameter `100`.
    pub fn parse(&self, channel: &str, user: &str, message: &str) -> Option<CommandEvent> {
        let body = message.trim_start().strip_prefix(self.prefix.as_str())?;
        let (name, rest) = match body.find(char::is_whitespace) {
            Some(split) => (&body[..split], &body[split..]),
            None => (body, ""),
        };
        if name.is_empty() {
            return None;
        }
        Some(CommandEvent::new(user, name.to_lowercase(), rest.trim()).in_channel(channel))
    }

    /// Parse and dispatch a raw chat message
    pub async fn handle_message(
        &self,
        channel: &str,
        user: &str,
        message: &str,
    ) -> Option<Dispatched> {
        let event = self.parse(channel, user, message)?;
        self.dispatch(event).await
    }

    /// Run one command event through middleware, guard and body.
    ///
    /// Returns `None` for commands nobody registered.
    pub async fn dispatch(&self, mut event: CommandEvent) -> Option<Dispatched> {
        event.command = event.command.to_lowercase();
        let route = self.routes.get(&event.command)?;
        let correlation_id = Uuid::new_v4();
        let start = Instant::now();

        for middleware in &route.middleware {
            let verdict = middleware.check(&event).await;
            if let Some(reply) = verdict.blocked_reply() {
                tracing::info!(
                    command = %event.command,
                    user = %event.user,
                    middleware = middleware.name(),
                    correlation_id = %correlation_id,
                    outcome = Outcome::Blocked.as_str(),
                    "Command blocked"
                );
                return Some(Dispatched {
                    correlation_id,
                    command: event.command.clone(),
                    outcome: Outcome::Blocked,
                    reply: reply.to_string(),
                });
            }
        }

        let result = match resolve(self.handler.ledger(), &event, route.guard, correlation_id).await
        {
            Ok(context) => self.run(route.kind, &event, &context).await,
            Err(e) => Err(e),
        };

        let duration_ms = start.elapsed().as_millis();
        let (outcome, reply) = match result {
            Ok(reply) => (Outcome::Executed, reply),
            Err(AppError::Command(e)) => {
                tracing::debug!(
                    command = %event.command,
                    user = %event.user,
                    kind = e.kind(),
                    correlation_id = %correlation_id,
                    "Command rejected"
                );
                (Outcome::Rejected, e.to_string())
            }
            Err(e) => {
                tracing::error!(
                    command = %event.command,
                    user = %event.user,
                    correlation_id = %correlation_id,
                    error = %e,
                    "Command failed"
                );
                (Outcome::Failed, e.reply_text())
            }
        };

        tracing::info!(
            command = %event.command,
            user = %event.user,
            channel = %event.channel,
            correlation_id = %correlation_id,
            outcome = outcome.as_str(),
            duration_ms = %duration_ms,
            "Command handled"
        );

        Some(Dispatched {
            correlation_id,
            command: event.command,
            outcome,
            reply,
        })
    }

    async fn run(
        &self,
        kind: CommandKind,
        event: &CommandEvent,
        context: &CommandContext,
    ) -> AppResult<String> {
        let params = Params::parse(&event.parameter);
        let handler = &self.handler;
        match kind {
            CommandKind::Balance => handler.balance(&params, context).await,
            CommandKind::Deposit => handler.deposit(&params, context).await,
            CommandKind::Withdraw => handler.withdraw(&params, context).await,
            CommandKind::Work => handler.work(&params, context).await,
            CommandKind::Gamble => handler.gamble(&params, context).await,
            CommandKind::Transfer => handler.transfer(&params, context).await,
            CommandKind::Rob => handler.rob(&params, context).await,
            CommandKind::Currency => handler.set_currency(&params, context).await,
            CommandKind::SetWallet => handler.set_wallet(&params, context).await,
            CommandKind::SetBank => handler.set_bank(&params, context).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::StaticDirectory;
    use crate::ledger::Ledger;
    use crate::store::MemoryStore;

    fn dispatcher() -> Dispatcher {
        let ledger = Arc::new(Ledger::new(Arc::new(MemoryStore::new())));
        let handler = Arc::new(
            EconomyHandler::new(ledger, Arc::new(StaticDirectory::new(["alice", "bob"])), "drunklockbot")
                .with_seed(1),
        );
        Dispatcher::with_economy_routes(
            ">",
            handler,
            &RouteSettings {
                operators: vec!["rinonkaru".to_string()],
                cooldown: Duration::from_secs(60),
            },
        )
    }

    #[test]
    fn test_parse_command() {
        let dispatcher = dispatcher();
        let event = dispatcher.parse("chan", "Alice", ">Deposit   100 ").unwrap();
        assert_eq!(event.command, "deposit");
        assert_eq!(event.parameter, "100");
        assert_eq!(event.channel, "chan");
    }

    #[test]
    fn test_parse_ignores_chat() {
        let dispatcher = dispatcher();
        assert!(dispatcher.parse("chan", "alice", "hello there").is_none());
        assert!(dispatcher.parse("chan", "alice", ">").is_none());
        assert!(dispatcher.parse("chan", "alice", "> work").is_none());
    }

    #[test]
    fn test_parse_no_parameter() {
        let dispatcher = dispatcher();
        let event = dispatcher.parse("chan", "alice", ">work").unwrap();
        assert_eq!(event.command, "work");
        assert!(event.parameter.is_empty());
    }

    #[test]
    fn test_all_commands_registered() {
        let dispatcher = dispatcher();
        for kind in CommandKind::ALL {
            assert!(dispatcher.routes.contains_key(kind.name()), "{kind} missing");
        }
        assert_eq!(dispatcher.routes["work"].middleware.len(), 1);
        assert_eq!(dispatcher.routes["currency"].middleware[0].name(), "user_restriction");
        assert!(dispatcher.routes["balance"].middleware.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_command_is_silent() {
        let dispatcher = dispatcher();
        assert!(dispatcher.handle_message("chan", "alice", ">dance").await.is_none());
    }

    #[tokio::test]
    async fn test_restricted_command_blocked() {
        let dispatcher = dispatcher();
        let dispatched = dispatcher
            .handle_message("chan", "alice", ">currency Gold")
            .await
            .unwrap();
        assert_eq!(dispatched.outcome, Outcome::Blocked);
        assert_eq!(dispatched.reply, crate::middleware::DEFAULT_BLOCKED_REPLY);
    }

    #[tokio::test]
    async fn test_rejection_is_reply() {
        let dispatcher = dispatcher();
        let dispatched = dispatcher
            .handle_message("chan", "alice", ">deposit lots")
            .await
            .unwrap();
        assert_eq!(dispatched.outcome, Outcome::Rejected);
        assert_eq!(dispatched.reply, "Please provide a valid number to deposit.");
    }
}
