//! Account guard
//!
//! Runs after the middleware chain and before the command body: makes sure
//! the invoker (and a mentioned user, if the route cares) has a ledger
//! record, then hands the body the identities it asked for.

use uuid::Uuid;

use crate::domain::{CommandContext, CommandEvent};
use crate::error::AppResult;
use crate::identity::{canonicalize, extract_mention};
use crate::ledger::Ledger;

/// Per-route guard configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuardSpec {
    /// Look for an `@mention` in the parameter text
    pub mention: bool,
    /// Pass the invoker's canonical name to the body
    pub executor: bool,
    /// Pass the mentioned user's canonical name to the body
    pub target: bool,
}

impl GuardSpec {
    /// No account work at all
    pub const NONE: GuardSpec = GuardSpec {
        mention: false,
        executor: false,
        target: false,
    };

    /// Invoker only
    pub const EXECUTOR: GuardSpec = GuardSpec {
        mention: false,
        executor: true,
        target: false,
    };

    /// Mentioned user only
    pub const TARGET: GuardSpec = GuardSpec {
        mention: true,
        executor: false,
        target: true,
    };

    /// Invoker and mentioned user
    pub const BOTH: GuardSpec = GuardSpec {
        mention: true,
        executor: true,
        target: true,
    };

    pub fn is_noop(&self) -> bool {
        *self == Self::NONE
    }
}

/// Create missing records and build the handler context.
///
/// Does not consult the platform directory; the body confirms a target
/// before trusting it.
pub async fn resolve(
    ledger: &Ledger,
    event: &CommandEvent,
    spec: GuardSpec,
    correlation_id: Uuid,
) -> AppResult<CommandContext> {
    let mut context = CommandContext::new().with_correlation_id(correlation_id);
    if spec.is_noop() {
        return Ok(context);
    }

    let executor = canonicalize(&event.user);
    ledger.ensure_account(&executor).await?;

    let target = if spec.mention && event.parameter.contains('@') {
        let target = canonicalize(extract_mention(&event.parameter));
        if target.is_empty() {
            None
        } else {
            ledger.ensure_account(&target).await?;
            Some(target)
        }
    } else {
        None
    };

    if spec.executor {
        context.executor = Some(executor);
    }
    if spec.target {
        context.target = target;
    }
    Ok(context)
}
