// request_actions/src/actions/runner.rs

use crate::actions::context::ActionContext;
use crate::core::control::RunOutcome;
use crate::error::{ActionsError, ActionsResult};
use crate::events::EventSink;
use crate::model::action::{Action, ActionKind};
use crate::registry::ExecutorRegistry;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// Executes one resolved action against its context.
pub struct ActionRunner {
  action: Action,
  events: Arc<dyn EventSink>,
  context: ActionContext,
  executors: Arc<ExecutorRegistry>,
}

impl ActionRunner {
  pub fn new(
    action: Action,
    events: Arc<dyn EventSink>,
    context: ActionContext,
    executors: Arc<ExecutorRegistry>,
  ) -> Self {
    Self {
      action,
      events,
      context,
      executors,
    }
  }

  pub fn action(&self) -> &Action {
    &self.action
  }

  /// Decodes the action's config, looks up its executor and runs it.
  ///
  /// An unknown name, or a known name without a registered executor, yields
  /// `RunOutcome::NoExecutor`. Decode failures and executor failures are errors.
  #[instrument(
    name = "ActionRunner::run",
    skip_all,
    fields(action = %self.action.name, phase = %self.context.phase(), priority = self.action.priority),
    err(Display)
  )]
  pub async fn run(&self) -> ActionsResult<RunOutcome> {
    let kind = self.action.kind()?;
    let executor = match kind.name() {
      Some(name) => self.executors.get(name),
      None => None,
    };
    let Some(executor) = executor else {
      if let ActionKind::Unknown(name) = &kind {
        event!(Level::DEBUG, name = %name, "No executor matches the action name.");
      } else {
        event!(Level::DEBUG, "No executor registered for the action.");
      }
      return Ok(RunOutcome::NoExecutor);
    };

    event!(Level::TRACE, "Dispatching action to executor.");
    executor
      .execute(&kind, &self.context, self.events.as_ref())
      .await
      .map_err(|source| ActionsError::ActionExecution {
        action: self.action.name.clone(),
        source,
      })?;
    Ok(RunOutcome::Executed)
  }
}
