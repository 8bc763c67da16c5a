// request_actions/src/pipeline/execution.rs

//! Contains `ActionsRunner::process_request_actions()` and
//! `ActionsRunner::process_response_actions()`, the two entry points the
//! transport pipeline calls before sending a request and after receiving its
//! response.

use crate::actions::context::ActionContext;
use crate::actions::runner::ActionRunner;
use crate::core::context_data::ContextData;
use crate::error::{ActionsError, ActionsResult};
use crate::model::action::Action;
use crate::model::group::map_groups;
use crate::model::http::{EditorRequest, Response, TransportRequest};
use crate::model::phase::Phase;
use crate::model::record::RawGroup;
use crate::pipeline::definition::ActionsRunner;
use crate::variables::{Variable, VariableResolver};
use std::sync::Arc;
use tracing::{event, instrument, Level};

impl ActionsRunner {
  /// Runs the request actions attached to `request`.
  ///
  /// Returns the same `request` handle; actions may have changed the data
  /// behind it. Nothing to run (no actions, no enabled groups, a malformed
  /// container) is not an error. Fails with `InvalidArgument` when the editor
  /// request has no inner request, and with the action's error when a
  /// synchronous `fail_on_error` action fails.
  ///
  /// Must be called from within a Tokio runtime: asynchronous actions are spawned.
  #[instrument(name = "ActionsRunner::process_request_actions", skip_all, err(Display))]
  pub async fn process_request_actions(
    &self,
    request: ContextData<EditorRequest>,
  ) -> ActionsResult<ContextData<EditorRequest>> {
    let Some(groups) = stored_groups(&request, Phase::Request)? else {
      event!(Level::TRACE, "No request actions attached.");
      return Ok(request);
    };
    self
      .run_phase(Phase::Request, groups, ActionContext::for_request(request.clone()))
      .await?;
    Ok(request)
  }

  /// Runs the response actions attached to `request`.
  ///
  /// `executed` is the request as the transport sent it. All three inputs are
  /// required.
  #[instrument(name = "ActionsRunner::process_response_actions", skip_all, err(Display))]
  pub async fn process_response_actions(
    &self,
    request: ContextData<EditorRequest>,
    executed: Option<TransportRequest>,
    response: Option<Response>,
  ) -> ActionsResult<()> {
    let executed = executed.ok_or_else(|| ActionsError::invalid_argument("executed"))?;
    let response = response.ok_or_else(|| ActionsError::invalid_argument("response"))?;
    let Some(groups) = stored_groups(&request, Phase::Response)? else {
      event!(Level::TRACE, "No response actions attached.");
      return Ok(());
    };
    let context = ActionContext::for_response(request, Arc::new(executed), Arc::new(response));
    self.run_phase(Phase::Response, groups, context).await
  }

  /// Awaits every asynchronous action launched so far.
  ///
  /// The pipeline never waits for them itself; this exists for shutdown and tests.
  pub async fn wait_for_background(&self) {
    let handles = std::mem::take(&mut *self.background.lock());
    for handle in handles {
      if let Err(e) = handle.await {
        event!(Level::WARN, error = %e, "Asynchronous action task did not complete.");
      }
    }
  }

  async fn run_phase(&self, phase: Phase, groups: Vec<RawGroup>, context: ActionContext) -> ActionsResult<()> {
    let runnables = map_groups(phase, groups);
    if runnables.is_empty() {
      event!(Level::DEBUG, %phase, "No enabled action groups.");
      return Ok(());
    }

    let resolver = self.resolvers.create(self.read_variables().await);

    for (group_index, runnable) in runnables.iter().enumerate() {
      if !context.satisfies(runnable) {
        event!(Level::DEBUG, %phase, group_index, "Group condition not satisfied, skipping group.");
        continue;
      }

      for action in runnable.runnable_actions() {
        let action = evaluate_action(&action, resolver.as_ref()).await;
        let name = action.name.clone();
        let (sync, fail_on_error) = (action.sync, action.fail_on_error);
        let runner = ActionRunner::new(action, self.events.clone(), context.clone(), self.executors.clone());

        if !sync {
          self.run_asynchronous_action(runner);
          continue;
        }

        match runner.run().await {
          Ok(outcome) => {
            event!(Level::TRACE, %phase, group_index, action = %name, ?outcome, "Synchronous action finished.");
          }
          Err(e) if fail_on_error => {
            event!(
              Level::ERROR,
              %phase,
              group_index,
              action = %name,
              error = %e,
              "Synchronous action failed, aborting pipeline."
            );
            return Err(e);
          }
          Err(e) => {
            event!(
              Level::WARN,
              %phase,
              group_index,
              action = %name,
              error = %e,
              "Synchronous action failed, continuing."
            );
          }
        }
      }
    }
    Ok(())
  }

  fn run_asynchronous_action(&self, runner: ActionRunner) {
    let name = runner.action().name.clone();
    let handle = tokio::spawn(async move {
      match runner.run().await {
        Ok(outcome) => event!(Level::TRACE, action = %name, ?outcome, "Asynchronous action finished."),
        Err(e) => event!(Level::WARN, action = %name, error = %e, "Asynchronous action resulted in error."),
      }
    });
    let mut background = self.background.lock();
    background.retain(|h| !h.is_finished());
    background.push(handle);
  }

  async fn read_variables(&self) -> Vec<Variable> {
    match self.variables.current_environment().await {
      Ok(environment) => environment.variables,
      Err(e) => {
        event!(Level::WARN, error = %e, "Reading the current environment failed, resolving without variables.");
        Vec::new()
      }
    }
  }
}

/// Returns a copy of `action` with placeholders resolved in `config`,
/// `config.source` and `config.source.iterator`. The input is never modified.
pub async fn evaluate_action(action: &Action, resolver: &dyn VariableResolver) -> Action {
  let mut copy = action.clone();
  resolver.resolve_in_place(&mut copy.config).await;
  if let Some(source) = copy.config.get_mut("source") {
    resolver.resolve_in_place(source).await;
    if let Some(iterator) = source.get_mut("iterator") {
      resolver.resolve_in_place(iterator).await;
    }
  }
  copy
}

/// Decodes the groups stored for `phase`, or `None` when there is nothing to run.
fn stored_groups(request: &ContextData<EditorRequest>, phase: Phase) -> ActionsResult<Option<Vec<RawGroup>>> {
  let guard = request.read();
  let http = guard
    .request
    .as_ref()
    .ok_or_else(|| ActionsError::invalid_argument("request"))?;
  Ok(http.actions.as_ref().and_then(|actions| actions.groups(phase)))
}
