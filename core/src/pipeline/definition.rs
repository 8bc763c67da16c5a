// request_actions/src/pipeline/definition.rs

//! Contains the `ActionsRunner` struct and its builder. Execution lives in
//! `pipeline::execution`.

use crate::error::{ActionsError, ActionsResult};
use crate::events::{EventSink, NoopEventSink};
use crate::registry::ExecutorRegistry;
use crate::variables::{ResolverFactory, TemplateResolverFactory, VariableSource};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Runs the request and response actions attached to a request.
///
/// Every collaborator is injected: the variable source, the resolver factory
/// used for `${...}` placeholders, the executor registry and the event sink
/// executors report to.
pub struct ActionsRunner {
  pub(crate) variables: Arc<dyn VariableSource>,
  pub(crate) resolvers: Arc<dyn ResolverFactory>,
  pub(crate) executors: Arc<ExecutorRegistry>,
  pub(crate) events: Arc<dyn EventSink>,
  // Fire-and-forget actions still running (or finished but not yet pruned).
  pub(crate) background: Mutex<Vec<JoinHandle<()>>>,
}

impl ActionsRunner {
  /// A runner with the built-in executors and `${name}` templates.
  pub fn new(variables: Arc<dyn VariableSource>, events: Arc<dyn EventSink>) -> Self {
    Self {
      variables,
      resolvers: Arc::new(TemplateResolverFactory),
      executors: Arc::new(ExecutorRegistry::with_builtin()),
      events,
      background: Mutex::new(Vec::new()),
    }
  }

  pub fn builder() -> ActionsRunnerBuilder {
    ActionsRunnerBuilder::default()
  }

  pub fn executors(&self) -> &Arc<ExecutorRegistry> {
    &self.executors
  }
}

/// Fluent construction of an `ActionsRunner`.
///
/// Only the variable source is required; the rest default to
/// `TemplateResolverFactory`, `ExecutorRegistry::with_builtin()` and `NoopEventSink`.
#[derive(Default)]
pub struct ActionsRunnerBuilder {
  variables: Option<Arc<dyn VariableSource>>,
  resolvers: Option<Arc<dyn ResolverFactory>>,
  executors: Option<Arc<ExecutorRegistry>>,
  events: Option<Arc<dyn EventSink>>,
}

impl ActionsRunnerBuilder {
  pub fn variables(mut self, source: Arc<dyn VariableSource>) -> Self {
    self.variables = Some(source);
    self
  }

  pub fn resolvers(mut self, factory: Arc<dyn ResolverFactory>) -> Self {
    self.resolvers = Some(factory);
    self
  }

  pub fn executors(mut self, registry: Arc<ExecutorRegistry>) -> Self {
    self.executors = Some(registry);
    self
  }

  pub fn events(mut self, sink: Arc<dyn EventSink>) -> Self {
    self.events = Some(sink);
    self
  }

  pub fn build(self) -> ActionsResult<ActionsRunner> {
    let variables = self.variables.ok_or_else(|| ActionsError::Configuration {
      message: String::from("a variable source is required"),
    })?;
    Ok(ActionsRunner {
      variables,
      resolvers: self.resolvers.unwrap_or_else(|| Arc::new(TemplateResolverFactory)),
      executors: self
        .executors
        .unwrap_or_else(|| Arc::new(ExecutorRegistry::with_builtin())),
      events: self.events.unwrap_or_else(|| Arc::new(NoopEventSink)),
      background: Mutex::new(Vec::new()),
    })
  }
}
