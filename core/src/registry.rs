// request_actions/src/registry.rs

//! Defines `ExecutorRegistry`, a capability-keyed map from `ActionName` to the
//! executor that performs it.

use crate::actions::context::ActionContext;
use crate::actions::executors::{DeleteCookieExecutor, SetCookieExecutor, SetVariableExecutor};
use crate::events::EventSink;
use crate::model::action::{ActionKind, ActionName};

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{event, Level};

/// Performs the effect of one kind of action.
///
/// Executors receive the decoded `ActionKind` for the name they were registered
/// under, read what they need from `context` (never holding its lock across an
/// `.await`) and report effects through `events`.
#[async_trait]
pub trait ActionExecutor: Send + Sync {
  async fn execute(&self, kind: &ActionKind, context: &ActionContext, events: &dyn EventSink) -> anyhow::Result<()>;
}

pub struct ExecutorRegistry {
  executors: RwLock<HashMap<ActionName, Arc<dyn ActionExecutor>>>,
}

impl ExecutorRegistry {
  /// Creates an empty registry. Every action dispatched through it is inert.
  pub fn new() -> Self {
    Self {
      executors: RwLock::new(HashMap::new()),
    }
  }

  /// Registry with the built-in cookie and variable executors.
  pub fn with_builtin() -> Self {
    let registry = Self::new();
    registry.register(ActionName::SetCookie, SetCookieExecutor);
    registry.register(ActionName::SetVariable, SetVariableExecutor);
    registry.register(ActionName::DeleteCookie, DeleteCookieExecutor);
    registry
  }

  /// Registers `executor` for `name`, replacing any previous one.
  pub fn register<E>(&self, name: ActionName, executor: E)
  where
    E: ActionExecutor + 'static,
  {
    event!(Level::DEBUG, action = %name, executor_type = %std::any::type_name::<E>(), "Registering action executor.");
    self.executors.write().insert(name, Arc::new(executor));
  }

  pub fn unregister(&self, name: ActionName) -> bool {
    self.executors.write().remove(&name).is_some()
  }

  pub fn get(&self, name: ActionName) -> Option<Arc<dyn ActionExecutor>> {
    self.executors.read().get(&name).cloned()
  }

  pub fn contains(&self, name: ActionName) -> bool {
    self.executors.read().contains_key(&name)
  }
}

impl Default for ExecutorRegistry {
  fn default() -> Self {
    Self::with_builtin()
  }
}
