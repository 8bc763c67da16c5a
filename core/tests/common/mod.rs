// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use request_actions::model::action::SetVariableConfig;
use request_actions::{
  ActionContext, ActionEvent, ActionExecutor, ActionKind, ActionName, ActionsRunner, ContextData, EditorRequest,
  Environment, EventSink, ExecutorRegistry, HttpRequest, RawAction, RawCondition, RawGroup, RequestActions, Variable,
  VariableSource,
};
use serde_json::json;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use tokio::sync::Notify;
use tracing::Level;

// --- Collaborator fakes ---

/// Records every event; fails dispatch when `fail` is set.
#[derive(Default)]
pub struct RecordingEventSink {
  pub events: Mutex<Vec<ActionEvent>>,
  pub fail: bool,
}

impl RecordingEventSink {
  pub fn failing() -> Self {
    Self {
      events: Mutex::new(Vec::new()),
      fail: true,
    }
  }

  pub fn events(&self) -> Vec<ActionEvent> {
    self.events.lock().clone()
  }
}

#[async_trait]
impl EventSink for RecordingEventSink {
  async fn dispatch(&self, event: ActionEvent) -> anyhow::Result<()> {
    if self.fail {
      anyhow::bail!("event sink rejected {:?}", event);
    }
    self.events.lock().push(event);
    Ok(())
  }
}

/// Counts how often the environment is read.
#[derive(Default)]
pub struct CountingVariableSource {
  pub calls: AtomicUsize,
  pub variables: Vec<Variable>,
  pub fail: bool,
}

impl CountingVariableSource {
  pub fn with(variables: Vec<Variable>) -> Self {
    Self {
      variables,
      ..Default::default()
    }
  }

  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl VariableSource for CountingVariableSource {
  async fn current_environment(&self) -> anyhow::Result<Environment> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    if self.fail {
      anyhow::bail!("environment store unavailable");
    }
    Ok(Environment {
      name: Some("test".into()),
      variables: self.variables.clone(),
    })
  }
}

pub static SCRIPTED_EXEC_COUNTER: Lazy<Arc<AtomicUsize>> = Lazy::new(|| Arc::new(AtomicUsize::new(0)));

pub fn reset_counters() {
  SCRIPTED_EXEC_COUNTER.store(0, Ordering::SeqCst);
}

/// Stands in for `set-variable`. Records each resolved config in execution order.
///
/// Variable names drive the script: `fail*` fails, `slow*` waits on `gate`
/// before recording.
#[derive(Clone, Default)]
pub struct ScriptedExecutor {
  pub calls: Arc<Mutex<Vec<SetVariableConfig>>>,
  pub gate: Arc<Notify>,
}

impl ScriptedExecutor {
  pub fn names(&self) -> Vec<String> {
    self.calls.lock().iter().map(|c| c.name.clone()).collect()
  }
}

#[async_trait]
impl ActionExecutor for ScriptedExecutor {
  async fn execute(&self, kind: &ActionKind, _context: &ActionContext, _events: &dyn EventSink) -> anyhow::Result<()> {
    let ActionKind::SetVariable(config) = kind else {
      anyhow::bail!("scripted executor only runs set-variable");
    };
    if config.name.starts_with("slow") {
      self.gate.notified().await;
    }
    SCRIPTED_EXEC_COUNTER.fetch_add(1, Ordering::SeqCst);
    self.calls.lock().push(config.clone());
    tracing::debug!(target: "test_executors", name = %config.name, "scripted action executed");
    if config.name.starts_with("fail") {
      anyhow::bail!("scripted failure for '{}'", config.name);
    }
    Ok(())
  }
}

pub fn scripted_runner(executor: &ScriptedExecutor, variables: Arc<CountingVariableSource>) -> ActionsRunner {
  let registry = ExecutorRegistry::new();
  registry.register(ActionName::SetVariable, executor.clone());
  ActionsRunner::builder()
    .variables(variables)
    .executors(Arc::new(registry))
    .build()
    .expect("runner builds")
}

// --- Record builders ---

/// A `set-variable` action the scripted executor identifies by `name`.
pub fn variable_action(name: &str, priority: i32) -> RawAction {
  let mut action = RawAction::new(
    "set-variable",
    json!({"name": name, "source": {"source": "request.url"}}),
  );
  action.priority = Some(priority);
  action
}

pub fn always(actions: Vec<RawAction>) -> RawGroup {
  RawGroup::new(RawCondition::always_pass(), actions)
}

pub fn sample_request() -> HttpRequest {
  HttpRequest {
    url: "https://api.example.com/users?id=7".into(),
    method: "POST".into(),
    headers: "Content-Type: application/json\nX-Trace: abc123".into(),
    payload: Some(json!({"user": {"id": 7, "name": "Ada"}, "tags": ["a", "b"]}).to_string()),
    actions: None,
  }
}

pub fn editor_request(request_groups: Vec<RawGroup>, response_groups: Vec<RawGroup>) -> ContextData<EditorRequest> {
  let mut request = sample_request();
  request.actions = Some(RequestActions::new(request_groups, response_groups));
  ContextData::new(EditorRequest::new(request))
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
