// src/lib.rs

//! Request actions: conditional, prioritized side effects attached to the
//! request and response lifecycle of an HTTP client.
//!
//! A request carries groups of actions per phase. Each group has a condition
//! evaluated against the live request/response; when it holds, the group's
//! enabled actions run in priority order:
//!  - Placeholders (`${name}`) in each action's configuration are resolved
//!    against the current variable environment, on a copy of the action.
//!  - Synchronous actions run one at a time. A failure aborts the pipeline only
//!    when the action is marked `fail_on_error`.
//!  - Asynchronous actions are spawned and never block or fail the pipeline.
//!  - Effects (cookies, variables) are reported to an injected `EventSink`.

pub mod actions;
pub mod condition;
pub mod core;
pub mod error;
pub mod events;
pub mod model;
pub mod pipeline;
pub mod registry;
pub mod variables;

// --- Re-exports for the Public API ---

pub use crate::core::context_data::ContextData;
pub use crate::core::control::RunOutcome;

pub use crate::pipeline::definition::{ActionsRunner, ActionsRunnerBuilder};

pub use crate::actions::{ActionContext, ActionRunner};
pub use crate::registry::{ActionExecutor, ExecutorRegistry};

pub use crate::condition::operator::{evaluate, Operator};
pub use crate::condition::Condition;

pub use crate::events::{ActionEvent, Cookie, EventSink, NoopEventSink};
pub use crate::variables::{
  Environment, ResolverFactory, StaticVariableSource, TemplateResolver, TemplateResolverFactory, Variable,
  VariableResolver, VariableSource,
};

pub use crate::model::{
  Action, ActionKind, ActionName, EditorRequest, HttpRequest, Phase, RawAction, RawCondition, RawGroup,
  RequestActions, Response, TransportRequest,
};

pub use crate::error::{ActionsError, ActionsResult};

/*
    Typical use from a transport pipeline:
    1. Build an `ActionsRunner` once, injecting a `VariableSource` and an `EventSink`
       (and optionally a custom `ExecutorRegistry` or `ResolverFactory`).
    2. Before sending: `let request = runner.process_request_actions(request).await?;`
    3. After receiving: `runner.process_response_actions(request, Some(executed), Some(response)).await?;`
    4. On shutdown, `runner.wait_for_background().await` lets fire-and-forget actions finish.
*/
