// request_actions/src/actions/context.rs

use crate::actions::data_source::{read_data_source, value_text};
use crate::condition::extract::PhaseData;
use crate::core::context_data::ContextData;
use crate::model::action::DataSourceConfig;
use crate::model::group::RunnableGroup;
use crate::model::http::{EditorRequest, Response, TransportRequest};
use crate::model::phase::Phase;
use anyhow::anyhow;
use std::sync::Arc;

/// What an action can see: the in-flight request, plus the executed request and
/// response in the response phase.
///
/// Cheap to clone; asynchronous actions carry their own copy onto their task.
#[derive(Debug, Clone)]
pub struct ActionContext {
  pub request: ContextData<EditorRequest>,
  pub executed: Option<Arc<TransportRequest>>,
  pub response: Option<Arc<Response>>,
}

impl ActionContext {
  pub fn for_request(request: ContextData<EditorRequest>) -> Self {
    Self {
      request,
      executed: None,
      response: None,
    }
  }

  pub fn for_response(
    request: ContextData<EditorRequest>,
    executed: Arc<TransportRequest>,
    response: Arc<Response>,
  ) -> Self {
    Self {
      request,
      executed: Some(executed),
      response: Some(response),
    }
  }

  pub fn phase(&self) -> Phase {
    if self.response.is_some() {
      Phase::Response
    } else {
      Phase::Request
    }
  }

  /// Runs `f` against the phase data under a read lock. `None` when the editor
  /// request has no inner request.
  pub fn with_data<R>(&self, f: impl FnOnce(Option<PhaseData<'_>>) -> R) -> R {
    let guard = self.request.read();
    let data = guard.request.as_ref().map(|request| match (self.executed.as_deref(), self.response.as_deref()) {
      (Some(executed), Some(response)) => PhaseData::Response {
        request,
        executed,
        response,
      },
      _ => PhaseData::Request { request },
    });
    f(data)
  }

  pub fn satisfies(&self, group: &RunnableGroup) -> bool {
    let guard = self.request.read();
    match guard.request.as_ref() {
      Some(request) => group.satisfied(request, self.executed.as_deref(), self.response.as_deref()),
      None => false,
    }
  }

  pub fn request_url(&self) -> anyhow::Result<String> {
    self
      .request
      .read()
      .request
      .as_ref()
      .map(|request| request.url.clone())
      .ok_or_else(|| anyhow!("the pipeline request is not set"))
  }

  /// Reads a data source and renders it as text. `Ok(None)` when the source or
  /// path did not resolve.
  pub fn read_value(&self, source: &DataSourceConfig) -> anyhow::Result<Option<String>> {
    self.with_data(|data| {
      let data = data.ok_or_else(|| anyhow!("the pipeline request is not set"))?;
      Ok(read_data_source(source, &data)?.as_ref().map(value_text))
    })
  }
}
