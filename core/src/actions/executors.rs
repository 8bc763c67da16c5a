// request_actions/src/actions/executors.rs

//! Built-in executors. They never touch stores directly; every effect leaves
//! through the `EventSink`.

use crate::actions::context::ActionContext;
use crate::events::{ActionEvent, Cookie, EventSink};
use crate::model::action::ActionKind;
use crate::registry::ActionExecutor;
use anyhow::{anyhow, bail, Context as AnyhowContext};
use async_trait::async_trait;
use url::Url;

#[derive(Debug, Clone, Copy, Default)]
pub struct SetVariableExecutor;

#[async_trait]
impl ActionExecutor for SetVariableExecutor {
  async fn execute(&self, kind: &ActionKind, context: &ActionContext, events: &dyn EventSink) -> anyhow::Result<()> {
    let ActionKind::SetVariable(config) = kind else {
      bail!("set-variable executor cannot run {:?}", kind.name());
    };
    let name = config.name.trim();
    if name.is_empty() {
      bail!("variable name is empty");
    }
    let value = context
      .read_value(&config.source)?
      .ok_or_else(|| anyhow!("no value found for variable '{}'", name))?;
    events
      .dispatch(ActionEvent::SetVariable {
        name: name.to_string(),
        value,
      })
      .await
  }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SetCookieExecutor;

#[async_trait]
impl ActionExecutor for SetCookieExecutor {
  async fn execute(&self, kind: &ActionKind, context: &ActionContext, events: &dyn EventSink) -> anyhow::Result<()> {
    let ActionKind::SetCookie(config) = kind else {
      bail!("set-cookie executor cannot run {:?}", kind.name());
    };
    if config.name.trim().is_empty() {
      bail!("cookie name is empty");
    }
    let url = cookie_url(config.use_request_url, config.url.as_deref(), context)?;
    let parsed = Url::parse(&url).with_context(|| format!("invalid cookie url '{}'", url))?;
    let value = context
      .read_value(&config.source)?
      .ok_or_else(|| anyhow!("no value found for cookie '{}'", config.name))?;
    let cookie = Cookie {
      name: config.name.trim().to_string(),
      value,
      domain: parsed.host_str().map(String::from),
      path: Some(parsed.path().to_string()),
      url,
      expires: config.expires.clone().filter(|e| !e.is_empty()),
      host_only: config.host_only,
      http_only: config.http_only,
      secure: config.secure,
      session: config.session,
    };
    events.dispatch(ActionEvent::SetCookie(cookie)).await
  }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteCookieExecutor;

#[async_trait]
impl ActionExecutor for DeleteCookieExecutor {
  async fn execute(&self, kind: &ActionKind, context: &ActionContext, events: &dyn EventSink) -> anyhow::Result<()> {
    let ActionKind::DeleteCookie(config) = kind else {
      bail!("delete-cookie executor cannot run {:?}", kind.name());
    };
    let url = cookie_url(config.use_request_url, config.url.as_deref(), context)?;
    let name = if config.remove_all {
      None
    } else {
      let name = config.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
      Some(name.ok_or_else(|| anyhow!("cookie name is required unless removeAll is set"))?.to_string())
    };
    events.dispatch(ActionEvent::DeleteCookies { url, name }).await
  }
}

fn cookie_url(use_request_url: bool, configured: Option<&str>, context: &ActionContext) -> anyhow::Result<String> {
  if use_request_url {
    return context.request_url();
  }
  configured
    .map(str::trim)
    .filter(|u| !u.is_empty())
    .map(String::from)
    .ok_or_else(|| anyhow!("no cookie url configured and useRequestUrl is not set"))
}
