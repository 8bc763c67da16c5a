// request_actions/src/events.rs

//! Notifications executors emit so the host application can update its stores.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
  pub name: String,
  pub value: String,
  pub url: String,
  pub domain: Option<String>,
  pub path: Option<String>,
  pub expires: Option<String>,
  pub host_only: bool,
  pub http_only: bool,
  pub secure: bool,
  pub session: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ActionEvent {
  SetVariable { name: String, value: String },
  SetCookie(Cookie),
  /// `name: None` removes every cookie for the URL.
  DeleteCookies { url: String, name: Option<String> },
}

/// Dispatch target through which executors reach the cookie and variable stores.
#[async_trait]
pub trait EventSink: Send + Sync {
  async fn dispatch(&self, event: ActionEvent) -> anyhow::Result<()>;
}

/// Drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

#[async_trait]
impl EventSink for NoopEventSink {
  async fn dispatch(&self, event: ActionEvent) -> anyhow::Result<()> {
    tracing::trace!(?event, "Event dropped by NoopEventSink.");
    Ok(())
  }
}
