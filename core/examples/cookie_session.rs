// request_actions/examples/cookie_session.rs

use async_trait::async_trait;
use request_actions::{
  ActionEvent, ActionsResult, ActionsRunner, ContextData, EditorRequest, EventSink, HttpRequest, RawAction,
  RawCondition, RawGroup, RequestActions, Response, StaticVariableSource, TransportRequest, Variable,
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

// 1. An event sink standing in for the cookie jar and environment store.
struct LoggingSink;

#[async_trait]
impl EventSink for LoggingSink {
  async fn dispatch(&self, event: ActionEvent) -> anyhow::Result<()> {
    info!("Event: {}", serde_json::to_string(&event)?);
    Ok(())
  }
}

#[tokio::main]
async fn main() -> ActionsResult<()> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Cookie Session Example ---");

  // 2. Build the runner once. Variables come from the active environment.
  let variables = StaticVariableSource::new(vec![Variable::new("tenant", "acme")]);
  let runner = ActionsRunner::new(Arc::new(variables), Arc::new(LoggingSink));

  // 3. Attach actions to a request.
  let tag_tenant = RawGroup::new(
    RawCondition::always_pass(),
    vec![RawAction::new(
      "set-variable",
      json!({"name": "lastTenant", "source": {"source": "request.url", "path": "query.tenant"}}),
    )],
  );
  let store_session = RawGroup::new(
    RawCondition::check("status-code", "equal", 200),
    vec![RawAction::new(
      "set-cookie",
      json!({
        "name": "session-${tenant}",
        "source": {"source": "response.body", "path": "session.id"},
        "useRequestUrl": true,
        "httpOnly": true
      }),
    )],
  );

  let mut http = HttpRequest::new("https://api.example.com/login?tenant=acme", "POST");
  http.actions = Some(RequestActions::new(vec![tag_tenant], vec![store_session]));
  let request = ContextData::new(EditorRequest::new(http));

  // 4. Before sending.
  let request = runner.process_request_actions(request).await?;

  // 5. After the transport returns.
  let executed = TransportRequest {
    url: "https://api.example.com/login?tenant=acme".into(),
    method: "POST".into(),
    ..Default::default()
  };
  let mut response = Response::new(200);
  response.payload = Some(json!({"session": {"id": "s-9f2"}}).to_string());
  runner
    .process_response_actions(request, Some(executed), Some(response))
    .await?;

  runner.wait_for_background().await;
  info!("--- Cookie Session Example Complete ---");
  Ok(())
}
