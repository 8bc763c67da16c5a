// request_actions/src/model/action.rs

//! Executable actions: normalization of stored records, ordering, and the typed
//! per-name configurations decoded at dispatch time.

use crate::condition::operator::Operator;
use crate::error::{ActionsError, ActionsResult};
use crate::model::phase::Phase;
use crate::model::record::RawAction;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;

pub const DEFAULT_PRIORITY: i32 = 5;

/// One normalized unit of effect.
///
/// `config` stays structured JSON so placeholders can be resolved in place; it
/// is decoded into an `ActionKind` only when the action is dispatched.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
  /// `None` when the record did not say; the action then follows its group.
  pub phase: Option<Phase>,
  pub name: String,
  pub enabled: bool,
  pub priority: i32,
  pub sync: bool,
  pub fail_on_error: bool,
  pub config: Value,
}

impl Action {
  pub fn from_record(raw: &RawAction) -> Self {
    Self {
      phase: raw.phase.as_deref().and_then(Phase::parse),
      name: raw.name.clone().unwrap_or_default(),
      enabled: raw.enabled,
      priority: raw.priority.unwrap_or(DEFAULT_PRIORITY),
      sync: raw.sync.unwrap_or(true),
      fail_on_error: raw.fail_on_error.unwrap_or(false),
      config: raw.config.clone().unwrap_or_else(|| Value::Object(Default::default())),
    }
  }

  /// True when the action may run inside a group of `phase`.
  pub fn applies_to(&self, phase: Phase) -> bool {
    self.phase.map_or(true, |own| own == phase)
  }

  /// Decodes the configuration for this action's name.
  pub fn kind(&self) -> ActionsResult<ActionKind> {
    let Some(name) = ActionName::parse(&self.name) else {
      return Ok(ActionKind::Unknown(self.name.clone()));
    };
    let invalid = |source| ActionsError::InvalidActionConfig {
      action: self.name.clone(),
      source,
    };
    let config = self.config.clone();
    Ok(match name {
      ActionName::SetCookie => ActionKind::SetCookie(serde_json::from_value(config).map_err(invalid)?),
      ActionName::SetVariable => ActionKind::SetVariable(serde_json::from_value(config).map_err(invalid)?),
      ActionName::DeleteCookie => ActionKind::DeleteCookie(serde_json::from_value(config).map_err(invalid)?),
    })
  }
}

/// Normalizes stored records, applying `sync = true`, `priority = 5` and
/// `fail_on_error = false` where the record is silent.
pub fn map_actions(raw: &[RawAction]) -> Vec<Action> {
  raw.iter().map(Action::from_record).collect()
}

/// Ascending by priority. Use with a stable sort so equal priorities keep their
/// stored order.
pub fn sort_actions(a: &Action, b: &Action) -> Ordering {
  a.priority.cmp(&b.priority)
}

/// Names with a built-in executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionName {
  SetCookie,
  SetVariable,
  DeleteCookie,
}

impl ActionName {
  pub fn parse(raw: &str) -> Option<Self> {
    match raw {
      "set-cookie" => Some(ActionName::SetCookie),
      "set-variable" => Some(ActionName::SetVariable),
      "delete-cookie" => Some(ActionName::DeleteCookie),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      ActionName::SetCookie => "set-cookie",
      ActionName::SetVariable => "set-variable",
      ActionName::DeleteCookie => "delete-cookie",
    }
  }
}

impl fmt::Display for ActionName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// An action's effect with its typed configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionKind {
  SetCookie(SetCookieConfig),
  SetVariable(SetVariableConfig),
  DeleteCookie(DeleteCookieConfig),
  Unknown(String),
}

impl ActionKind {
  pub fn name(&self) -> Option<ActionName> {
    match self {
      ActionKind::SetCookie(_) => Some(ActionName::SetCookie),
      ActionKind::SetVariable(_) => Some(ActionName::SetVariable),
      ActionKind::DeleteCookie(_) => Some(ActionName::DeleteCookie),
      ActionKind::Unknown(_) => None,
    }
  }
}

/// Where an action reads its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
  #[serde(rename = "request.url")]
  RequestUrl,
  #[serde(rename = "request.method")]
  RequestMethod,
  #[serde(rename = "request.headers")]
  RequestHeaders,
  #[serde(rename = "request.body")]
  RequestBody,
  #[serde(rename = "response.url")]
  ResponseUrl,
  #[serde(rename = "response.method")]
  ResponseMethod,
  #[serde(rename = "response.headers")]
  ResponseHeaders,
  #[serde(rename = "response.body")]
  ResponseBody,
  #[serde(rename = "response.status")]
  ResponseStatus,
}

impl DataSource {
  pub fn phase(&self) -> Phase {
    match self {
      DataSource::RequestUrl | DataSource::RequestMethod | DataSource::RequestHeaders | DataSource::RequestBody => {
        Phase::Request
      }
      _ => Phase::Response,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceConfig {
  pub source: DataSource,
  #[serde(default)]
  pub path: Option<String>,
  #[serde(default)]
  pub iterator_enabled: bool,
  #[serde(default)]
  pub iterator: Option<IteratorConfig>,
}

/// Picks one item out of an array body before `path` is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IteratorConfig {
  pub path: String,
  pub condition: String,
  pub operator: Operator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCookieConfig {
  pub name: String,
  pub source: DataSourceConfig,
  #[serde(default)]
  pub use_request_url: bool,
  #[serde(default)]
  pub url: Option<String>,
  #[serde(default)]
  pub expires: Option<String>,
  #[serde(default)]
  pub host_only: bool,
  #[serde(default)]
  pub http_only: bool,
  #[serde(default)]
  pub secure: bool,
  #[serde(default)]
  pub session: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetVariableConfig {
  pub name: String,
  pub source: DataSourceConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCookieConfig {
  #[serde(default)]
  pub use_request_url: bool,
  #[serde(default)]
  pub url: Option<String>,
  #[serde(default)]
  pub remove_all: bool,
  #[serde(default)]
  pub name: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn with_priority(name: &str, priority: i32) -> Action {
    let mut raw = RawAction::new(name, json!({}));
    raw.priority = Some(priority);
    Action::from_record(&raw)
  }

  #[test]
  fn record_defaults_are_applied() {
    let action = Action::from_record(&RawAction::default());
    assert_eq!(action.priority, DEFAULT_PRIORITY);
    assert!(action.sync);
    assert!(!action.fail_on_error);
    assert!(!action.enabled);
    assert_eq!(action.config, json!({}));
    assert!(action.applies_to(Phase::Request) && action.applies_to(Phase::Response));
  }

  #[test]
  fn equal_priorities_keep_stored_order() {
    let mut actions = vec![
      with_priority("a", 5),
      with_priority("b", 1),
      with_priority("c", 5),
      with_priority("d", 3),
    ];
    actions.sort_by(sort_actions);
    let names: Vec<_> = actions.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["b", "d", "a", "c"]);
  }

  #[test]
  fn unknown_names_decode_to_unknown_kind() {
    let action = Action::from_record(&RawAction::new("open-url", json!({"url": "x"})));
    assert_eq!(action.kind().ok(), Some(ActionKind::Unknown("open-url".into())));
  }

  #[test]
  fn bad_config_for_known_name_is_an_error() {
    let action = Action::from_record(&RawAction::new("set-variable", json!({"name": 3})));
    let err = action.kind().unwrap_err();
    assert!(matches!(err, ActionsError::InvalidActionConfig { .. }));
    assert_eq!(err.action_name(), Some("set-variable"));
  }

  #[test]
  fn set_cookie_config_decodes() {
    let action = Action::from_record(&RawAction::new(
      "set-cookie",
      json!({
        "name": "token",
        "useRequestUrl": true,
        "source": {
          "source": "response.body",
          "path": "id",
          "iteratorEnabled": true,
          "iterator": {"path": "items.*.kind", "condition": "a", "operator": "equal"}
        }
      }),
    ));
    let Ok(ActionKind::SetCookie(config)) = action.kind() else {
      panic!("expected set-cookie config");
    };
    assert!(config.use_request_url);
    assert_eq!(config.source.source, DataSource::ResponseBody);
    assert_eq!(config.source.iterator.map(|i| i.operator), Some(Operator::Equal));
  }
}
