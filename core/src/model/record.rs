// request_actions/src/model/record.rs

//! Stored action and condition records, as deserialized by the caller.
//!
//! Every field is lenient: missing or `null` values fall back to defaults here
//! and are normalized (or rejected) by the mappers in `model::group` and
//! `model::action`. An action record that does not decode is dropped on its
//! own; its siblings in the group still run.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{event, Level};

/// A stored condition with the actions it gates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGroup {
  #[serde(default)]
  pub condition: RawCondition,
  #[serde(default, deserialize_with = "lenient_actions")]
  pub actions: Vec<RawAction>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub enabled: bool,
}

impl RawGroup {
  pub fn new(condition: RawCondition, actions: Vec<RawAction>) -> Self {
    Self {
      condition,
      actions,
      enabled: true,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCondition {
  #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
  pub phase: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub source: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub path: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub operator: Option<String>,
  /// String or number.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub value: Option<Value>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub always_pass: bool,
}

impl RawCondition {
  pub fn always_pass() -> Self {
    Self {
      always_pass: true,
      ..Default::default()
    }
  }

  pub fn check(source: &str, operator: &str, value: impl Into<Value>) -> Self {
    Self {
      source: Some(source.to_string()),
      operator: Some(operator.to_string()),
      value: Some(value.into()),
      ..Default::default()
    }
  }

  pub fn with_path(mut self, path: impl Into<String>) -> Self {
    self.path = Some(path.into());
    self
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAction {
  #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
  pub phase: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub enabled: bool,
  /// Fractional priorities are floored; anything non-numeric reads as unset.
  #[serde(default, deserialize_with = "lenient_priority", skip_serializing_if = "Option::is_none")]
  pub priority: Option<i32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub config: Option<Value>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub sync: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub fail_on_error: Option<bool>,
}

impl RawAction {
  /// An enabled action with every other field left to its default.
  pub fn new(name: &str, config: Value) -> Self {
    Self {
      name: Some(name.to_string()),
      enabled: true,
      config: Some(config),
      ..Default::default()
    }
  }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_priority<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = Option::<Value>::deserialize(deserializer)?;
  Ok(
    raw
      .as_ref()
      .and_then(Value::as_f64)
      .filter(|p| p.is_finite())
      .map(|p| p.floor().clamp(i32::MIN as f64, i32::MAX as f64) as i32),
  )
}

fn lenient_actions<'de, D>(deserializer: D) -> Result<Vec<RawAction>, D::Error>
where
  D: Deserializer<'de>,
{
  let items = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
  let actions = items
    .into_iter()
    .enumerate()
    .filter_map(|(idx, item)| match serde_json::from_value::<RawAction>(item) {
      Ok(action) => Some(action),
      Err(e) => {
        event!(Level::WARN, action_index = idx, error = %e, "Dropping malformed action record.");
        None
      }
    })
    .collect();
  Ok(actions)
}
