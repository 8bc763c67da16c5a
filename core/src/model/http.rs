// request_actions/src/model/http.rs

//! Request and response shapes the transport pipeline hands to the engine.

use crate::model::phase::Phase;
use crate::model::record::RawGroup;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{event, Level};

/// The request as produced by the request editor.
///
/// `request` is mandatory for both pipeline entry points; its absence is
/// reported as `ActionsError::InvalidArgument`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorRequest {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  #[serde(default)]
  pub request: Option<HttpRequest>,
}

impl EditorRequest {
  pub fn new(request: HttpRequest) -> Self {
    Self {
      id: None,
      request: Some(request),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpRequest {
  pub url: String,
  #[serde(default = "default_method")]
  pub method: String,
  /// Raw header block, one `Name: value` per line.
  #[serde(default)]
  pub headers: String,
  #[serde(default)]
  pub payload: Option<String>,
  #[serde(default)]
  pub actions: Option<RequestActions>,
}

fn default_method() -> String {
  String::from("GET")
}

impl HttpRequest {
  pub fn new(url: impl Into<String>, method: impl Into<String>) -> Self {
    Self {
      url: url.into(),
      method: method.into(),
      ..Default::default()
    }
  }
}

/// Stored action groups for both phases, kept as plain structured data until a
/// pipeline run decodes them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestActions {
  #[serde(default)]
  pub request: Option<Value>,
  #[serde(default)]
  pub response: Option<Value>,
}

impl RequestActions {
  pub fn new(request: Vec<RawGroup>, response: Vec<RawGroup>) -> Self {
    Self {
      request: serde_json::to_value(request).ok(),
      response: serde_json::to_value(response).ok(),
    }
  }

  /// Decodes the groups stored for `phase`.
  ///
  /// Returns `None` when the phase holds nothing or is not a list. Group records
  /// that fail to decode are dropped individually.
  pub fn groups(&self, phase: Phase) -> Option<Vec<RawGroup>> {
    let stored = match phase {
      Phase::Request => self.request.as_ref(),
      Phase::Response => self.response.as_ref(),
    }?;
    let Value::Array(items) = stored else {
      event!(Level::DEBUG, %phase, "Stored actions for phase are not a list, ignoring.");
      return None;
    };
    let groups = items
      .iter()
      .enumerate()
      .filter_map(|(idx, item)| match serde_json::from_value::<RawGroup>(item.clone()) {
        Ok(group) => Some(group),
        Err(e) => {
          event!(Level::WARN, %phase, group_index = idx, error = %e, "Dropping malformed action group record.");
          None
        }
      })
      .collect();
    Some(groups)
  }
}

/// The request as it was actually sent by the transport.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportRequest {
  pub url: String,
  #[serde(default = "default_method")]
  pub method: String,
  #[serde(default)]
  pub headers: String,
  #[serde(default)]
  pub payload: Option<String>,
}

/// A response, or an error response when `error` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
  #[serde(default)]
  pub status: u16,
  #[serde(default)]
  pub status_text: Option<String>,
  #[serde(default)]
  pub headers: String,
  #[serde(default)]
  pub payload: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl Response {
  pub fn new(status: u16) -> Self {
    Self {
      status,
      ..Default::default()
    }
  }
}

/// Case-insensitive lookup of `name` in a raw header block. First match wins.
pub fn header_value(headers: &str, name: &str) -> Option<String> {
  let name = name.trim();
  if name.is_empty() {
    return None;
  }
  headers.lines().find_map(|line| {
    let (key, value) = line.split_once(':')?;
    if key.trim().eq_ignore_ascii_case(name) {
      Some(value.trim().to_string())
    } else {
      None
    }
  })
}

/// Walks a dotted path (`data.items.0.id`) into a JSON value. Numeric segments
/// index arrays.
pub fn lookup_path<'v>(value: &'v Value, path: &str) -> Option<&'v Value> {
  let mut current = value;
  for segment in path.split('.') {
    if segment.is_empty() {
      continue;
    }
    current = match current {
      Value::Object(map) => map.get(segment)?,
      Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
      _ => return None,
    };
  }
  Some(current)
}

/// Parses `payload` as JSON and reads `path` from it.
pub fn payload_path(payload: Option<&str>, path: &str) -> Option<Value> {
  let body: Value = serde_json::from_str(payload?).ok()?;
  lookup_path(&body, path).cloned()
}
