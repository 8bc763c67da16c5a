// request_actions/src/actions/data_source.rs

//! Reading action values (`request.body`, `response.headers`, ...) out of the
//! phase data, including iterator selection over array bodies.

use crate::condition::extract::PhaseData;
use crate::model::action::{DataSource, DataSourceConfig, IteratorConfig};
use crate::model::http::{header_value, lookup_path, payload_path};
use anyhow::bail;
use serde_json::Value;
use url::Url;

pub fn read_data_source(config: &DataSourceConfig, data: &PhaseData<'_>) -> anyhow::Result<Option<Value>> {
  let path = config.path.as_deref().map(str::trim).filter(|p| !p.is_empty());
  let (request, executed, response) = match data {
    PhaseData::Request { request } => {
      if config.source.phase() != data.phase() {
        bail!("data source {:?} is not available in the request phase", config.source);
      }
      (*request, None, None)
    }
    PhaseData::Response {
      request,
      executed,
      response,
    } => (*request, Some(*executed), Some(*response)),
  };

  Ok(match config.source {
    DataSource::RequestUrl => url_part(&request.url, path),
    DataSource::RequestMethod => Some(Value::String(request.method.clone())),
    DataSource::RequestHeaders => headers(&request.headers, path),
    DataSource::RequestBody => body(request.payload.as_deref(), config, path),
    DataSource::ResponseUrl => executed.and_then(|e| url_part(&e.url, path)),
    DataSource::ResponseMethod => executed.map(|e| Value::String(e.method.clone())),
    DataSource::ResponseHeaders => response.and_then(|r| headers(&r.headers, path)),
    DataSource::ResponseBody => response.and_then(|r| body(r.payload.as_deref(), config, path)),
    DataSource::ResponseStatus => response.map(|r| Value::from(r.status)),
  })
}

/// Strings as-is, everything else as JSON.
pub fn value_text(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

fn url_part(raw: &str, path: Option<&str>) -> Option<Value> {
  let Some(path) = path else {
    return Some(Value::String(raw.to_string()));
  };
  let url = Url::parse(raw).ok()?;
  let part = match path {
    "host" => url.host_str().map(String::from),
    "protocol" => Some(url.scheme().to_string()),
    "path" => Some(url.path().to_string()),
    "query" => url.query().map(String::from),
    "hash" => url.fragment().map(String::from),
    other => {
      let param = other.strip_prefix("query.")?;
      url.query_pairs().find(|(key, _)| key == param).map(|(_, value)| value.into_owned())
    }
  };
  part.map(Value::String)
}

fn headers(raw: &str, path: Option<&str>) -> Option<Value> {
  match path {
    Some(name) => header_value(raw, name).map(Value::String),
    None => Some(Value::String(raw.to_string())),
  }
}

fn body(payload: Option<&str>, config: &DataSourceConfig, path: Option<&str>) -> Option<Value> {
  if config.iterator_enabled {
    if let Some(iterator) = &config.iterator {
      return iterate(payload, iterator, path);
    }
  }
  match path {
    Some(path) => payload_path(payload, path),
    None => payload.map(|p| Value::String(p.to_string())),
  }
}

/// Finds the first array item whose value at the iterator's item path satisfies
/// its operator, then reads `path` relative to that item.
///
/// `items.*.id` splits into the array path `items` and the item path `id`; a
/// path without `*` is an item path over a root-level array.
fn iterate(payload: Option<&str>, iterator: &IteratorConfig, path: Option<&str>) -> Option<Value> {
  let body: Value = serde_json::from_str(payload?).ok()?;
  let (array_path, item_path) = match iterator.path.split_once('*') {
    Some((array, item)) => (array.trim_end_matches('.'), item.trim_start_matches('.')),
    None => ("", iterator.path.as_str()),
  };
  let items = lookup_path(&body, array_path)?.as_array()?;
  let comparand = Value::String(iterator.condition.clone());
  let item = items
    .iter()
    .find(|item| iterator.operator.check(lookup_path(item, item_path), &comparand))?;
  match path {
    Some(path) => lookup_path(item, path).cloned(),
    None => Some(item.clone()),
  }
}
