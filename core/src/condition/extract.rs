// request_actions/src/condition/extract.rs

//! Reads the left-hand side of a condition out of the live request/response.

use crate::model::http::{header_value, payload_path, HttpRequest, Response, TransportRequest};
use crate::model::phase::Phase;
use serde_json::Value;

/// Where a condition reads its comparison value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionSource {
  Url,
  StatusCode,
  Headers,
  Body,
  LiteralValue,
}

impl ConditionSource {
  pub fn parse(raw: &str) -> Option<Self> {
    Some(match raw {
      "url" => ConditionSource::Url,
      "status-code" | "statuscode" => ConditionSource::StatusCode,
      "headers" => ConditionSource::Headers,
      "body" => ConditionSource::Body,
      "literal-value" | "value" => ConditionSource::LiteralValue,
      _ => return None,
    })
  }

  /// `status-code` only exists once there is a response.
  pub fn valid_in(&self, phase: Phase) -> bool {
    !(matches!(self, ConditionSource::StatusCode) && phase == Phase::Request)
  }
}

/// The data visible to conditions in the current phase.
#[derive(Debug, Clone, Copy)]
pub enum PhaseData<'a> {
  Request {
    request: &'a HttpRequest,
  },
  Response {
    request: &'a HttpRequest,
    executed: &'a TransportRequest,
    response: &'a Response,
  },
}

impl<'a> PhaseData<'a> {
  pub fn phase(&self) -> Phase {
    match self {
      PhaseData::Request { .. } => Phase::Request,
      PhaseData::Response { .. } => Phase::Response,
    }
  }

  fn url(&self) -> &'a str {
    match self {
      PhaseData::Request { request } => &request.url,
      PhaseData::Response { executed, .. } => &executed.url,
    }
  }

  fn headers(&self) -> &'a str {
    match self {
      PhaseData::Request { request } => &request.headers,
      PhaseData::Response { response, .. } => &response.headers,
    }
  }

  fn payload(&self) -> Option<&'a str> {
    match self {
      PhaseData::Request { request } => request.payload.as_deref(),
      PhaseData::Response { response, .. } => response.payload.as_deref(),
    }
  }
}

/// Produces the value handed to the operator. `None` means the source or path
/// did not resolve; operators treat that as a miss.
pub fn extract_value(source: ConditionSource, path: Option<&str>, data: &PhaseData<'_>) -> Option<Value> {
  let path = path.map(str::trim).filter(|p| !p.is_empty());
  match source {
    ConditionSource::Url => Some(Value::String(data.url().to_string())),
    ConditionSource::StatusCode => match data {
      PhaseData::Response { response, .. } => Some(Value::from(response.status)),
      PhaseData::Request { .. } => None,
    },
    ConditionSource::Headers => match path {
      Some(name) => header_value(data.headers(), name).map(Value::String),
      None => Some(Value::String(data.headers().to_string())),
    },
    ConditionSource::Body => match path {
      Some(path) => payload_path(data.payload(), path),
      None => data.payload().map(|p| Value::String(p.to_string())),
    },
    ConditionSource::LiteralValue => path.map(|literal| Value::String(literal.to_string())),
  }
}
