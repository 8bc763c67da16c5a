use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the exchange a group or action applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
  Request,
  Response,
}

impl Phase {
  pub fn as_str(&self) -> &'static str {
    match self {
      Phase::Request => "request",
      Phase::Response => "response",
    }
  }

  pub fn parse(raw: &str) -> Option<Self> {
    match raw {
      "request" => Some(Phase::Request),
      "response" => Some(Phase::Response),
      _ => None,
    }
  }
}

impl fmt::Display for Phase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}
