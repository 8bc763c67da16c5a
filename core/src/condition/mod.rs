// request_actions/src/condition/mod.rs

//! Gating conditions for action groups.
//!
//! A stored `RawCondition` is normalized into a `Condition` once per pipeline
//! run. Conditions that cannot be evaluated (missing fields, unknown source or
//! operator, `status-code` in the request phase) fail closed: they are simply
//! not satisfied.

pub mod extract;
pub mod operator;

use crate::model::phase::Phase;
use crate::model::record::RawCondition;
use extract::{extract_value, ConditionSource, PhaseData};
use operator::Operator;
use serde_json::Value;
use tracing::{event, Level};

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
  AlwaysPass,
  Check(ConditionCheck),
  /// Missing or unrecognized fields. Never satisfied.
  Unevaluable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionCheck {
  pub phase: Option<Phase>,
  pub source: ConditionSource,
  pub path: Option<String>,
  pub operator: Operator,
  pub value: Value,
}

impl Condition {
  pub fn from_record(raw: &RawCondition) -> Self {
    if raw.always_pass {
      return Condition::AlwaysPass;
    }
    let Some(source) = raw.source.as_deref() else {
      return Condition::Unevaluable(String::from("missing source"));
    };
    let Some(source) = ConditionSource::parse(source) else {
      return Condition::Unevaluable(format!("unknown source '{}'", source));
    };
    let Some(operator) = raw.operator.as_deref() else {
      return Condition::Unevaluable(String::from("missing operator"));
    };
    let Some(operator) = Operator::parse(operator) else {
      return Condition::Unevaluable(format!("unknown operator '{}'", operator));
    };
    let Some(value) = raw.value.clone() else {
      return Condition::Unevaluable(String::from("missing value"));
    };
    Condition::Check(ConditionCheck {
      phase: raw.phase.as_deref().and_then(Phase::parse),
      source,
      path: raw.path.clone(),
      operator,
      value,
    })
  }

  pub fn satisfied(&self, data: &PhaseData<'_>) -> bool {
    match self {
      Condition::AlwaysPass => true,
      Condition::Unevaluable(reason) => {
        event!(Level::DEBUG, reason = %reason, "Condition cannot be evaluated, treating as not satisfied.");
        false
      }
      Condition::Check(check) => check.satisfied(data),
    }
  }
}

impl ConditionCheck {
  pub fn satisfied(&self, data: &PhaseData<'_>) -> bool {
    let phase = data.phase();
    if self.phase.map_or(false, |own| own != phase) {
      event!(Level::DEBUG, %phase, "Condition belongs to the other phase.");
      return false;
    }
    if !self.source.valid_in(phase) {
      event!(Level::DEBUG, source = ?self.source, %phase, "Condition source is not available in this phase.");
      return false;
    }
    let value = extract_value(self.source, self.path.as_deref(), data);
    self.operator.check(value.as_ref(), &self.value)
  }
}
