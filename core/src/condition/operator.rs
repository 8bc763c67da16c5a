// request_actions/src/condition/operator.rs

//! Comparison operators used by conditions and by data-source iterators.
//!
//! Every function here is total: odd value shapes, absent values and bad
//! patterns all evaluate to `false` instead of failing.

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operator {
  Equal,
  NotEqual,
  GreaterThan,
  #[serde(alias = "greater-than-equal")]
  GreaterThanOrEqual,
  LessThan,
  #[serde(alias = "less-than-equal")]
  LessThanOrEqual,
  Contains,
  Regex,
}

impl Operator {
  pub fn parse(raw: &str) -> Option<Self> {
    Some(match raw {
      "equal" => Operator::Equal,
      "not-equal" => Operator::NotEqual,
      "greater-than" => Operator::GreaterThan,
      "greater-than-or-equal" | "greater-than-equal" => Operator::GreaterThanOrEqual,
      "less-than" => Operator::LessThan,
      "less-than-or-equal" | "less-than-equal" => Operator::LessThanOrEqual,
      "contains" => Operator::Contains,
      "regex" => Operator::Regex,
      _ => return None,
    })
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Operator::Equal => "equal",
      Operator::NotEqual => "not-equal",
      Operator::GreaterThan => "greater-than",
      Operator::GreaterThanOrEqual => "greater-than-or-equal",
      Operator::LessThan => "less-than",
      Operator::LessThanOrEqual => "less-than-or-equal",
      Operator::Contains => "contains",
      Operator::Regex => "regex",
    }
  }

  /// Compares `value` (absent when extraction missed) against `comparand`.
  pub fn check(&self, value: Option<&Value>, comparand: &Value) -> bool {
    match self {
      Operator::Equal => is_equal(value, comparand),
      Operator::NotEqual => !is_equal(value, comparand),
      Operator::GreaterThan => compare_numbers(value, comparand, |a, b| a > b),
      Operator::GreaterThanOrEqual => compare_numbers(value, comparand, |a, b| a >= b),
      Operator::LessThan => compare_numbers(value, comparand, |a, b| a < b),
      Operator::LessThanOrEqual => compare_numbers(value, comparand, |a, b| a <= b),
      Operator::Contains => contains(value, comparand),
      Operator::Regex => matches_regex(value, comparand),
    }
  }
}

impl fmt::Display for Operator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Evaluates an operator given by name. Unknown names are `false`.
pub fn evaluate(value: Option<&Value>, operator: &str, comparand: &Value) -> bool {
  Operator::parse(operator).map_or(false, |op| op.check(value, comparand))
}

/// Numeric comparison when the comparand is numeric, string comparison otherwise.
///
/// Both sides are first brought to their string form, so an absent value reads
/// as `"undefined"` and `"10"` equals `10`.
pub fn is_equal(value: Option<&Value>, comparand: &Value) -> bool {
  let value_text = to_text(value);
  let comparand_text = to_text(Some(comparand));
  if is_numeric_comparand(comparand) {
    match (parse_number(&value_text), parse_number(&comparand_text)) {
      (Some(a), Some(b)) => a == b,
      _ => false,
    }
  } else {
    value_text == comparand_text
  }
}

fn is_numeric_comparand(comparand: &Value) -> bool {
  match comparand {
    Value::Number(_) => true,
    Value::String(s) => !s.trim().is_empty() && parse_number(s).is_some(),
    _ => false,
  }
}

fn compare_numbers(value: Option<&Value>, comparand: &Value, cmp: impl Fn(f64, f64) -> bool) -> bool {
  match (to_number(value), to_number(Some(comparand))) {
    (Some(a), Some(b)) => cmp(a, b),
    _ => false,
  }
}

/// Substring for strings, membership for lists, key presence for maps.
pub fn contains(value: Option<&Value>, comparand: &Value) -> bool {
  let Some(value) = value else {
    return false;
  };
  if is_falsy(value) {
    return false;
  }
  match value {
    Value::String(s) => s.contains(to_text(Some(comparand)).as_str()),
    Value::Array(items) => {
      if !comparand.is_number() {
        if let Some(n) = to_number(Some(comparand)) {
          if items.iter().any(|item| item.as_f64() == Some(n)) {
            return true;
          }
        }
      }
      items.iter().any(|item| strict_equal(item, comparand))
    }
    Value::Object(map) => map.contains_key(to_text(Some(comparand)).as_str()),
    _ => false,
  }
}

/// Multiline match of the value's string form. A pattern that does not compile is `false`.
pub fn matches_regex(value: Option<&Value>, comparand: &Value) -> bool {
  let pattern = to_text(Some(comparand));
  match RegexBuilder::new(&pattern).multi_line(true).build() {
    Ok(re) => re.is_match(&to_text(value)),
    Err(_) => false,
  }
}

fn strict_equal(a: &Value, b: &Value) -> bool {
  match (a, b) {
    (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
    (Value::String(x), Value::String(y)) => x == y,
    (Value::Bool(x), Value::Bool(y)) => x == y,
    (Value::Null, Value::Null) => true,
    _ => false,
  }
}

fn is_falsy(value: &Value) -> bool {
  match value {
    Value::Null => true,
    Value::Bool(b) => !b,
    Value::Number(n) => n.as_f64().map_or(true, |f| f == 0.0),
    Value::String(s) => s.is_empty(),
    _ => false,
  }
}

/// String form of a value: absent is `"undefined"`, lists join with `,`,
/// maps read as `"[object Object]"`.
pub fn to_text(value: Option<&Value>) -> String {
  match value {
    None => String::from("undefined"),
    Some(Value::Null) => String::from("null"),
    Some(Value::Bool(b)) => b.to_string(),
    Some(Value::Number(n)) => number_text(n),
    Some(Value::String(s)) => s.clone(),
    Some(Value::Array(items)) => items
      .iter()
      .map(|item| match item {
        Value::Null => String::new(),
        other => to_text(Some(other)),
      })
      .collect::<Vec<_>>()
      .join(","),
    Some(Value::Object(_)) => String::from("[object Object]"),
  }
}

fn number_text(n: &serde_json::Number) -> String {
  if n.is_i64() || n.is_u64() {
    return n.to_string();
  }
  match n.as_f64() {
    Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f),
    Some(f) => f.to_string(),
    None => n.to_string(),
  }
}

/// Numeric form of a value. Absent values and maps have none.
pub fn to_number(value: Option<&Value>) -> Option<f64> {
  match value? {
    Value::Null => Some(0.0),
    Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
    Value::Number(n) => n.as_f64(),
    Value::String(s) => parse_number(s),
    array @ Value::Array(_) => parse_number(&to_text(Some(array))),
    Value::Object(_) => None,
  }
}

/// Parses numeric text the way loosely typed sources write it: surrounding
/// whitespace is ignored, blank is zero, `Infinity` and `0x`/`0o`/`0b`
/// prefixes are accepted.
pub fn parse_number(raw: &str) -> Option<f64> {
  let text = raw.trim();
  if text.is_empty() {
    return Some(0.0);
  }
  match text {
    "Infinity" | "+Infinity" => return Some(f64::INFINITY),
    "-Infinity" => return Some(f64::NEG_INFINITY),
    _ => {}
  }
  let radix = match text.get(..2) {
    Some("0x") | Some("0X") => Some(16),
    Some("0o") | Some("0O") => Some(8),
    Some("0b") | Some("0B") => Some(2),
    _ => None,
  };
  if let Some(radix) = radix {
    return u64::from_str_radix(&text[2..], radix).ok().map(|n| n as f64);
  }
  if !text.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')) {
    return None;
  }
  text.parse::<f64>().ok().filter(|n| !n.is_nan())
}
