// tests/condition_tests.rs

mod common;

use common::*;
use request_actions::condition::extract::PhaseData;
use request_actions::{evaluate, Condition, Operator, RawCondition, Response, TransportRequest};
use serde_json::{json, Value};

fn eval(value: Value, operator: &str, comparand: Value) -> bool {
  evaluate(Some(&value), operator, &comparand)
}

#[test]
fn equal_coerces_numeric_strings() {
  setup_tracing();
  assert!(eval(json!("10"), "equal", json!(10)));
  assert!(eval(json!(10), "equal", json!("10")));
  assert!(eval(json!("1e1"), "equal", json!("10")));
  assert!(!eval(json!("ten"), "equal", json!(10)));
  assert!(eval(json!("abc"), "equal", json!("abc")));
  assert!(!eval(json!("abc"), "equal", json!("abd")));
}

#[test]
fn not_equal_is_the_negation_of_equal() {
  assert!(!eval(json!("10"), "not-equal", json!(10)));
  assert!(eval(json!("abc"), "not-equal", json!("xyz")));
  assert!(evaluate(None, "not-equal", &json!("anything")));
}

#[test]
fn ordering_operators_need_two_numbers() {
  assert!(eval(json!(200), "less-than", json!(300)));
  assert!(eval(json!("404"), "greater-than-or-equal", json!(400)));
  assert!(eval(json!(5), "less-than-equal", json!("5")));
  assert!(!eval(json!("abc"), "less-than", json!(5)));
  assert!(!eval(json!("abc"), "greater-than", json!(5)));
  assert!(!evaluate(None, "greater-than", &json!(0)));
}

#[test]
fn contains_handles_strings_lists_and_maps() {
  assert!(eval(json!("application/json; charset=utf-8"), "contains", json!("json")));
  assert!(eval(json!([1, 2, 3]), "contains", json!("2")));
  assert!(eval(json!(["a", "b"]), "contains", json!("b")));
  assert!(!eval(json!(["a", "b"]), "contains", json!("c")));
  assert!(eval(json!({"token": "x"}), "contains", json!("token")));
  assert!(!eval(json!(""), "contains", json!("")));
  assert!(!evaluate(None, "contains", &json!("x")));
}

#[test]
fn regex_matches_multiline_and_fails_closed() {
  assert!(eval(json!("first\nsecond"), "regex", json!("^second$")));
  assert!(eval(json!("/api/v2/users"), "regex", json!(r"/v\d+/")));
  assert!(!eval(json!("anything"), "regex", json!("([unclosed")));
}

#[test]
fn unknown_operator_is_false() {
  assert!(!eval(json!(1), "between", json!(1)));
  assert_eq!(Operator::parse("greater-than-equal"), Some(Operator::GreaterThanOrEqual));
  assert_eq!(Operator::parse("nope"), None);
}

#[test]
fn incomplete_conditions_are_never_satisfied() {
  let request = sample_request();
  let data = PhaseData::Request { request: &request };

  let missing_value = RawCondition {
    source: Some("url".into()),
    operator: Some("contains".into()),
    ..Default::default()
  };
  let unknown_source = RawCondition::check("cookies", "equal", "x");
  let unknown_operator = RawCondition::check("url", "like", "api");

  for raw in [missing_value, unknown_source, unknown_operator, RawCondition::default()] {
    let condition = Condition::from_record(&raw);
    assert!(matches!(condition, Condition::Unevaluable(_)), "{:?}", raw);
    assert!(!condition.satisfied(&data));
  }
  assert!(Condition::from_record(&RawCondition::always_pass()).satisfied(&data));
}

#[test]
fn request_phase_conditions_read_the_live_request() {
  let request = sample_request();
  let data = PhaseData::Request { request: &request };

  let by_url = Condition::from_record(&RawCondition::check("url", "contains", "api.example.com"));
  let by_header = Condition::from_record(&RawCondition::check("headers", "equal", "abc123").with_path("x-trace"));
  let by_body = Condition::from_record(&RawCondition::check("body", "greater-than", 5).with_path("user.id"));
  let by_literal = Condition::from_record(&RawCondition::check("literal-value", "equal", "on").with_path("on"));
  let by_status = Condition::from_record(&RawCondition::check("status-code", "equal", 200));

  assert!(by_url.satisfied(&data));
  assert!(by_header.satisfied(&data));
  assert!(by_body.satisfied(&data));
  assert!(by_literal.satisfied(&data));
  assert!(!by_status.satisfied(&data), "status-code has no value before the response");
}

#[test]
fn response_phase_conditions_read_status_and_response_data() {
  let request = sample_request();
  let executed = TransportRequest {
    url: "https://api.example.com/users?id=7&expand=1".into(),
    method: "POST".into(),
    ..Default::default()
  };
  let mut response = Response::new(401);
  response.headers = "WWW-Authenticate: Bearer".into();
  response.payload = Some(json!({"error": {"code": "expired"}}).to_string());
  let data = PhaseData::Response {
    request: &request,
    executed: &executed,
    response: &response,
  };

  let unauthorized = Condition::from_record(&RawCondition::check("status-code", "equal", "401"));
  let client_error = Condition::from_record(&RawCondition::check("statuscode", "greater-than-or-equal", 400));
  let expired = Condition::from_record(&RawCondition::check("body", "equal", "expired").with_path("error.code"));
  let executed_url = Condition::from_record(&RawCondition::check("url", "contains", "expand=1"));
  let mut request_only = RawCondition::check("url", "contains", "api");
  request_only.phase = Some("request".into());

  assert!(unauthorized.satisfied(&data));
  assert!(client_error.satisfied(&data));
  assert!(expired.satisfied(&data));
  assert!(executed_url.satisfied(&data));
  assert!(!Condition::from_record(&request_only).satisfied(&data));
}
