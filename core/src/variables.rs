// request_actions/src/variables.rs

//! Variable environment and placeholder resolution.
//!
//! The engine reads the current environment once per pipeline run, asks a
//! `ResolverFactory` for a resolver bound to it, and resolves each action's
//! configuration with that resolver before dispatch.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
  pub name: String,
  #[serde(default)]
  pub value: String,
  #[serde(default = "enabled_by_default")]
  pub enabled: bool,
}

fn enabled_by_default() -> bool {
  true
}

impl Variable {
  pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      value: value.into(),
      enabled: true,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub variables: Vec<Variable>,
}

/// Read-only access to the current variable environment.
#[async_trait]
pub trait VariableSource: Send + Sync {
  async fn current_environment(&self) -> anyhow::Result<Environment>;
}

/// A fixed environment, handy for tests and embedded use.
#[derive(Debug, Clone, Default)]
pub struct StaticVariableSource {
  environment: Environment,
}

impl StaticVariableSource {
  pub fn new(variables: Vec<Variable>) -> Self {
    Self {
      environment: Environment { name: None, variables },
    }
  }
}

#[async_trait]
impl VariableSource for StaticVariableSource {
  async fn current_environment(&self) -> anyhow::Result<Environment> {
    Ok(self.environment.clone())
  }
}

/// Best-effort, in-place placeholder substitution.
///
/// Implementations must treat non-object nodes and unknown placeholders as
/// no-ops; nothing here can fail a pipeline.
#[async_trait]
pub trait VariableResolver: Send + Sync {
  async fn resolve_in_place(&self, node: &mut Value);
}

/// Builds a resolver bound to one environment snapshot.
pub trait ResolverFactory: Send + Sync {
  fn create(&self, variables: Vec<Variable>) -> Arc<dyn VariableResolver>;
}

static PLACEHOLDER: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"\$\{\s*([^}\s]+)\s*\}").expect("placeholder pattern is valid"));

/// Substitutes `${name}` with enabled variables.
///
/// Only the string fields of the node it is given are resolved (or the node
/// itself when it is a string); nested objects are left for the caller.
#[derive(Debug, Clone, Default)]
pub struct TemplateResolver {
  values: HashMap<String, String>,
}

impl TemplateResolver {
  pub fn new(variables: Vec<Variable>) -> Self {
    let values = variables
      .into_iter()
      .filter(|v| v.enabled)
      .map(|v| (v.name, v.value))
      .collect();
    Self { values }
  }

  pub fn resolve_str(&self, input: &str) -> String {
    PLACEHOLDER
      .replace_all(input, |caps: &Captures| match self.values.get(&caps[1]) {
        Some(value) => value.clone(),
        None => caps[0].to_string(),
      })
      .into_owned()
  }

  fn resolve_leaf(&self, leaf: &mut Value) {
    if let Value::String(s) = leaf {
      if s.contains("${") {
        *s = self.resolve_str(s);
      }
    }
  }
}

#[async_trait]
impl VariableResolver for TemplateResolver {
  async fn resolve_in_place(&self, node: &mut Value) {
    match node {
      Value::Object(map) => map.values_mut().for_each(|leaf| self.resolve_leaf(leaf)),
      leaf => self.resolve_leaf(leaf),
    }
  }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateResolverFactory;

impl ResolverFactory for TemplateResolverFactory {
  fn create(&self, variables: Vec<Variable>) -> Arc<dyn VariableResolver> {
    Arc::new(TemplateResolver::new(variables))
  }
}
