// request_actions/src/model/group.rs

//! Runnable groups: a condition paired with the actions it gates, built fresh
//! for every pipeline run.

use crate::condition::extract::PhaseData;
use crate::condition::Condition;
use crate::model::action::{map_actions, sort_actions, Action};
use crate::model::http::{HttpRequest, Response, TransportRequest};
use crate::model::phase::Phase;
use crate::model::record::{RawAction, RawGroup};

#[derive(Debug, Clone, PartialEq)]
pub struct RunnableGroup {
  pub phase: Phase,
  pub condition: Condition,
  pub actions: Vec<RawAction>,
  pub enabled: bool,
}

impl RunnableGroup {
  pub fn from_record(phase: Phase, raw: RawGroup) -> Self {
    Self {
      phase,
      condition: Condition::from_record(&raw.condition),
      actions: raw.actions,
      enabled: raw.enabled,
    }
  }

  /// Whether the group's condition holds for the given phase data.
  ///
  /// Response groups need both `executed` and `response`; without them the
  /// group is not satisfied.
  pub fn satisfied(
    &self,
    request: &HttpRequest,
    executed: Option<&TransportRequest>,
    response: Option<&Response>,
  ) -> bool {
    let data = match self.phase {
      Phase::Request => PhaseData::Request { request },
      Phase::Response => match (executed, response) {
        (Some(executed), Some(response)) => PhaseData::Response {
          request,
          executed,
          response,
        },
        _ => return false,
      },
    };
    self.condition.satisfied(&data)
  }

  /// Enabled actions for this group's phase, in execution order.
  pub fn runnable_actions(&self) -> Vec<Action> {
    let mut actions: Vec<Action> = map_actions(&self.actions)
      .into_iter()
      .filter(|action| action.enabled && action.applies_to(self.phase))
      .collect();
    // `sort_by` is stable: equal priorities keep their stored order.
    actions.sort_by(sort_actions);
    actions
  }
}

/// Keeps enabled groups that have at least one action, in stored order.
pub fn map_groups(phase: Phase, raw: Vec<RawGroup>) -> Vec<RunnableGroup> {
  raw
    .into_iter()
    .filter(|group| group.enabled && !group.actions.is_empty())
    .map(|group| RunnableGroup::from_record(phase, group))
    .collect()
}
