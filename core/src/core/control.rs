// request_actions/src/core/control.rs

//! Outcomes reported by a single action dispatch.

/// Result of handing one action to the `ActionRunner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
  /// An executor was found and completed without error.
  Executed,
  /// No executor matches the action's name. Inert, not an error.
  NoExecutor,
}

impl RunOutcome {
  pub fn is_executed(&self) -> bool {
    matches!(self, RunOutcome::Executed)
  }
}
