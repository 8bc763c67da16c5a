// request_actions/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActionsError {
  /// A mandatory pipeline input was not provided. Raised before any work begins.
  #[error("Invalid argument: expected `{argument}` to be set")]
  InvalidArgument { argument: String },

  /// An executor (or the event sink it dispatched to) failed.
  #[error("Action '{action}' failed. Source: {source}")]
  ActionExecution {
    action: String,
    #[source]
    source: AnyhowError,
  },

  /// The resolved configuration of an action does not decode into its typed config.
  #[error("Invalid configuration for action '{action}'. Source: {source}")]
  InvalidActionConfig {
    action: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("Configuration error: {message}")]
  Configuration { message: String },
}

impl ActionsError {
  pub(crate) fn invalid_argument(argument: &str) -> Self {
    ActionsError::InvalidArgument {
      argument: argument.to_string(),
    }
  }

  /// Name of the action whose failure this error reports, if any.
  pub fn action_name(&self) -> Option<&str> {
    match self {
      ActionsError::ActionExecution { action, .. } | ActionsError::InvalidActionConfig { action, .. } => Some(action),
      _ => None,
    }
  }
}

// Collaborators report failures as anyhow errors.
impl From<AnyhowError> for ActionsError {
  fn from(err: AnyhowError) -> Self {
    match err.downcast::<ActionsError>() {
      Ok(actions_err) => actions_err,
      Err(err) => ActionsError::ActionExecution {
        action: String::from("unknown"),
        source: err,
      },
    }
  }
}

pub type ActionsResult<T, E = ActionsError> = std::result::Result<T, E>;
