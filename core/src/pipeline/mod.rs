// request_actions/src/pipeline/mod.rs

//! The actions engine: `ActionsRunner`, its builder, and the request/response
//! phase execution.

pub mod definition;
pub mod execution;

pub use definition::{ActionsRunner, ActionsRunnerBuilder};
pub use execution::evaluate_action;
