// request_actions/src/actions/mod.rs

//! Running a single action: its context, data-source reading, and the built-in
//! executors for `set-cookie`, `set-variable` and `delete-cookie`.

pub mod context;
pub mod data_source;
pub mod executors;
pub mod runner;

pub use context::ActionContext;
pub use executors::{DeleteCookieExecutor, SetCookieExecutor, SetVariableExecutor};
pub use runner::ActionRunner;
