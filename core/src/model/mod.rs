//! Data shapes: stored records, HTTP models, normalized actions and groups.

pub mod action;
pub mod group;
pub mod http;
pub mod phase;
pub mod record;

pub use action::{Action, ActionKind, ActionName};
pub use group::{map_groups, RunnableGroup};
pub use http::{EditorRequest, HttpRequest, RequestActions, Response, TransportRequest};
pub use phase::Phase;
pub use record::{RawAction, RawCondition, RawGroup};
