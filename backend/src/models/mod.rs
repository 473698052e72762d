//! Data models shared across the stores, the core services and the HTTP handlers.

pub mod leave_request;
pub mod request_status;
pub mod selection;
pub mod window;

pub use leave_request::{LeaveRequest, NewLeaveRequest};
pub use request_status::{RequestStatus, StatusVocabulary};
pub use selection::SelectionSet;
pub use window::{DateTimeWindow, WindowInput};
