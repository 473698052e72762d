pub mod id;

pub use id::LeaveRequestId;
