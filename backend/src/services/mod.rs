pub mod approval;
pub mod bulk_transition;
pub mod range_matcher;
pub mod report;

pub use approval::{apply_selection, approve_window, ApprovalOutcome, WorkflowError};
pub use bulk_transition::{BulkFailure, BulkResult, BulkTransitionEngine, DispatchMode};
