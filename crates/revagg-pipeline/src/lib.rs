pub mod orchestrator;
pub mod outcome;
pub mod service;

pub use orchestrator::aggregate;
pub use outcome::{BatchResult, BatchSummary, ErrorKind, FetchOutcome, ItemError, PersistReport, PersistStatus};
pub use service::{AggregationService, ServiceError};
