pub mod error;
pub mod model;
pub mod queue;

pub use error::QueueError;
pub use model::{Job, JobId, JobStatus, JobSummary, OwnerId, SourceKind};
pub use queue::{JobQueue, DEFAULT_QUEUE_CAPACITY};
