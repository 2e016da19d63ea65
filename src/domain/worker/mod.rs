pub mod error;
pub mod worker;
pub mod workspace;

pub use error::JobError;
pub use worker::{ConversionWorker, Iteration, WorkerConfig, WorkerHandle};
pub use workspace::prepare_temp_dir;
