use crate::error::AppError;
use crate::domain::job::QueueError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("text is empty")]
    Empty,
    #[error("text is too long: {length} characters (maximum {max})")]
    TooLong { length: usize, max: usize },
    #[error(transparent)]
    Queue(#[from] QueueError),
}

impl From<SubmissionError> for AppError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Empty => AppError::BadRequest("Text cannot be empty".to_string()),
            SubmissionError::TooLong { .. } => AppError::PayloadTooLarge(err.to_string()),
            SubmissionError::Queue(QueueError::CapacityExceeded { capacity }) => AppError::ServiceUnavailable(format!(
                "The queue is full ({} jobs). Please try again later.",
                capacity
            )),
            SubmissionError::Queue(QueueError::Closed) => {
                AppError::ServiceUnavailable("The service is shutting down".to_string())
            }
        }
    }
}
