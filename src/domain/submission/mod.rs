pub mod error;
pub mod service;

pub use error::SubmissionError;
pub use service::{
    SubmissionLimits, SubmissionReceipt, SubmissionService, DEFAULT_CHARS_PER_MINUTE,
    DEFAULT_MAX_SUBMISSION_CHARS,
};
