pub mod job;
pub mod submission;
pub mod tts;
pub mod worker;
