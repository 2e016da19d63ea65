pub mod health;
pub mod inbox;
pub mod jobs;
pub mod preferences;
