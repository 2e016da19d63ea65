#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("queue is full ({capacity} jobs waiting or running)")]
    CapacityExceeded { capacity: usize },
    #[error("queue is closed")]
    Closed,
}
