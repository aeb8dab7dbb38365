// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    #[error("queue is full (capacity {capacity})")]
    QueueFull { capacity: usize },
}

pub type Result<T> = std::result::Result<T, QueueError>;
