use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    #[error("queue is empty")]
    EmptyQueue,

    #[error("no workers available")]
    EmptyPool,

    #[error("stale handle: entry {0} is no longer in the heap")]
    StaleHandle(usize),

    #[error("worker {0} has no pending work to complete")]
    WorkerIdle(u64),

    #[error("worker not found: {0}")]
    UnknownWorker(u64),
}

pub type Result<T> = std::result::Result<T, DispatchError>;
