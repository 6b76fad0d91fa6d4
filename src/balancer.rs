//! Load-aware dispatch over a pool of workers.
//!
//! The pool is a min-heap keyed on each worker's pending-load count, so
//! `dispatch` always picks the least-loaded worker and both `dispatch` and
//! `complete` restore heap order in O(log n).

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{DispatchError, Result};
use crate::heap::{EntryId, IndexedHeap};

pub type WorkerId = u64;

/// Registry record for a pool member: its display label and the heap handle
/// retained for in-place re-ranking.
#[derive(Debug)]
struct WorkerRecord {
    label: String,
    handle: EntryId,
}

/// Read-only view of one worker, for reporting and metrics export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerSnapshot {
    pub id: WorkerId,
    pub label: String,
    pub pending: u64,
}

/// Routes each unit of work to the worker with the fewest pending units.
///
/// A worker is `Idle` at pending 0 and `Busy` otherwise; `dispatch` moves it
/// toward `Busy`, `complete` back toward `Idle`. Workers never leave the pool
/// unless explicitly removed via [`remove_worker`](Balancer::remove_worker).
#[derive(Debug)]
pub struct Balancer {
    /// Heap key is the worker's pending count; payload is its id.
    pool: IndexedHeap<u64, WorkerId>,
    workers: HashMap<WorkerId, WorkerRecord>,
    next_id: WorkerId,
}

impl Balancer {
    /// Creates a pool of `worker_count` idle workers with default labels
    /// (`[00]`, `[01]`, ...).
    pub fn new(worker_count: usize) -> Self {
        Self::with_labels(worker_count, |i| format!("[{i:02}]"))
    }

    /// Creates a pool of `worker_count` idle workers, labelling each by its
    /// zero-based position.
    pub fn with_labels(worker_count: usize, label_fn: impl Fn(usize) -> String) -> Self {
        let mut balancer = Self {
            pool: IndexedHeap::min(),
            workers: HashMap::with_capacity(worker_count),
            next_id: 0,
        };
        for i in 0..worker_count {
            balancer.add_worker(label_fn(i));
        }
        balancer
    }

    /// Adds an idle worker to the pool and returns its id.
    pub fn add_worker(&mut self, label: String) -> WorkerId {
        let id = self.next_id;
        self.next_id += 1;
        let handle = self.pool.insert(0, id);
        self.workers.insert(id, WorkerRecord { label, handle });
        tracing::info!(worker_id = id, "worker registered");
        id
    }

    /// Removes a worker from the pool, regardless of its pending load.
    pub fn remove_worker(&mut self, id: WorkerId) -> Result<()> {
        let record = self
            .workers
            .remove(&id)
            .ok_or(DispatchError::UnknownWorker(id))?;
        self.pool.remove(record.handle)?;
        tracing::info!(worker_id = id, "worker removed");
        Ok(())
    }

    /// Assigns one unit of work to the least-loaded worker and returns its id.
    ///
    /// The worker is re-ranked in place through its retained handle rather
    /// than extracted and re-inserted; it never leaves the pool.
    pub fn dispatch(&mut self) -> Result<WorkerId> {
        let handle = self.pool.peek_id().ok_or(DispatchError::EmptyPool)?;
        let (&pending, &id) = self.pool.get(handle)?;
        self.pool.update_key(handle, pending + 1)?;
        tracing::debug!(worker_id = id, pending = pending + 1, "dispatched");
        Ok(id)
    }

    /// Records one completed unit of work for the given worker.
    ///
    /// Completion of an already-idle worker is an error
    /// ([`DispatchError::WorkerIdle`]), not a silent no-op; callers that
    /// expect duplicate completion events can ignore it by their own policy.
    pub fn complete(&mut self, id: WorkerId) -> Result<()> {
        let record = self
            .workers
            .get(&id)
            .ok_or(DispatchError::UnknownWorker(id))?;
        let (&pending, _) = self.pool.get(record.handle)?;
        if pending == 0 {
            return Err(DispatchError::WorkerIdle(id));
        }
        self.pool.update_key(record.handle, pending - 1)?;
        tracing::debug!(worker_id = id, pending = pending - 1, "completed");
        Ok(())
    }

    /// Number of workers in the pool.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Sum of pending counts across the pool.
    pub fn total_pending(&self) -> u64 {
        self.workers
            .values()
            .map(|record| {
                self.pool
                    .get(record.handle)
                    .map(|(&pending, _)| pending)
                    .unwrap_or(0)
            })
            .sum()
    }

    /// Read-only view of the pool, ordered by worker id.
    pub fn snapshot(&self) -> Vec<WorkerSnapshot> {
        let mut view: Vec<WorkerSnapshot> = self
            .workers
            .iter()
            .filter_map(|(&id, record)| {
                let (&pending, _) = self.pool.get(record.handle).ok()?;
                Some(WorkerSnapshot {
                    id,
                    label: record.label.clone(),
                    pending,
                })
            })
            .collect();
        view.sort_by_key(|w| w.id);
        view
    }
}
