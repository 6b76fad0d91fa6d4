//! A load-aware job dispatcher built on an indexed binary heap.
//!
//! Workers are heap-ordered by pending load, so finding the least-loaded
//! worker and re-ranking a worker after its load changes are both O(log n).
//! The core is single-threaded: callers that want concurrent producers must
//! serialize dispatch and completion events through a single owning thread.

pub mod balancer;
pub mod config;
pub mod error;
pub mod heap;
