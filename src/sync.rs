//! Concurrency primitives shared by the builder, the query engine and the crawler.
//!
//! - [`lock`] - reader/writer lock with write-owner tracking
//! - [`work_queue`] - fixed worker pool with a pending-work barrier

pub mod lock;
pub mod work_queue;

pub use lock::{RawReadWriteLock, ReadWriteLock};
pub use work_queue::{TaskSubmitter, WorkQueue};
