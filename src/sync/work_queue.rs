//! Fixed-size worker pool with a completion barrier.
//!
//! Tasks are closures pushed onto a shared channel and executed by `n` worker
//! threads. Every submission increments a pending-work counter *before* the
//! task is enqueued, and every executed task decrements it exactly once,
//! whether it returned or panicked. [`WorkQueue::finish`] blocks until that
//! counter reaches zero, which includes tasks submitted by other tasks while
//! the caller is already waiting.
//!
//! Tasks that need to fan out further work hold a [`TaskSubmitter`], a cheap
//! cloneable handle onto the same queue.
//!
//! Submission and shutdown share one gate. A task is either accepted and
//! enqueued ahead of every stop message, or rejected; an accepted task always
//! runs.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! use scour::sync::work_queue::WorkQueue;
//!
//! let mut queue = WorkQueue::new(4).unwrap();
//! let done = Arc::new(AtomicUsize::new(0));
//!
//! for _ in 0..10 {
//!     let done = Arc::clone(&done);
//!     queue.submit(move || {
//!         done.fetch_add(1, Ordering::SeqCst);
//!     }).unwrap();
//! }
//!
//! queue.finish();
//! assert_eq!(done.load(Ordering::SeqCst), 10);
//! queue.shutdown();
//! ```

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, unbounded};
use parking_lot::{Condvar, Mutex};

use crate::error::{Result, ScourError};

type Job = Box<dyn FnOnce() + Send + 'static>;

enum Message {
    Run(Job),
    Stop,
}

/// Count of submitted-but-unfinished tasks plus the signal used to wait on it.
#[derive(Debug, Default)]
struct Pending {
    count: AtomicUsize,
    lock: Mutex<()>,
    drained: Condvar,
}

impl Pending {
    fn increment(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Taking the mutex orders this wakeup after any waiter's check.
            let _guard = self.lock.lock();
            self.drained.notify_all();
        }
    }

    fn wait_for_zero(&self) {
        let mut guard = self.lock.lock();
        while self.count.load(Ordering::SeqCst) > 0 {
            self.drained.wait(&mut guard);
        }
    }

    fn get(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

/// Cloneable handle for submitting work to a [`WorkQueue`].
///
/// Handles stay valid after the queue shuts down; submissions are then
/// rejected with [`ScourError::QueueShutdown`] instead of blocking.
#[derive(Clone)]
pub struct TaskSubmitter {
    sender: Sender<Message>,
    pending: Arc<Pending>,
    /// Set once shutdown has begun. Held while enqueueing.
    closed: Arc<Mutex<bool>>,
}

impl TaskSubmitter {
    /// Submit a task for execution by one of the workers.
    pub fn submit<F>(&self, task: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let closed = self.closed.lock();
        if *closed {
            return Err(ScourError::queue_shutdown("task rejected"));
        }

        self.pending.increment();
        if self.sender.send(Message::Run(Box::new(task))).is_err() {
            self.pending.decrement();
            return Err(ScourError::queue_shutdown("workers are gone"));
        }
        Ok(())
    }

    /// Number of submitted tasks that have not finished yet.
    pub fn pending(&self) -> usize {
        self.pending.get()
    }
}

/// A fixed pool of worker threads executing submitted tasks.
pub struct WorkQueue {
    submitter: TaskSubmitter,
    workers: Vec<JoinHandle<()>>,
}

impl WorkQueue {
    /// Start a queue with `threads` workers.
    pub fn new(threads: usize) -> Result<Self> {
        if threads == 0 {
            return Err(ScourError::invalid_argument(
                "work queue needs at least one worker",
            ));
        }

        let (sender, receiver) = unbounded();
        let pending = Arc::new(Pending::default());

        let mut workers = Vec::with_capacity(threads);
        for i in 0..threads {
            let receiver = receiver.clone();
            let pending = Arc::clone(&pending);
            let handle = thread::Builder::new()
                .name(format!("work-queue-{i}"))
                .spawn(move || run_worker(receiver, pending))?;
            workers.push(handle);
        }

        log::debug!("work queue started with {threads} workers");

        Ok(Self {
            submitter: TaskSubmitter {
                sender,
                pending,
                closed: Arc::new(Mutex::new(false)),
            },
            workers,
        })
    }

    /// Submit a task for execution by one of the workers.
    pub fn submit<F>(&self, task: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.submitter.submit(task)
    }

    /// A handle that running tasks can use to submit more work.
    pub fn submitter(&self) -> TaskSubmitter {
        self.submitter.clone()
    }

    /// Block until every submitted task, including tasks submitted by running
    /// tasks, has completed.
    pub fn finish(&self) {
        self.submitter.pending.wait_for_zero();
    }

    /// Number of submitted tasks that have not finished yet.
    pub fn pending(&self) -> usize {
        self.submitter.pending()
    }

    /// Number of worker threads still attached to this queue.
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Whether [`WorkQueue::shutdown`] has been called.
    pub fn is_shutdown(&self) -> bool {
        *self.submitter.closed.lock()
    }

    /// Stop accepting work, let the workers drain what is already queued,
    /// and join them. Calling it again is a no-op.
    pub fn shutdown(&mut self) {
        {
            let mut closed = self.submitter.closed.lock();
            if *closed {
                return;
            }
            *closed = true;

            for _ in 0..self.workers.len() {
                // Workers only exit on Stop, so the channel is still connected here.
                let _ = self.submitter.sender.send(Message::Stop);
            }
        }

        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                log::error!("work queue worker exited abnormally");
            }
        }

        log::debug!("work queue shut down");
    }
}

impl Drop for WorkQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker(receiver: Receiver<Message>, pending: Arc<Pending>) {
    while let Ok(message) = receiver.recv() {
        match message {
            Message::Run(job) => {
                if let Err(panic) = panic::catch_unwind(AssertUnwindSafe(job)) {
                    let reason = panic
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| panic.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_string());
                    log::error!("task panicked: {reason}");
                }
                pending.decrement();
            }
            Message::Stop => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_zero_workers_rejected() {
        assert!(matches!(
            WorkQueue::new(0),
            Err(ScourError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_finish_waits_for_all_tasks() {
        let mut queue = WorkQueue::new(3).unwrap();
        let done = Arc::new(AtomicUsize::new(0));

        for _ in 0..50 {
            let done = Arc::clone(&done);
            queue
                .submit(move || {
                    thread::sleep(Duration::from_millis(1));
                    done.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
        }

        queue.finish();
        assert_eq!(done.load(Ordering::SeqCst), 50);
        assert_eq!(queue.pending(), 0);
        queue.shutdown();
    }

    #[test]
    fn test_finish_waits_for_recursive_submissions() {
        fn spawn_tree(submitter: TaskSubmitter, depth: usize, done: Arc<AtomicUsize>) {
            done.fetch_add(1, Ordering::SeqCst);
            if depth == 0 {
                return;
            }
            for _ in 0..2 {
                let child = submitter.clone();
                let done = Arc::clone(&done);
                submitter
                    .submit(move || {
                        thread::sleep(Duration::from_millis(1));
                        spawn_tree(child, depth - 1, done);
                    })
                    .unwrap();
            }
        }

        let mut queue = WorkQueue::new(4).unwrap();
        let done = Arc::new(AtomicUsize::new(0));

        let submitter = queue.submitter();
        let root_done = Arc::clone(&done);
        queue
            .submit(move || spawn_tree(submitter, 5, root_done))
            .unwrap();

        queue.finish();
        // A full binary tree of depth 5 has 2^6 - 1 nodes.
        assert_eq!(done.load(Ordering::SeqCst), 63);
        queue.shutdown();
    }

    #[test]
    fn test_panicking_task_does_not_stall_finish() {
        let mut queue = WorkQueue::new(2).unwrap();
        let done = Arc::new(AtomicUsize::new(0));

        queue.submit(|| panic!("boom")).unwrap();
        for _ in 0..5 {
            let done = Arc::clone(&done);
            queue
                .submit(move || {
                    done.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
        }

        queue.finish();
        assert_eq!(done.load(Ordering::SeqCst), 5);
        assert_eq!(queue.pending(), 0);
        queue.shutdown();
    }

    #[test]
    fn test_submit_after_shutdown_is_rejected() {
        let mut queue = WorkQueue::new(2).unwrap();
        let submitter = queue.submitter();
        queue.shutdown();

        assert!(queue.is_shutdown());
        assert_eq!(queue.size(), 0);
        assert!(matches!(
            submitter.submit(|| {}),
            Err(ScourError::QueueShutdown(_))
        ));

        // A second shutdown is harmless.
        queue.shutdown();
    }

    #[test]
    fn test_submissions_racing_shutdown_all_run() {
        for _ in 0..20 {
            let mut queue = WorkQueue::new(2).unwrap();
            let executed = Arc::new(AtomicUsize::new(0));

            let producers: Vec<_> = (0..4)
                .map(|_| {
                    let submitter = queue.submitter();
                    let executed = Arc::clone(&executed);
                    thread::spawn(move || {
                        let mut accepted = 0;
                        for _ in 0..200 {
                            let executed = Arc::clone(&executed);
                            let result = submitter.submit(move || {
                                executed.fetch_add(1, Ordering::SeqCst);
                            });
                            if result.is_ok() {
                                accepted += 1;
                            }
                        }
                        accepted
                    })
                })
                .collect();

            thread::sleep(Duration::from_micros(50));
            queue.shutdown();

            let accepted: usize = producers.into_iter().map(|p| p.join().unwrap()).sum();
            assert_eq!(executed.load(Ordering::SeqCst), accepted);
            assert_eq!(queue.pending(), 0);
        }
    }

    #[test]
    fn test_shutdown_drains_queued_tasks() {
        let mut queue = WorkQueue::new(1).unwrap();
        let done = Arc::new(AtomicUsize::new(0));

        for _ in 0..10 {
            let done = Arc::clone(&done);
            queue
                .submit(move || {
                    done.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
        }

        queue.shutdown();
        assert_eq!(done.load(Ordering::SeqCst), 10);
    }
}
