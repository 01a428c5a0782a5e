//! Reader/writer lock with write-owner tracking.
//!
//! Any number of readers may hold the lock at once as long as no writer is
//! active; a writer holds it exclusively. The lock remembers which thread
//! acquired the write side and refuses a release from any other thread with
//! [`ScourError::ConcurrentModification`].
//!
//! Two layers are provided:
//!
//! - [`RawReadWriteLock`] guards no data and exposes explicit acquire/release
//!   pairs through [`RawReadWriteLock::read_lock`] and
//!   [`RawReadWriteLock::write_lock`].
//! - [`ReadWriteLock<T>`] owns a value and hands out RAII guards, so the value
//!   can only be reached while the matching side of the lock is held.
//!
//! There is no fairness between waiting readers and writers: whoever observes
//! the lock free first takes it, so a steady stream of readers can starve a
//! writer.
//!
//! # Examples
//!
//! ```
//! use scour::sync::lock::ReadWriteLock;
//!
//! let lock = ReadWriteLock::new(vec![1, 2, 3]);
//! {
//!     let values = lock.read();
//!     assert_eq!(values.len(), 3);
//! }
//! lock.write().push(4);
//! assert_eq!(lock.read().len(), 4);
//! ```

use std::cell::UnsafeCell;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::thread::{self, ThreadId};

use parking_lot::{Condvar, Mutex};

use crate::error::{Result, ScourError};

#[derive(Debug, Default)]
struct LockState {
    readers: usize,
    writers: usize,
    owner: Option<ThreadId>,
}

/// A reader/writer lock that protects no data of its own.
///
/// All state transitions happen under one internal mutex, and waiters block
/// on a condition variable that is signalled with `notify_all` on every
/// release that may unblock someone.
#[derive(Debug, Default)]
pub struct RawReadWriteLock {
    state: Mutex<LockState>,
    changed: Condvar,
}

impl RawReadWriteLock {
    /// Create a new unlocked lock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the read side of this lock.
    pub fn read_lock(&self) -> ReadLock<'_> {
        ReadLock { raw: self }
    }

    /// Get the write side of this lock.
    pub fn write_lock(&self) -> WriteLock<'_> {
        WriteLock { raw: self }
    }

    /// Number of readers currently holding the lock.
    pub fn readers(&self) -> usize {
        self.state.lock().readers
    }

    /// Whether a writer currently holds the lock.
    pub fn is_write_locked(&self) -> bool {
        self.state.lock().writers > 0
    }

    /// Whether the calling thread holds the write side.
    pub fn is_held_by_current_thread(&self) -> bool {
        let state = self.state.lock();
        state.writers > 0 && state.owner == Some(thread::current().id())
    }

    fn acquire_read(&self) {
        let mut state = self.state.lock();
        while state.writers > 0 {
            self.changed.wait(&mut state);
        }
        state.readers += 1;
    }

    fn release_read(&self) -> Result<()> {
        let mut state = self.state.lock();
        if state.readers == 0 {
            return Err(ScourError::concurrent_modification(
                "read lock released while no reader holds it",
            ));
        }

        state.readers -= 1;
        if state.readers == 0 {
            self.changed.notify_all();
        }
        Ok(())
    }

    fn acquire_write(&self) {
        let mut state = self.state.lock();
        while state.writers > 0 || state.readers > 0 {
            self.changed.wait(&mut state);
        }
        state.writers += 1;
        state.owner = Some(thread::current().id());
    }

    fn release_write(&self) -> Result<()> {
        let current = thread::current().id();
        let mut state = self.state.lock();
        if state.writers == 0 || state.owner != Some(current) {
            return Err(ScourError::concurrent_modification(format!(
                "write lock released by {current:?}, held by {:?}",
                state.owner
            )));
        }

        state.writers -= 1;
        state.owner = None;
        self.changed.notify_all();
        Ok(())
    }
}

/// Acquire/release pair for the shared side of a [`RawReadWriteLock`].
#[derive(Debug, Clone, Copy)]
pub struct ReadLock<'a> {
    raw: &'a RawReadWriteLock,
}

impl ReadLock<'_> {
    /// Block until no writer is active, then register as a reader.
    pub fn lock(&self) {
        self.raw.acquire_read();
    }

    /// Unregister a reader, waking all waiters when the last one leaves.
    pub fn unlock(&self) -> Result<()> {
        self.raw.release_read()
    }
}

/// Acquire/release pair for the exclusive side of a [`RawReadWriteLock`].
#[derive(Debug, Clone, Copy)]
pub struct WriteLock<'a> {
    raw: &'a RawReadWriteLock,
}

impl WriteLock<'_> {
    /// Block until no reader or writer is active, then take ownership.
    pub fn lock(&self) {
        self.raw.acquire_write();
    }

    /// Release the lock. Only the thread that acquired it may do so.
    ///
    /// Returns [`ScourError::ConcurrentModification`] when called from any
    /// other thread, or when the write side is not held at all.
    pub fn unlock(&self) -> Result<()> {
        self.raw.release_write()
    }
}

/// A reader/writer lock that owns the value it protects.
pub struct ReadWriteLock<T: ?Sized> {
    raw: RawReadWriteLock,
    data: UnsafeCell<T>,
}

// SAFETY: access to `data` is mediated by `raw`, which admits either any number
// of shared borrows or one exclusive borrow, exactly like `std::sync::RwLock`.
unsafe impl<T: ?Sized + Send> Send for ReadWriteLock<T> {}
unsafe impl<T: ?Sized + Send + Sync> Sync for ReadWriteLock<T> {}

impl<T> ReadWriteLock<T> {
    /// Create a new lock around `data`.
    pub fn new(data: T) -> Self {
        Self {
            raw: RawReadWriteLock::new(),
            data: UnsafeCell::new(data),
        }
    }

    /// Consume the lock, returning the protected value.
    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

impl<T: ?Sized> ReadWriteLock<T> {
    /// Acquire shared access, blocking while a writer is active.
    pub fn read(&self) -> ReadGuard<'_, T> {
        self.raw.acquire_read();
        ReadGuard {
            lock: self,
            _not_send: PhantomData,
        }
    }

    /// Acquire exclusive access, blocking while any reader or writer is active.
    pub fn write(&self) -> WriteGuard<'_, T> {
        self.raw.acquire_write();
        WriteGuard {
            lock: self,
            _not_send: PhantomData,
        }
    }

    /// Mutable access without locking; the borrow checker proves exclusivity.
    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }

    /// Number of readers currently holding the lock.
    pub fn readers(&self) -> usize {
        self.raw.readers()
    }

    /// Whether a writer currently holds the lock.
    pub fn is_write_locked(&self) -> bool {
        self.raw.is_write_locked()
    }
}

impl<T: Default> Default for ReadWriteLock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: ?Sized> fmt::Debug for ReadWriteLock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadWriteLock")
            .field("readers", &self.raw.readers())
            .field("write_locked", &self.raw.is_write_locked())
            .finish()
    }
}

/// Shared access to the value inside a [`ReadWriteLock`].
///
/// The guard is not `Send`: the read side is released on the thread that took it.
pub struct ReadGuard<'a, T: ?Sized> {
    lock: &'a ReadWriteLock<T>,
    _not_send: PhantomData<*const ()>,
}

impl<T: ?Sized> Deref for ReadGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: the read side is held for the lifetime of the guard.
        unsafe { &*self.lock.data.get() }
    }
}

impl<T: ?Sized> Drop for ReadGuard<'_, T> {
    fn drop(&mut self) {
        if let Err(err) = self.lock.raw.release_read() {
            panic!("{err}");
        }
    }
}

/// Exclusive access to the value inside a [`ReadWriteLock`].
///
/// The guard is not `Send`, so it is always released by the owning thread.
pub struct WriteGuard<'a, T: ?Sized> {
    lock: &'a ReadWriteLock<T>,
    _not_send: PhantomData<*const ()>,
}

impl<T: ?Sized> Deref for WriteGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: the write side is held for the lifetime of the guard.
        unsafe { &*self.lock.data.get() }
    }
}

impl<T: ?Sized> DerefMut for WriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: the write side is held exclusively for the lifetime of the guard.
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T: ?Sized> Drop for WriteGuard<'_, T> {
    fn drop(&mut self) {
        if let Err(err) = self.lock.raw.release_write() {
            panic!("{err}");
        }
    }
}
