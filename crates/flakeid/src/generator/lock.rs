use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use super::{Mutex, state::State};
use crate::{Poll, Result, SnowflakeGenerator, SnowflakeId, TimeSource, validate_identity};

/// A lock-based Snowflake ID generator suitable for multi-threaded
/// environments.
///
/// This generator wraps its state in an [`Arc<Mutex<_>>`]. The clock is read
/// and the state advanced while the lock is held, so concurrent callers are
/// serialized and never observe each other's readings out of order. Clones
/// share the same state (and the same identity), so a clone is the same
/// logical generator, not a new one.
///
/// The lock is a std mutex by default, or a `parking_lot` mutex with the
/// `parking-lot` feature.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Clones share one sequence
///
/// ## Recommended When
/// - Several threads need IDs from one `(datacenter_id, worker_id)` pair
///
/// ## See Also
/// - [`BasicSnowflakeGenerator`]
///
/// [`BasicSnowflakeGenerator`]: crate::BasicSnowflakeGenerator
#[derive(Debug)]
pub struct LockSnowflakeGenerator<T>
where
    T: TimeSource,
{
    pub(crate) state: Arc<Mutex<State>>,
    datacenter_id: u64,
    worker_id: u64,
    time: T,
}

impl<T> Clone for LockSnowflakeGenerator<T>
where
    T: TimeSource + Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            datacenter_id: self.datacenter_id,
            worker_id: self.worker_id,
            time: self.time.clone(),
        }
    }
}

impl<T> LockSnowflakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a new [`LockSnowflakeGenerator`] for the given datacenter and
    /// worker.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if either ID exceeds 31.
    ///
    /// # Example
    /// ```
    /// use flakeid::{LockSnowflakeGenerator, MonotonicClock};
    /// use std::thread;
    ///
    /// let generator = LockSnowflakeGenerator::new(3, 9, MonotonicClock::new())?;
    ///
    /// let handles: Vec<_> = (0..4)
    ///     .map(|_| {
    ///         let generator = generator.clone();
    ///         thread::spawn(move || generator.next_id())
    ///     })
    ///     .collect();
    ///
    /// for handle in handles {
    ///     let id = handle.join().unwrap()?;
    ///     assert_eq!(id.datacenter_id(), 3);
    ///     assert_eq!(id.worker_id(), 9);
    /// }
    /// # Ok::<(), flakeid::Error>(())
    /// ```
    ///
    /// [`Error::OutOfRange`]: crate::Error::OutOfRange
    pub fn new(datacenter_id: u64, worker_id: u64, time: T) -> Result<Self> {
        validate_identity(datacenter_id, worker_id)?;
        Ok(Self::new_unchecked(datacenter_id, worker_id, time))
    }

    /// Creates a new generator without range-checking the IDs.
    ///
    /// Values above 31 are not masked: they overlap the neighbouring fields
    /// of every generated ID. Prefer [`Self::new`].
    pub fn new_unchecked(datacenter_id: u64, worker_id: u64, time: T) -> Self {
        Self::from_components(0, datacenter_id, worker_id, 0, time)
    }

    /// Creates a new ID generator from explicit state.
    ///
    /// See [`BasicSnowflakeGenerator::from_components`]. Nothing is
    /// validated.
    ///
    /// [`BasicSnowflakeGenerator::from_components`]: crate::BasicSnowflakeGenerator::from_components
    pub fn from_components(
        last_timestamp: u64,
        datacenter_id: u64,
        worker_id: u64,
        sequence: u64,
        time: T,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(State::new(last_timestamp, sequence))),
            datacenter_id,
            worker_id,
            time,
        }
    }

    /// Returns the configured datacenter ID.
    pub fn datacenter_id(&self) -> u64 {
        self.datacenter_id
    }

    /// Returns the configured worker ID.
    pub fn worker_id(&self) -> u64 {
        self.worker_id
    }

    /// Generates a new ID, yielding the thread while the current millisecond
    /// is exhausted.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRegression`] if the clock moved backwards.
    /// - [`Error::LockPoisoned`] if the lock is poisoned.
    ///
    /// [`Error::ClockRegression`]: crate::Error::ClockRegression
    /// [`Error::LockPoisoned`]: crate::Error::LockPoisoned
    pub fn next_id(&self) -> Result<SnowflakeId> {
        self.try_next_id(|_| std::thread::yield_now())
    }

    /// Generates a new ID, calling `f` with the suggested back-off in
    /// milliseconds whenever the current millisecond is exhausted.
    ///
    /// The lock is released while `f` runs.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRegression`] if the clock moved backwards.
    /// - [`Error::LockPoisoned`] if the lock is poisoned.
    ///
    /// [`Error::ClockRegression`]: crate::Error::ClockRegression
    /// [`Error::LockPoisoned`]: crate::Error::LockPoisoned
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self, f)))]
    pub fn try_next_id(&self, mut f: impl FnMut(u64)) -> Result<SnowflakeId> {
        loop {
            match self.try_poll_id()? {
                Poll::Ready { id } => break Ok(id),
                Poll::Pending { yield_for } => f(yield_for),
            }
        }
    }

    /// Attempts to generate the next available ID with fallible error
    /// handling.
    ///
    /// # Returns
    /// - `Ok(Poll::Ready { id })`: A new ID is available
    /// - `Ok(Poll::Pending { yield_for })`: The time to wait (in milliseconds)
    ///   before trying again
    ///
    /// # Errors
    /// - [`Error::ClockRegression`] if the clock reads earlier than the last
    ///   timestamp. The state is left untouched.
    /// - [`Error::LockPoisoned`] if the underlying std mutex is poisoned.
    ///
    /// # Example
    /// ```
    /// use flakeid::{LockSnowflakeGenerator, Poll, SystemClock};
    ///
    /// let generator = LockSnowflakeGenerator::new(0, 0, SystemClock)?;
    ///
    /// let id = loop {
    ///     match generator.try_poll_id()? {
    ///         Poll::Ready { id } => break id,
    ///         Poll::Pending { yield_for } => {
    ///             std::thread::sleep(core::time::Duration::from_millis(yield_for));
    ///         }
    ///     }
    /// };
    /// assert!(id.is_valid());
    /// # Ok::<(), flakeid::Error>(())
    /// ```
    ///
    /// [`Error::ClockRegression`]: crate::Error::ClockRegression
    /// [`Error::LockPoisoned`]: crate::Error::LockPoisoned
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll_id(&self) -> Result<Poll> {
        let mut state = {
            #[cfg(feature = "parking-lot")]
            {
                self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.state.lock()?
            }
        };

        // Read under the lock: a reading taken before it could be older than
        // a timestamp another thread has since stored.
        let now = self.time.current_millis();
        state.poll(now, self.datacenter_id, self.worker_id)
    }
}

impl<T> SnowflakeGenerator<T> for LockSnowflakeGenerator<T>
where
    T: TimeSource,
{
    fn new(datacenter_id: u64, worker_id: u64, time: T) -> Result<Self> {
        Self::new(datacenter_id, worker_id, time)
    }

    fn new_unchecked(datacenter_id: u64, worker_id: u64, time: T) -> Self {
        Self::new_unchecked(datacenter_id, worker_id, time)
    }

    fn datacenter_id(&self) -> u64 {
        self.datacenter_id()
    }

    fn worker_id(&self) -> u64 {
        self.worker_id()
    }

    fn try_poll_id(&self) -> Result<Poll> {
        self.try_poll_id()
    }

    fn try_next_id(&self, f: impl FnMut(u64)) -> Result<SnowflakeId> {
        self.try_next_id(f)
    }

    fn next_id(&self) -> Result<SnowflakeId> {
        self.next_id()
    }
}
