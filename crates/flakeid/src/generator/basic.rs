use core::cell::Cell;

#[cfg(feature = "tracing")]
use tracing::instrument;

use super::state::State;
use crate::{Poll, Result, SnowflakeGenerator, SnowflakeId, TimeSource, validate_identity};

/// A non-concurrent Snowflake ID generator for single-owner use.
///
/// The state lives in a [`Cell`], so the generator is `Send` but not `Sync`:
/// it can be moved to another thread, but never shared between threads. Every
/// call to [`Self::next_id`] is therefore serialized by construction.
///
/// ```compile_fail
/// use flakeid::{BasicSnowflakeGenerator, SystemClock};
///
/// fn assert_sync<T: Sync>(_: &T) {}
///
/// let generator = BasicSnowflakeGenerator::new(0, 0, SystemClock).unwrap();
/// assert_sync(&generator);
/// ```
///
/// ## Features
/// - ❌ Not thread-safe
/// - ✅ No locking overhead
///
/// ## Recommended When
/// - Each thread or task owns its own generator (with its own worker ID)
/// - You want the fastest generator
///
/// ## See Also
/// - [`LockSnowflakeGenerator`]
///
/// [`LockSnowflakeGenerator`]: crate::LockSnowflakeGenerator
#[derive(Debug)]
pub struct BasicSnowflakeGenerator<T>
where
    T: TimeSource,
{
    state: Cell<State>,
    datacenter_id: u64,
    worker_id: u64,
    time: T,
}

impl<T> BasicSnowflakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a new [`BasicSnowflakeGenerator`] for the given datacenter and
    /// worker.
    ///
    /// # Parameters
    ///
    /// - `datacenter_id`: `0..=31`, encoded into every generated ID.
    /// - `worker_id`: `0..=31`, encoded into every generated ID.
    /// - `time`: A [`TimeSource`] implementation (e.g., [`SystemClock`]) that
    ///   determines how timestamps are read.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if either ID exceeds 31.
    ///
    /// # Example
    /// ```
    /// use flakeid::{BasicSnowflakeGenerator, SystemClock};
    ///
    /// let generator = BasicSnowflakeGenerator::new(1, 7, SystemClock)?;
    /// let id = generator.next_id()?;
    /// assert_eq!(id.datacenter_id(), 1);
    /// assert_eq!(id.worker_id(), 7);
    /// # Ok::<(), flakeid::Error>(())
    /// ```
    ///
    /// [`SystemClock`]: crate::SystemClock
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
    /// This constructor is primarily useful for advanced use cases such as
    /// restoring a generator's position or controlling its starting point in
    /// tests. Nothing is validated.
    ///
    /// # Parameters
    /// - `last_timestamp`: Last timestamp an ID was generated for, in
    ///   milliseconds since the Unix epoch
    /// - `datacenter_id`: The datacenter identifier
    /// - `worker_id`: The worker identifier
    /// - `sequence`: The last sequence number used at `last_timestamp`
    /// - `time`: A [`TimeSource`] implementation used to fetch the current time
    pub fn from_components(
        last_timestamp: u64,
        datacenter_id: u64,
        worker_id: u64,
        sequence: u64,
        time: T,
    ) -> Self {
        Self {
            state: Cell::new(State::new(last_timestamp, sequence)),
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

    /// Generates a new ID, spinning while the current millisecond is
    /// exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockRegression`] if the clock moved backwards.
    ///
    /// [`Error::ClockRegression`]: crate::Error::ClockRegression
    pub fn next_id(&self) -> Result<SnowflakeId> {
        self.try_next_id(|_| core::hint::spin_loop())
    }

    /// Generates a new ID, calling `f` with the suggested back-off in
    /// milliseconds whenever the current millisecond is exhausted.
    ///
    /// # Example
    /// ```
    /// use flakeid::{BasicSnowflakeGenerator, SystemClock};
    ///
    /// let generator = BasicSnowflakeGenerator::new(0, 0, SystemClock)?;
    ///
    /// // Sleep instead of spinning when the sequence runs out.
    /// let id = generator.try_next_id(|ms| {
    ///     std::thread::sleep(std::time::Duration::from_millis(ms));
    /// })?;
    /// assert_eq!(id.sequence(), 0);
    /// # Ok::<(), flakeid::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockRegression`] if the clock moved backwards.
    ///
    /// [`Error::ClockRegression`]: crate::Error::ClockRegression
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self, f)))]
    pub fn try_next_id(&self, mut f: impl FnMut(u64)) -> Result<SnowflakeId> {
        loop {
            match self.try_poll_id()? {
                Poll::Ready { id } => break Ok(id),
                Poll::Pending { yield_for } => f(yield_for),
            }
        }
    }

    /// Attempts to generate the next available ID.
    ///
    /// # Returns
    /// - `Ok(Poll::Ready { id })`: A new ID is available
    /// - `Ok(Poll::Pending { yield_for })`: The time to wait (in milliseconds)
    ///   before trying again
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockRegression`] if the clock reads earlier than the
    /// last timestamp. The generator state is left untouched.
    ///
    /// [`Error::ClockRegression`]: crate::Error::ClockRegression
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll_id(&self) -> Result<Poll> {
        let now = self.time.current_millis();
        let mut state = self.state.get();
        let poll = state.poll(now, self.datacenter_id, self.worker_id)?;
        self.state.set(state);
        Ok(poll)
    }
}

impl<T> SnowflakeGenerator<T> for BasicSnowflakeGenerator<T>
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
