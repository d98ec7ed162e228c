use crate::{Poll, Result, SnowflakeId, TimeSource};

/// A minimal interface for generating Snowflake IDs.
///
/// A generator owns a fixed `(datacenter_id, worker_id)` pair and a
/// [`TimeSource`]. Pairs must be unique across every generator in a
/// deployment; the generator cannot check that for you.
pub trait SnowflakeGenerator<T>: Sized
where
    T: TimeSource,
{
    /// Creates a new generator, rejecting IDs that do not fit their fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `datacenter_id` or `worker_id` is
    /// greater than 31.
    ///
    /// [`Error::OutOfRange`]: crate::Error::OutOfRange
    fn new(datacenter_id: u64, worker_id: u64, time: T) -> Result<Self>;

    /// Creates a new generator without checking the IDs.
    ///
    /// Out-of-range values are packed as-is and bleed into the neighbouring
    /// fields of every generated ID.
    fn new_unchecked(datacenter_id: u64, worker_id: u64, time: T) -> Self;

    /// Returns the configured datacenter ID.
    fn datacenter_id(&self) -> u64;

    /// Returns the configured worker ID.
    fn worker_id(&self) -> u64;

    /// Attempts to generate the next available ID.
    ///
    /// The returned [`Poll`] contains either:
    /// - the newly generated ID, or
    /// - a duration to yield/sleep if the current millisecond is exhausted.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRegression`] if the clock is behind the last timestamp
    ///   an ID was generated for.
    /// - [`Error::LockPoisoned`] if the implementation uses a std mutex and it
    ///   is poisoned.
    ///
    /// [`Error::ClockRegression`]: crate::Error::ClockRegression
    /// [`Error::LockPoisoned`]: crate::Error::LockPoisoned
    fn try_poll_id(&self) -> Result<Poll>;

    /// Generates the next ID, calling `f` with the suggested back-off (in
    /// milliseconds) each time the current millisecond is exhausted.
    ///
    /// Blocks until the clock moves past the exhausted millisecond. There is
    /// no timeout.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`SnowflakeGenerator::try_poll_id`].
    fn try_next_id(&self, f: impl FnMut(u64)) -> Result<SnowflakeId>;

    /// Generates the next ID, waiting through sequence exhaustion with the
    /// implementation's default back-off.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`SnowflakeGenerator::try_poll_id`].
    fn next_id(&self) -> Result<SnowflakeId>;
}
