use crate::SnowflakeId;

/// Represents the result of attempting to generate a new Snowflake ID.
///
/// This type models the outcome of `SnowflakeGenerator::try_poll_id()`:
///
/// - [`Poll::Ready`] indicates a new ID was successfully generated.
/// - [`Poll::Pending`] means all 4096 sequence numbers of the current
///   millisecond are spent, and no ID can be produced until the clock moves
///   past it.
///
/// This allows non-blocking generation loops and custom backoff strategies.
///
/// # Example
///
/// ```
/// use flakeid::{BasicSnowflakeGenerator, Poll, SnowflakeId, TimeSource};
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1_700_000_000_000
///     }
/// }
///
/// let generator = BasicSnowflakeGenerator::from_components(
///     1_700_000_000_000,
///     0,
///     1,
///     SnowflakeId::MAX_SEQUENCE,
///     FixedTime,
/// );
/// match generator.try_poll_id() {
///     Ok(Poll::Ready { id }) => println!("ID: {id}"),
///     Ok(Poll::Pending { yield_for }) => println!("Back off for {yield_for} ms"),
///     Err(e) => println!("Generator error: {e}"),
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated Snowflake ID.
        id: SnowflakeId,
    },
    /// No ID could be generated because the sequence has been exhausted for the
    /// current millisecond.
    Pending {
        /// Milliseconds to wait before polling again.
        yield_for: u64,
    },
}
