use core::time::Duration;

/// Twitter epoch: Thursday, November 4, 2010 1:42:54.657 UTC
///
/// Subtracted from the clock reading before the timestamp is packed into an
/// ID.
pub const TWITTER_EPOCH: Duration = Duration::from_millis(TWITTER_EPOCH_MILLIS);

/// [`TWITTER_EPOCH`] as milliseconds since the Unix epoch.
pub const TWITTER_EPOCH_MILLIS: u64 = 1_288_834_974_657;

/// A trait for time sources that return a wall-clock timestamp.
///
/// This abstraction allows you to plug in the system clock, a monotonic
/// timer, or a mocked time source in tests.
///
/// The unit is **milliseconds since the Unix epoch**. Generators subtract
/// [`TWITTER_EPOCH`] themselves when packing an ID.
///
/// # Example
///
/// ```
/// use flakeid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

#[cfg(feature = "std")]
impl<T: TimeSource + ?Sized> TimeSource for std::sync::Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

/// A time source that reads the system wall clock on every call.
///
/// The wall clock can be stepped backwards (NTP, manual changes, VM
/// migration). Generators report that as [`Error::ClockRegression`]; use
/// [`MonotonicClock`] to rule it out within a process.
///
/// A system clock set before 1970 reads as `0`.
///
/// [`Error::ClockRegression`]: crate::Error::ClockRegression
/// [`MonotonicClock`]: crate::MonotonicClock
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
#[cfg(feature = "std")]
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    }
}
