use core::fmt;

/// A result type defaulting to the crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Which configured identity field a value was meant for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Component {
    /// The 5-bit datacenter ID field.
    Datacenter,
    /// The 5-bit worker ID field.
    Worker,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Datacenter => f.write_str("datacenter ID"),
            Self::Worker => f.write_str("worker ID"),
        }
    }
}

/// All error variants that `flakeid` can emit.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The clock reported a time earlier than the last timestamp the
    /// generator emitted an ID for.
    ///
    /// The generator state is left untouched. Whether to retry later or treat
    /// this as fatal is up to the caller; it usually points at an NTP step or
    /// a paused VM.
    #[error("clock moved backwards: now {now} ms is earlier than last timestamp {last} ms")]
    ClockRegression {
        /// Reading that triggered the failure, in ms since the Unix epoch.
        now: u64,
        /// Last timestamp an ID was generated for, in ms since the Unix epoch.
        last: u64,
    },

    /// A datacenter or worker ID does not fit its field.
    #[error("{component} {value} is out of range (max {max})")]
    OutOfRange {
        /// The offending field.
        component: Component,
        /// The value that was supplied.
        value: u64,
        /// The largest value the field can hold.
        max: u64,
    },

    /// The generator's lock was poisoned by a thread that panicked while
    /// holding it.
    ///
    /// Only produced by the std mutex; with the `parking-lot` feature mutexes
    /// do not poison.
    #[error("generator lock was poisoned")]
    LockPoisoned,

    /// A string could not be parsed as a decimal `u64` ID.
    #[error("invalid snowflake ID: {0}")]
    ParseId(#[from] core::num::ParseIntError),
}

#[cfg_attr(docsrs, doc(cfg(all(feature = "std", not(feature = "parking-lot")))))]
#[cfg(all(feature = "std", not(feature = "parking-lot")))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg_attr(docsrs, doc(cfg(all(feature = "std", not(feature = "parking-lot")))))]
#[cfg(all(feature = "std", not(feature = "parking-lot")))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
