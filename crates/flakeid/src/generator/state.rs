use core::cmp::Ordering;

use crate::{Error, Poll, Result, SnowflakeId, TWITTER_EPOCH_MILLIS};

/// Mutable half of a generator: the last timestamp an ID was minted for and
/// the sequence number used within it.
///
/// `last_timestamp` is in milliseconds since the Unix epoch. It starts at 0,
/// so the first reading of any real clock rolls over to sequence 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct State {
    pub(crate) last_timestamp: u64,
    pub(crate) sequence: u64,
}

impl State {
    pub(crate) const fn new(last_timestamp: u64, sequence: u64) -> Self {
        Self {
            last_timestamp,
            sequence,
        }
    }

    /// Advances the state for a clock reading of `now` and returns the
    /// resulting ID.
    ///
    /// The state is only modified when an ID is produced.
    pub(crate) fn poll(&mut self, now: u64, datacenter_id: u64, worker_id: u64) -> Result<Poll> {
        match now.cmp(&self.last_timestamp) {
            Ordering::Equal => {
                if self.sequence < SnowflakeId::MAX_SEQUENCE {
                    self.sequence += 1;
                    Ok(Poll::Ready {
                        id: self.encode(datacenter_id, worker_id),
                    })
                } else {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(timestamp = now, "sequence exhausted");
                    Ok(Poll::Pending { yield_for: 1 })
                }
            }
            Ordering::Greater => {
                self.last_timestamp = now;
                self.sequence = 0;
                Ok(Poll::Ready {
                    id: self.encode(datacenter_id, worker_id),
                })
            }
            Ordering::Less => Err(Self::cold_clock_behind(now, self.last_timestamp)),
        }
    }

    const fn encode(&self, datacenter_id: u64, worker_id: u64) -> SnowflakeId {
        SnowflakeId::pack(
            self.last_timestamp.wrapping_sub(TWITTER_EPOCH_MILLIS),
            datacenter_id,
            worker_id,
            self.sequence,
        )
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(now: u64, last: u64) -> Error {
        #[cfg(feature = "tracing")]
        tracing::warn!(now, last, "clock moved backwards");
        Error::ClockRegression { now, last }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = TWITTER_EPOCH_MILLIS + 1_000;

    fn ready(poll: Poll) -> SnowflakeId {
        match poll {
            Poll::Ready { id } => id,
            Poll::Pending { yield_for } => panic!("unexpected pending (yield for: {yield_for})"),
        }
    }

    #[test]
    fn new_millisecond_resets_sequence() {
        let mut state = State::new(NOW - 1, 17);
        let id = ready(state.poll(NOW, 3, 4).unwrap());
        assert_eq!(state, State::new(NOW, 0));
        assert_eq!(id.timestamp(), 1_000);
        assert_eq!(id.datacenter_id(), 3);
        assert_eq!(id.worker_id(), 4);
        assert_eq!(id.sequence(), 0);
    }

    #[test]
    fn same_millisecond_increments_sequence() {
        let mut state = State::new(NOW, 0);
        let id = ready(state.poll(NOW, 0, 0).unwrap());
        assert_eq!(id.sequence(), 1);
        assert_eq!(state.sequence, 1);
    }

    #[test]
    fn exhausted_sequence_is_pending_and_untouched() {
        let mut state = State::new(NOW, SnowflakeId::MAX_SEQUENCE);
        assert_eq!(state.poll(NOW, 0, 0), Ok(Poll::Pending { yield_for: 1 }));
        assert_eq!(state, State::new(NOW, SnowflakeId::MAX_SEQUENCE));
    }

    #[test]
    fn regression_is_an_error_and_untouched() {
        let mut state = State::new(NOW, 5);
        assert_eq!(
            state.poll(NOW - 1, 0, 0),
            Err(Error::ClockRegression {
                now: NOW - 1,
                last: NOW
            })
        );
        assert_eq!(state, State::new(NOW, 5));
    }

    #[test]
    fn clock_before_epoch_wraps() {
        let mut state = State::default();
        let id = ready(state.poll(TWITTER_EPOCH_MILLIS - 1, 0, 0).unwrap());
        // (-1 << 22) truncated to 64 bits
        assert_eq!(id.to_raw(), u64::MAX << 22);
    }
}
