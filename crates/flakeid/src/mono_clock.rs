use crate::TimeSource;
use core::time::Duration;
use std::{
    sync::{
        Arc, OnceLock,
        atomic::{AtomicU64, Ordering},
    },
    thread::{self, JoinHandle},
    time::{Instant, SystemTime, UNIX_EPOCH},
};

/// Shared ticker thread that updates every millisecond.
#[derive(Debug)]
struct SharedTickerInner {
    current: AtomicU64,
    _handle: OnceLock<JoinHandle<()>>,
}

/// A monotonic time source reporting milliseconds since the Unix epoch.
///
/// The wall clock is read once at construction. From then on the clock
/// advances by the elapsed time of a monotonic [`Instant`], so NTP steps or
/// manual clock changes after startup never make it go backward, and
/// generators driven by it never report a clock regression.
///
/// A background thread refreshes a shared counter once per millisecond, so
/// reads are a single atomic load. Clones share the thread; it exits once the
/// last clone is dropped.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use flakeid::{MonotonicClock, TimeSource};
///
/// let clock = MonotonicClock::new();
/// let start = clock.current_millis();
///
/// std::thread::sleep(Duration::from_millis(5));
///
/// // Never goes backward; usually reports close to 5 ms later, though timer
/// // alignment may leave it a tick behind.
/// assert!(clock.current_millis() >= start);
/// ```
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    inner: Arc<SharedTickerInner>,
    epoch_offset: u64, // wall clock at construction, in milliseconds
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Constructs a monotonic clock anchored to the current wall-clock time.
    ///
    /// Spawns the ticker thread. A system clock set before 1970 anchors the
    /// clock at `0`.
    pub fn new() -> Self {
        let start = Instant::now();
        let epoch_offset = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        let inner = Arc::new(SharedTickerInner {
            current: AtomicU64::new(0),
            _handle: OnceLock::new(),
        });

        let weak_inner = Arc::downgrade(&inner);
        let handle = thread::spawn(move || {
            let mut tick = 0;

            loop {
                let Some(inner_ref) = weak_inner.upgrade() else {
                    break;
                };

                // Absolute target time of the next tick
                let target = start + Duration::from_millis(tick);

                let now = Instant::now();
                if now < target {
                    thread::sleep(target - now);
                }

                let now_ms = start.elapsed().as_millis() as u64;
                inner_ref.current.store(now_ms, Ordering::Relaxed);

                // Align to the next tick after the actual time
                tick = now_ms + 1;
            }
        });

        // Freshly created cell, cannot already be set.
        let _ = inner._handle.set(handle);

        Self {
            inner,
            epoch_offset,
        }
    }
}

impl TimeSource for MonotonicClock {
    fn current_millis(&self) -> u64 {
        self.epoch_offset + self.inner.current.load(Ordering::Relaxed)
    }
}
