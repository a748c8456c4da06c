use std::time::SystemTime;

/// 2024-01-01T00:00:00.000Z, the default epoch for new generators.
pub const DEFAULT_EPOCH: u64 = 1_704_067_200_000;

/// A source for the current wall-clock time.
///
/// The [`SystemClock`] is used unless another source is handed to
/// [`SnipId::with_time_source`](crate::SnipId::with_time_source),
/// which is mostly useful to pin the time in tests.
///
/// # Example
///
/// ```
/// use snipid::TimeSource;
///
/// struct FixedTime;
///
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1_704_067_260_000
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1_704_067_260_000);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> u64;
}

/// Reads the system clock.
///
/// A system clock set before 1970 reads as zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .ok()
            .and_then(|since_epoch| u64::try_from(since_epoch.as_millis()).ok())
            .unwrap_or(0)
    }
}

impl<F: Fn() -> u64> TimeSource for F {
    fn current_millis(&self) -> u64 {
        self()
    }
}
