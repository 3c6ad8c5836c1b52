//! # Backoff policy for admission retries.
//!
//! [`BackoffPolicy`] controls how long a client sleeps after a scan in which no
//! eligible station had a free slot. It is parameterized by:
//! - [`BackoffPolicy::first`] the delay after the first failed scan;
//! - [`BackoffPolicy::factor`] the multiplicative growth factor;
//! - [`BackoffPolicy::max`] the maximum delay cap.
//!
//! The delay for failed scan `n` (0-indexed) is `first × factor^n`, clamped to `max`,
//! then jitter is applied. The base delay depends only on `n`, so jitter output
//! never feeds back into later delays.
//!
//! The default is the classic fixed polling interval: 100ms, `factor = 1.0`.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use stationvisor::{BackoffPolicy, JitterPolicy};
//!
//! let fixed = BackoffPolicy::default();
//! assert_eq!(fixed.next(0), Duration::from_millis(100));
//! assert_eq!(fixed.next(7), Duration::from_millis(100));
//!
//! let growing = BackoffPolicy {
//!     factor: 2.0,
//!     max: Duration::from_millis(500),
//!     jitter: JitterPolicy::None,
//!     ..BackoffPolicy::default()
//! };
//! assert_eq!(growing.next(2), Duration::from_millis(400));
//! assert_eq!(growing.next(3), Duration::from_millis(500));
//! ```

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;

/// Delay schedule between failed admission scans.
#[derive(Clone, Copy, Debug)]
pub struct BackoffPolicy {
    /// Delay after the first failed scan.
    pub first: Duration,
    /// Upper bound for any delay.
    pub max: Duration,
    /// Multiplicative growth factor (`>= 1.0` recommended).
    pub factor: f64,
    /// Randomization applied to each delay.
    pub jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    /// Fixed 100ms polling interval (`factor = 1.0`, `max = 2s`, no jitter).
    fn default() -> Self {
        Self {
            first: Duration::from_millis(100),
            max: Duration::from_secs(2),
            jitter: JitterPolicy::None,
            factor: 1.0,
        }
    }
}

impl BackoffPolicy {
    /// Computes the delay after failed scan `attempt` (0-indexed).
    ///
    /// The base delay is `first × factor^attempt`, clamped to [`BackoffPolicy::max`].
    /// Non-finite or negative intermediate values clamp to `max` as well.
    pub fn next(&self, attempt: u32) -> Duration {
        let max_secs = self.max.as_secs_f64();
        let clamped_exp = attempt.min(i32::MAX as u32) as i32;
        let unclamped_secs = self.first.as_secs_f64() * self.factor.powi(clamped_exp);

        let base =
            if !unclamped_secs.is_finite() || unclamped_secs < 0.0 || unclamped_secs > max_secs {
                self.max
            } else {
                Duration::from_secs_f64(unclamped_secs)
            };

        match self.jitter {
            JitterPolicy::Decorrelated => {
                self.jitter
                    .apply_decorrelated(self.first.min(self.max), base, self.max)
            }
            _ => self.jitter.apply(base),
        }
    }
}
