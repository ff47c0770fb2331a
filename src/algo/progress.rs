//! Progress reporting for long-running passes.
//!
//! Classification of very large meshes can take a noticeable moment in an
//! interactive tool. Passes accept a [`Progress`] so callers can drive a
//! status line or progress bar.
//!
//! # Example
//!
//! ```
//! use uvseam::algo::Progress;
//!
//! let progress = Progress::new(|current, total, message| {
//!     eprintln!("[{}/{}] {}", current, total, message);
//! });
//! progress.report(3, 10, "Classifying edges");
//! ```

/// A progress callback that receives updates during long-running operations.
///
/// The callback receives:
/// - `current`: Steps completed so far
/// - `total`: Total number of steps
/// - `message`: Description of the current operation
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report progress.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }

    /// Report progress as a whole percentage, rounding to nearest.
    ///
    /// Convenience for callers that only render percentages; the callback
    /// receives `(percent, 100, message)`.
    pub fn report_percent(&self, current: usize, total: usize, message: &str) {
        if total == 0 {
            return;
        }
        let percent = if current >= total {
            100
        } else {
            (current * 100 + total / 2) / total
        };
        (self.callback)(percent, 100, message);
    }

    /// Create a no-op progress reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_report_percent_rounds() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress = Progress::new(move |current, total, _| {
            sink.lock().unwrap().push((current, total));
        });

        progress.report_percent(1, 3, "step");
        progress.report_percent(3, 3, "step");
        progress.report_percent(5, 0, "ignored");

        assert_eq!(*seen.lock().unwrap(), vec![(33, 100), (100, 100)]);
    }
}
