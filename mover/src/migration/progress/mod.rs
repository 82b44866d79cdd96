//! Two-phase progress reporting.
//!
//! Once the candidate count `n` is known the total is fixed to `2 * n`:
//! downloads fill the first `n` slots, uploads the next `n`. This counts
//! files, not bytes.

use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// `(completed, total)` callback supplied by the caller
pub type ProgressCallback<'a> = &'a (dyn Fn(usize, usize) + Send + Sync);

pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
    phase_total: usize,
    reported: AtomicUsize,
}

impl<'a> ProgressReporter<'a> {
    pub fn new(callback: Option<ProgressCallback<'a>>, candidate_count: usize) -> Self {
        Self {
            callback,
            phase_total: candidate_count,
            reported: AtomicUsize::new(0),
        }
    }

    pub fn total(&self) -> usize {
        self.phase_total * 2
    }

    /// `completed` downloads out of the candidate count
    pub fn download_progress(&self, completed: usize) {
        self.report(completed.min(self.phase_total));
    }

    /// `completed` uploads, offset by the download phase
    pub fn upload_progress(&self, completed: usize) {
        self.report(self.phase_total + completed.min(self.phase_total));
    }

    fn report(&self, completed: usize) {
        if self.phase_total == 0 {
            return;
        }
        let previous = self.reported.fetch_max(completed, Ordering::SeqCst);
        if completed < previous {
            return;
        }
        debug!("[Progress] {}/{}", completed, self.total());
        if let Some(callback) = self.callback {
            callback(completed, self.total());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_two_phase_offsets() {
        let seen = Mutex::new(Vec::new());
        let callback = |completed: usize, total: usize| {
            seen.lock().unwrap().push((completed, total))
        };
        let reporter = ProgressReporter::new(Some(&callback), 3);

        reporter.download_progress(1);
        reporter.download_progress(3);
        reporter.upload_progress(2);
        reporter.upload_progress(3);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![(1, 6), (3, 6), (5, 6), (6, 6)]
        );
    }

    #[test]
    fn test_never_goes_backwards() {
        let seen = Mutex::new(Vec::new());
        let callback = |completed: usize, total: usize| {
            seen.lock().unwrap().push((completed, total))
        };
        let reporter = ProgressReporter::new(Some(&callback), 2);

        reporter.upload_progress(1);
        reporter.download_progress(2);

        assert_eq!(*seen.lock().unwrap(), vec![(3, 4)]);
    }

    #[test]
    fn test_no_candidates_reports_nothing() {
        let seen = Mutex::new(Vec::new());
        let callback = |completed: usize, total: usize| {
            seen.lock().unwrap().push((completed, total))
        };
        let reporter = ProgressReporter::new(Some(&callback), 0);

        reporter.download_progress(0);
        reporter.upload_progress(0);

        assert!(seen.lock().unwrap().is_empty());
    }
}
