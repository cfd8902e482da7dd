//! Build phase timing.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Times one pipeline phase against the tree it writes into.
///
/// The duration is logged together with the phase name and target tree, so
/// staged and in-place runs can be told apart in the log.
pub struct Timer {
    phase: &'static str,
    target: PathBuf,
    start: Instant,
}

impl Timer {
    pub fn start(phase: &'static str, target: &Path) -> Self {
        tracing::debug!(phase, target = %target.display(), "starting");
        Self {
            phase,
            target: target.to_path_buf(),
            start: Instant::now(),
        }
    }

    pub fn finish(self) -> Duration {
        let elapsed = self.start.elapsed();
        tracing::info!(
            phase = self.phase,
            target = %self.target.display(),
            "finished in {:.1}s",
            elapsed.as_secs_f64()
        );
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_reports_elapsed() {
        let timer = Timer::start("driver", Path::new("/build/lib"));
        std::thread::sleep(Duration::from_millis(5));
        assert!(timer.finish() >= Duration::from_millis(5));
    }
}
