use crate::cache::EstimateCache;
use hdtq_common::DFResult;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use thread_priority::{set_current_thread_priority, ThreadPriority};
use tracing::{debug, warn};

/// A background thread that fills an [EstimateCache].
///
/// The thread runs at the lowest scheduling priority and checks a stop flag between entries.
/// Dropping the task stops it and blocks until the thread has exited.
#[derive(Debug)]
pub struct PrefetchTask {
    cache: &'static str,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl PrefetchTask {
    pub fn spawn(cache: Arc<dyn EstimateCache>) -> DFResult<Self> {
        let name = cache.name();
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        let handle = std::thread::Builder::new()
            .name(format!("hdtq-prefetch-{name}"))
            .spawn(move || {
                if let Err(error) = lower_current_thread_priority() {
                    debug!(cache = name, ?error, "Could not lower the prefetch thread priority");
                }
                debug!(cache = name, "Starting estimate prefetch");
                match cache.prefetch(&thread_stop) {
                    Ok(visited) => debug!(cache = name, visited, "Finished estimate prefetch"),
                    Err(error) => warn!(cache = name, %error, "Estimate prefetch failed"),
                }
            })?;

        Ok(Self {
            cache: name,
            stop,
            handle: Some(handle),
        })
    }

    /// Returns whether the thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Signals the thread to stop and waits until it has exited.
    ///
    /// There is no timeout. A slow index probe delays the return by its duration.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!(cache = self.cache, "Prefetch thread panicked");
            }
        }
    }
}

impl Drop for PrefetchTask {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Moves the calling thread to the lowest scheduling priority.
fn lower_current_thread_priority() -> Result<(), thread_priority::Error> {
    set_current_thread_priority(ThreadPriority::Min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use datafusion::common::stats::Precision;
    use std::sync::atomic::AtomicUsize;

    #[derive(Debug, Default)]
    struct CountingCache {
        prefetched: AtomicUsize,
    }

    impl EstimateCache for CountingCache {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn get(&self, _id: u64) -> DFResult<Precision<u64>> {
            Ok(Precision::Absent)
        }

        fn normalized(&self, _id: u64) -> f64 {
            1.0
        }

        fn prefetch(&self, _stop: &AtomicBool) -> DFResult<usize> {
            Ok(self.prefetched.fetch_add(1, Ordering::Relaxed) + 1)
        }
    }

    #[test]
    fn priority_can_be_lowered_on_a_worker_thread() {
        let lowered = std::thread::spawn(|| lower_current_thread_priority().is_ok())
            .join()
            .unwrap();
        assert!(lowered);
    }

    #[test]
    fn low_priority_prefetch_runs_to_completion() -> DFResult<()> {
        let cache = Arc::new(CountingCache::default());
        let mut task = PrefetchTask::spawn(Arc::<CountingCache>::clone(&cache))?;

        task.stop();
        assert!(task.is_finished());
        assert_eq!(cache.prefetched.load(Ordering::Relaxed), 1);
        Ok(())
    }
}
