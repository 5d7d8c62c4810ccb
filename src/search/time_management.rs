use std::time::{Duration, Instant};

/// Search budget bookkeeping. Time is only enforced between iterations of
/// the deepening loop, so a long final iteration may overshoot by its own
/// cost; callers that need hard cutoffs use the stop flag.
#[derive(Debug, Clone)]
pub struct TimeManager {
    start: Instant,
    time_limit: Option<Duration>,
    depth_limit: Option<i32>,
}

impl TimeManager {
    pub fn new(time_limit_ms: Option<u64>, depth_limit: Option<i32>) -> Self {
        Self {
            start: Instant::now(),
            time_limit: time_limit_ms.map(Duration::from_millis),
            depth_limit,
        }
    }

    pub fn infinite() -> Self {
        Self::new(None, None)
    }

    #[inline(always)]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    #[inline(always)]
    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// True once the allotted time has run out.
    pub fn out_of_time(&self) -> bool {
        match self.time_limit {
            Some(limit) => self.start.elapsed() >= limit,
            None => false,
        }
    }

    /// True while `depth` is still within the depth budget.
    pub fn depth_allowed(&self, depth: i32) -> bool {
        match self.depth_limit {
            Some(limit) => depth <= limit,
            None => true,
        }
    }
}
