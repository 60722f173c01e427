use std::time::{Duration, Instant};

pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(3);

/// Counts bytes and yields the average rate once per interval.
#[derive(Debug, Clone)]
pub struct Throughput {
    interval: Duration,
    since: Instant,
    bytes: u64,
}

impl Throughput {
    pub fn new(interval: Duration) -> Self {
        Self::starting_at(interval, Instant::now())
    }

    pub fn starting_at(interval: Duration, since: Instant) -> Self {
        Self {
            interval,
            since,
            bytes: 0,
        }
    }

    /// Count `bytes` received at `now`. Returns bytes per second since the last report, if one
    /// is due.
    pub fn record(&mut self, bytes: usize, now: Instant) -> Option<f64> {
        self.bytes += bytes as u64;
        let elapsed = now.saturating_duration_since(self.since);
        if elapsed > self.interval {
            let rate = self.bytes as f64 / elapsed.as_secs_f64();
            self.since = now;
            self.bytes = 0;
            Some(rate)
        } else {
            None
        }
    }
}

/// MB here is 2^20 bytes.
pub fn mib_per_sec(bytes_per_sec: f64) -> f64 {
    bytes_per_sec / (1024.0 * 1024.0)
}
