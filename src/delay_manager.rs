use std::time::Duration;
use std::thread;
use rand::Rng;
use log::debug;

/// Up to 25% extra on top of the base delay.
const JITTER_DIVISOR: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageDelay {
    base: Duration,
}

impl PageDelay {
    pub fn new(base: Duration) -> Self {
        PageDelay { base }
    }

    pub fn none() -> Self {
        PageDelay { base: Duration::ZERO }
    }

    pub fn next_wait(&self) -> Duration {
        if self.base.is_zero() {
            return Duration::ZERO;
        }
        let max_jitter = self.base / JITTER_DIVISOR;
        let mut rng = rand::thread_rng();
        let jitter = rng.gen_range(Duration::ZERO..=max_jitter);
        self.base + jitter
    }

    pub fn wait(&self) {
        let wait = self.next_wait();
        if wait.is_zero() {
            return;
        }
        debug!("Waiting for {:.2} seconds (Page Delay)...", wait.as_secs_f64());
        thread::sleep(wait);
    }
}
