use std::time::Duration;

/// Animation length. The same constants are baked into the generated
/// stats-page script so both renditions tick identically.
pub const DEFAULT_DURATION_MS: u64 = 1000;
pub const TICK_MS: u64 = 25;

/// Linear count-up from 0 to a target value over a fixed duration.
#[derive(Clone, Copy, Debug)]
pub struct Counter {
    target: u64,
    duration_ms: u64,
}

impl Counter {
    pub fn new(target: u64) -> Self {
        Self::with_duration(target, DEFAULT_DURATION_MS)
    }

    pub fn with_duration(target: u64, duration_ms: u64) -> Self {
        Self {
            target,
            duration_ms: duration_ms.max(1),
        }
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    /// Displayed value after `elapsed_ms`, clamped to the target on
    /// overshoot.
    pub fn value_at(&self, elapsed_ms: u64) -> u64 {
        if elapsed_ms >= self.duration_ms {
            return self.target;
        }
        ((self.target as u128 * elapsed_ms as u128) / self.duration_ms as u128) as u64
    }

    /// The full frame sequence at the fixed tick interval. The last frame is
    /// always exactly the target.
    pub fn frames(&self) -> Vec<u64> {
        let mut out = Vec::new();
        let mut elapsed = 0;
        loop {
            out.push(self.value_at(elapsed));
            if elapsed >= self.duration_ms {
                break;
            }
            elapsed += TICK_MS;
        }
        out
    }

    /// Drives the animation on the tokio timer, handing each frame to the
    /// caller for display.
    pub async fn run<F: FnMut(u64)>(&self, mut show: F) {
        let mut ticker = tokio::time::interval(Duration::from_millis(TICK_MS));
        let mut elapsed = 0;
        loop {
            ticker.tick().await;
            show(self.value_at(elapsed));
            if elapsed >= self.duration_ms {
                break;
            }
            elapsed += TICK_MS;
        }
    }
}
