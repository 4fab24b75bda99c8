use std::time::Duration;

use rand::Rng;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

/// Randomized spacing between outbound requests.
///
/// The first request goes out immediately. Every later request waits until
/// a uniformly sampled gap in `[min, max]` has passed since the previous
/// one. Callers queue on the cursor lock, so concurrent tasks are
/// serialized. The cursor only moves once a wait completes; a caller
/// dropped mid-wait leaves it untouched.
#[derive(Debug)]
pub struct AdaptiveDelay {
    min: Duration,
    max: Duration,
    last: Mutex<Option<Instant>>,
}

impl AdaptiveDelay {
    pub fn new(min: Duration, max: Duration) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min,
            max,
            last: Mutex::new(None),
        }
    }

    pub fn bounds(&self) -> (Duration, Duration) {
        (self.min, self.max)
    }

    fn sample_gap(&self) -> Duration {
        rand::thread_rng().gen_range(self.min..=self.max)
    }

    /// Waits for this caller's slot, then records it as the latest request.
    pub async fn wait(&self) {
        let mut last = self.last.lock().await;
        if let Some(previous) = *last {
            let gap = self.sample_gap();
            sleep_until(previous + gap).await;
        }
        *last = Some(Instant::now());
    }
}
