use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::error::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Attempts after the first one.
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub backoff_multiplier: f64,
    /// Randomize each delay by ±30%
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(5),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Runs `f` until it succeeds, fails with a non-transient error, or retries run out.
    /// The last error is returned as-is.
    pub async fn run<F, Fut, T>(&self, mut f: F) -> Result<T, Error>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        let mut attempt = 0;
        let mut backoff = self.initial_backoff;

        loop {
            match f().await {
                Ok(result) => return Ok(result),
                Err(err) if err.is_transient() && attempt < self.max_retries => {
                    attempt += 1;

                    let delay = self.jittered(backoff);

                    tracing::warn!(
                        "retry attempt {}/{} after {}, waiting {:?}",
                        attempt,
                        self.max_retries,
                        err,
                        delay
                    );

                    tokio::time::sleep(delay).await;

                    backoff = Duration::from_millis(
                        ((backoff.as_millis() as f64 * self.backoff_multiplier)
                            .min(self.max_backoff.as_millis() as f64)) as u64,
                    );
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn jittered(&self, base: Duration) -> Duration {
        if !self.jitter {
            return base;
        }

        let factor = rand::thread_rng().gen_range(0.7..=1.3);
        Duration::from_millis((base.as_millis() as f64 * factor) as u64)
    }
}
