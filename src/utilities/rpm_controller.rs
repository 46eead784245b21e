//! Rate limiting for completion calls.
//!
//! When `PIPELINE_MAX_RPM` is set, the controller counts requests in the
//! current minute window and makes callers wait for the next window once
//! the limit is reached.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Length of one rate-limit window.
const WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct WindowState {
    started: Instant,
    count: u32,
}

/// Requests-per-minute gate.
#[derive(Debug)]
pub struct RpmController {
    /// Maximum requests per minute. `None` means no limit.
    pub max_rpm: Option<u32>,
    state: Mutex<WindowState>,
}

impl RpmController {
    /// Create a controller with the given limit.
    pub fn new(max_rpm: Option<u32>) -> Self {
        Self {
            max_rpm,
            state: Mutex::new(WindowState {
                started: Instant::now(),
                count: 0,
            }),
        }
    }

    /// Count one request, waiting for the next minute window if the limit
    /// is already spent.
    pub async fn check_or_wait(&self) {
        let Some(max) = self.max_rpm else {
            return;
        };

        loop {
            let wait = {
                let Ok(mut state) = self.state.lock() else {
                    return;
                };
                let elapsed = state.started.elapsed();
                if elapsed >= WINDOW {
                    state.started = Instant::now();
                    state.count = 0;
                }
                if state.count < max {
                    state.count += 1;
                    None
                } else {
                    Some(WINDOW - elapsed.min(WINDOW))
                }
            };

            match wait {
                None => return,
                Some(delay) => {
                    log::info!(
                        "max RPM ({}) reached, waiting {:?} for the next minute window",
                        max,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Requests counted in the current window.
    pub fn current_rpm(&self) -> u32 {
        self.state.lock().map(|s| s.count).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unlimited_never_waits() {
        let controller = RpmController::new(None);
        for _ in 0..1000 {
            controller.check_or_wait().await;
        }
        assert_eq!(controller.current_rpm(), 0);
    }

    #[tokio::test]
    async fn test_counts_up_to_limit() {
        let controller = RpmController::new(Some(10));
        for _ in 0..10 {
            controller.check_or_wait().await;
        }
        assert_eq!(controller.current_rpm(), 10);
    }
}
