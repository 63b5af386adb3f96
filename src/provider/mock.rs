use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::batch::CancelToken;
use crate::error::{ForgeError, Result};
use crate::models::ImagePayload;
use crate::provider::ImageProvider;

/// In-memory provider for orchestrator tests: no network, records call
/// counts and the concurrency high-water mark, and can inject failures or
/// flip a cancel token after a given number of calls.
#[derive(Default)]
pub struct MockProvider {
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    fail_on_call: Mutex<Option<usize>>,
    cancel_after: Mutex<Option<(usize, CancelToken)>>,
    staggered_delays: bool,
}

struct InFlightGuard<'a> {
    counter: &'a AtomicUsize,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the n-th call (1-based) with a provider error.
    pub fn fail_on_call(self, call: usize) -> Self {
        *self.fail_on_call.lock().unwrap() = Some(call);
        self
    }

    /// Give later calls within a group shorter delays, so completion order
    /// differs from issue order.
    pub fn with_staggered_delays(mut self) -> Self {
        self.staggered_delays = true;
        self
    }

    /// Flip `token` once `calls` calls have been issued.
    pub fn cancel_after_calls(&self, calls: usize, token: CancelToken) {
        *self.cancel_after.lock().unwrap() = Some((calls, token));
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageProvider for MockProvider {
    async fn generate(
        &self,
        _prompt: &str,
        _iterative_mode: bool,
        _api_key_override: Option<&str>,
    ) -> Result<ImagePayload> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        let _guard = InFlightGuard {
            counter: &self.in_flight,
        };

        if let Some((threshold, token)) = self.cancel_after.lock().unwrap().as_ref() {
            if call >= *threshold {
                token.cancel();
            }
        }

        let delay_ms = if self.staggered_delays {
            // Inverted so a group's last-issued call settles first.
            20u64.saturating_sub((call as u64 % 5) * 4)
        } else {
            1
        };
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;

        if *self.fail_on_call.lock().unwrap() == Some(call) {
            return Err(ForgeError::ProviderError(format!(
                "injected failure on call {}",
                call
            )));
        }

        Ok(ImagePayload::from_url(format!(
            "https://mock.invalid/{}.png",
            call
        )))
    }
}
