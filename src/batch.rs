use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;

use crate::config::BatchConfig;
use crate::error::{ForgeError, Result};
use crate::models::{GeneratedImage, GenerationRequest};
use crate::provider::ImageProvider;

/// Cooperative cancellation signal shared by one batch run. Checked before
/// each concurrency group; in-flight calls are left to settle.
#[derive(Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Point-in-time progress snapshot reported to callers.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct BatchProgress {
    pub current: usize,
    pub total: usize,
}

/// Shared progress state, advanced exactly once per settled group.
#[derive(Default)]
pub struct ProgressTracker {
    current: AtomicUsize,
    total: AtomicUsize,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&self, total: usize) {
        self.current.store(0, Ordering::SeqCst);
        self.total.store(total, Ordering::SeqCst);
    }

    fn advance(&self, settled: usize) {
        self.current.fetch_add(settled, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> BatchProgress {
        let total = self.total.load(Ordering::SeqCst);
        BatchProgress {
            current: self.current.load(Ordering::SeqCst).min(total),
            total,
        }
    }
}

/// One slot of the batch: either the generated image or the retained
/// failure reason. A failure never aborts the run.
#[derive(Debug)]
pub struct ItemOutcome {
    pub index: usize,
    pub result: std::result::Result<GeneratedImage, ForgeError>,
}

/// Result of a whole batch run. `items` is ordered by batch index and may
/// be shorter than `requested` after cancellation.
#[derive(Debug)]
pub struct BatchOutcome {
    pub items: Vec<ItemOutcome>,
    pub requested: usize,
    pub cancelled: bool,
}

impl BatchOutcome {
    pub fn succeeded(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.result.is_ok())
            .count()
    }

    pub fn into_images(self) -> Vec<GeneratedImage> {
        self.items
            .into_iter()
            .filter_map(|item| item.result.ok())
            .collect()
    }
}

/// Drives N generation calls in fixed-width concurrency groups.
///
/// Groups are strictly sequential: group K+1 is not issued until every
/// call in group K has settled. Each call carries its 0-based index, so
/// results keep their assigned position regardless of completion order.
/// A failed item consumes its slot and counts toward progress.
pub struct BatchOrchestrator {
    provider: Arc<dyn ImageProvider>,
    width: usize,
    progress: Arc<ProgressTracker>,
    cancel: CancelToken,
}

impl BatchOrchestrator {
    pub fn new(provider: Arc<dyn ImageProvider>, config: BatchConfig) -> Self {
        Self {
            provider,
            width: config.width.max(1),
            progress: Arc::new(ProgressTracker::new()),
            cancel: CancelToken::new(),
        }
    }

    /// Handle for observing progress while a run is in flight.
    pub fn progress(&self) -> Arc<ProgressTracker> {
        self.progress.clone()
    }

    /// Handle for cancelling the run from another task.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub async fn run(&self, request: &GenerationRequest) -> Result<BatchOutcome> {
        request.validate()?;

        let total = request.count as usize;
        self.progress.reset(total);

        let _timer = crate::logger::timer("batch generation");
        let mut items: Vec<ItemOutcome> = Vec::with_capacity(total);
        let mut cancelled = false;

        let mut group_start = 0;
        while group_start < total {
            if self.cancel.is_cancelled() {
                log::warn!(
                    "🛑 Batch cancelled after {} of {} items",
                    items.len(),
                    total
                );
                cancelled = true;
                break;
            }

            let group_end = (group_start + self.width).min(total);
            let calls = (group_start..group_end).map(|index| {
                let provider = self.provider.clone();
                let prompt = request.prompt.clone();
                let iterative_mode = request.iterative_mode;
                let api_key = request.personal_api_key().map(str::to_string);
                async move {
                    let result = provider
                        .generate(&prompt, iterative_mode, api_key.as_deref())
                        .await;
                    (index, result)
                }
            });

            let settled = join_all(calls).await;
            let settled_count = settled.len();

            for (index, result) in settled {
                match result {
                    Ok(payload) => {
                        items.push(ItemOutcome {
                            index,
                            result: Ok(GeneratedImage {
                                index,
                                fallback: payload.note.is_some(),
                                payload,
                            }),
                        });
                    }
                    Err(e) => {
                        log::warn!("⚠️  Generation failed for item {}: {}", index, e);
                        items.push(ItemOutcome {
                            index,
                            result: Err(e),
                        });
                    }
                }
            }

            self.progress.advance(settled_count);
            group_start = group_end;
        }

        let outcome = BatchOutcome {
            items,
            requested: total,
            cancelled,
        };
        log::info!(
            "✅ Batch finished: {} of {} succeeded{}",
            outcome.succeeded(),
            outcome.requested,
            if outcome.cancelled { " (cancelled)" } else { "" }
        );
        Ok(outcome)
    }
}
