//! Parallel transform stage: fan items out to a fixed worker pool, fan the
//! results back in.
//!
//! ```text
//!              ┌─ worker 0 ─┐
//! dispatcher ──┼─ worker 1 ─┼──> result sink ──> collector (one slot per item)
//!  (queue)     └─ worker N ─┘      (index, result)
//! ```
//!
//! Workers never see each other's results. The collector is the only owner
//! of the slot vector, so no locking is involved.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::config::{Config, ProcessingConfig};
use crate::error::{PipelineError, Result, TierscanError};
use crate::types::{ClassificationResult, WorkItem};

use super::channel::{result_sink, work_queue};
use super::processor::ImageProcessor;

/// Bounded-concurrency executor applying the classifier to every item.
pub struct TransformStage {
    processor: Arc<ImageProcessor>,
    config: ProcessingConfig,
}

impl TransformStage {
    /// Create a transform stage with the given configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            processor: Arc::new(ImageProcessor::new(config)),
            config: config.processing.clone(),
        }
    }

    /// Configured worker pool size.
    pub fn workers(&self) -> usize {
        self.config.parallel_workers
    }

    /// Classify every item. See [`TransformStage::run_with_progress`].
    pub async fn run(
        &self,
        items: Vec<WorkItem>,
        cancel: &CancellationToken,
    ) -> Result<Vec<ClassificationResult>> {
        self.run_with_progress(items, cancel, |_| {}).await
    }

    /// Classify every item, calling `on_result` as each one completes.
    ///
    /// Returns exactly one result per item, in input order. Item failures
    /// are recorded as failed results. Once `cancel` fires, workers stop
    /// taking items from the queue, in-flight items are allowed to finish,
    /// and the stage returns [`TierscanError::Cancelled`] unless every item
    /// had already completed.
    pub async fn run_with_progress<F>(
        &self,
        items: Vec<WorkItem>,
        cancel: &CancellationToken,
        mut on_result: F,
    ) -> Result<Vec<ClassificationResult>>
    where
        F: FnMut(&ClassificationResult),
    {
        let total = items.len();
        if total == 0 {
            return Ok(Vec::new());
        }

        let items: Arc<[WorkItem]> = Arc::from(items);
        let worker_count = self.config.parallel_workers.clamp(1, total);
        tracing::info!(
            "Classifying {} item(s) with {} worker(s)",
            total,
            worker_count
        );

        let (work_tx, work_rx) = work_queue::<usize>(&self.config);
        let (result_tx, mut result_rx) =
            result_sink::<(usize, ClassificationResult)>(&self.config);

        let mut workers = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            let work_rx = work_rx.clone();
            let result_tx = result_tx.clone();
            let processor = self.processor.clone();
            let items = items.clone();
            let cancel = cancel.clone();

            workers.push(tokio::spawn(async move {
                loop {
                    // Queued items are abandoned once cancelled
                    let index = tokio::select! {
                        biased;
                        _ = cancel.cancelled() => break,
                        next = work_rx.recv() => match next {
                            Ok(index) => index,
                            Err(_) => break,
                        },
                    };
                    let result = processor.process(&items[index]).await;
                    if result_tx.send((index, result)).await.is_err() {
                        // Collector gone, nothing left to report to
                        break;
                    }
                }
                tracing::trace!("Worker {} drained", worker_id);
            }));
        }
        // Only workers hold these now; the sink closes when the last one exits
        drop(work_rx);
        drop(result_tx);

        let dispatcher = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                for index in 0..total {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            tracing::warn!("Cancellation requested, no further items dispatched");
                            work_tx.close();
                            break;
                        }
                        sent = work_tx.send(index) => {
                            if sent.is_err() {
                                tracing::debug!("Work queue closed after {} item(s)", index);
                                break;
                            }
                        }
                    }
                }
            })
        };

        let mut slots: Vec<Option<ClassificationResult>> = (0..total).map(|_| None).collect();
        let mut completed = 0usize;
        while let Some((index, result)) = result_rx.recv().await {
            on_result(&result);
            slots[index] = Some(result);
            completed += 1;
        }

        if let Err(e) = dispatcher.await {
            tracing::error!("Dispatcher task failed: {e}");
        }
        for handle in workers {
            if let Err(e) = handle.await {
                tracing::error!("Transform worker panicked: {e}");
            }
        }

        if cancel.is_cancelled() && completed < total {
            return Err(TierscanError::Cancelled { completed, total });
        }

        // A worker that died mid-item leaves its slot empty; every item
        // still gets exactly one result.
        let results: Vec<ClassificationResult> = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| {
                    let item = &items[index];
                    let lost = ClassificationResult::failed(
                        item,
                        PipelineError::WorkerLost(item.source_path.clone()),
                        0,
                    );
                    on_result(&lost);
                    lost
                })
            })
            .collect();

        let failed = results.iter().filter(|r| !r.is_ok()).count();
        tracing::info!(
            "Transform stage finished: {} succeeded, {} failed",
            total - failed,
            failed
        );
        Ok(results)
    }
}
