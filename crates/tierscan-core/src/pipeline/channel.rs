//! Bounded channels for backpressure in the transform stage.

use tokio::sync::mpsc;

use crate::config::ProcessingConfig;

/// Create the multi-consumer work queue feeding the worker pool.
///
/// When the buffer is full the dispatcher waits, so at most `queue_size`
/// items sit between discovery output and the workers.
pub fn work_queue<T>(
    config: &ProcessingConfig,
) -> (async_channel::Sender<T>, async_channel::Receiver<T>) {
    async_channel::bounded(config.queue_size)
}

/// Create the sink workers publish results into.
///
/// Many producers, one consumer: the collector owns the reduction.
pub fn result_sink<T>(config: &ProcessingConfig) -> (mpsc::Sender<T>, mpsc::Receiver<T>) {
    mpsc::channel(config.queue_size)
}
