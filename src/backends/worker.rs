// Copyright 2024 The NLP Genie Authors
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Long-lived model runner
//! Models are loaded and used on a dedicated OS thread: they need a sync context and are not
//! shared across threads. Async callers send jobs over a bounded channel and await the result
//! on a oneshot channel.
//!
//! ```no_run
//! use nlp_genie::backends::worker::ModelWorker;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let worker = ModelWorker::spawn("upper", || Ok(String::from("loaded model"))).await?;
//! let length = worker.run(|model| Ok(model.len())).await?;
//! # Ok(())
//! # }
//! ```

use crate::common::error::GenieError;
use std::sync::mpsc;
use std::thread;
use tokio::sync::oneshot;
use tokio::task;

/// Maximum number of queued jobs per model before callers block.
pub const QUEUE_CAPACITY: usize = 100;

/// Unit of work executed against the loaded model
type Job<M> = Box<dyn FnOnce(&M) + Send>;

/// Handle to a model owned by a background thread
pub struct ModelWorker<M> {
    name: &'static str,
    sender: mpsc::SyncSender<Job<M>>,
}

impl<M: 'static> ModelWorker<M> {
    /// Spawns the runner thread, loads the model on it with `loader` and waits until it is ready.
    ///
    /// A loader failure is returned here and the thread exits.
    pub async fn spawn<F>(name: &'static str, loader: F) -> Result<ModelWorker<M>, GenieError>
    where
        F: FnOnce() -> Result<M, GenieError> + Send + 'static,
    {
        let (sender, receiver) = mpsc::sync_channel(QUEUE_CAPACITY);
        let (ready_sender, ready_receiver) = oneshot::channel();
        thread::Builder::new()
            .name(format!("{name}-model"))
            .spawn(move || Self::runner(name, loader, receiver, ready_sender))?;

        ready_receiver.await.map_err(|_| {
            GenieError::WorkerError(format!("{name} model thread exited during start-up"))
        })??;
        tracing::info!(model = name, "model loaded");
        Ok(ModelWorker { name, sender })
    }

    /// The runner itself, loads the model then serves jobs until every handle is dropped
    fn runner<F>(
        name: &'static str,
        loader: F,
        receiver: mpsc::Receiver<Job<M>>,
        ready: oneshot::Sender<Result<(), GenieError>>,
    ) where
        F: FnOnce() -> Result<M, GenieError>,
    {
        let model = match loader() {
            Ok(model) => {
                let _ = ready.send(Ok(()));
                model
            }
            Err(error) => {
                tracing::error!(model = name, %error, "failed to load model");
                let _ = ready.send(Err(error));
                return;
            }
        };

        while let Ok(job) = receiver.recv() {
            job(&model);
        }
        tracing::debug!(model = name, "model thread stopped");
    }

    /// Runs `job` on the model thread and returns its result.
    ///
    /// Requires the multi-threaded tokio runtime: queueing blocks in place when the channel is
    /// full.
    pub async fn run<T, F>(&self, job: F) -> Result<T, GenieError>
    where
        T: Send + 'static,
        F: FnOnce(&M) -> Result<T, GenieError> + Send + 'static,
    {
        let (sender, receiver) = oneshot::channel();
        let job: Job<M> = Box::new(move |model| {
            let _ = sender.send(job(model));
        });
        task::block_in_place(|| self.sender.send(job)).map_err(|_| {
            GenieError::WorkerError(format!("{} model thread is not running", self.name))
        })?;
        receiver.await.map_err(|_| {
            GenieError::WorkerError(format!("{} model thread dropped the request", self.name))
        })?
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test(flavor = "multi_thread")]
    async fn serves_jobs_on_one_thread() -> anyhow::Result<()> {
        // Cell is !Sync: the model never leaves its thread.
        let worker = ModelWorker::spawn("counter", || Ok(Cell::new(0usize))).await?;
        for expected in 1..=3 {
            let count = worker
                .run(|model: &Cell<usize>| {
                    model.set(model.get() + 1);
                    Ok(model.get())
                })
                .await?;
            assert_eq!(count, expected);
        }

        let thread_name = worker
            .run(|_| Ok(thread::current().name().map(String::from)))
            .await?;
        assert_eq!(thread_name.as_deref(), Some("counter-model"));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn loader_failure_is_reported() {
        let result = ModelWorker::<String>::spawn("broken", || {
            Err(GenieError::FileDownloadError("weights unavailable".to_string()))
        })
        .await;
        match result {
            Err(GenieError::FileDownloadError(message)) => {
                assert_eq!(message, "weights unavailable")
            }
            Err(other) => panic!("unexpected error {other}"),
            Ok(_) => panic!("loader failure was swallowed"),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn job_errors_are_returned() -> anyhow::Result<()> {
        let worker = ModelWorker::spawn("failing", || Ok(())).await?;
        let result: Result<(), GenieError> = worker
            .run(|_| Err(GenieError::BackendError("bad input".to_string())))
            .await;
        assert!(matches!(result, Err(GenieError::BackendError(_))));
        Ok(())
    }
}
