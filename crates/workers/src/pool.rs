//! [`WorkerPool`]: a fixed-size thread pool for label-tagged, fallible jobs.

use std::num::NonZeroUsize;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};

use crate::error::WorkerError;

type Job<L, R> = Box<dyn FnOnce() -> TaskResult<L, R> + Send>;

/// The outcome of one submitted task: its label, carried through regardless
/// of success or failure, and the task's own result.
#[derive(Debug)]
pub struct TaskResult<L, R> {
    /// The label the task was submitted with.
    pub label: L,
    /// `Ok` with the task's return value, or `Err` with a human-readable
    /// failure message.
    pub outcome: Result<R, String>,
}

/// A fixed-size pool of worker threads that run fallible, label-tagged jobs.
///
/// The worker count is fixed at construction. [`WorkerPool::submit`] enqueues
/// a job; [`WorkerPool::process`] blocks until every job submitted so far has
/// completed, aggregating any failures into a single [`WorkerError`]. Either
/// way, [`WorkerPool::drain_results`] returns every [`TaskResult`] completed
/// since the last drain — callers that need both the successes and the
/// failures (not just whether the round succeeded) read the results from
/// there rather than from `process`'s return value.
///
/// A pool that has reported a failure from `process` is poisoned: further
/// `submit` calls return [`WorkerError::Poisoned`] rather than silently
/// accepting more work. Construct a new pool for the next round instead.
pub struct WorkerPool<L, R> {
    job_tx: Option<Sender<Job<L, R>>>,
    result_rx: Receiver<TaskResult<L, R>>,
    result_tx: Sender<TaskResult<L, R>>,
    handles: Vec<JoinHandle<()>>,
    pending: usize,
    completed: Vec<TaskResult<L, R>>,
    poisoned: bool,
}

impl<L, R> WorkerPool<L, R>
where
    L: Send + 'static,
    R: Send + 'static,
{
    /// Spawns `worker_count` worker threads, each looping on the internal
    /// job queue until the pool is dropped.
    #[must_use]
    pub fn new(worker_count: NonZeroUsize) -> Self {
        let (job_tx, job_rx) = crossbeam_channel::unbounded::<Job<L, R>>();
        let (result_tx, result_rx) = crossbeam_channel::unbounded::<TaskResult<L, R>>();

        let handles = (0..worker_count.get())
            .map(|_| {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                std::thread::spawn(move || {
                    for job in job_rx.iter() {
                        let outcome = job();
                        if result_tx.send(outcome).is_err() {
                            break;
                        }
                    }
                })
            })
            .collect();

        Self {
            job_tx: Some(job_tx),
            result_rx,
            result_tx,
            handles,
            pending: 0,
            completed: Vec::new(),
            poisoned: false,
        }
    }

    /// Enqueues `task`, tagged with `label`, for execution by the next free
    /// worker thread. `task` reports failure by returning `Err` with a
    /// human-readable message rather than by panicking.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Poisoned`] if a previous call to
    /// [`WorkerPool::process`] already reported a failure.
    pub fn submit<F>(&mut self, label: L, task: F) -> Result<(), WorkerError>
    where
        F: FnOnce() -> Result<R, String> + Send + 'static,
    {
        if self.poisoned {
            return Err(WorkerError::Poisoned);
        }
        let job: Job<L, R> = Box::new(move || TaskResult {
            label,
            outcome: task(),
        });
        let tx = self
            .job_tx
            .as_ref()
            .expect("job sender only cleared on drop");
        tx.send(job).expect("worker threads outlive the pool handle");
        self.pending += 1;
        Ok(())
    }

    /// Blocks until every task submitted since the last call to `process`
    /// (or construction) has completed, moving each [`TaskResult`] into the
    /// internal completed buffer drained by [`WorkerPool::drain_results`].
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::TasksFailed`] aggregating every task failure
    /// from this round. The pool is poisoned afterward: further `submit`
    /// calls fail.
    pub fn process(&mut self) -> Result<(), WorkerError> {
        let mut failures = Vec::new();
        for _ in 0..self.pending {
            let result = self
                .result_rx
                .recv()
                .map_err(|_| WorkerError::WorkerLost)?;
            if let Err(message) = &result.outcome {
                failures.push(message.clone());
            }
            self.completed.push(result);
        }
        self.pending = 0;

        if failures.is_empty() {
            Ok(())
        } else {
            self.poisoned = true;
            Err(WorkerError::TasksFailed { failures })
        }
    }

    /// Takes every [`TaskResult`] completed since the last drain, in
    /// completion order. Includes both successes and failures.
    pub fn drain_results(&mut self) -> Vec<TaskResult<L, R>> {
        std::mem::take(&mut self.completed)
    }

    /// The number of tasks submitted but not yet collected by `process`.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending
    }
}

impl<L, R> Drop for WorkerPool<L, R> {
    fn drop(&mut self) {
        // Dropping the sender closes the job queue, which ends each
        // worker's `for job in job_rx.iter()` loop once it drains.
        self.job_tx.take();
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool<R: Send + 'static>(n: usize) -> WorkerPool<&'static str, R> {
        WorkerPool::new(NonZeroUsize::new(n).unwrap())
    }

    #[test]
    fn runs_all_submitted_tasks() {
        let mut pool = pool::<i32>(3);
        for i in 0..10 {
            pool.submit("job", move || Ok(i)).unwrap();
        }
        pool.process().unwrap();
        let results = pool.drain_results();
        let mut values: Vec<i32> = results.into_iter().map(|r| r.outcome.unwrap()).collect();
        values.sort_unstable();
        assert_eq!(values, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn aggregates_failures_and_keeps_successes_in_results() {
        let mut pool = pool::<i32>(2);
        pool.submit("ok-1", || Ok(1)).unwrap();
        pool.submit("bad", || Err("boom".to_string())).unwrap();
        pool.submit("ok-2", || Ok(2)).unwrap();

        let err = pool.process().unwrap_err();
        match err {
            WorkerError::TasksFailed { failures } => {
                assert_eq!(failures, vec!["boom".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let results = pool.drain_results();
        assert_eq!(results.len(), 3);
        let ok_count = results.iter().filter(|r| r.outcome.is_ok()).count();
        assert_eq!(ok_count, 2);
    }

    #[test]
    fn poisoned_pool_rejects_further_submissions() {
        let mut pool = pool::<i32>(1);
        pool.submit("bad", || Err("boom".to_string())).unwrap();
        pool.process().unwrap_err();

        let err = pool.submit("more", || Ok(1)).unwrap_err();
        assert!(matches!(err, WorkerError::Poisoned));
    }

    #[test]
    fn labels_round_trip_with_their_outcome() {
        let mut pool = pool::<i32>(2);
        pool.submit("alpha", || Ok(1)).unwrap();
        pool.submit("beta", || Err("no".to_string())).unwrap();
        pool.process().unwrap_err();

        let results = pool.drain_results();
        let alpha = results.iter().find(|r| r.label == "alpha").unwrap();
        let beta = results.iter().find(|r| r.label == "beta").unwrap();
        assert!(alpha.outcome.is_ok());
        assert!(beta.outcome.is_err());
    }

    #[test]
    fn process_with_no_pending_tasks_is_a_no_op() {
        let mut pool = pool::<i32>(2);
        pool.process().unwrap();
        assert!(pool.drain_results().is_empty());
    }

    #[test]
    fn reusable_across_rounds_when_no_failures() {
        let mut pool = pool::<i32>(2);
        pool.submit("r1", || Ok(1)).unwrap();
        pool.process().unwrap();
        assert_eq!(pool.drain_results().len(), 1);

        pool.submit("r2", || Ok(2)).unwrap();
        pool.process().unwrap();
        assert_eq!(pool.drain_results().len(), 1);
    }
}
