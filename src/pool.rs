use std::sync::{Arc, Condvar, Mutex};
use std::thread;

use crossbeam::sync::WaitGroup;
use log::{debug, error};

use crate::job::Job;
use crate::queue::JobQueue;
use crate::worker::{self, Worker};
use crate::{PoolError, Result};

/// State shared between the pool handle and its workers.
///
/// Everything lives behind a single mutex so that compound predicates like
/// "queue empty and nobody working" are decided atomically. The lock is
/// only ever held for bookkeeping, never across a job's execution.
struct PoolState {
    queue: JobQueue,
    /// Workers that completed startup and have not yet exited.
    alive: u32,
    /// Workers currently executing a job. Bounded by `alive`.
    working: u32,
    /// While set, no worker dequeues; in-flight jobs are unaffected.
    paused: bool,
    /// Monotonic: set once at teardown, never cleared.
    shutdown: bool,
}

pub(crate) struct Shared {
    state: Mutex<PoolState>,
    /// Signaled on submission and at shutdown.
    job_available: Condvar,
    /// Signaled on unblock and at shutdown.
    resumed: Condvar,
    /// Signaled when the last busy worker finishes with an empty queue.
    drained: Condvar,
}

impl Shared {
    fn new() -> Self {
        Shared {
            state: Mutex::new(PoolState {
                queue: JobQueue::default(),
                alive: 0,
                working: 0,
                paused: false,
                shutdown: false,
            }),
            job_available: Condvar::new(),
            resumed: Condvar::new(),
            drained: Condvar::new(),
        }
    }

    /// Called by a worker once, as soon as its thread is up.
    pub(crate) fn worker_started(&self) {
        let mut state = self.state.lock().unwrap();
        state.alive += 1;
    }

    /// Blocks the calling worker until a job can be dequeued, returning
    /// `None` once shutdown is requested.
    ///
    /// Every wakeup re-checks the full predicate: shutdown wins over
    /// everything, pause parks the worker on `resumed` regardless of queue
    /// contents, and spurious wakeups fall through to another wait. The
    /// returned job is already counted in `working`: pop and increment
    /// happen in one critical section, so a waiter checking "empty and
    /// idle" can never slip between them.
    pub(crate) fn dequeue_blocking(&self) -> Option<Job> {
        let mut state = self.state.lock().unwrap();
        loop {
            if state.shutdown {
                return None;
            }
            if state.paused {
                state = self.resumed.wait(state).unwrap();
                continue;
            }
            if let Some(job) = state.queue.pop() {
                state.working += 1;
                debug_assert!(state.working <= state.alive);
                return Some(job);
            }
            state = self.job_available.wait(state).unwrap();
        }
    }

    /// Called by a worker after its job ran (or panicked).
    pub(crate) fn job_finished(&self) {
        let mut state = self.state.lock().unwrap();
        state.working -= 1;
        if state.working == 0 && state.queue.is_empty() {
            self.drained.notify_all();
        }
    }

    /// Called by a worker on its way out; returns how many remain alive.
    pub(crate) fn worker_exited(&self) -> u32 {
        let mut state = self.state.lock().unwrap();
        state.alive -= 1;
        state.alive
    }
}

/// A fixed-size worker thread pool.
///
/// Jobs are dequeued in FIFO submission order by whichever worker frees up
/// first; with more than one worker, completion order across jobs is not
/// guaranteed. The worker count is fixed at construction.
///
/// Dropping the pool requests shutdown and joins all workers: jobs that
/// never started are discarded, jobs in flight run to completion. Because
/// teardown consumes the handle, operating on a destroyed pool is rejected
/// at compile time.
pub struct ThreadPool {
    shared: Arc<Shared>,
    workers: Vec<Worker>,
    threads: u32,
}

impl ThreadPool {
    /// Creates a pool with exactly `threads` worker threads and blocks
    /// until every one of them has started.
    ///
    /// If a worker thread cannot be spawned, the workers already started
    /// are shut down and joined before the error is returned; no
    /// half-initialized pool ever escapes.
    ///
    /// # Errors
    ///
    /// [`PoolError::InvalidThreadCount`] if `threads` is zero,
    /// [`PoolError::Io`] if the operating system refuses a thread.
    pub fn new(threads: u32) -> Result<ThreadPool> {
        if threads == 0 {
            return Err(PoolError::InvalidThreadCount(threads));
        }

        let shared = Arc::new(Shared::new());
        let ready = WaitGroup::new();
        let mut workers = Vec::with_capacity(threads as usize);

        for id in 0..threads {
            let shared_worker = Arc::clone(&shared);
            let ready = ready.clone();
            let spawned = thread::Builder::new()
                .name(format!("tpool-worker-{id}"))
                .spawn(move || worker::run(id, shared_worker, ready));
            match spawned {
                Ok(handle) => workers.push(Worker { id, handle }),
                Err(e) => {
                    // Roll back: dropping the partial pool runs the normal
                    // teardown over the workers that did start.
                    drop(ThreadPool {
                        shared,
                        workers,
                        threads,
                    });
                    return Err(e.into());
                }
            }
        }

        ready.wait();
        debug!("thread pool started with {threads} workers");

        Ok(ThreadPool {
            shared,
            workers,
            threads,
        })
    }

    /// Submits a job to the pool.
    ///
    /// Never blocks: the queue is unbounded. Multi-argument work is
    /// expressed by capturing the arguments in the closure.
    ///
    /// Submitting while the pool is [blocked](ThreadPool::block) is
    /// allowed; the job waits in the queue until
    /// [`unblock`](ThreadPool::unblock).
    ///
    /// If the job panics, the executing worker contains the panic and
    /// reports it through the `log` facade; the pool keeps running. There
    /// is no per-job failure channel; a job that must report success or
    /// failure does so through whatever the closure captures.
    pub fn spawn<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        {
            let mut state = self.shared.state.lock().unwrap();
            state.queue.push(Job::new(f));
        }
        // Wake one idle worker. While the pool is blocked the woken worker
        // re-checks the pause predicate and parks on `resumed` instead of
        // dequeuing.
        self.shared.job_available.notify_one();
    }

    /// Blocks until the pool is drained: no queued jobs and no worker
    /// executing one, observed simultaneously.
    ///
    /// The drain predicate is re-checked under the same mutex the workers
    /// update on every wakeup, so a job finishing between a check and the
    /// suspension cannot be missed, and a wakeup racing with a fresh
    /// submission puts the caller back to sleep.
    ///
    /// On a blocked pool with queued jobs this returns only after some
    /// other thread calls [`unblock`](ThreadPool::unblock) and the backlog
    /// drains.
    pub fn wait(&self) {
        let mut state = self.shared.state.lock().unwrap();
        while state.working > 0 || !state.queue.is_empty() {
            state = self.shared.drained.wait(state).unwrap();
        }
    }

    /// Pauses the pool: no worker starts a new job until
    /// [`unblock`](ThreadPool::unblock).
    ///
    /// Jobs already executing run to completion. Submissions remain
    /// accepted and queue up. Blocking an already blocked pool is a no-op.
    pub fn block(&self) {
        let mut state = self.shared.state.lock().unwrap();
        state.paused = true;
    }

    /// Resumes a blocked pool, waking every worker parked on the pause.
    /// A no-op if the pool is not blocked.
    pub fn unblock(&self) {
        let mut state = self.shared.state.lock().unwrap();
        state.paused = false;
        let backlog = !state.queue.is_empty();
        drop(state);
        self.shared.resumed.notify_all();
        // Jobs queued during the pause: workers that slept through the
        // whole episode are parked on `job_available`, not `resumed`.
        if backlog {
            self.shared.job_available.notify_all();
        }
    }

    /// Number of workers executing a job right now.
    ///
    /// Approximate by nature: the count may have changed by the time the
    /// caller looks at it. Observability only; never use it to decide
    /// whether the pool is drained, that is what
    /// [`wait`](ThreadPool::wait) is for.
    pub fn num_working(&self) -> u32 {
        self.shared.state.lock().unwrap().working
    }

    /// The fixed number of worker threads chosen at construction.
    pub fn num_threads(&self) -> u32 {
        self.threads
    }

    /// Tears the pool down now, consuming the handle.
    ///
    /// Equivalent to dropping the pool; exists so call sites can make the
    /// teardown point explicit. The `Drop` impl documents the teardown
    /// contract.
    pub fn shutdown(self) {}
}

impl Drop for ThreadPool {
    /// Requests shutdown, then wakes and joins every worker.
    ///
    /// Jobs still queued but never started are discarded without running.
    /// This is intentional, so teardown never waits on an unbounded
    /// backlog. Jobs already executing run to completion before the join
    /// returns. Call [`wait`](ThreadPool::wait) first to drain instead of
    /// discard.
    fn drop(&mut self) {
        let discarded = {
            let mut state = self.shared.state.lock().unwrap();
            state.shutdown = true;
            state.queue.len()
        };
        if discarded > 0 {
            debug!("discarding {discarded} queued jobs at shutdown");
        }

        // Workers may be parked waiting for a job or waiting out a pause;
        // both paths re-check `shutdown` on wakeup.
        self.shared.job_available.notify_all();
        self.shared.resumed.notify_all();

        debug!("joining {} workers", self.workers.len());
        for worker in self.workers.drain(..) {
            if worker.handle.join().is_err() {
                // Job panics are contained inside the worker loop, so this
                // only fires if the loop itself has a bug.
                error!("worker {} thread panicked", worker.id);
            }
        }
    }
}
