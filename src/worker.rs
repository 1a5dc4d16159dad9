use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam::sync::WaitGroup;
use log::{debug, error};

use crate::pool::Shared;

/// Handle to one pool-owned worker thread.
pub(crate) struct Worker {
    pub(crate) id: u32,
    pub(crate) handle: JoinHandle<()>,
}

/// The loop every worker runs for the pool's whole lifetime.
///
/// The worker reports itself alive, then repeatedly pulls a job and runs
/// it until shutdown. Dropping `ready` releases the startup barrier the
/// pool constructor blocks on; it must happen after the alive count is
/// bumped so the constructor never returns with an unstarted worker.
pub(crate) fn run(id: u32, shared: Arc<Shared>, ready: WaitGroup) {
    shared.worker_started();
    debug!("worker {id} started");
    drop(ready);

    while let Some(job) = shared.dequeue_blocking() {
        debug!("worker {id} executing job");
        // A panicking job must not take the worker down or skew the
        // working count: contain it here, at the call boundary.
        if catch_unwind(AssertUnwindSafe(|| job.run())).is_err() {
            error!("worker {id}: job panicked, continuing");
        }
        shared.job_finished();
    }

    let left = shared.worker_exited();
    debug!("worker {id} exiting, {left} workers still alive");
}
