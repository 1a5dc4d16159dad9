/// A single unit of work: a closure plus everything it captured.
///
/// Multi-argument work is expressed by capturing the arguments in the
/// closure; the pool never inspects the payload. Ownership moves from the
/// submitter into the queue and then into the executing worker, which
/// consumes the job by running it. A job still queued when the pool shuts
/// down is dropped without running.
pub(crate) struct Job(Box<dyn FnOnce() + Send + 'static>);

impl Job {
    pub(crate) fn new<F>(f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Job(Box::new(f))
    }

    /// Consumes the job and runs it.
    pub(crate) fn run(self) {
        (self.0)()
    }
}
