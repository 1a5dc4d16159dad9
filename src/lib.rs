#![deny(missing_docs)]

//! A fixed-size worker thread pool with pause, resume, and drain
//! synchronization.
//!
//! Worker threads pull jobs off a shared, unbounded FIFO queue. A caller
//! can wait until every outstanding job has finished, or pause and resume
//! the workers without tearing the pool down. Teardown discards jobs that
//! never started and completes in bounded time.
//!
//! # Example
//!
//! ```
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! use tpool::ThreadPool;
//!
//! let pool = ThreadPool::new(4)?;
//! let counter = Arc::new(AtomicUsize::new(0));
//!
//! for _ in 0..100 {
//!     let counter = Arc::clone(&counter);
//!     pool.spawn(move || {
//!         counter.fetch_add(1, Ordering::SeqCst);
//!     });
//! }
//!
//! pool.wait();
//! assert_eq!(counter.load(Ordering::SeqCst), 100);
//! # Ok::<(), tpool::PoolError>(())
//! ```

mod error;
mod job;
mod pool;
mod queue;
mod worker;

pub use error::{PoolError, Result};
pub use pool::ThreadPool;
