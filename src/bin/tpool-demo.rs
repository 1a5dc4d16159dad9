use std::process::exit;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use log::{error, info};

use tpool::{Result, ThreadPool};

#[derive(Parser)]
#[command(name = "tpool-demo", version, about = "Demonstrates the tpool worker thread pool")]
struct Cli {
    /// Number of worker threads (defaults to the number of CPUs)
    #[arg(long, value_name = "N")]
    threads: Option<u32>,

    /// Number of jobs to submit
    #[arg(long, default_value_t = 100, value_name = "N")]
    jobs: u32,

    /// How long the pool stays blocked before the backlog is released, in milliseconds
    #[arg(long, default_value_t = 200, value_name = "MS")]
    pause_ms: u64,
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("{}", e);
        exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let threads = cli.threads.unwrap_or_else(|| num_cpus::get() as u32);
    let pool = ThreadPool::new(threads)?;

    info!("tpool-demo {}", env!("CARGO_PKG_VERSION"));
    info!("{} workers, {} jobs", threads, cli.jobs);

    let completed = Arc::new(AtomicU64::new(0));

    // Queue the whole batch against a blocked pool, then release it at
    // once so every worker starts loaded.
    pool.block();
    let start = Instant::now();
    for n in 0..cli.jobs {
        let completed = Arc::clone(&completed);
        pool.spawn(move || {
            // Just enough arithmetic to keep a worker busy for a moment.
            let mut acc = u64::from(n);
            for i in 0..50_000u64 {
                acc = acc.wrapping_mul(6364136223846793005).wrapping_add(i);
            }
            std::hint::black_box(acc);
            completed.fetch_add(1, Ordering::SeqCst);
        });
    }
    info!(
        "queued {} jobs while blocked, {} working",
        cli.jobs,
        pool.num_working()
    );

    thread::sleep(Duration::from_millis(cli.pause_ms));
    pool.unblock();
    pool.wait();

    println!(
        "completed {} jobs on {} workers in {:?}",
        completed.load(Ordering::SeqCst),
        threads,
        start.elapsed()
    );

    pool.shutdown();
    Ok(())
}
