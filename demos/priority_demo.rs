//! Priority scheduling walkthrough
//!
//! Computes a value through a result handle, then floods a pool with
//! interleaved Normal and Critical jobs so the Critical ones visibly run
//! first, and finally shows a drain shutdown.
//!
//! Run with: RUST_LOG=debug cargo run --example priority_demo

use priority_thread_pool::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

fn busy_wait(duration: Duration) {
    let start = Instant::now();
    while start.elapsed() < duration {
        std::hint::spin_loop();
    }
}

fn main() -> Result<()> {
    env_logger::init();

    println!("=== Priority Thread Pool Demo ===\n");

    let pool = ThreadPool::new()?;
    println!("1. Pool started with {} workers", pool.num_threads());

    // A short job whose value comes back through the handle
    let mut product = pool.submit(|| {
        let value = 3 * 4;
        println!("   computed {}", value);
        value
    })?;

    if product.wait_timeout(Duration::ZERO) {
        println!("   result was ready immediately");
    }
    println!("   3 * 4 = {}", product.wait()?);

    println!("\n2. Interleaving Normal and Critical jobs:");
    let completed = Arc::new(AtomicUsize::new(0));
    let critical_done_at = Arc::new(AtomicUsize::new(0));
    let normal_done_at = Arc::new(AtomicUsize::new(0));

    for i in 0..200 {
        let completed_n = Arc::clone(&completed);
        let normal_done_at = Arc::clone(&normal_done_at);
        pool.submit(move || {
            busy_wait(Duration::from_millis(2));
            let position = completed_n.fetch_add(1, Ordering::SeqCst);
            normal_done_at.fetch_max(position, Ordering::SeqCst);
            log::trace!("NORM: {}", i);
        })?;

        let completed_c = Arc::clone(&completed);
        let critical_done_at = Arc::clone(&critical_done_at);
        pool.submit_with_priority(
            move || {
                busy_wait(Duration::from_millis(2));
                let position = completed_c.fetch_add(1, Ordering::SeqCst);
                critical_done_at.fetch_max(position, Ordering::SeqCst);
                log::trace!("CRIT: {}", i);
            },
            Priority::Critical,
        )?;
    }

    let depths = pool.queue_depths();
    println!(
        "   queued: {} critical, {} high, {} normal",
        depths.critical, depths.high, depths.normal
    );

    println!("\n3. A few slow Normal jobs, then shutdown (queued work drains):");
    for i in 0..2 {
        pool.submit(move || {
            thread::sleep(Duration::from_millis(500));
            println!("   MINI: {}", i);
        })?;
    }

    pool.shutdown()?;

    println!(
        "   last Critical job finished at position {}, last Normal at {}",
        critical_done_at.load(Ordering::SeqCst),
        normal_done_at.load(Ordering::SeqCst)
    );

    println!("\n4. Statistics:");
    println!("   Total jobs submitted: {}", pool.total_jobs_submitted());
    println!("   Total jobs processed: {}", pool.total_jobs_processed());
    for (i, stat) in pool.get_stats().iter().enumerate() {
        println!(
            "   Worker {}: {} critical, {} normal, avg time: {:.2}μs",
            i, stat.critical_jobs, stat.normal_jobs, stat.average_processing_time_us
        );
    }

    println!("\n=== Demo completed ===");
    Ok(())
}
