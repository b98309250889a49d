//! Property-based tests for priority_thread_pool using proptest

use crossbeam_channel::bounded;
use parking_lot::Mutex;
use priority_thread_pool::prelude::*;
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn any_priority() -> impl Strategy<Value = Priority> {
    prop::sample::select(Priority::DESCENDING.to_vec())
}

// ============================================================================
// Priority Tests
// ============================================================================

proptest! {
    /// Display output always parses back to the same level
    #[test]
    fn test_priority_display_parses(priority in any_priority(), upper in any::<bool>()) {
        let text = if upper {
            priority.to_string().to_uppercase()
        } else {
            priority.to_string()
        };
        prop_assert_eq!(text.parse::<Priority>().unwrap(), priority);
    }

    /// Ordering agrees with the numeric value
    #[test]
    fn test_priority_order_matches_value(a in any_priority(), b in any_priority()) {
        prop_assert_eq!(a.cmp(&b), a.value().cmp(&b.value()));
    }
}

// ============================================================================
// ThreadPoolConfig Tests
// ============================================================================

proptest! {
    /// Any requested thread count yields at least one worker
    #[test]
    fn test_config_thread_count(threads in 0usize..32) {
        let config = ThreadPoolConfig::new(threads);
        prop_assert_eq!(config.num_threads, threads.max(1));
        prop_assert!(config.validate().is_ok());
    }

    /// Configuration survives a JSON round trip
    #[test]
    fn test_config_json_roundtrip(
        threads in 1usize..64,
        prefix in "[a-z]{3,10}",
        discard in any::<bool>()
    ) {
        let mode = if discard { ShutdownMode::Discard } else { ShutdownMode::Drain };
        let config = ThreadPoolConfig::new(threads)
            .with_thread_name_prefix(prefix)
            .with_shutdown_mode(mode);

        let json = serde_json::to_string(&config).unwrap();
        let back: ThreadPoolConfig = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, config);
    }
}

// ============================================================================
// Scheduling Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Every submitted job runs exactly once before shutdown returns
    #[test]
    fn test_every_job_runs_once(
        threads in 1usize..6,
        priorities in prop::collection::vec(any_priority(), 1..120)
    ) {
        let pool = ThreadPool::with_threads(threads).unwrap();
        let runs: Arc<Vec<AtomicUsize>> =
            Arc::new(priorities.iter().map(|_| AtomicUsize::new(0)).collect());

        for (i, &priority) in priorities.iter().enumerate() {
            let runs = Arc::clone(&runs);
            pool.submit_with_priority(
                move || {
                    runs[i].fetch_add(1, Ordering::SeqCst);
                },
                priority,
            )
            .unwrap();
        }

        pool.shutdown().unwrap();

        prop_assert!(runs.iter().all(|count| count.load(Ordering::SeqCst) == 1));
        prop_assert_eq!(pool.total_jobs_submitted(), priorities.len() as u64);
    }

    /// With one worker, queued jobs run sorted by priority, FIFO within a level
    #[test]
    fn test_single_worker_order_is_stable_priority_sort(
        priorities in prop::collection::vec(any_priority(), 1..60)
    ) {
        let pool = ThreadPool::with_threads(1).unwrap();
        let (gate_tx, gate_rx) = bounded::<()>(1);
        let (started_tx, started_rx) = bounded::<()>(1);

        pool.submit(move || {
            started_tx.send(()).unwrap();
            gate_rx.recv().unwrap();
        })
        .unwrap();
        started_rx.recv().unwrap();

        let order = Arc::new(Mutex::new(Vec::new()));
        for (i, &priority) in priorities.iter().enumerate() {
            let order = Arc::clone(&order);
            pool.submit_with_priority(move || order.lock().push(i), priority)
                .unwrap();
        }
        prop_assert_eq!(pool.pending_jobs(), priorities.len());

        gate_tx.send(()).unwrap();
        pool.shutdown().unwrap();

        let mut expected: Vec<usize> = (0..priorities.len()).collect();
        expected.sort_by_key(|&i| std::cmp::Reverse(priorities[i]));
        prop_assert_eq!(order.lock().clone(), expected);
    }

    /// Queue depths reflect exactly what was queued at each level
    #[test]
    fn test_queue_depths_track_submissions(
        priorities in prop::collection::vec(any_priority(), 0..40)
    ) {
        let pool = ThreadPool::with_threads(1).unwrap();
        let (gate_tx, gate_rx) = bounded::<()>(1);
        let (started_tx, started_rx) = bounded::<()>(1);

        pool.submit(move || {
            started_tx.send(()).unwrap();
            gate_rx.recv().unwrap();
        })
        .unwrap();
        started_rx.recv().unwrap();

        for &priority in &priorities {
            pool.submit_with_priority(|| (), priority).unwrap();
        }

        let depths = pool.queue_depths();
        for level in Priority::DESCENDING {
            let expected = priorities.iter().filter(|&&p| p == level).count();
            prop_assert_eq!(depths.get(level), expected);
        }
        prop_assert_eq!(depths.total(), priorities.len());

        gate_tx.send(()).unwrap();
        pool.shutdown().unwrap();
        prop_assert_eq!(pool.pending_jobs(), 0);
    }
}
