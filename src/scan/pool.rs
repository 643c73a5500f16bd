//! Bounded-concurrency probe scheduling.

use std::any::Any;
use std::collections::{BTreeSet, VecDeque};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::scan::{probe, ProbeOutcome};

/// Probe every port in `ports` with at most `max_workers` connections in
/// flight, collecting outcomes in completion order.
///
/// The pool is constructed per call and torn down before returning. Workers
/// pull ports from a shared queue, so excess ports wait until a worker
/// frees up. Exactly one outcome is produced per port: a panicking probe is
/// caught and reported as an unexpected error for that port instead of
/// aborting the scan.
pub fn scan_all(
    host: &str,
    ports: &BTreeSet<u16>,
    timeout: Duration,
    max_workers: usize,
) -> Vec<ProbeOutcome> {
    let queue: Arc<Mutex<VecDeque<u16>>> = Arc::new(Mutex::new(ports.iter().copied().collect()));
    let workers = max_workers.min(ports.len());
    let (tx, rx) = mpsc::channel();

    thread::scope(|s| {
        for _ in 0..workers {
            let tx = tx.clone();
            let queue = Arc::clone(&queue);
            s.spawn(move || loop {
                let port = match queue.lock() {
                    Ok(mut q) => q.pop_front(),
                    // A plain VecDeque stays consistent even if another
                    // worker died holding the lock; keep draining it.
                    Err(poisoned) => poisoned.into_inner().pop_front(),
                };
                let Some(port) = port else { break };

                let outcome = catch_unwind(AssertUnwindSafe(|| probe::probe(host, port, timeout)))
                    .unwrap_or_else(|panic| ProbeOutcome {
                        port,
                        open: false,
                        error: Some(format!(
                            "port {port}: unexpected error {}",
                            panic_message(&panic)
                        )),
                    });

                if tx.send(outcome).is_err() {
                    break;
                }
            });
        }

        // The collecting end is the single writer of the result list; it
        // drains until every worker has dropped its sender.
        drop(tx);
        rx.iter().collect()
    })
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s
    } else {
        "probe worker panicked"
    }
}
