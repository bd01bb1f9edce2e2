//! Single-worker event serialization.
//!
//! Counter mutation is read-modify-write against the settings store, so two
//! concurrent launches would race without a serialization point. All units
//! of work funnel through one background worker: strict FIFO submission
//! order, no overlap, no cancellation. Submission is fire-and-forget;
//! [`EventSerializer::wait_idle`] is the rendezvous for tests and shutdown.

use std::thread::JoinHandle;

use crossbeam_channel::{bounded, unbounded, Sender};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// FIFO queue with a concurrency of one.
pub struct EventSerializer {
    tx: Option<Sender<Job>>,
    worker: Option<JoinHandle<()>>,
}

impl EventSerializer {
    /// Spawn the worker thread.
    pub fn new() -> Self {
        let (tx, rx) = unbounded::<Job>();
        let worker = std::thread::Builder::new()
            .name("ratekit-events".to_string())
            .spawn(move || {
                for job in rx {
                    job();
                }
            })
            .expect("failed to spawn event serializer thread");

        Self {
            tx: Some(tx),
            worker: Some(worker),
        }
    }

    /// Enqueue a unit of work. Returns immediately; the job runs after all
    /// previously submitted jobs have finished.
    pub fn submit(&self, job: impl FnOnce() + Send + 'static) {
        if let Some(tx) = &self.tx {
            // Send fails only after shutdown; jobs submitted then are dropped.
            let _ = tx.send(Box::new(job));
        }
    }

    /// Block until every job submitted before this call has completed.
    pub fn wait_idle(&self) {
        let (ack_tx, ack_rx) = bounded::<()>(1);
        self.submit(move || {
            let _ = ack_tx.send(());
        });
        let _ = ack_rx.recv();
    }
}

impl Default for EventSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EventSerializer {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain remaining jobs and exit.
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[test]
    fn jobs_run_in_submission_order() {
        let serializer = EventSerializer::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for i in 0..50 {
            let order = Arc::clone(&order);
            serializer.submit(move || order.lock().unwrap().push(i));
        }
        serializer.wait_idle();

        let order = order.lock().unwrap();
        assert_eq!(*order, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn jobs_never_overlap() {
        let serializer = EventSerializer::new();
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        for _ in 0..20 {
            let in_flight = Arc::clone(&in_flight);
            let max_seen = Arc::clone(&max_seen);
            serializer.submit(move || {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                std::thread::sleep(std::time::Duration::from_millis(1));
                in_flight.fetch_sub(1, Ordering::SeqCst);
            });
        }
        serializer.wait_idle();

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn concurrent_submitters_lose_no_jobs() {
        let serializer = Arc::new(EventSerializer::new());
        let count = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let serializer = Arc::clone(&serializer);
                let count = Arc::clone(&count);
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        let count = Arc::clone(&count);
                        serializer.submit(move || {
                            count.fetch_add(1, Ordering::SeqCst);
                        });
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        serializer.wait_idle();

        assert_eq!(count.load(Ordering::SeqCst), 200);
    }

    #[test]
    fn drop_drains_pending_jobs() {
        let count = Arc::new(AtomicUsize::new(0));
        {
            let serializer = EventSerializer::new();
            for _ in 0..10 {
                let count = Arc::clone(&count);
                serializer.submit(move || {
                    count.fetch_add(1, Ordering::SeqCst);
                });
            }
        }
        assert_eq!(count.load(Ordering::SeqCst), 10);
    }
}
