//! Producer/consumer hand-off between logging threads and the worker
//!
//! The queue is unbounded: producers only ever wait for the lock, never
//! for the worker. The worker sleeps on a condition variable until a
//! record arrives or shutdown is requested, and keeps draining after
//! shutdown until the queue is empty.

use super::error::{LoggerError, Result};
use super::log_record::LogRecord;
use super::sink::panic_message;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

struct QueueState {
    records: VecDeque<LogRecord>,
    /// Accepted records whose processing has not finished yet
    outstanding: usize,
    running: bool,
}

/// FIFO of pending records plus the worker's wake-up signal
pub struct DispatchQueue {
    state: Mutex<QueueState>,
    available: Condvar,
    idle: Condvar,
}

impl DispatchQueue {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                records: VecDeque::new(),
                outstanding: 0,
                running: true,
            }),
            available: Condvar::new(),
            idle: Condvar::new(),
        }
    }

    /// Append a record and wake the worker.
    ///
    /// Fails with [`LoggerError::LoggerStopped`] once shutdown has been
    /// requested; everything accepted before that point is drained.
    pub fn enqueue(&self, record: LogRecord) -> Result<()> {
        {
            let mut state = self.state.lock();
            if !state.running {
                return Err(LoggerError::LoggerStopped);
            }
            state.records.push_back(record);
            state.outstanding += 1;
        }
        self.available.notify_one();
        Ok(())
    }

    /// Block until a record is available and pop the oldest one.
    ///
    /// Returns `None` only after shutdown was requested and the queue has
    /// been drained. The lock is released before returning, so the caller
    /// processes the record without blocking producers.
    pub fn next(&self) -> Option<LogRecord> {
        let mut state = self.state.lock();
        loop {
            if let Some(record) = state.records.pop_front() {
                return Some(record);
            }
            if !state.running {
                return None;
            }
            self.available.wait(&mut state);
        }
    }

    /// Mark one record returned by [`DispatchQueue::next`] as fully processed
    pub fn task_done(&self) {
        let mut state = self.state.lock();
        state.outstanding = state.outstanding.saturating_sub(1);
        if state.outstanding == 0 {
            self.idle.notify_all();
        }
    }

    /// Wait until every accepted record has been processed.
    ///
    /// Returns `false` if `timeout` elapsed first.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        while state.outstanding > 0 {
            if self.idle.wait_until(&mut state, deadline).timed_out() {
                return state.outstanding == 0;
            }
        }
        true
    }

    /// Stop accepting records and wake the worker so it can drain and exit
    pub fn shutdown(&self) {
        self.state.lock().running = false;
        self.available.notify_all();
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().running
    }

    /// Number of records waiting for the worker
    pub fn len(&self) -> usize {
        self.state.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().records.is_empty()
    }
}

impl Default for DispatchQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Start the single consumer thread for `queue`.
///
/// `handle` runs on the worker for every record, in queue order, until
/// the queue is shut down and empty. A panic in `handle` costs only the
/// record being processed; the worker keeps going.
pub fn spawn_worker<F>(
    name: String,
    queue: Arc<DispatchQueue>,
    mut handle: F,
) -> io::Result<thread::JoinHandle<()>>
where
    F: FnMut(LogRecord) + Send + 'static,
{
    thread::Builder::new().name(name).spawn(move || {
        while let Some(record) = queue.next() {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| handle(record))) {
                eprintln!(
                    "[LOGGER ERROR] Dispatch worker recovered from panic: {}",
                    panic_message(payload.as_ref())
                );
            }
            queue.task_done();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_level::LogLevel;

    fn record(message: &str) -> LogRecord {
        LogRecord::new(LogLevel::Info, message)
    }

    #[test]
    fn test_fifo_order() {
        let queue = DispatchQueue::new();
        for msg in ["r1", "r2", "r3"] {
            queue.enqueue(record(msg)).unwrap();
        }
        assert_eq!(queue.len(), 3);

        assert_eq!(queue.next().unwrap().message, "r1");
        assert_eq!(queue.next().unwrap().message, "r2");
        assert_eq!(queue.next().unwrap().message, "r3");
        assert!(queue.is_empty());
    }

    #[test]
    fn test_drain_after_shutdown() {
        let queue = DispatchQueue::new();
        queue.enqueue(record("a")).unwrap();
        queue.enqueue(record("b")).unwrap();
        queue.shutdown();

        assert!(!queue.is_running());
        assert_eq!(queue.next().unwrap().message, "a");
        assert_eq!(queue.next().unwrap().message, "b");
        assert!(queue.next().is_none());
    }

    #[test]
    fn test_enqueue_after_shutdown_is_rejected() {
        let queue = DispatchQueue::new();
        queue.shutdown();
        assert!(matches!(
            queue.enqueue(record("late")),
            Err(LoggerError::LoggerStopped)
        ));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_worker_wakes_on_enqueue_and_exits_on_shutdown() {
        let queue = Arc::new(DispatchQueue::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let handle = spawn_worker("test-worker".to_string(), Arc::clone(&queue), move |r| {
            sink.lock().push(r.message);
        })
        .unwrap();

        // Let the worker block on the empty queue first
        thread::sleep(Duration::from_millis(20));
        for i in 0..10 {
            queue.enqueue(record(&format!("m{}", i))).unwrap();
        }
        queue.shutdown();
        handle.join().unwrap();

        let expected: Vec<String> = (0..10).map(|i| format!("m{}", i)).collect();
        assert_eq!(*seen.lock(), expected);
    }

    #[test]
    fn test_wait_idle_tracks_processing() {
        let queue = Arc::new(DispatchQueue::new());
        assert!(queue.wait_idle(Duration::from_millis(1)));

        queue.enqueue(record("slow")).unwrap();
        assert!(!queue.wait_idle(Duration::from_millis(10)));

        let handle = spawn_worker("idle-worker".to_string(), Arc::clone(&queue), |_| {
            thread::sleep(Duration::from_millis(20));
        })
        .unwrap();

        assert!(queue.wait_idle(Duration::from_secs(5)));
        queue.shutdown();
        handle.join().unwrap();
    }

    #[test]
    fn test_worker_survives_panicking_handler() {
        let queue = Arc::new(DispatchQueue::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let handle = spawn_worker("panic-worker".to_string(), Arc::clone(&queue), move |r| {
            if r.message == "bad" {
                panic!("handler bug");
            }
            sink.lock().push(r.message);
        })
        .unwrap();

        for msg in ["a", "bad", "b"] {
            queue.enqueue(record(msg)).unwrap();
        }
        assert!(queue.wait_idle(Duration::from_secs(5)));
        assert_eq!(*seen.lock(), vec!["a".to_string(), "b".to_string()]);

        queue.shutdown();
        assert!(handle.join().is_ok());
    }

    #[test]
    fn test_concurrent_producers_lose_nothing() {
        let queue = Arc::new(DispatchQueue::new());
        let producers: Vec<_> = (0..4)
            .map(|t| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    for i in 0..250 {
                        queue.enqueue(record(&format!("{}-{}", t, i))).unwrap();
                    }
                })
            })
            .collect();
        for producer in producers {
            producer.join().unwrap();
        }

        queue.shutdown();
        let mut per_thread = vec![Vec::new(); 4];
        while let Some(r) = queue.next() {
            let (t, i) = r.message.split_once('-').unwrap();
            per_thread[t.parse::<usize>().unwrap()].push(i.parse::<usize>().unwrap());
        }

        for seq in per_thread {
            assert_eq!(seq, (0..250).collect::<Vec<_>>());
        }
    }
}
