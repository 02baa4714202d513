use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

type DeferredTask = Box<dyn FnOnce() + Send>;

struct Entry {
    due: Instant,
    task: DeferredTask,
}

/// Work deferred to the consumer context's next safe point.
///
/// Replaces "wait one frame before the native call" control flow: any
/// thread enqueues, the consumer drains during `pump()`. One drain
/// executes at most the tasks enqueued before it began, so a task that
/// enqueues follow-up work never runs that work in the same tick.
/// Entries may carry a delay; a not-yet-due entry keeps its queue
/// position until it becomes due.
#[derive(Clone)]
pub struct DeferredQueue {
    entries: Arc<Mutex<VecDeque<Entry>>>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Run `task` at the next pump.
    pub fn push(&self, task: impl FnOnce() + Send + 'static) {
        self.push_delayed(Duration::ZERO, task);
    }

    /// Run `task` at the first pump after `delay` has elapsed.
    pub fn push_delayed(&self, delay: Duration, task: impl FnOnce() + Send + 'static) {
        let entry = Entry {
            due: Instant::now() + delay,
            task: Box::new(task),
        };
        self.entries.lock().push_back(entry);
    }

    /// Execute every task that was enqueued before this call and is due
    /// at `now`. Returns how many ran.
    pub fn drain(&self, now: Instant) -> usize {
        // Take the whole batch first: tasks enqueued while the batch runs
        // land in the live queue and wait for a later tick.
        let batch = std::mem::take(&mut *self.entries.lock());

        let mut ran = 0;
        let mut not_due = VecDeque::new();
        for entry in batch {
            if entry.due <= now {
                (entry.task)();
                ran += 1;
            } else {
                not_due.push_back(entry);
            }
        }

        if !not_due.is_empty() {
            // Re-queue ahead of anything enqueued mid-drain, keeping the
            // original relative order.
            let mut entries = self.entries.lock();
            for entry in not_due.into_iter().rev() {
                entries.push_front(entry);
            }
        }
        ran
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for DeferredQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    #[test]
    fn tasks_run_in_enqueue_order() {
        let queue = DeferredQueue::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for label in ["a", "b", "c"] {
            let seen = Arc::clone(&seen);
            queue.push(move || seen.lock().push(label));
        }

        assert_eq!(queue.drain(Instant::now()), 3);
        assert_eq!(*seen.lock(), vec!["a", "b", "c"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn task_enqueued_during_drain_waits_for_next_tick() {
        let queue = DeferredQueue::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        {
            let queue_handle = queue.clone();
            let seen = Arc::clone(&seen);
            queue.push(move || {
                seen.lock().push("first");
                let seen = Arc::clone(&seen);
                queue_handle.push(move || seen.lock().push("second"));
            });
        }

        assert_eq!(queue.drain(Instant::now()), 1);
        assert_eq!(*seen.lock(), vec!["first"]);
        assert_eq!(queue.len(), 1);

        assert_eq!(queue.drain(Instant::now()), 1);
        assert_eq!(*seen.lock(), vec!["first", "second"]);
    }

    #[test]
    fn delayed_task_waits_until_due() {
        let queue = DeferredQueue::new();
        let ran = Arc::new(Mutex::new(false));

        let tick_started = Instant::now();
        {
            let ran = Arc::clone(&ran);
            queue.push_delayed(Duration::from_millis(10), move || *ran.lock() = true);
        }

        // Not due at the instant the tick began.
        assert_eq!(queue.drain(tick_started), 0);
        assert!(!*ran.lock());
        assert_eq!(queue.len(), 1);

        // Well past due on a later tick.
        assert_eq!(queue.drain(tick_started + Duration::from_secs(5)), 1);
        assert!(*ran.lock());
    }

    #[test]
    fn not_due_entry_keeps_its_position() {
        let queue = DeferredQueue::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        {
            let seen = Arc::clone(&seen);
            queue.push_delayed(Duration::from_millis(10), move || seen.lock().push("delayed"));
        }
        {
            let seen = Arc::clone(&seen);
            queue.push(move || seen.lock().push("immediate"));
        }

        let tick_started = Instant::now();

        // Only the immediate task is due on the first tick.
        assert_eq!(queue.drain(tick_started), 1);
        assert_eq!(*seen.lock(), vec!["immediate"]);

        assert_eq!(queue.drain(tick_started + Duration::from_secs(5)), 1);
        assert_eq!(*seen.lock(), vec!["immediate", "delayed"]);
    }
}
