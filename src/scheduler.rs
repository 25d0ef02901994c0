// ── Cooperative scheduler ─────────────────────────────────────────────────────
//
// Deferred tasks and timers for the UI thread.  Nothing here runs on its own:
// the run loop calls `advance` once per iteration and uses the returned
// instant to bound its wait.  Tasks from other threads arrive over a flume
// channel and join the deferred queue on the next advance.

use std::{
    cell::RefCell,
    collections::{BTreeMap, VecDeque},
    rc::Rc,
    time::{Duration, Instant},
};

/// Work queued on the UI thread.
pub type Task = Box<dyn FnOnce()>;

/// Work queued from another thread.
pub type SendTask = Box<dyn FnOnce() + Send>;

/// Identifies a scheduled timer for `Scheduler::cancel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

#[derive(Default)]
struct Inner {
    next_id: u64,
    deferred: VecDeque<Task>,
    /// Ordered by deadline, then by creation.
    timers: BTreeMap<(Instant, TimerId), Task>,
}

/// Handle to the UI thread's task queue.  Clones share the queue.
#[derive(Clone)]
pub struct Scheduler {
    inner: Rc<RefCell<Inner>>,
    remote_tx: flume::Sender<SendTask>,
    remote_rx: flume::Receiver<SendTask>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        let (remote_tx, remote_rx) = flume::unbounded();
        Self {
            inner: Rc::default(),
            remote_tx,
            remote_rx,
        }
    }

    /// Sender other threads use to queue work on this scheduler.
    pub fn remote(&self) -> flume::Sender<SendTask> {
        self.remote_tx.clone()
    }

    /// Run `task` on the next advance.
    pub fn perform(&self, task: impl FnOnce() + 'static) {
        self.inner.borrow_mut().deferred.push_back(Box::new(task));
    }

    /// Run `task` once `delay` has elapsed.
    pub fn schedule(&self, delay: Duration, task: impl FnOnce() + 'static) -> TimerId {
        self.schedule_at(Instant::now() + delay, task)
    }

    /// Run `task` on the first advance at or after `deadline`.
    pub fn schedule_at(&self, deadline: Instant, task: impl FnOnce() + 'static) -> TimerId {
        let mut inner = self.inner.borrow_mut();
        let id = TimerId(inner.next_id);
        inner.next_id += 1;
        inner.timers.insert((deadline, id), Box::new(task));
        id
    }

    /// Drop a timer that has not fired yet.  Returns `false` if it already ran
    /// or was cancelled.
    pub fn cancel(&self, id: TimerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let key = inner.timers.keys().find(|(_, timer)| *timer == id).copied();
        match key {
            Some(key) => inner.timers.remove(&key).is_some(),
            None => false,
        }
    }

    /// `true` if nothing is queued or scheduled.
    pub fn is_idle(&self) -> bool {
        let inner = self.inner.borrow();
        inner.deferred.is_empty() && inner.timers.is_empty() && self.remote_rx.is_empty()
    }

    /// Run the tasks queued before this call, then every timer due at `now`.
    ///
    /// Work added while advancing waits for the next call.  Returns when more
    /// work is due: `now` if tasks are already queued, the earliest timer
    /// deadline otherwise, or `None` when there is nothing left.
    pub fn advance(&self, now: Instant) -> Option<Instant> {
        let batch: Vec<Task> = {
            let mut inner = self.inner.borrow_mut();
            let mut batch: Vec<Task> = inner.deferred.drain(..).collect();
            batch.extend(self.remote_rx.try_iter().map(|task| task as Task));
            batch
        };
        for task in batch {
            task();
        }

        let due: Vec<(Instant, TimerId)> = self
            .inner
            .borrow()
            .timers
            .keys()
            .take_while(|(deadline, _)| *deadline <= now)
            .copied()
            .collect();
        for key in due {
            // Borrow released before running; the task may cancel later timers.
            let task = self.inner.borrow_mut().timers.remove(&key);
            if let Some(task) = task {
                task();
            }
        }

        let inner = self.inner.borrow();
        if !inner.deferred.is_empty() || !self.remote_rx.is_empty() {
            return Some(now);
        }
        inner.timers.keys().next().map(|(deadline, _)| *deadline)
    }
}
