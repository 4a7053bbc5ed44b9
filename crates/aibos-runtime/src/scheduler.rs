//! Zero-delay task scheduling.
//!
//! Custom elements never re-render synchronously; they queue a flush with a
//! zero-delay timer. [`Scheduler`] is that timer API and [`TaskQueue`] is a
//! deterministic single-threaded implementation that runs queued tasks one
//! turn at a time.

use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};
use std::rc::Rc;

/// Handle for a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

/// A deferred callback.
pub type Task = Box<dyn FnOnce()>;

/// `setTimeout(fn, 0)` / `clearTimeout(id)`.
pub trait Scheduler {
    fn set_timeout(&self, task: Task) -> TaskId;

    /// Cancel a task that has not run yet; unknown ids are ignored.
    fn clear_timeout(&self, id: TaskId);
}

#[derive(Default)]
struct QueueState {
    tasks: VecDeque<(TaskId, Task)>,
    cancelled: HashSet<TaskId>,
}

/// Macrotask queue driven explicitly by the caller.
#[derive(Default)]
pub struct TaskQueue {
    state: RefCell<QueueState>,
    next_id: Cell<u64>,
}

impl TaskQueue {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        let state = self.state.borrow();
        state
            .tasks
            .iter()
            .filter(|(id, _)| !state.cancelled.contains(id))
            .count()
    }

    /// Run the tasks queued before this call. Tasks they schedule run on the
    /// next turn. Returns how many tasks ran.
    pub fn run_turn(&self) -> usize {
        let batch: Vec<(TaskId, Task)> = self.state.borrow_mut().tasks.drain(..).collect();
        let mut ran = 0;
        for (id, task) in batch {
            if self.state.borrow_mut().cancelled.remove(&id) {
                continue;
            }
            task();
            ran += 1;
        }
        ran
    }

    /// Run turns until the queue is empty.
    pub fn run_until_idle(&self) -> usize {
        let mut total = 0;
        loop {
            if self.state.borrow().tasks.is_empty() {
                return total;
            }
            total += self.run_turn();
        }
    }
}

impl Scheduler for TaskQueue {
    fn set_timeout(&self, task: Task) -> TaskId {
        let id = TaskId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.state.borrow_mut().tasks.push_back((id, task));
        id
    }

    fn clear_timeout(&self, id: TaskId) {
        let mut state = self.state.borrow_mut();
        if state.tasks.iter().any(|(queued, _)| *queued == id) {
            state.cancelled.insert(id);
        }
    }
}
