use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

pub type TaskId = u32;

/// Deferred continuation belonging to the session.
///
/// Timer callbacks are reified as plain values so the session can run,
/// reorder, and cancel them explicitly.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Task {
    /// Pick a random cell and raise its mole.
    PopUp,
    /// Lower the mole on this cell if a hit has not already cleared it.
    HideMole(CellId),
    /// Countdown display update.
    Tick,
    /// Countdown reached zero; end the session.
    Finish,
    /// Redundant cleanup shortly after the nominal duration.
    SafetyStop,
}

/// Which component a task belongs to, for bulk cancellation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskOwner {
    Scheduler,
    Countdown,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub id: TaskId,
    pub due_at: Millis,
    pub owner: TaskOwner,
    pub task: Task,
}

/// Time-ordered queue of every outstanding deferred action.
///
/// Due tasks run in `(due_at, id)` order: deadline first, then scheduling
/// order. Ids only grow, so when a late pop-up collides with the finish task
/// on the same deadline, the finish task (scheduled at session start) runs
/// first and cancels the pop-up before it can fire.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskQueue {
    // kept sorted by (due_at, id)
    tasks: Vec<ScheduledTask>,
    next_id: TaskId,
}

impl TaskQueue {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn schedule(&mut self, due_at: Millis, owner: TaskOwner, task: Task) -> TaskId {
        let id = self.next_id;
        self.next_id += 1;
        let entry = ScheduledTask {
            id,
            due_at,
            owner,
            task,
        };
        let pos = self
            .tasks
            .partition_point(|other| (other.due_at, other.id) < (due_at, id));
        self.tasks.insert(pos, entry);
        log::trace!("scheduled {:?} as #{} due at {}", task, id, due_at);
        id
    }

    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|entry| entry.id != id);
        before != self.tasks.len()
    }

    pub fn cancel_owned_by(&mut self, owner: TaskOwner) {
        self.tasks.retain(|entry| entry.owner != owner);
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Deadline of the earliest outstanding task.
    pub fn next_due(&self) -> Option<Millis> {
        self.tasks.first().map(|entry| entry.due_at)
    }

    /// Removes and returns the earliest task due at or before `now`.
    pub fn pop_due(&mut self, now: Millis) -> Option<ScheduledTask> {
        if self.tasks.first()?.due_at <= now {
            Some(self.tasks.remove(0))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_due_returns_tasks_in_deadline_order() {
        let mut queue = TaskQueue::new();
        queue.schedule(300, TaskOwner::Countdown, Task::Tick);
        queue.schedule(100, TaskOwner::Scheduler, Task::PopUp);
        queue.schedule(200, TaskOwner::Scheduler, Task::HideMole(2));

        assert_eq!(queue.next_due(), Some(100));
        assert_eq!(queue.pop_due(300).unwrap().task, Task::PopUp);
        assert_eq!(queue.pop_due(300).unwrap().task, Task::HideMole(2));
        assert_eq!(queue.pop_due(300).unwrap().task, Task::Tick);
        assert!(queue.pop_due(300).is_none());
    }

    #[test]
    fn equal_deadlines_break_ties_by_scheduling_order() {
        let mut queue = TaskQueue::new();
        queue.schedule(500, TaskOwner::Countdown, Task::Finish);
        queue.schedule(500, TaskOwner::Scheduler, Task::PopUp);

        assert_eq!(queue.pop_due(500).unwrap().task, Task::Finish);
        assert_eq!(queue.pop_due(500).unwrap().task, Task::PopUp);
    }

    #[test]
    fn pop_due_leaves_future_tasks_queued() {
        let mut queue = TaskQueue::new();
        queue.schedule(1000, TaskOwner::Scheduler, Task::PopUp);

        assert!(queue.pop_due(999).is_none());
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop_due(1000).unwrap().task, Task::PopUp);
    }

    #[test]
    fn cancel_removes_a_single_task() {
        let mut queue = TaskQueue::new();
        let id = queue.schedule(100, TaskOwner::Scheduler, Task::PopUp);
        queue.schedule(200, TaskOwner::Countdown, Task::Tick);

        assert!(queue.cancel(id));
        assert!(!queue.cancel(id));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop_due(200).unwrap().task, Task::Tick);
    }

    #[test]
    fn cancel_owned_by_removes_only_that_owner() {
        let mut queue = TaskQueue::new();
        queue.schedule(100, TaskOwner::Scheduler, Task::PopUp);
        queue.schedule(150, TaskOwner::Scheduler, Task::HideMole(0));
        queue.schedule(200, TaskOwner::Countdown, Task::Tick);

        queue.cancel_owned_by(TaskOwner::Scheduler);

        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop_due(200).unwrap().owner, TaskOwner::Countdown);
    }
}
