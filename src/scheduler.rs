//! Generation-tagged delayed tasks on a virtual clock.
//!
//! The game never blocks: the comparison pause between two selections and the
//! relayout pause after a reset are scheduled continuations, released when
//! the host advances time. Each task is tagged with the generation current at
//! scheduling time; a reset bumps the generation, so continuations from a
//! prior round are ignored instead of firing late.

use std::time::Duration;

use crate::item::ItemId;

/// Deferred work owned by the game controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameTask {
    /// Compare the newly selected face against the previously held one.
    Compare { first: ItemId, second: ItemId },
    /// Re-run item resets, layout, and focus after a reset reshuffle.
    RelayoutAfterReset,
}

#[derive(Debug)]
struct Entry {
    due: Duration,
    seq: u64,
    generation: u64,
    task: GameTask,
}

/// Delayed-task scheduler with an explicit clock.
#[derive(Debug, Default)]
pub struct TaskScheduler {
    now: Duration,
    generation: u64,
    next_seq: u64,
    pending: Vec<Entry>,
}

impl TaskScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` to fire `delay` from the current virtual time.
    pub fn schedule(&mut self, delay: Duration, task: GameTask) {
        let entry = Entry {
            due: self.now + delay,
            seq: self.next_seq,
            generation: self.generation,
            task,
        };
        self.next_seq += 1;
        self.pending.push(entry);
    }

    /// Advance the clock and release every due, generation-current task in
    /// schedule order. Stale-generation tasks are dropped silently.
    pub fn advance(&mut self, dt: Duration) -> Vec<GameTask> {
        self.now += dt;
        let now = self.now;
        let generation = self.generation;

        let mut due: Vec<Entry> = Vec::new();
        self.pending.retain_mut(|entry| {
            if entry.generation != generation {
                return false;
            }
            if entry.due <= now {
                due.push(Entry {
                    due: entry.due,
                    seq: entry.seq,
                    generation: entry.generation,
                    task: entry.task.clone(),
                });
                return false;
            }
            true
        });

        due.sort_by_key(|entry| (entry.due, entry.seq));
        due.into_iter().map(|entry| entry.task).collect()
    }

    /// Invalidate everything currently pending. Scheduled continuations from
    /// before the bump never fire.
    pub fn bump_generation(&mut self) {
        self.generation += 1;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn has_pending(&self) -> bool {
        self.pending
            .iter()
            .any(|entry| entry.generation == self.generation)
    }

    pub fn now(&self) -> Duration {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compare(a: usize, b: usize) -> GameTask {
        GameTask::Compare {
            first: ItemId(a),
            second: ItemId(b),
        }
    }

    #[test]
    fn releases_tasks_when_due() {
        let mut scheduler = TaskScheduler::new();
        scheduler.schedule(Duration::from_millis(100), compare(0, 1));

        assert!(scheduler.advance(Duration::from_millis(50)).is_empty());
        let released = scheduler.advance(Duration::from_millis(50));
        assert_eq!(released, vec![compare(0, 1)]);
        assert!(!scheduler.has_pending());
    }

    #[test]
    fn releases_in_schedule_order() {
        let mut scheduler = TaskScheduler::new();
        scheduler.schedule(Duration::from_millis(100), compare(0, 1));
        scheduler.schedule(Duration::from_millis(20), GameTask::RelayoutAfterReset);

        let released = scheduler.advance(Duration::from_millis(200));
        assert_eq!(
            released,
            vec![GameTask::RelayoutAfterReset, compare(0, 1)]
        );
    }

    #[test]
    fn generation_bump_cancels_pending_tasks() {
        let mut scheduler = TaskScheduler::new();
        scheduler.schedule(Duration::from_millis(100), compare(0, 1));
        scheduler.bump_generation();

        assert!(scheduler.advance(Duration::from_millis(500)).is_empty());
        assert!(!scheduler.has_pending());
    }

    #[test]
    fn tasks_scheduled_after_a_bump_still_fire() {
        let mut scheduler = TaskScheduler::new();
        scheduler.schedule(Duration::from_millis(100), compare(0, 1));
        scheduler.bump_generation();
        scheduler.schedule(Duration::from_millis(100), GameTask::RelayoutAfterReset);

        let released = scheduler.advance(Duration::from_millis(100));
        assert_eq!(released, vec![GameTask::RelayoutAfterReset]);
    }
}
