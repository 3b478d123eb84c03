//! Deferred work driven by the host's frame callback.
//!
//! Tasks are due either after a number of frames or at a timestamp. Every task
//! carries the pager epoch it was scheduled under; the pager re-validates it
//! before running and drops it silently when stale.

use serde::{Deserialize, Serialize};

use crate::reconcile::Target;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Due {
    /// Absolute frame number.
    Frame(u64),
    /// Absolute timestamp in ms.
    At(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "task", rename_all = "snake_case")]
pub enum Task {
    FinishEntry { target: Target },
    ClearTitleMask,
    PlayHeroMotion,
    /// Re-arm the slogan release after a re-lock at the top.
    RearmRelease,
    ScrollToBody { offset: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scheduled {
    pub id: u64,
    pub epoch: u64,
    pub due: Due,
    pub task: Task,
}

#[derive(Debug, Default, Clone)]
pub struct Scheduler {
    queue: Vec<Scheduled>,
    frame: u64,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames advanced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    fn push(&mut self, epoch: u64, due: Due, task: Task) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.queue.push(Scheduled {
            id,
            epoch,
            due,
            task,
        });
        id
    }

    /// Run `task` once `frames` more frames have been advanced (at least one).
    pub fn after_frames(&mut self, frames: u64, epoch: u64, task: Task) -> u64 {
        let due = Due::Frame(self.frame + frames.max(1));
        self.push(epoch, due, task)
    }

    pub fn at(&mut self, at_ms: f64, epoch: u64, task: Task) -> u64 {
        self.push(epoch, Due::At(at_ms), task)
    }

    /// Advance one frame and drain every task now due, in scheduling order.
    pub fn advance(&mut self, now: f64) -> Vec<Scheduled> {
        self.frame += 1;
        let frame = self.frame;
        let (due, pending): (Vec<_>, Vec<_>) =
            self.queue.drain(..).partition(|s| match s.due {
                Due::Frame(f) => f <= frame,
                Due::At(t) => t <= now,
            });
        self.queue = pending;
        due
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_tasks_wait_for_their_frame() {
        let mut s = Scheduler::new();
        s.after_frames(3, 0, Task::ClearTitleMask);
        assert!(s.advance(0.0).is_empty());
        assert!(s.advance(0.0).is_empty());
        let due = s.advance(0.0);
        assert_eq!(due.len(), 1);
        assert!(s.is_empty());
    }

    #[test]
    fn timed_tasks_drain_in_insertion_order() {
        let mut s = Scheduler::new();
        s.at(100.0, 1, Task::RearmRelease);
        s.at(50.0, 1, Task::PlayHeroMotion);
        s.at(500.0, 1, Task::ClearTitleMask);
        let due: Vec<_> = s.advance(120.0).into_iter().map(|t| t.task).collect();
        assert_eq!(due, vec![Task::RearmRelease, Task::PlayHeroMotion]);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn zero_frames_still_waits_one_frame() {
        let mut s = Scheduler::new();
        s.after_frames(0, 0, Task::PlayHeroMotion);
        assert_eq!(s.len(), 1);
        assert_eq!(s.advance(0.0).len(), 1);
    }
}
