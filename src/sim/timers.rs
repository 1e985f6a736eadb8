//! Named scheduled tasks driven by the tick delta
//!
//! At most one task per [`TaskKind`] is pending at a time. Firing never calls
//! back into the simulation: [`Timers::advance`] just reports which tasks are
//! due and the match controller acts on them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    BalloonSpawn,
    BigBalloonSpawn,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Schedule {
    Once,
    /// Re-arm with this delay (seconds) after every firing
    Repeat(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Task {
    kind: TaskKind,
    remaining: f32,
    schedule: Schedule,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timers {
    tasks: Vec<Task>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, kind: TaskKind, delay: f32, schedule: Schedule) {
        self.cancel(kind);
        self.tasks.push(Task {
            kind,
            remaining: delay.max(0.0),
            schedule,
        });
    }

    /// Fire `kind` once after `delay` seconds, replacing any pending task of that kind
    pub fn schedule_once(&mut self, kind: TaskKind, delay: f32) {
        self.insert(kind, delay, Schedule::Once);
    }

    /// Fire `kind` every `delay` seconds, replacing any pending task of that kind
    pub fn schedule_repeating(&mut self, kind: TaskKind, delay: f32) {
        self.insert(kind, delay, Schedule::Repeat(delay.max(0.0)));
    }

    pub fn cancel(&mut self, kind: TaskKind) {
        self.tasks.retain(|t| t.kind != kind);
    }

    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    pub fn is_pending(&self, kind: TaskKind) -> bool {
        self.tasks.iter().any(|t| t.kind == kind)
    }

    /// Seconds until `kind` fires, if pending
    pub fn remaining(&self, kind: TaskKind) -> Option<f32> {
        self.tasks.iter().find(|t| t.kind == kind).map(|t| t.remaining)
    }

    /// Count down by `dt` and return the due tasks, most overdue first.
    /// Each task fires at most once per call.
    pub fn advance(&mut self, dt: f32) -> Vec<TaskKind> {
        let mut due: Vec<(f32, TaskKind)> = Vec::new();

        for task in &mut self.tasks {
            task.remaining -= dt;
            if task.remaining <= 0.0 {
                due.push((task.remaining, task.kind));
                if let Schedule::Repeat(delay) = task.schedule {
                    task.remaining = (task.remaining + delay).max(0.0);
                }
            }
        }

        self.tasks
            .retain(|t| !(t.schedule == Schedule::Once && t.remaining <= 0.0));

        due.sort_by(|a, b| a.0.total_cmp(&b.0));
        let fired: Vec<TaskKind> = due.into_iter().map(|(_, kind)| kind).collect();
        if !fired.is_empty() {
            log::trace!("Timers fired: {fired:?}");
        }
        fired
    }
}
