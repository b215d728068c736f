use crate::foundation::core::Millis;

/// Identifies a mounted effect on a [`crate::Stage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EffectId(pub u32);

/// Cancellation token for a pending frame request or timeout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskHandle(pub u64);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TaskKind {
    /// Fires on the next dispatched frame.
    Frame,
    /// Fires once the clock reaches `due`.
    Timeout { due: Millis },
}

#[derive(Clone, Copy, Debug)]
struct Task {
    handle: TaskHandle,
    owner: EffectId,
    kind: TaskKind,
}

/// Pending frame requests and timeouts, keyed by cancellable handles.
///
/// Frame requests follow `requestAnimationFrame` semantics: a request made while a frame is being
/// dispatched fires on the following frame, because dispatch drains the queue up front.
#[derive(Debug, Default)]
pub struct Scheduler {
    next: u64,
    tasks: Vec<Task>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_frame(&mut self, owner: EffectId) -> TaskHandle {
        self.push(owner, TaskKind::Frame)
    }

    pub fn set_timeout(&mut self, owner: EffectId, now: Millis, delay: Millis) -> TaskHandle {
        let due = now + delay.max(Millis::ZERO);
        self.push(owner, TaskKind::Timeout { due })
    }

    /// Returns false when the handle already fired or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.handle != handle);
        self.tasks.len() != before
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn pending_for(&self, owner: EffectId) -> usize {
        self.tasks.iter().filter(|t| t.owner == owner).count()
    }

    pub fn kind_of(&self, handle: TaskHandle) -> Option<TaskKind> {
        self.tasks
            .iter()
            .find(|t| t.handle == handle)
            .map(|t| t.kind)
    }

    pub fn has_frame_requests(&self) -> bool {
        self.tasks.iter().any(|t| t.kind == TaskKind::Frame)
    }

    /// Earliest timeout deadline, if any timeout is pending.
    pub fn next_timeout(&self) -> Option<Millis> {
        self.tasks
            .iter()
            .filter_map(|t| match t.kind {
                TaskKind::Timeout { due } => Some(due),
                TaskKind::Frame => None,
            })
            .fold(None, |acc: Option<Millis>, due| match acc {
                Some(a) if a.0 <= due.0 => Some(a),
                _ => Some(due),
            })
    }

    /// Remove and return every frame request, in request order.
    pub fn take_frame_requests(&mut self) -> Vec<(TaskHandle, EffectId)> {
        let mut out = Vec::new();
        self.tasks.retain(|t| {
            if t.kind == TaskKind::Frame {
                out.push((t.handle, t.owner));
                false
            } else {
                true
            }
        });
        out
    }

    /// Remove and return every timeout due at `now`, ordered by deadline then request order.
    pub fn take_due_timeouts(&mut self, now: Millis) -> Vec<(TaskHandle, EffectId)> {
        let mut due: Vec<(Millis, TaskHandle, EffectId)> = Vec::new();
        self.tasks.retain(|t| match t.kind {
            TaskKind::Timeout { due: d } if d.0 <= now.0 => {
                due.push((d, t.handle, t.owner));
                false
            }
            _ => true,
        });
        due.sort_by(|a, b| a.0.0.total_cmp(&b.0.0).then(a.1.cmp(&b.1)));
        due.into_iter().map(|(_, h, o)| (h, o)).collect()
    }

    fn push(&mut self, owner: EffectId, kind: TaskKind) -> TaskHandle {
        let handle = TaskHandle(self.next);
        self.next += 1;
        self.tasks.push(Task {
            handle,
            owner,
            kind,
        });
        handle
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/scheduler.rs"]
mod tests;
