use crate::foundation::core::{ElementId, Millis, Viewport};
use crate::foundation::error::{FxError, FxResult};
use crate::runtime::clock::Clock;
use crate::runtime::scheduler::{EffectId, Scheduler, TaskHandle};

/// What an effect wants next after being started or woken.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Wake {
    /// Wake on the next dispatched frame (`requestAnimationFrame`).
    NextFrame,
    /// Wake once `delay` has elapsed (`setTimeout`).
    After(Millis),
    /// Nothing pending; the effect stays mounted but dormant.
    Idle,
}

/// A time-driven visual effect hosted by a [`Stage`].
///
/// Effects own their instance state exclusively. The stage owns their pending tasks and listener
/// registrations, so an effect never has to remember how to cancel itself.
pub trait Effect {
    /// Short stable name used in logs.
    fn name(&self) -> &'static str;

    /// Whether the stage should register a resize listener for this effect.
    fn listens_to_resize(&self) -> bool {
        false
    }

    /// Called once on mount.
    fn start(&mut self, now: Millis) -> Wake;

    /// Called when a frame request or timeout registered for this effect fires.
    fn wake(&mut self, now: Millis) -> Wake;

    /// Called synchronously for every viewport change while a resize listener is registered.
    ///
    /// `None` keeps whatever is pending; `Some` replaces it.
    fn resize(&mut self, _viewport: Viewport, _now: Millis) -> Option<Wake> {
        None
    }

    /// Called once on unmount, after every registration has been detached.
    fn stop(&mut self) {}
}

/// Which host primitive a registration is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    /// The window (resize events).
    Window,
    /// The frame/timer scheduler.
    Scheduler,
    /// An intersection observer.
    Observer,
}

/// What was attached to a [`Target`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handler {
    ResizeListener,
    FrameRequest(TaskHandle),
    Timeout(TaskHandle),
    /// Visibility watch on one element.
    Observe(ElementId),
}

/// One `(target, handler)` pair owned by a mounted effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Registration {
    pub target: Target,
    pub handler: Handler,
}

/// Event-loop tuning.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StageOpts {
    /// Display refresh interval used for frame dispatch.
    pub frame_interval: Millis,
}

impl Default for StageOpts {
    fn default() -> Self {
        Self {
            frame_interval: Millis(1000.0 / 60.0),
        }
    }
}

impl StageOpts {
    pub fn validate(&self) -> FxResult<()> {
        let ms = self.frame_interval.0;
        if !ms.is_finite() || ms <= 0.0 {
            return Err(FxError::validation("frame interval must be > 0 ms"));
        }
        Ok(())
    }
}

/// Counters for one [`Stage::run_until`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub frames: u64,
    pub timeouts: u64,
}

struct Slot {
    id: EffectId,
    effect: Box<dyn Effect>,
    registrations: Vec<Registration>,
}

/// Single-threaded page lifecycle host.
///
/// Mount effects, feed it resizes, and drive it with [`Stage::run_until`]. With a
/// [`crate::ManualClock`] the loop is a deterministic discrete-event simulation; with a
/// [`crate::SystemClock`] it sleeps between events.
pub struct Stage<C: Clock> {
    clock: C,
    opts: StageOpts,
    viewport: Viewport,
    scheduler: Scheduler,
    slots: Vec<Slot>,
    next_id: u32,
    next_frame_at: Millis,
}

impl<C: Clock> Stage<C> {
    pub fn new(clock: C, viewport: Viewport, opts: StageOpts) -> Self {
        let next_frame_at = clock.now() + opts.frame_interval;
        Self {
            clock,
            opts,
            viewport,
            scheduler: Scheduler::new(),
            slots: Vec::new(),
            next_id: 0,
            next_frame_at,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn now(&self) -> Millis {
        self.clock.now()
    }

    /// Start `effect` and attach its listeners. The returned id is the unmount key.
    pub fn mount(&mut self, effect: Box<dyn Effect>) -> EffectId {
        let id = EffectId(self.next_id);
        self.next_id += 1;
        let now = self.clock.now();

        let mut slot = Slot {
            id,
            effect,
            registrations: Vec::new(),
        };
        if slot.effect.listens_to_resize() {
            slot.registrations.push(Registration {
                target: Target::Window,
                handler: Handler::ResizeListener,
            });
        }
        let wake = slot.effect.start(now);
        schedule(&mut self.scheduler, &mut slot, wake, now);
        tracing::debug!(effect = slot.effect.name(), id = id.0, ?wake, "mounted effect");
        self.slots.push(slot);
        id
    }

    /// Detach every registration of `id`, then stop and drop the effect.
    ///
    /// Returns false when `id` is not mounted.
    pub fn unmount(&mut self, id: EffectId) -> bool {
        let Some(pos) = self.slots.iter().position(|s| s.id == id) else {
            return false;
        };
        let mut slot = self.slots.remove(pos);
        dispose(&mut self.scheduler, &mut slot);
        true
    }

    /// Unmount everything (page teardown).
    pub fn dispose(&mut self) {
        for mut slot in std::mem::take(&mut self.slots) {
            dispose(&mut self.scheduler, &mut slot);
        }
    }

    pub fn is_mounted(&self, id: EffectId) -> bool {
        self.slots.iter().any(|s| s.id == id)
    }

    pub fn registrations(&self, id: EffectId) -> &[Registration] {
        self.slots
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.registrations.as_slice())
            .unwrap_or(&[])
    }

    /// Pending frame requests and timeouts across all effects.
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn pending_tasks_for(&self, id: EffectId) -> usize {
        self.scheduler.pending_for(id)
    }

    /// Synchronously notify every effect with a resize listener.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let now = self.clock.now();
        for slot in &mut self.slots {
            let listening = slot
                .registrations
                .iter()
                .any(|r| r.handler == Handler::ResizeListener);
            if !listening {
                continue;
            }
            if let Some(wake) = slot.effect.resize(viewport, now) {
                cancel_tasks(&mut self.scheduler, slot);
                schedule(&mut self.scheduler, slot, wake, now);
            }
        }
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            "dispatched resize"
        );
    }

    /// Run the event loop until the clock reaches `end`.
    ///
    /// Timeouts due at the same instant as a frame fire first.
    pub fn run_until(&mut self, end: Millis) -> RunStats {
        let mut stats = RunStats::default();
        loop {
            let now = self.clock.now();
            let next_frame = self
                .scheduler
                .has_frame_requests()
                .then(|| self.next_vsync(now));
            let next_timer = self.scheduler.next_timeout().map(|t| t.max(now));
            let next = match (next_frame, next_timer) {
                (Some(f), Some(t)) => Some(if t.0 <= f.0 { t } else { f }),
                (a, b) => a.or(b),
            };
            let Some(next) = next.filter(|n| n.0 <= end.0) else {
                self.clock.wait_until(end);
                break;
            };

            self.clock.wait_until(next);
            let now = self.clock.now();

            for (handle, owner) in self.scheduler.take_due_timeouts(now) {
                self.dispatch(owner, handle, now);
                stats.timeouts += 1;
            }

            if let Some(frame_at) = next_frame
                && now.0 >= frame_at.0
            {
                for (handle, owner) in self.scheduler.take_frame_requests() {
                    self.dispatch(owner, handle, now);
                }
                stats.frames += 1;
                self.next_frame_at = frame_at + self.opts.frame_interval;
            }
        }
        stats
    }

    /// First frame boundary at or after `now`. Frames stay on a fixed grid across idle periods.
    fn next_vsync(&self, now: Millis) -> Millis {
        let interval = self.opts.frame_interval.0;
        if now.0 <= self.next_frame_at.0 || interval <= 0.0 {
            return self.next_frame_at.max(now);
        }
        let behind = ((now.0 - self.next_frame_at.0) / interval).ceil();
        Millis(self.next_frame_at.0 + behind * interval)
    }

    fn dispatch(&mut self, owner: EffectId, handle: TaskHandle, now: Millis) {
        let Some(slot) = self.slots.iter_mut().find(|s| s.id == owner) else {
            return;
        };
        slot.registrations.retain(|r| match r.handler {
            Handler::FrameRequest(h) | Handler::Timeout(h) => h != handle,
            Handler::ResizeListener | Handler::Observe(_) => true,
        });
        let wake = slot.effect.wake(now);
        schedule(&mut self.scheduler, slot, wake, now);
    }
}

fn schedule(scheduler: &mut Scheduler, slot: &mut Slot, wake: Wake, now: Millis) {
    match wake {
        Wake::NextFrame => {
            let h = scheduler.request_frame(slot.id);
            slot.registrations.push(Registration {
                target: Target::Scheduler,
                handler: Handler::FrameRequest(h),
            });
        }
        Wake::After(delay) => {
            let h = scheduler.set_timeout(slot.id, now, delay);
            slot.registrations.push(Registration {
                target: Target::Scheduler,
                handler: Handler::Timeout(h),
            });
        }
        Wake::Idle => {}
    }
}

fn cancel_tasks(scheduler: &mut Scheduler, slot: &mut Slot) {
    slot.registrations.retain(|r| match r.handler {
        Handler::FrameRequest(h) | Handler::Timeout(h) => {
            scheduler.cancel(h);
            false
        }
        Handler::ResizeListener | Handler::Observe(_) => true,
    });
}

fn dispose(scheduler: &mut Scheduler, slot: &mut Slot) {
    let detached = slot.registrations.len();
    for reg in slot.registrations.drain(..) {
        match reg.handler {
            Handler::FrameRequest(h) | Handler::Timeout(h) => {
                scheduler.cancel(h);
            }
            Handler::ResizeListener | Handler::Observe(_) => {}
        }
    }
    slot.effect.stop();
    tracing::debug!(
        effect = slot.effect.name(),
        id = slot.id.0,
        detached,
        "unmounted effect"
    );
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/stage.rs"]
mod tests;
