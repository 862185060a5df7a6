//! Cooperative, frame-stepped sequencing of time-extended game
//! behavior: combat resolution, dialog advance, screen fades.
//!
//! A [`Timeline`] is a queue of [`TimelineAction`]s polled once per
//! render frame. Actions suspend by reporting "not finished yet" from
//! [`TimelineAction::is_finished`]; there are no threads and no
//! blocking calls. Branching splices new actions at the queue cursor
//! ([`TimelineCtx::push_action`]), so arbitrarily long conditional
//! chains run at constant stack depth.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// One unit of sequenced work: not-started → running → finished.
///
/// `start` runs once when the action becomes current, `update` once
/// per frame while it runs, `end` once when `is_finished` first
/// reports true.
pub trait TimelineAction {
    fn start(&mut self, _ctx: &mut TimelineCtx) {}

    fn update(&mut self, _ctx: &mut TimelineCtx) {}

    fn is_finished(&mut self, ctx: &mut TimelineCtx) -> bool;

    fn end(&mut self, _ctx: &mut TimelineCtx) {}
}

/// Handed to action hooks; collects actions to splice at the queue
/// cursor once the current poll returns.
#[derive(Default)]
pub struct TimelineCtx {
    spliced: Vec<Box<dyn TimelineAction>>,
}

impl TimelineCtx {
    /// Queues an action right behind the current one.
    pub fn push_action(&mut self, action: Box<dyn TimelineAction>) {
        self.spliced.push(action);
    }

    /// Queues all actions of an unstarted timeline behind the current
    /// action.
    ///
    /// # Panics
    ///
    /// Panics when the timeline has already been started; splicing a
    /// half-run timeline is an integration bug.
    pub fn push_timeline(&mut self, timeline: Timeline) {
        assert!(!timeline.has_started(), "cannot splice a timeline that has already started");
        self.spliced.extend(timeline.queue);
    }
}

/// An ordered queue of actions advanced one poll per frame.
#[derive(Default)]
pub struct Timeline {
    queue: VecDeque<Box<dyn TimelineAction>>,
    current: Option<Box<dyn TimelineAction>>,
    started: bool,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> TimelineBuilder {
        TimelineBuilder::default()
    }

    pub fn has_started(&self) -> bool {
        self.started
    }

    /// True once no action is running and none are queued. A timeline
    /// that never held actions counts as finished.
    pub fn is_finished(&self) -> bool {
        self.current.is_none() && self.queue.is_empty()
    }

    /// Marks the timeline as running; `update` does nothing before
    /// this.
    pub fn start(&mut self) {
        self.started = true;
    }

    /// Appends an action to the end of the queue; allowed while the
    /// timeline runs.
    pub fn append(&mut self, action: Box<dyn TimelineAction>) {
        self.queue.push_back(action);
    }

    /// Advances by one step. Call once per render frame.
    ///
    /// Starts the next queued action if none is current, then polls the
    /// current action and retires it when it reports finished. One
    /// synchronously-finishing action is consumed per call.
    pub fn update(&mut self) {
        if !self.started || self.is_finished() {
            return;
        }

        let mut ctx = TimelineCtx::default();

        if self.current.is_none() {
            let Some(mut action) = self.queue.pop_front() else {
                return;
            };
            action.start(&mut ctx);
            self.current = Some(action);
        }

        let current = self.current.as_mut().expect("current action was just ensured");
        current.update(&mut ctx);
        if current.is_finished(&mut ctx) {
            let mut finished = self.current.take().expect("current action still present");
            finished.end(&mut ctx);
        }

        // Splice at the cursor: pushed actions run before the rest of
        // the queue, in push order.
        for action in ctx.spliced.into_iter().rev() {
            self.queue.push_front(action);
        }
    }

    /// Wraps this timeline as a single action for nesting in another
    /// timeline.
    ///
    /// # Panics
    ///
    /// Panics when the timeline has already been started.
    pub fn into_action(self) -> Box<dyn TimelineAction> {
        assert!(!self.started, "cannot nest a timeline that has already started");
        Box::new(NestedTimeline { inner: self })
    }
}

/// Fluent constructor for timelines.
#[derive(Default)]
pub struct TimelineBuilder {
    actions: Vec<Box<dyn TimelineAction>>,
}

impl TimelineBuilder {
    /// A synchronous callback; finishes on the frame it starts.
    pub fn action(mut self, action: impl FnOnce() + 'static) -> Self {
        self.actions.push(Box::new(RunOnce { action: Some(Box::new(action)) }));
        self
    }

    /// Waits until the given wall-clock time has passed.
    pub fn delay(mut self, duration: Duration) -> Self {
        self.actions.push(Box::new(Delay { duration, deadline: None }));
        self
    }

    /// Waits until the predicate first reports true. Re-evaluated every
    /// frame, so it must be cheap.
    pub fn delay_until(mut self, condition: impl FnMut() -> bool + 'static) -> Self {
        self.actions.push(Box::new(DelayUntil { condition: Box::new(condition) }));
        self
    }

    pub fn include_action(mut self, action: Box<dyn TimelineAction>) -> Self {
        self.actions.push(action);
        self
    }

    /// Inlines all actions of an unstarted timeline.
    ///
    /// # Panics
    ///
    /// Panics when the timeline has already been started.
    pub fn include(mut self, timeline: Timeline) -> Self {
        assert!(!timeline.has_started(), "cannot include a timeline that has already started");
        self.actions.extend(timeline.queue);
        self
    }

    /// Conditionally splices a timeline built on demand.
    ///
    /// The condition is observed once, when this slot of the queue is
    /// reached; if it holds, the supplier runs exactly once and its
    /// timeline is spliced at the cursor, otherwise the slot is
    /// skipped. Neither closure runs before the slot is reached, so
    /// the branch target can depend on state that does not exist when
    /// the timeline is built.
    pub fn include_later(
        mut self,
        supplier: impl FnOnce() -> Timeline + 'static,
        condition: impl FnMut() -> bool + 'static,
    ) -> Self {
        self.actions.push(Box::new(IncludeLater {
            supplier: Some(Box::new(supplier)),
            condition: Box::new(condition),
        }));
        self
    }

    /// Runs all given actions concurrently within one queue slot; the
    /// slot finishes when every action has finished.
    pub fn parallel(mut self, actions: Vec<Box<dyn TimelineAction>>) -> Self {
        self.actions.push(Box::new(ParallelActions { actions }));
        self
    }

    pub fn build(self) -> Timeline {
        Timeline { queue: self.actions.into(), current: None, started: false }
    }
}

struct RunOnce {
    action: Option<Box<dyn FnOnce()>>,
}

impl TimelineAction for RunOnce {
    fn start(&mut self, _ctx: &mut TimelineCtx) {
        if let Some(action) = self.action.take() {
            action();
        }
    }

    fn is_finished(&mut self, _ctx: &mut TimelineCtx) -> bool {
        true
    }
}

struct Delay {
    duration: Duration,
    deadline: Option<Instant>,
}

impl TimelineAction for Delay {
    fn start(&mut self, _ctx: &mut TimelineCtx) {
        self.deadline = Some(Instant::now() + self.duration);
    }

    fn is_finished(&mut self, _ctx: &mut TimelineCtx) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

struct DelayUntil {
    condition: Box<dyn FnMut() -> bool>,
}

impl TimelineAction for DelayUntil {
    fn is_finished(&mut self, _ctx: &mut TimelineCtx) -> bool {
        (self.condition)()
    }
}

struct IncludeLater {
    supplier: Option<Box<dyn FnOnce() -> Timeline>>,
    condition: Box<dyn FnMut() -> bool>,
}

impl TimelineAction for IncludeLater {
    fn start(&mut self, ctx: &mut TimelineCtx) {
        if !(self.condition)() {
            return;
        }
        if let Some(supplier) = self.supplier.take() {
            ctx.push_timeline(supplier());
        }
    }

    fn is_finished(&mut self, _ctx: &mut TimelineCtx) -> bool {
        true
    }
}

struct NestedTimeline {
    inner: Timeline,
}

impl TimelineAction for NestedTimeline {
    fn start(&mut self, _ctx: &mut TimelineCtx) {
        self.inner.start();
    }

    fn update(&mut self, _ctx: &mut TimelineCtx) {
        self.inner.update();
    }

    fn is_finished(&mut self, _ctx: &mut TimelineCtx) -> bool {
        self.inner.is_finished()
    }
}

struct ParallelActions {
    actions: Vec<Box<dyn TimelineAction>>,
}

impl TimelineAction for ParallelActions {
    fn start(&mut self, ctx: &mut TimelineCtx) {
        for action in &mut self.actions {
            action.start(ctx);
        }
    }

    fn update(&mut self, ctx: &mut TimelineCtx) {
        for action in &mut self.actions {
            action.update(ctx);
        }
    }

    fn is_finished(&mut self, ctx: &mut TimelineCtx) -> bool {
        // Each child's end hook runs the frame it finishes, not when
        // the whole group does.
        let mut remaining = Vec::with_capacity(self.actions.len());
        for mut action in self.actions.drain(..) {
            if action.is_finished(ctx) {
                action.end(ctx);
            } else {
                remaining.push(action);
            }
        }
        self.actions = remaining;
        self.actions.is_empty()
    }
}
