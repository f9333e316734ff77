//! Deferred sizing and layout.
//!
//! Cores do not recompute anything when they are invalidated. They ask the
//! [`LayoutCoordinator`] of their context, which collects the requests and
//! works through them in one flush on the UI dispatcher:
//!
//! 1. sizing, deepest views first, until no sizing request is left;
//! 2. window auto-sizing;
//! 3. layout, shallowest views first, each view at most once per flush;
//! 4. window centering.
//!
//! The coordinator only holds weak references. Views dropped before their
//! turn are skipped.

use std::collections::HashSet;
use std::sync::{Arc, Weak};

use boden_core::logging::{span_names, targets};
use boden_core::{Dispatcher, PerfSpan, ProblemResponse, Result};
use parking_lot::Mutex;

use crate::view::View;
use crate::view::core::WindowCore;
use crate::view::tree::ViewId;

/// Upper bound of drain rounds within one phase. Work still pending after
/// that many rounds moves to the next flush.
const MAX_PHASE_ROUNDS: usize = 128;

#[derive(Default)]
struct PendingSet {
    order: Vec<(ViewId, Weak<View>)>,
    members: HashSet<ViewId>,
}

impl PendingSet {
    fn insert(&mut self, view: &Arc<View>) -> bool {
        if !self.members.insert(view.id()) {
            return false;
        }
        self.order.push((view.id(), Arc::downgrade(view)));
        true
    }

    fn remove(&mut self, id: ViewId) -> bool {
        if !self.members.remove(&id) {
            return false;
        }
        self.order.retain(|(entry, _)| *entry != id);
        true
    }

    fn contains(&self, id: ViewId) -> bool {
        self.members.contains(&id)
    }

    fn len(&self) -> usize {
        self.members.len()
    }

    fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[derive(Default)]
struct State {
    sizing: PendingSet,
    auto_size: PendingSet,
    layout: PendingSet,
    center: PendingSet,
    update_scheduled: bool,
    in_flush: bool,
}

impl State {
    fn has_pending(&self) -> bool {
        !(self.sizing.is_empty()
            && self.auto_size.is_empty()
            && self.layout.is_empty()
            && self.center.is_empty())
    }

    /// Mark a flush as scheduled. Returns `true` if the caller has to post
    /// it.
    fn claim_schedule(&mut self) -> bool {
        if self.update_scheduled || self.in_flush {
            return false;
        }
        self.update_scheduled = true;
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Sizing,
    AutoSize,
    Layout,
    Center,
}

impl Phase {
    fn name(self) -> &'static str {
        match self {
            Self::Sizing => "sizing",
            Self::AutoSize => "window auto-size",
            Self::Layout => "layout",
            Self::Center => "window centering",
        }
    }

    fn set(self, state: &mut State) -> &mut PendingSet {
        match self {
            Self::Sizing => &mut state.sizing,
            Self::AutoSize => &mut state.auto_size,
            Self::Layout => &mut state.layout,
            Self::Center => &mut state.center,
        }
    }
}

/// Collects sizing and layout requests and flushes them on the UI thread.
pub struct LayoutCoordinator {
    this: Weak<LayoutCoordinator>,
    dispatcher: Arc<Dispatcher>,
    state: Mutex<State>,
}

static_assertions::assert_impl_all!(LayoutCoordinator: Send, Sync);

impl LayoutCoordinator {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            this: this.clone(),
            dispatcher,
            state: Mutex::new(State::default()),
        })
    }

    /// Recompute the sizing info of `view` in the next flush.
    pub fn request_sizing_update(&self, view: &Arc<View>) {
        self.enqueue(Phase::Sizing, view);
    }

    /// Lay out the children of `view` in the next flush.
    pub fn request_layout(&self, view: &Arc<View>) {
        self.enqueue(Phase::Layout, view);
    }

    /// Size `window` to its content in the next flush.
    pub fn request_window_auto_size(&self, window: &Arc<View>) {
        self.enqueue(Phase::AutoSize, window);
    }

    /// Center `window` on its screen in the next flush.
    pub fn request_window_center(&self, window: &Arc<View>) {
        self.enqueue(Phase::Center, window);
    }

    pub fn is_sizing_pending(&self, id: ViewId) -> bool {
        self.state.lock().sizing.contains(id)
    }

    pub fn is_layout_pending(&self, id: ViewId) -> bool {
        self.state.lock().layout.contains(id)
    }

    /// Number of views waiting for a sizing update.
    pub fn pending_sizing_count(&self) -> usize {
        self.state.lock().sizing.len()
    }

    /// Number of pending requests over all phases.
    pub fn pending_count(&self) -> usize {
        let state = self.state.lock();
        state.sizing.len() + state.auto_size.len() + state.layout.len() + state.center.len()
    }

    pub fn is_update_scheduled(&self) -> bool {
        self.state.lock().update_scheduled
    }

    fn enqueue(&self, phase: Phase, view: &Arc<View>) {
        let schedule = {
            let mut state = self.state.lock();
            if !phase.set(&mut state).insert(view) {
                return;
            }
            state.claim_schedule()
        };
        tracing::trace!(target: targets::COORDINATOR, id = ?view.id(), phase = phase.name(), "requested");
        if schedule {
            self.schedule_flush();
        }
    }

    fn schedule_flush(&self) {
        let this = self.this.clone();
        self.dispatcher.post(move || match this.upgrade() {
            Some(coordinator) => coordinator.flush(),
            None => Ok(()),
        });
    }

    /// Work through every pending request. Normally posted by the
    /// coordinator itself; a call during a running flush does nothing.
    ///
    /// Returns the error of a unit of work the problem handler decided to
    /// abort on, marked as reported so the dispatcher does not hand it to
    /// the handler a second time. Requests not processed stay pending for
    /// the next flush.
    pub fn flush(&self) -> Result<()> {
        self.dispatcher
            .affinity()
            .debug_assert_same_thread("LayoutCoordinator::flush");
        {
            let mut state = self.state.lock();
            state.update_scheduled = false;
            if state.in_flush {
                return Ok(());
            }
            state.in_flush = true;
        }

        let result = {
            let _span = tracing::info_span!(target: targets::COORDINATOR, span_names::LAYOUT_FLUSH).entered();
            let _perf = PerfSpan::new("layout flush");
            self.run_phases()
        };

        let reschedule = {
            let mut state = self.state.lock();
            state.in_flush = false;
            state.has_pending() && state.claim_schedule()
        };
        if reschedule {
            tracing::trace!(target: targets::COORDINATOR, "work left after flush, rescheduling");
            self.schedule_flush();
        }
        result
    }

    fn run_phases(&self) -> Result<()> {
        self.drain(Phase::Sizing, |view| view.update_sizing_info())?;
        self.drain(Phase::AutoSize, |view| with_window_core(view, |w| w.auto_size()))?;
        self.drain(Phase::Layout, |view| view.layout())?;
        self.drain(Phase::Center, |view| with_window_core(view, |w| w.center()))
    }

    /// Run `work` on every view pending in `phase` until the set stays
    /// empty. Each view leaves the set right before its work runs, so
    /// requests made for views still waiting are absorbed.
    fn drain<F>(&self, phase: Phase, work: F) -> Result<()>
    where
        F: Fn(&Arc<View>) -> Result<()>,
    {
        let mut done: HashSet<ViewId> = HashSet::new();
        for _ in 0..MAX_PHASE_ROUNDS {
            let snapshot = phase.set(&mut self.state.lock()).order.clone();

            let mut live = Vec::with_capacity(snapshot.len());
            let mut dead = Vec::new();
            for (id, weak) in snapshot {
                match weak.upgrade() {
                    Some(view) => live.push((view.depth(), view)),
                    None => dead.push(id),
                }
            }
            if !dead.is_empty() {
                let mut state = self.state.lock();
                for id in dead {
                    phase.set(&mut state).remove(id);
                }
            }

            // A view runs at most once per flush in the layout phase; a
            // repeated request waits for the next flush.
            if phase == Phase::Layout {
                live.retain(|(_, view)| !done.contains(&view.id()));
            }
            if live.is_empty() {
                return Ok(());
            }

            match phase {
                Phase::Sizing => live.sort_by(|a, b| b.0.cmp(&a.0)),
                Phase::Layout => live.sort_by(|a, b| a.0.cmp(&b.0)),
                Phase::AutoSize | Phase::Center => {}
            }

            for (_, view) in live {
                let id = view.id();
                if !phase.set(&mut self.state.lock()).remove(id) {
                    continue;
                }
                done.insert(id);
                tracing::trace!(target: targets::COORDINATOR, ?id, phase = phase.name(), "running");
                if let Err(err) = work(&view) {
                    let origin = format!("{} of view {id:?}", phase.name());
                    if self.dispatcher.report_problem(err.clone(), origin) == ProblemResponse::Abort {
                        tracing::warn!(target: targets::COORDINATOR, phase = phase.name(), "flush aborted");
                        return Err(err.reported());
                    }
                }
            }
        }
        tracing::warn!(
            target: targets::COORDINATOR,
            phase = phase.name(),
            "phase did not settle, leaving the rest for the next flush"
        );
        Ok(())
    }
}

/// Run `f` on the window capability of the view's core. Views without one
/// are skipped.
fn with_window_core<F>(view: &Arc<View>, f: F) -> Result<()>
where
    F: FnOnce(&dyn WindowCore) -> Result<()>,
{
    let Some(core) = view.view_core() else {
        return Ok(());
    };
    match core.as_window_core() {
        Some(window) => f(window),
        None => Ok(()),
    }
}

impl std::fmt::Debug for LayoutCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("LayoutCoordinator")
            .field("sizing", &state.sizing.len())
            .field("auto_size", &state.auto_size.len())
            .field("layout", &state.layout.len())
            .field("center", &state.center.len())
            .field("update_scheduled", &state.update_scheduled)
            .finish()
    }
}
