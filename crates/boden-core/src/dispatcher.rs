//! The UI-affine execution context.
//!
//! A [`Dispatcher`] is bound to the thread that created it. Any thread may
//! post work; the work runs when the UI thread calls
//! [`Dispatcher::process_pending`] (one idle pass) or
//! [`Dispatcher::run_until_idle`]. Delayed work waits in a deadline-ordered
//! queue until it is due.
//!
//! Posted work returns [`Result`]. A failed unit of work is reported to the
//! installed [`UnhandledProblemHandler`], which decides whether the
//! dispatcher resumes with the next unit or aborts the pass.
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use boden_core::{BodenError, Dispatcher};
//!
//! let dispatcher = Dispatcher::new();
//! let ran = Arc::new(AtomicUsize::new(0));
//!
//! let counter = ran.clone();
//! dispatcher.post(move || {
//!     counter.fetch_add(1, Ordering::SeqCst);
//!     Ok(())
//! });
//! dispatcher.post(|| Err(BodenError::programming("broken view")));
//!
//! // The default handler logs the failure and keeps going.
//! assert_eq!(dispatcher.process_pending().unwrap(), 2);
//! assert_eq!(ran.load(Ordering::SeqCst), 1);
//! ```

use std::cmp::Ordering as CmpOrdering;
use std::collections::BinaryHeap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use parking_lot::{Mutex, RwLock};
use slotmap::{SlotMap, new_key_type};

use crate::error::{BodenError, Result};
use crate::logging::{span_names, targets};
use crate::thread_check::ThreadAffinity;

/// A unique identifier for posted work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

fn next_task_id() -> TaskId {
    TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
}

new_key_type! {
    /// Identifier of work posted with a delay; used to cancel it.
    pub struct DelayedTaskId;
}

type BoxedTask = Box<dyn FnOnce() -> Result<()> + Send + 'static>;

struct QueuedTask {
    id: TaskId,
    task: BoxedTask,
}

// ============================================================================
// Unhandled problems
// ============================================================================

/// A failure raised by a unit of scheduled work.
#[derive(Debug, Clone)]
pub struct UnhandledProblem {
    /// What failed.
    pub error: BodenError,
    /// Where it failed, e.g. `"layout"` or `"posted task 17"`.
    pub origin: String,
}

impl fmt::Display for UnhandledProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unhandled problem in {}: {}", self.origin, self.error)
    }
}

/// The handler's decision about how to continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemResponse {
    /// Drop the failed unit and continue with the remaining work.
    Resume,
    /// Stop the current pass. Work that has not run yet stays queued.
    Abort,
}

/// Decides what happens after scheduled work failed.
pub trait UnhandledProblemHandler: Send + Sync {
    fn handle(&self, problem: &UnhandledProblem) -> ProblemResponse;
}

/// The default handler: log the problem and keep running.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAndResume;

impl UnhandledProblemHandler for LogAndResume {
    fn handle(&self, problem: &UnhandledProblem) -> ProblemResponse {
        if problem.error.is_programming_error() {
            tracing::error!(target: targets::DISPATCHER, origin = %problem.origin, error = %problem.error, "programming error in scheduled work");
        } else {
            tracing::warn!(target: targets::DISPATCHER, origin = %problem.origin, error = %problem.error, "scheduled work failed");
        }
        ProblemResponse::Resume
    }
}

impl<F> UnhandledProblemHandler for F
where
    F: Fn(&UnhandledProblem) -> ProblemResponse + Send + Sync,
{
    fn handle(&self, problem: &UnhandledProblem) -> ProblemResponse {
        self(problem)
    }
}

// ============================================================================
// Delayed queue
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct DelayedEntry {
    id: DelayedTaskId,
    due: Instant,
    seq: u64,
}

impl PartialEq for DelayedEntry {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for DelayedEntry {}

impl PartialOrd for DelayedEntry {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl Ord for DelayedEntry {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        // Reversed for a min-heap; equal deadlines keep posting order.
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Default)]
struct DelayedQueue {
    tasks: SlotMap<DelayedTaskId, BoxedTask>,
    heap: BinaryHeap<DelayedEntry>,
    seq: u64,
}

impl DelayedQueue {
    fn insert(&mut self, due: Instant, task: BoxedTask) -> DelayedTaskId {
        let id = self.tasks.insert(task);
        self.seq += 1;
        self.heap.push(DelayedEntry {
            id,
            due,
            seq: self.seq,
        });
        id
    }

    /// Remove every task due at `now`, in deadline order. Cancelled entries
    /// left in the heap are skipped.
    fn take_due(&mut self, now: Instant) -> Vec<BoxedTask> {
        let mut due = Vec::new();
        while let Some(entry) = self.heap.peek() {
            if entry.due > now {
                break;
            }
            let entry = *entry;
            self.heap.pop();
            if let Some(task) = self.tasks.remove(entry.id) {
                due.push(task);
            }
        }
        due
    }

    fn next_deadline(&mut self) -> Option<Instant> {
        while let Some(entry) = self.heap.peek() {
            if self.tasks.contains_key(entry.id) {
                return Some(entry.due);
            }
            self.heap.pop();
        }
        None
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

/// The UI-affine execution context.
pub struct Dispatcher {
    affinity: ThreadAffinity,
    sender: Sender<QueuedTask>,
    receiver: Receiver<QueuedTask>,
    delayed: Mutex<DelayedQueue>,
    handler: RwLock<Arc<dyn UnhandledProblemHandler>>,
}

impl Dispatcher {
    /// Create a dispatcher bound to the calling thread.
    pub fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self {
            affinity: ThreadAffinity::current(),
            sender,
            receiver,
            delayed: Mutex::new(DelayedQueue::default()),
            handler: RwLock::new(Arc::new(LogAndResume)),
        }
    }

    /// The UI thread this dispatcher is bound to.
    #[inline]
    pub fn affinity(&self) -> ThreadAffinity {
        self.affinity
    }

    /// Whether the calling thread is the UI thread.
    #[inline]
    pub fn is_ui_thread(&self) -> bool {
        self.affinity.is_same_thread()
    }

    /// Install the handler for failed work.
    pub fn set_problem_handler(&self, handler: Arc<dyn UnhandledProblemHandler>) {
        *self.handler.write() = handler;
    }

    /// Report a failure through the installed handler.
    pub fn report_problem(&self, error: BodenError, origin: impl Into<String>) -> ProblemResponse {
        let problem = UnhandledProblem {
            error,
            origin: origin.into(),
        };
        let handler = self.handler.read().clone();
        handler.handle(&problem)
    }

    /// Post work to run on the UI thread at the next idle pass.
    pub fn post<F>(&self, task: F) -> TaskId
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        let id = next_task_id();
        // The dispatcher owns the receiver, so the channel is never closed
        // while `self` is alive.
        let _ = self.sender.send(QueuedTask {
            id,
            task: Box::new(task),
        });
        tracing::trace!(target: targets::DISPATCHER, task = id.as_u64(), "task posted");
        id
    }

    /// Post work to run once `delay` has passed.
    pub fn post_delayed<F>(&self, delay: Duration, task: F) -> DelayedTaskId
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        self.delayed
            .lock()
            .insert(Instant::now() + delay, Box::new(task))
    }

    /// Cancel delayed work. Returns `true` if it had not run yet.
    pub fn cancel_delayed(&self, id: DelayedTaskId) -> bool {
        self.delayed.lock().tasks.remove(id).is_some()
    }

    /// A cloneable handle other threads can post through.
    pub fn handle(&self) -> DispatchHandle {
        DispatchHandle {
            sender: self.sender.clone(),
        }
    }

    /// Number of immediately runnable tasks.
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Whether immediate work is queued.
    pub fn has_pending(&self) -> bool {
        !self.receiver.is_empty()
    }

    /// The deadline of the earliest delayed task, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.delayed.lock().next_deadline()
    }

    /// Run one idle pass: every due delayed task, then every task that was
    /// queued when the pass started.
    ///
    /// Returns the number of tasks run. Returns the error when the problem
    /// handler decided to abort; the unrun tasks stay queued.
    pub fn process_pending(&self) -> Result<usize> {
        self.affinity.check("Dispatcher::process_pending")?;
        let _span = tracing::trace_span!(target: targets::DISPATCHER, span_names::DISPATCH).entered();

        let mut ran = 0;
        let due = self.delayed.lock().take_due(Instant::now());
        let mut due = due.into_iter();
        while let Some(task) = due.next() {
            ran += 1;
            if let Err(err) = task() {
                if let Some(err) = self.handle_task_error(err, || "delayed task".to_owned()) {
                    self.requeue_remaining(due);
                    return Err(err);
                }
            }
        }

        let batch = self.receiver.len();
        for _ in 0..batch {
            let queued = match self.receiver.try_recv() {
                Ok(queued) => queued,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            };
            ran += 1;
            if let Err(err) = (queued.task)() {
                let id = queued.id.as_u64();
                if let Some(err) = self.handle_task_error(err, || format!("posted task {id}")) {
                    return Err(err);
                }
            }
        }
        Ok(ran)
    }

    /// Run idle passes until no immediate work is left, at most
    /// `max_passes` times. Returns the total number of tasks run.
    pub fn run_until_idle(&self, max_passes: usize) -> Result<usize> {
        let mut total = 0;
        for _ in 0..max_passes {
            let ran = self.process_pending()?;
            total += ran;
            if ran == 0 && !self.has_pending() {
                break;
            }
        }
        Ok(total)
    }

    /// Decide what a failed task means for the running pass. Returns the
    /// error to stop with, or `None` to go on.
    ///
    /// An error marked as reported already went through the handler, which
    /// chose to abort. It stops the pass without a second report.
    fn handle_task_error<O>(&self, err: BodenError, origin: O) -> Option<BodenError>
    where
        O: FnOnce() -> String,
    {
        if err.is_reported() {
            return Some(err.into_unreported());
        }
        match self.report_problem(err.clone(), origin()) {
            ProblemResponse::Abort => Some(err),
            ProblemResponse::Resume => None,
        }
    }

    fn requeue_remaining(&self, remaining: impl Iterator<Item = BoxedTask>) {
        let now = Instant::now();
        let mut delayed = self.delayed.lock();
        for task in remaining {
            delayed.insert(now, task);
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("affinity", &self.affinity)
            .field("pending", &self.receiver.len())
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(Dispatcher: Send, Sync);

/// Posts work to a [`Dispatcher`] from any thread.
#[derive(Clone)]
pub struct DispatchHandle {
    sender: Sender<QueuedTask>,
}

impl DispatchHandle {
    /// Post work; fails once the dispatcher has been dropped.
    pub fn post<F>(&self, task: F) -> Result<TaskId>
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        let id = next_task_id();
        self.sender
            .send(QueuedTask {
                id,
                task: Box::new(task),
            })
            .map_err(|_| BodenError::DispatcherClosed)?;
        Ok(id)
    }
}

impl fmt::Debug for DispatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchHandle").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter() -> (Arc<AtomicUsize>, impl Fn() -> Result<()> + Clone + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        (count, move || {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    #[test]
    fn test_post_and_process() {
        let dispatcher = Dispatcher::new();
        let (count, task) = counter();

        dispatcher.post(task.clone());
        dispatcher.post(task);
        assert_eq!(dispatcher.pending_count(), 2);

        assert_eq!(dispatcher.process_pending().unwrap(), 2);
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(!dispatcher.has_pending());
    }

    #[test]
    fn test_work_posted_during_pass_runs_next_pass() {
        let dispatcher = Arc::new(Dispatcher::new());
        let (count, task) = counter();

        let d = dispatcher.clone();
        dispatcher.post(move || {
            d.post(task);
            Ok(())
        });

        assert_eq!(dispatcher.process_pending().unwrap(), 1);
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(dispatcher.process_pending().unwrap(), 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_run_until_idle() {
        let dispatcher = Arc::new(Dispatcher::new());
        let (count, task) = counter();

        let d = dispatcher.clone();
        dispatcher.post(move || {
            d.post(task);
            Ok(())
        });
        assert_eq!(dispatcher.run_until_idle(10).unwrap(), 2);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_default_handler_resumes() {
        let dispatcher = Dispatcher::new();
        let (count, task) = counter();

        dispatcher.post(|| Err(BodenError::programming("first fails")));
        dispatcher.post(task);

        assert_eq!(dispatcher.process_pending().unwrap(), 2);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_abort_handler_stops_pass() {
        let dispatcher = Dispatcher::new();
        let (count, task) = counter();
        dispatcher.set_problem_handler(Arc::new(|_: &UnhandledProblem| ProblemResponse::Abort));

        dispatcher.post(|| Err(BodenError::invalid_argument("bad")));
        dispatcher.post(task);

        let err = dispatcher.process_pending().unwrap_err();
        assert!(matches!(err, BodenError::InvalidArgument(_)));
        assert_eq!(count.load(Ordering::SeqCst), 0);

        // The second task is still queued
        assert_eq!(dispatcher.pending_count(), 1);
        assert_eq!(dispatcher.process_pending().unwrap(), 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reported_error_stops_pass_without_second_report() {
        let dispatcher = Dispatcher::new();
        let (count, task) = counter();
        let reports = Arc::new(AtomicUsize::new(0));
        let r = reports.clone();
        dispatcher.set_problem_handler(Arc::new(move |_: &UnhandledProblem| {
            r.fetch_add(1, Ordering::SeqCst);
            ProblemResponse::Abort
        }));

        dispatcher.post(|| Err(BodenError::programming("seen").reported()));
        dispatcher.post(task);

        let err = dispatcher.process_pending().unwrap_err();
        assert_eq!(err, BodenError::programming("seen"));
        assert_eq!(reports.load(Ordering::SeqCst), 0);
        assert_eq!(dispatcher.pending_count(), 1);

        dispatcher.post_delayed(Duration::ZERO, || {
            Err(BodenError::invalid_argument("late").reported())
        });
        let err = dispatcher.process_pending().unwrap_err();
        assert_eq!(err, BodenError::invalid_argument("late"));
        assert_eq!(reports.load(Ordering::SeqCst), 0);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_handler_sees_origin() {
        let dispatcher = Dispatcher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        dispatcher.set_problem_handler(Arc::new(move |p: &UnhandledProblem| {
            s.lock().push(p.origin.clone());
            ProblemResponse::Resume
        }));

        let id = dispatcher.post(|| Err(BodenError::programming("x")));
        dispatcher.process_pending().unwrap();

        assert_eq!(*seen.lock(), vec![format!("posted task {}", id.as_u64())]);
    }

    #[test]
    fn test_delayed_tasks() {
        let dispatcher = Dispatcher::new();
        let (count, task) = counter();

        dispatcher.post_delayed(Duration::ZERO, task.clone());
        let later = dispatcher.post_delayed(Duration::from_secs(3600), task);
        assert!(dispatcher.next_deadline().is_some());

        assert_eq!(dispatcher.process_pending().unwrap(), 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);

        assert!(dispatcher.cancel_delayed(later));
        assert!(!dispatcher.cancel_delayed(later));
        assert!(dispatcher.next_deadline().is_none());
    }

    #[test]
    fn test_post_from_other_thread() {
        let dispatcher = Dispatcher::new();
        let handle = dispatcher.handle();
        let (count, task) = counter();

        std::thread::spawn(move || handle.post(task).map(|_| ()))
            .join()
            .unwrap()
            .unwrap();

        assert_eq!(dispatcher.process_pending().unwrap(), 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handle_fails_after_dispatcher_dropped() {
        let dispatcher = Dispatcher::new();
        let handle = dispatcher.handle();
        drop(dispatcher);

        let err = handle.post(|| Ok(())).unwrap_err();
        assert_eq!(err, BodenError::DispatcherClosed);
    }

    #[test]
    fn test_process_pending_off_thread_is_programming_error() {
        let dispatcher = Arc::new(Dispatcher::new());
        let d = dispatcher.clone();
        let result = std::thread::spawn(move || d.process_pending())
            .join()
            .unwrap();
        assert!(result.unwrap_err().is_programming_error());
    }
}
