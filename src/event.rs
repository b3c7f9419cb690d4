//! # Event Binding and Posting
//!
//! An [`Event`] is a one-bit signal, owned by application code and bound
//! to at most one task. Binding assigns the event the next free bit in
//! its task's ready-flag word; posting ORs that bit in; the scheduler
//! dispatches the task and the body discriminates which event(s) fired
//! via [`Event::assert`].
//!
//! Bit assignment is strictly sequential and gap-free, and there is no
//! unbind operation — see `DESIGN.md` for why gap reuse is intentionally
//! unsupported (it would require per-bit liveness tracking the contract
//! omits). Once bound, an event's mask is stable for the program's
//! lifetime.
use core::cell::Cell;
use core::ptr::NonNull;

use crate::config::{Tick, MAX_EVENTS_PER_TASK};
use crate::hooks::Hooks;
use crate::sync::critical;
use crate::tcb::Tcb;

/// A one-bit signal bound to exactly one task.
///
/// Constructed unbound with [`Event::new`]; application code declares
/// events in static storage and binds each one exactly once before use.
/// An `Event` must never be moved or copied once it has an active
/// timer (see [`crate::timer`]) — its address is captured by the
/// timer list's intrusive links.
pub struct Event {
    /// Bound task id, or `-1` if unbound. Kept as a signed sentinel
    /// (rather than `Option<usize>`) to mirror the source contract's
    /// "`E.id >= 0` ⇔ E is bound" wording directly — see `DESIGN.md`.
    pub(crate) id: Cell<i32>,
    /// One-hot bit selecting which bit of the bound task's flag word
    /// this event sets. Meaningless while unbound.
    pub(crate) mask: Cell<u32>,
    /// Remaining ticks until expiry, as a delta relative to the
    /// previous entry in the timer list. `0` means "not listed".
    pub(crate) timeout: Cell<Tick>,
    /// Intrusive forward pointer in the timer list. `None` when not
    /// linked.
    pub(crate) next: Cell<Option<NonNull<Event>>>,
}

// Safety: all fields are Cell; every mutation happens inside a critical
// section or an ISR context the caller guarantees excludes concurrent
// access, matching the discipline documented on `Tcb`.
unsafe impl Sync for Event {}

impl Event {
    /// Construct an unbound event, armed with no timer.
    pub const fn new() -> Self {
        Self {
            id: Cell::new(-1),
            mask: Cell::new(0),
            timeout: Cell::new(0),
            next: Cell::new(None),
        }
    }

    /// Whether this event is currently bound to a task.
    #[inline]
    pub fn is_bound(&self) -> bool {
        self.id.get() >= 0
    }

    /// Whether this event currently has an active (armed) timer.
    #[inline]
    pub fn is_armed(&self) -> bool {
        self.timeout.get() > 0
    }

    fn bind_unchecked<H: Hooks>(&self, tcb: &Tcb<H>) {
        let counter = tcb.counter.get();
        self.next.set(None);
        self.timeout.set(0);
        self.mask.set(1u32 << counter);
        self.id.set(tcb.id() as i32);
        tcb.counter.set(counter + 1);
    }

    /// Bind this event to `tcb`.
    ///
    /// Succeeds iff `tcb` has bound fewer than [`MAX_EVENTS_PER_TASK`]
    /// events and this event is not already bound to some task.
    /// Rebinding an already-bound event is refused, not redirected.
    ///
    /// Call from thread context; see [`Event::bind_isr`] for the
    /// interrupt-context form.
    pub fn bind<H: Hooks>(&self, tcb: &Tcb<H>) -> bool {
        critical(|_cs| self.bind_in_section(tcb))
    }

    /// Identical to [`Event::bind`] but without the critical section —
    /// call only from a context already known to exclude concurrent
    /// mutation of `tcb` and `self` (an interrupt handler whose priority
    /// excludes the relevant thread and ISR contexts).
    pub fn bind_isr<H: Hooks>(&self, tcb: &Tcb<H>) -> bool {
        self.bind_in_section(tcb)
    }

    fn bind_in_section<H: Hooks>(&self, tcb: &Tcb<H>) -> bool {
        if tcb.counter.get() >= MAX_EVENTS_PER_TASK {
            return false;
        }
        if self.is_bound() {
            return false;
        }
        self.bind_unchecked(tcb);
        true
    }

    /// Post this event: OR its mask into its bound task's ready-flag
    /// word. A no-op if the event is unbound. Never fails, never
    /// blocks.
    ///
    /// `tasks` is the same task table passed to
    /// [`crate::scheduler::Scheduler::start`] — callers normally reach
    /// this through [`crate::kernel::Kernel::event_post`] rather than
    /// calling it directly.
    pub fn post<H: Hooks>(&self, tasks: &[Tcb<H>]) {
        let id = self.id.get();
        if id < 0 {
            return;
        }
        critical(|_cs| {
            let tcb = &tasks[id as usize];
            tcb.flag.set(tcb.flag.get() | self.mask.get());
        });
    }

    /// Identical to [`Event::post`] but without the critical section —
    /// the ISR form, for posting from an interrupt handler.
    pub fn post_isr<H: Hooks>(&self, tasks: &[Tcb<H>]) {
        let id = self.id.get();
        if id < 0 {
            return;
        }
        let tcb = &tasks[id as usize];
        tcb.flag.set(tcb.flag.get() | self.mask.get());
    }

    /// Returns whether this event's bit is set in `ready_snapshot` — the
    /// flag word the scheduler captured immediately before dispatching
    /// the currently running task body.
    ///
    /// Only meaningful when called from within a running task body;
    /// the snapshot is stale otherwise. See
    /// [`crate::kernel::Kernel::event_assert`].
    #[inline]
    pub fn assert(&self, ready_snapshot: u32) -> bool {
        (ready_snapshot & self.mask.get()) == self.mask.get()
    }
}

impl Default for Event {
    fn default() -> Self {
        Self::new()
    }
}
