//! # Timer List
//!
//! A sorted, singly linked list of pending one-shot timeouts, headed by
//! a sentinel node. Every stored `timeout` is a **delta from the
//! previous node** — only the head's first real entry holds an absolute
//! tick count, which is why a single subtraction on the first survivor
//! is enough to advance every later node implicitly on tick.
//!
//! There are no periodic timers: every armed event fires at most once
//! and must be re-armed with [`TimerList::start`] to fire again.
use core::num::NonZeroU32;
use core::ptr::NonNull;

use crate::config::Tick;
use crate::event::Event;
use crate::hooks::Hooks;
use crate::sync::critical;
use crate::tcb::Tcb;

/// Sorted delta-list of armed timeouts.
///
/// Owned by [`crate::scheduler::Scheduler`]; application code reaches
/// these operations through [`crate::kernel::Kernel`].
pub struct TimerList {
    head: Event,
}

// Safety: `head` is an `Event`, already `Sync` under the same
// critical-section discipline documented there.
unsafe impl Sync for TimerList {}

impl TimerList {
    /// An empty timer list.
    pub const fn new() -> Self {
        Self { head: Event::new() }
    }

    /// Arm `event` to fire after `ticks` ticks.
    ///
    /// If `event` is already armed, it is removed first and its
    /// remaining delta folded into its successor so later entries keep
    /// their absolute firing times (restart is unlink-then-reinsert,
    /// not a special case). `ticks` is a `NonZeroU32` so that a
    /// zero-duration timer — which would violate "armed ⇔ timeout > 0"
    /// (see `DESIGN.md`, Open Question 1) — is unrepresentable rather
    /// than merely checked.
    pub fn start(&self, event: &Event, ticks: NonZeroU32) {
        critical(|_cs| self.start_in_section(event, ticks.get()));
    }

    /// Identical to [`TimerList::start`] but without the critical
    /// section — call only from a context already known to exclude
    /// concurrent mutation of the list.
    pub fn start_isr(&self, event: &Event, ticks: NonZeroU32) {
        self.start_in_section(event, ticks.get());
    }

    fn start_in_section(&self, event: &Event, ticks: u32) {
        if event.timeout.get() > 0 {
            self.unlink(event);
        }

        let head_ptr = NonNull::from(&self.head);
        let mut prev = head_ptr;
        let mut base: u32 = 0;

        loop {
            match unsafe { prev.as_ref() }.next.get() {
                None => break,
                Some(n) => {
                    let node = unsafe { n.as_ref() };
                    base += node.timeout.get();
                    if base >= ticks {
                        break;
                    }
                    prev = n;
                }
            }
        }

        match unsafe { prev.as_ref() }.next.get() {
            None => {
                event.timeout.set(ticks - base);
                event.next.set(None);
                unsafe { prev.as_ref() }.next.set(Some(NonNull::from(event)));
            }
            Some(succ_ptr) => {
                let succ = unsafe { succ_ptr.as_ref() };
                event.timeout.set(ticks - (base - succ.timeout.get()));
                succ.timeout.set(base - ticks);
                event.next.set(Some(succ_ptr));
                unsafe { prev.as_ref() }.next.set(Some(NonNull::from(event)));
            }
        }
    }

    /// Disarm `event`. A no-op if it has no active timer.
    pub fn stop(&self, event: &Event) {
        critical(|_cs| self.stop_in_section(event));
    }

    /// Identical to [`TimerList::stop`] but without the critical
    /// section.
    pub fn stop_isr(&self, event: &Event) {
        self.stop_in_section(event);
    }

    fn stop_in_section(&self, event: &Event) {
        if event.timeout.get() == 0 {
            return;
        }
        self.unlink(event);
    }

    /// Unlink `event` from the list, assumed currently armed, folding
    /// its remaining delta into its successor (if any — see
    /// `DESIGN.md`, Open Question 2: the source dereferences the
    /// successor unconditionally, which is unsound when the unlinked
    /// node is the tail).
    fn unlink(&self, event: &Event) {
        let head_ptr = NonNull::from(&self.head);
        let mut prev = head_ptr;
        loop {
            match unsafe { prev.as_ref() }.next.get() {
                Some(n) if core::ptr::eq(n.as_ptr(), event as *const Event as *mut Event) => break,
                Some(n) => prev = n,
                None => return,
            }
        }

        let event_next = event.next.get();
        unsafe { prev.as_ref() }.next.set(event_next);
        if let Some(succ_ptr) = event_next {
            let succ = unsafe { succ_ptr.as_ref() };
            succ.timeout.set(succ.timeout.get() + event.timeout.get());
        }
        event.next.set(None);
        event.timeout.set(0);
    }

    /// Advance the list by `ticks`, raising the bound task's event bit
    /// for every timer that expires in this batch. `ticks` may be
    /// arbitrary: `0` is a no-op and a very large delta correctly fires
    /// every expired timer in one call.
    pub fn tick_handle<H: Hooks>(&self, ticks: Tick, tasks: &[Tcb<H>]) {
        critical(|_cs| self.tick_handle_in_section(ticks, tasks));
    }

    /// Identical to [`TimerList::tick_handle`] but without the critical
    /// section — the ISR form, normally called directly from a tick
    /// timer interrupt handler.
    pub fn tick_handle_isr<H: Hooks>(&self, ticks: Tick, tasks: &[Tcb<H>]) {
        self.tick_handle_in_section(ticks, tasks);
    }

    fn tick_handle_in_section<H: Hooks>(&self, mut ticks: Tick, tasks: &[Tcb<H>]) {
        if ticks == 0 {
            return;
        }
        loop {
            match self.head.next.get() {
                None => break,
                Some(n) => {
                    let node = unsafe { n.as_ref() };
                    if node.timeout.get() > ticks {
                        node.timeout.set(node.timeout.get() - ticks);
                        break;
                    }
                    ticks -= node.timeout.get();
                    let id = node.id.get();
                    if id >= 0 {
                        let tcb = &tasks[id as usize];
                        tcb.flag.set(tcb.flag.get() | node.mask.get());
                    }
                    self.head.next.set(node.next.get());
                    node.next.set(None);
                    node.timeout.set(0);
                }
            }
        }
    }

    /// The first (soonest-firing) timer's absolute remaining ticks, or
    /// `0` if the list is empty. Intended for sizing a tickless-idle
    /// sleep.
    pub fn get_min(&self) -> Tick {
        match self.head.next.get() {
            Some(n) => unsafe { n.as_ref() }.timeout.get(),
            None => 0,
        }
    }
}

impl Default for TimerList {
    fn default() -> Self {
        Self::new()
    }
}
