//! # Kernel
//!
//! Thin public facade over [`Scheduler`]. Every method here mirrors one
//! of the source kernel's C entry points (`OSStart`, `OSEventBind`,
//! `OSEventPost`, `OSTimeoutStart`, `OSTickHandle`, ...) but takes and
//! returns the typed equivalents instead of raw pointers.
//!
//! ## Startup sequence
//!
//! ```text
//! static SCHEDULER: Scheduler<MyHooks, N> = Scheduler::new([...]);
//! static KERNEL: Kernel<MyHooks, N> = Kernel::new(&SCHEDULER);
//!
//! fn main() -> ! {
//!     KERNEL.start()   // runs task initializers, then the dispatch loop — never returns
//! }
//! ```
use core::num::NonZeroU32;

use crate::config::Tick;
use crate::event::Event;
use crate::hooks::Hooks;
use crate::scheduler::Scheduler;
use crate::tcb::Tcb;

/// Public entry point wrapping a `'static` [`Scheduler`].
///
/// Holding a `&'static` reference (rather than owning the scheduler)
/// lets application code place the scheduler in `static` storage so
/// both thread-context calls and ISRs can reach it without `unsafe`
/// pointer juggling.
pub struct Kernel<H: Hooks, const N: usize> {
    scheduler: &'static Scheduler<H, N>,
}

impl<H: Hooks, const N: usize> Kernel<H, N> {
    /// Wrap an already-constructed, `'static` scheduler.
    pub const fn new(scheduler: &'static Scheduler<H, N>) -> Self {
        Self { scheduler }
    }

    /// The task table, for application code that needs to bind events
    /// to specific tasks (`event.bind(&kernel.tasks()[i])`).
    pub fn tasks(&self) -> &[Tcb<H>; N] {
        &self.scheduler.tasks
    }

    /// Run every task's one-shot initializer, then start the dispatch
    /// loop. Never returns.
    pub fn start(&self) -> ! {
        self.scheduler.init_tasks();
        self.scheduler.run()
    }

    /// Bind `event` to `tcb`. See [`Event::bind`].
    pub fn event_bind(&self, tcb: &Tcb<H>, event: &Event) -> bool {
        event.bind(tcb)
    }

    /// ISR form of [`Kernel::event_bind`].
    pub fn event_bind_isr(&self, tcb: &Tcb<H>, event: &Event) -> bool {
        event.bind_isr(tcb)
    }

    /// Post `event`, waking its bound task on the next dispatch scan.
    pub fn event_post(&self, event: &Event) {
        event.post(&self.scheduler.tasks);
    }

    /// ISR form of [`Kernel::event_post`].
    pub fn event_post_isr(&self, event: &Event) {
        event.post_isr(&self.scheduler.tasks);
    }

    /// Returns whether `event`'s bit was set in the flag word the
    /// scheduler captured immediately before dispatching the currently
    /// running task. See [`Event::assert`].
    ///
    /// Only meaningful when called from within a running task body —
    /// the snapshot belongs to whichever task was most recently
    /// dispatched.
    pub fn event_assert(&self, event: &Event) -> bool {
        event.assert(self.scheduler.ready_snapshot())
    }

    /// Arm `event` to fire after `ticks` system ticks.
    pub fn timeout_start(&self, event: &Event, ticks: NonZeroU32) {
        self.scheduler.timers.start(event, ticks);
    }

    /// ISR form of [`Kernel::timeout_start`].
    pub fn timeout_start_isr(&self, event: &Event, ticks: NonZeroU32) {
        self.scheduler.timers.start_isr(event, ticks);
    }

    /// Disarm `event`'s timer, if any.
    pub fn timeout_stop(&self, event: &Event) {
        self.scheduler.timers.stop(event);
    }

    /// ISR form of [`Kernel::timeout_stop`].
    pub fn timeout_stop_isr(&self, event: &Event) {
        self.scheduler.timers.stop_isr(event);
    }

    /// Advance the timer list by `ticks`, call from the system tick
    /// interrupt handler.
    pub fn tick_handle(&self, ticks: Tick) {
        self.scheduler.tick_handle(ticks);
    }

    /// ISR form of [`Kernel::tick_handle`] — identical in this crate,
    /// since `tick_handle` is itself normally called from interrupt
    /// context; provided for symmetry with the other `_isr` pairs.
    pub fn tick_handle_isr(&self, ticks: Tick) {
        self.scheduler.tick_handle_isr(ticks);
    }

    /// Remaining ticks until the soonest-firing armed timer, or `0` if
    /// none are armed. Useful for sizing a tickless-idle sleep.
    pub fn tick_get_min(&self) -> Tick {
        self.scheduler.timers.get_min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::NoHooks;

    fn body(_tcb: &Tcb<NoHooks>) {}

    #[test]
    fn event_bind_and_post_route_through_the_shared_task_table() {
        static SCHED: Scheduler<NoHooks, 2> = Scheduler::new([Tcb::new(body), Tcb::new(body)]);
        let kernel = Kernel::new(&SCHED);
        kernel.scheduler.init_tasks();

        let event = Event::new();
        assert!(kernel.event_bind(&kernel.tasks()[1], &event));

        kernel.event_post(&event);
        assert_eq!(kernel.tasks()[1].flag.get(), event.mask.get());
    }

    #[test]
    fn tick_get_min_reports_zero_with_no_armed_timers() {
        static SCHED: Scheduler<NoHooks, 1> = Scheduler::new([Tcb::new(body)]);
        let kernel = Kernel::new(&SCHED);
        assert_eq!(kernel.tick_get_min(), 0);
    }
}
