//! # Scheduler
//!
//! The dispatch loop: a strict, fixed-priority, cooperative scan over a
//! fixed task table. There is no preemption and no time slicing — a
//! dispatched task runs its body to completion on the shared stack
//! before the scheduler looks at anything else.
//!
//! ## Dispatch loop
//!
//! Each iteration:
//! 1. [`Hooks::circulate_begin`] runs.
//! 2. The task at `cursor` has its `flag` word sampled and cleared
//!    (inside a critical section) into `ready_snapshot`.
//! 3. If `ready_snapshot != 0`, the task's body runs with that
//!    snapshot, [`Hooks::timestamp`] brackets it to update
//!    [`Tcb::max_tick`](crate::tcb::Tcb), the cursor resets to `0`, and
//!    the loop restarts immediately — skipping step 5 entirely, so a
//!    continuously-ready low-index task can starve later-index tasks
//!    (see `DESIGN.md`, Open Question 3: this is an intentional
//!    consequence of strict fixed-priority scheduling, not a bug).
//! 4. Otherwise the cursor advances; after the last task it wraps to
//!    `0` and [`Hooks::idle`] runs once per full empty scan.
//! 5. [`Hooks::circulate_end`] runs — but only on iterations that
//!    didn't dispatch a task (see [`Hooks::circulate_end`]'s doc).
//!
//! Steps 2–4 live in the private `dispatch_step` method; `run` wraps it
//! with the begin/end hooks. With `N == 0` there is no task table to
//! scan, so `dispatch_step` just idles on every call.
use core::cell::Cell;

use crate::hooks::Hooks;
use crate::sync::critical;
use crate::tcb::Tcb;
use crate::timer::TimerList;

/// Fixed-priority cooperative scheduler over `N` tasks.
///
/// Task index *is* priority: index 0 is highest. There is no
/// notion of task state beyond "has pending events" — a task is
/// either dispatched (its flag word was nonzero when sampled) or
/// skipped for this scan.
pub struct Scheduler<H: Hooks, const N: usize> {
    /// The task table, in priority order (index 0 = highest priority).
    pub tasks: [Tcb<H>; N],
    /// Shared timeout list used by every task's timed waits.
    pub timers: TimerList,
    /// Index of the task the dispatch loop examines next. A `Cell` so
    /// the scheduler can live in `'static` storage and be driven
    /// through a shared reference, matching the interior-mutability
    /// discipline used throughout this crate.
    cursor: Cell<usize>,
    /// The flag word captured immediately before the currently (or most
    /// recently) dispatched task's body ran. A running body reads this,
    /// indirectly, through [`crate::kernel::Kernel::event_assert`] to
    /// tell which of its bound events caused the dispatch.
    ready_snapshot: Cell<u32>,
}

// Safety: `cursor` is a Cell mutated only inside `run`'s own control
// flow (single logical thread of execution) or, for `tick_handle`,
// deferred entirely to `TimerList`'s own critical sections.
unsafe impl<H: Hooks, const N: usize> Sync for Scheduler<H, N> {}

impl<H: Hooks, const N: usize> Scheduler<H, N> {
    /// Build a scheduler from an already-constructed task table.
    pub const fn new(tasks: [Tcb<H>; N]) -> Self {
        Self {
            tasks,
            timers: TimerList::new(),
            cursor: Cell::new(0),
            ready_snapshot: Cell::new(0),
        }
    }

    /// Assign each task its table index and run its one-shot
    /// initializer, if any. Must run once, before [`Scheduler::run`]
    /// is ever called.
    pub fn init_tasks(&self) {
        for (i, tcb) in self.tasks.iter().enumerate() {
            tcb.reset(i);
            if let Some(init) = tcb.init {
                init(tcb);
            }
        }
    }

    /// Run the dispatch loop forever. Does not return.
    ///
    /// `N == 0` is a valid, if useless, configuration: there is nothing
    /// to scan, so every iteration just runs the hooks and [`Hooks::idle`].
    pub fn run(&self) -> ! {
        loop {
            H::circulate_begin();
            if self.dispatch_step() {
                continue;
            }
            H::circulate_end();
        }
    }

    /// Run a single step of the dispatch algorithm: sample-and-clear the
    /// task at `cursor`, and either run its body (returning `true`) or
    /// advance the cursor, idling once per full empty scan (returning
    /// `false`). `circulate_begin`/`circulate_end` are the caller's
    /// responsibility — see [`Scheduler::run`].
    ///
    /// With `N == 0` there is no task table to index, so this always
    /// idles and returns `false`.
    fn dispatch_step(&self) -> bool {
        if N == 0 {
            H::idle();
            return false;
        }

        let tcb = &self.tasks[self.cursor.get()];
        let ready = critical(|_cs| {
            let snapshot = tcb.flag.get();
            tcb.flag.set(0);
            snapshot
        });

        if ready != 0 {
            self.ready_snapshot.set(ready);
            let start = H::timestamp();
            (tcb.body)(tcb);
            let elapsed = H::timestamp().wrapping_sub(start);
            if elapsed > tcb.max_tick.get() {
                tcb.max_tick.set(elapsed);
            }
            self.cursor.set(0);
            return true;
        }

        if self.cursor.get() + 1 < N {
            self.cursor.set(self.cursor.get() + 1);
        } else {
            self.cursor.set(0);
            H::idle();
        }
        false
    }

    /// The flag word captured immediately before the most recently
    /// dispatched task's body ran. See
    /// [`crate::kernel::Kernel::event_assert`].
    pub(crate) fn ready_snapshot(&self) -> u32 {
        self.ready_snapshot.get()
    }

    /// Advance the shared timer list by `ticks`, raising the bound
    /// task's event bit for every timer that expires. Call this from
    /// the system tick interrupt handler.
    pub fn tick_handle(&self, ticks: crate::config::Tick) {
        self.timers.tick_handle(ticks, &self.tasks);
    }

    /// Identical to [`Scheduler::tick_handle`] but without the
    /// critical section — for use when already inside an excluding
    /// interrupt context.
    pub fn tick_handle_isr(&self, ticks: crate::config::Tick) {
        self.timers.tick_handle_isr(ticks, &self.tasks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use crate::hooks::NoHooks;
    use std::cell::Cell;

    thread_local! {
        static CALLS: Cell<u32> = const { Cell::new(0) };
    }

    fn counting_task(_tcb: &Tcb<NoHooks>) {
        CALLS.with(|c| c.set(c.get() + 1));
    }

    /// S1: binding assigns sequential one-hot masks across a small
    /// task table built the way a scheduler owns it.
    #[test]
    fn tasks_bind_events_in_table_order() {
        let tasks = [
            Tcb::<NoHooks>::new(counting_task),
            Tcb::<NoHooks>::new(counting_task),
        ];
        let sched = Scheduler::<NoHooks, 2>::new(tasks);
        sched.init_tasks();

        let e0 = Event::new();
        let e1 = Event::new();
        assert!(e0.bind(&sched.tasks[0]));
        assert!(e1.bind(&sched.tasks[1]));
        assert_eq!(e0.mask.get(), 1);
        assert_eq!(e1.mask.get(), 1);
        assert_eq!(sched.tasks[0].id(), 0);
        assert_eq!(sched.tasks[1].id(), 1);
    }

    #[test]
    fn init_tasks_runs_initializer_once() {
        thread_local! {
            static INIT_CALLS: Cell<u32> = const { Cell::new(0) };
        }
        fn init(_tcb: &Tcb<NoHooks>) {
            INIT_CALLS.with(|c| c.set(c.get() + 1));
        }
        fn body(_tcb: &Tcb<NoHooks>) {}

        let tasks = [Tcb::<NoHooks>::with_init(Some(init), body)];
        let sched = Scheduler::<NoHooks, 1>::new(tasks);
        sched.init_tasks();
        assert_eq!(INIT_CALLS.with(|c| c.get()), 1);
    }

    #[test]
    fn posting_before_init_tasks_has_no_observable_effect_after_reset() {
        let tasks = [Tcb::<NoHooks>::new(counting_task)];
        let sched = Scheduler::<NoHooks, 1>::new(tasks);
        sched.tasks[0].flag.set(0xFF);
        sched.init_tasks();
        assert_eq!(sched.tasks[0].flag.get(), 0);
    }

    /// S1 / Testable Property 5: with both tasks' events raised before
    /// any dispatch, the lower-index (higher-priority) task's body runs
    /// first, and a second `dispatch_step` call only reaches the other
    /// task once the first has nothing left to do.
    #[test]
    fn dispatch_step_serves_highest_priority_ready_task_first() {
        thread_local! {
            static ORDER: core::cell::RefCell<std::vec::Vec<usize>> =
                core::cell::RefCell::new(std::vec::Vec::new());
        }
        fn task_a(tcb: &Tcb<NoHooks>) {
            ORDER.with(|o| o.borrow_mut().push(tcb.id()));
        }
        fn task_b(tcb: &Tcb<NoHooks>) {
            ORDER.with(|o| o.borrow_mut().push(tcb.id()));
        }

        let tasks = [Tcb::<NoHooks>::new(task_a), Tcb::<NoHooks>::new(task_b)];
        let sched = Scheduler::<NoHooks, 2>::new(tasks);
        sched.init_tasks();

        let ea = Event::new();
        let eb = Event::new();
        assert!(ea.bind(&sched.tasks[0]));
        assert!(eb.bind(&sched.tasks[1]));
        ea.post(&sched.tasks);
        eb.post(&sched.tasks);

        assert!(sched.dispatch_step()); // task 0 runs
        assert!(!sched.dispatch_step()); // task 0 has nothing left; cursor advances
        assert!(sched.dispatch_step()); // task 1 finally runs

        ORDER.with(|o| assert_eq!(*o.borrow(), std::vec![0, 1]));
    }

    /// S1 (priority restart): an event raised for a higher-priority task
    /// *during* a lower-priority task's body is served before the
    /// scheduler considers any other lower-priority task again, because
    /// a successful dispatch resets the cursor to the top of the table.
    #[test]
    fn dispatch_step_resets_cursor_so_newly_raised_higher_priority_task_runs_next() {
        thread_local! {
            static ORDER: core::cell::RefCell<std::vec::Vec<usize>> =
                core::cell::RefCell::new(std::vec::Vec::new());
            static TASK0: Cell<Option<*const Tcb<NoHooks>>> = const { Cell::new(None) };
        }
        fn task_a(tcb: &Tcb<NoHooks>) {
            ORDER.with(|o| o.borrow_mut().push(tcb.id()));
        }
        // Stands in for an ISR posting to a higher-priority task's event
        // while this (lower-priority) task's body is still running.
        fn task_b(_tcb: &Tcb<NoHooks>) {
            TASK0.with(|p| {
                if let Some(ptr) = p.get() {
                    let task0 = unsafe { &*ptr };
                    task0.flag.set(task0.flag.get() | 1);
                }
            });
        }

        let tasks = [Tcb::<NoHooks>::new(task_a), Tcb::<NoHooks>::new(task_b)];
        let sched = Scheduler::<NoHooks, 2>::new(tasks);
        sched.init_tasks();

        TASK0.with(|p| p.set(Some(&sched.tasks[0] as *const _)));

        // Only task 1 has a pending event.
        sched.tasks[1].flag.set(1);

        assert!(!sched.dispatch_step()); // task 0 not ready, cursor -> 1
        assert!(sched.dispatch_step()); // task 1 runs, posts to task 0, cursor resets to 0
        assert!(sched.dispatch_step()); // task 0 now ready, runs immediately

        ORDER.with(|o| assert_eq!(*o.borrow(), std::vec![0]));
    }

    /// `N == 0` never indexes the (empty) task table; every step just
    /// idles and reports nothing was dispatched.
    #[test]
    fn dispatch_step_with_no_tasks_never_indexes_and_idles() {
        let sched = Scheduler::<NoHooks, 0>::new([]);
        sched.init_tasks();
        for _ in 0..3 {
            assert!(!sched.dispatch_step());
        }
    }

    /// The snapshot a running task body would read via `event_assert`
    /// reflects exactly the bits that were set at dispatch time.
    #[test]
    fn dispatch_step_records_ready_snapshot_for_the_dispatched_task() {
        let tasks = [Tcb::<NoHooks>::new(counting_task)];
        let sched = Scheduler::<NoHooks, 1>::new(tasks);
        sched.init_tasks();

        let e = Event::new();
        assert!(e.bind(&sched.tasks[0]));
        e.post(&sched.tasks);

        assert!(sched.dispatch_step());
        assert_eq!(sched.ready_snapshot(), e.mask.get());
    }

    /// Testable Property 4: from inside a dispatched task body,
    /// `Kernel::event_assert` is true for exactly the bound events whose
    /// bits were set when the scheduler sampled the task's flag word —
    /// not for events bound to the same task that weren't raised.
    #[test]
    fn event_assert_is_true_only_for_events_raised_at_dispatch_time() {
        use crate::kernel::Kernel;

        static E1: Event = Event::new();
        static E2: Event = Event::new();
        static SCHED: Scheduler<NoHooks, 1> = Scheduler::new([Tcb::new(assert_task)]);
        static KERNEL: Kernel<NoHooks, 1> = Kernel::new(&SCHED);

        thread_local! {
            static SEEN: Cell<Option<(bool, bool)>> = const { Cell::new(None) };
        }
        fn assert_task(_tcb: &Tcb<NoHooks>) {
            SEEN.with(|s| s.set(Some((KERNEL.event_assert(&E1), KERNEL.event_assert(&E2)))));
        }

        SCHED.init_tasks();
        assert!(E1.bind(&SCHED.tasks[0]));
        assert!(E2.bind(&SCHED.tasks[0]));
        E1.post(&SCHED.tasks);

        assert!(SCHED.dispatch_step());
        assert_eq!(SEEN.with(|s| s.get()), Some((true, false)));
    }

    #[test]
    fn tick_handle_raises_bound_tasks_event_bit() {
        let tasks = [Tcb::<NoHooks>::new(counting_task)];
        let sched = Scheduler::<NoHooks, 1>::new(tasks);
        sched.init_tasks();

        let e = Event::new();
        assert!(e.bind(&sched.tasks[0]));
        sched.timers.start(&e, core::num::NonZeroU32::new(5).unwrap());

        sched.tick_handle(5);
        assert_eq!(sched.tasks[0].flag.get(), e.mask.get());
    }
}
