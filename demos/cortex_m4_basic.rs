//! # EventOS Example Firmware
//!
//! Three tasks sharing two events on a single Cortex-M4 core:
//!
//! | Task | Priority | Driven by |
//! |------|----------|-----------|
//! | `button_task` | 0 (highest) | `BUTTON_EVENT`, posted from an EXTI ISR |
//! | `blink_task` | 1 | `BLINK_EVENT`, a self-rearming 500-tick timer |
//! | `heartbeat_task` | 2 (lowest) | `BLINK_EVENT` too — both tasks can bind the
//! |   | | same event to different purposes by each owning their own `Event` |
//!
//! `button_task` being priority 0 means a pending button press always
//! preempts the blink cadence on the next dispatch scan — there is no
//! separate preemption mechanism, just table order.

#![no_std]
#![no_main]

use core::num::NonZeroU32;

use cortex_m_rt::entry;
use panic_halt as _;

use eventos::arch::cortex_m4::{configure_systick, CortexM4Hooks};
use eventos::event::Event;
use eventos::kernel::Kernel;
use eventos::scheduler::Scheduler;
use eventos::tcb::Tcb;

const BLINK_PERIOD_TICKS: u32 = 500;

static BUTTON_EVENT: Event = Event::new();
static BLINK_EVENT: Event = Event::new();

static SCHEDULER: Scheduler<CortexM4Hooks, 3> = Scheduler::new([
    Tcb::with_init(Some(init_button_task), button_task),
    Tcb::with_init(Some(init_blink_task), blink_task),
    Tcb::new(heartbeat_task),
]);

static KERNEL: Kernel<CortexM4Hooks, 3> = Kernel::new(&SCHEDULER);

fn init_button_task(tcb: &Tcb<CortexM4Hooks>) {
    KERNEL.event_bind(tcb, &BUTTON_EVENT);
}

/// Handles a debounced button-press event. Runs to completion and
/// returns — there is no loop here, the dispatch loop calls this again
/// next time `BUTTON_EVENT` fires.
fn button_task(_tcb: &Tcb<CortexM4Hooks>) {
    toggle_status_led();
}

fn init_blink_task(tcb: &Tcb<CortexM4Hooks>) {
    KERNEL.event_bind(tcb, &BLINK_EVENT);
    KERNEL.timeout_start(&BLINK_EVENT, NonZeroU32::new(BLINK_PERIOD_TICKS).unwrap());
}

/// Rearms its own timer on every dispatch — the only periodic pattern
/// this kernel supports, since timers are one-shot by design.
fn blink_task(_tcb: &Tcb<CortexM4Hooks>) {
    toggle_blink_led();
    KERNEL.timeout_start(&BLINK_EVENT, NonZeroU32::new(BLINK_PERIOD_TICKS).unwrap());
}

/// Never bound to any event — this task never runs via dispatch. Kept
/// to demonstrate that an all-zero flag word is simply skipped forever
/// without special-casing; it exists only so `N = 3` has something to
/// show for a table entry nobody wakes up.
fn heartbeat_task(_tcb: &Tcb<CortexM4Hooks>) {}

fn toggle_status_led() {
    // Board-specific GPIO write; omitted in this reference firmware.
}

fn toggle_blink_led() {
    // Board-specific GPIO write; omitted in this reference firmware.
}

#[entry]
fn main() -> ! {
    let mut cp = cortex_m::Peripherals::take().unwrap();

    configure_systick(&mut cp.SYST);
    eventos::arch::cortex_m4::enable_cycle_counter(&mut cp.DWT, &mut cp.DCB);

    KERNEL.start()
}

#[no_mangle]
pub extern "C" fn SysTick() {
    KERNEL.tick_handle_isr(1);
}

/// Stand-in for the board's actual EXTI line handler; posts the event
/// the real ISR would post after debouncing.
#[no_mangle]
pub extern "C" fn EXTI0() {
    KERNEL.event_post_isr(&BUTTON_EVENT);
}
