//! # Cortex-M4 Port Layer
//!
//! The only hardware-specific code in this crate: SysTick configuration
//! and a concrete [`Hooks`] implementation. There is no context-switch
//! machinery here — tasks have no private stacks and the dispatch loop
//! never preempts, so there is nothing for PendSV to do.
//!
//! Gated behind the `cortex-m4` feature; the rest of the crate has no
//! dependency on any particular target.
use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::{DCB, DWT, SYST};

use crate::config::{Tick, SYSTEM_CLOCK_HZ, TICK_HZ};
use crate::hooks::Hooks;

/// Configure the SysTick timer to fire at [`TICK_HZ`](crate::config::TICK_HZ).
///
/// The application's `SysTick` handler should call
/// [`Kernel::tick_handle_isr`](crate::kernel::Kernel::tick_handle_isr)
/// with `1` each time it fires (or accumulate several ticks' worth and
/// call it less often, under a tickless-idle scheme).
pub fn configure_systick(syst: &mut SYST) {
    let reload = SYSTEM_CLOCK_HZ / TICK_HZ - 1;
    syst.set_reload(reload);
    syst.clear_current();
    syst.set_clock_source(SystClkSource::Core);
    syst.enable_counter();
    syst.enable_interrupt();
}

/// Enable the DWT cycle counter backing [`CortexM4Hooks::timestamp`].
///
/// Must be called once at startup, with debug access enabled (true on
/// every Cortex-M4 unless debug fuses have been blown).
pub fn enable_cycle_counter(dwt: &mut DWT, dcb: &mut DCB) {
    dcb.enable_trace();
    dwt.enable_cycle_counter();
}

/// A [`Hooks`] implementation for bare Cortex-M4 targets: idles via
/// `wfi` and timestamps via the DWT cycle counter.
///
/// [`enable_cycle_counter`] must have been called before
/// [`CortexM4Hooks::timestamp`] is used, or it will read an
/// unstarted (and thus meaningless, though not unsound) counter.
pub struct CortexM4Hooks;

impl Hooks for CortexM4Hooks {
    fn idle() {
        cortex_m::asm::wfi();
    }

    fn timestamp() -> Tick {
        DWT::cycle_count()
    }
}
