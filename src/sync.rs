//! # Critical Section
//!
//! Interrupt-safe critical section wrapper used by every non-ISR kernel
//! entry point that mutates shared state (`tcb.flag`, the timer list,
//! the scheduler's ready snapshot).
//!
//! Rather than hardwiring `cortex_m::interrupt::free`, this wraps the
//! [`critical-section`](critical_section) crate: the ecosystem-standard
//! hookable critical section abstraction for `no_std` Rust. Exactly one
//! backend must be linked into the final binary — the `cortex-m4`
//! feature of this crate pulls in `cortex-m`'s
//! `critical-section-single-core` implementation; host-side tests link
//! `critical-section`'s `std`-mutex backend (dev-dependency). This keeps
//! the kernel core itself free of any assumption about what "critical
//! section" means on a given target, matching the source's contract
//! that the primitive is "assumed hookable" and out of the core's scope.
use critical_section::CriticalSection;

/// Execute a closure within a critical section.
///
/// This is the non-ISR form used throughout `event.rs`, `timer.rs`, and
/// `scheduler.rs`. ISR-variant entry points (`*_isr` functions) omit
/// this wrapper entirely and run their logic bare, under the caller's
/// guarantee that they are already executing in an interrupt context
/// that excludes concurrent mutation.
#[inline]
pub fn critical<F, R>(f: F) -> R
where
    F: FnOnce(CriticalSection<'_>) -> R,
{
    critical_section::with(f)
}
