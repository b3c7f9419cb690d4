//! # Weak Hooks
//!
//! The application-provided collaborators the scheduler loop calls into:
//! begin/end-of-iteration hooks, an idle fallback, and a timestamp source
//! for per-task diagnostics.
//!
//! Each method has an empty (or zero) default body — the Rust rendering
//! of the source kernel's `__WEAK` functions (`OSCirculateBeginHook`,
//! `OSIdelTask`, `OSTimestampGet`, ...). Because `Hooks` is a trait used
//! as a generic parameter rather than a set of `#[no_mangle]` weak
//! symbols, an application that doesn't override a hook pays nothing for
//! it: the default method is inlined away at monomorphization time.
//!
//! `critical_enter`/`critical_exit` from the original interface are not
//! part of this trait — critical sections are handled separately by
//! [`crate::sync`], which wraps the `critical-section` crate instead of
//! exposing bare enter/exit hooks (see `DESIGN.md`).
use crate::config::Tick;

/// Application-provided scheduler collaborators.
///
/// Implement this for a unit struct and pass it as the `H` parameter of
/// [`crate::kernel::Kernel`]. All methods are optional; the defaults are
/// no-ops (or, for `timestamp`, a constant zero) exactly as specified.
pub trait Hooks {
    /// Called at the top of every scheduler loop iteration, before the
    /// ready-task scan.
    fn circulate_begin() {}

    /// Called at the bottom of every scheduler loop iteration — but only
    /// on iterations that did *not* dispatch a task. A dispatch restarts
    /// the scan from the top without calling this hook, matching the
    /// source's `OSStart` (the `continue` after running a task skips the
    /// `OSCirculateEndHook()` call at the loop's tail).
    fn circulate_end() {}

    /// Called once per full scan of the task table that found no ready
    /// task. Typically enters a low-power wait state.
    fn idle() {}

    /// Returns a monotonic tick/cycle count used to measure a task
    /// body's execution duration for [`Tcb::max_tick`](crate::tcb::Tcb).
    /// Defaults to a constant zero, which makes `max_tick` tracking a
    /// no-op until an application supplies a real timestamp source.
    fn timestamp() -> Tick {
        0
    }
}

/// A [`Hooks`] implementation where every hook is the default no-op.
///
/// Useful for tests and for applications that don't need begin/end
/// hooks, idle behavior, or execution-time diagnostics.
pub struct NoHooks;

impl Hooks for NoHooks {}
