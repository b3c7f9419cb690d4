//! # Configuration
//!
//! Compile-time constants governing kernel behavior. All limits are
//! fixed at compile time — no dynamic allocation anywhere in this crate.

/// Tick count type. Meaning (e.g. 1ms) is application-defined.
pub type Tick = u32;

/// Maximum number of events a single task may have bound to it.
///
/// Fixed by the width of [`Tcb::flag`](crate::tcb::Tcb): one bit per
/// event, so at most `u32::BITS` events can be distinguished.
pub const MAX_EVENTS_PER_TASK: u8 = 32;

/// SysTick frequency in Hz, used by the optional Cortex-M4 tick source.
/// Higher values give finer timer granularity at the cost of more
/// frequent interrupts.
pub const TICK_HZ: u32 = 1000;

/// System clock frequency in Hz (default for STM32F4 at 16 MHz HSI),
/// used to compute the SysTick reload value in the Cortex-M4 demo.
pub const SYSTEM_CLOCK_HZ: u32 = 16_000_000;
