//! # EventOS — Cooperative Event-Driven Task Executor
//!
//! A fixed-priority, non-preemptive scheduler for single-address-space
//! microcontrollers. Tasks have no private stacks: a task is an
//! ordinary function, invoked on the shared stack whenever one of its
//! bound events becomes ready, and runs to completion before the
//! scheduler looks at anything else.
//!
//! ## Overview
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                    Application Tasks                    │
//! ├────────────────────────────────────────────────────────┤
//! │                 Kernel API (kernel.rs)                  │
//! │   start() · event_bind() · event_post() · tick_handle()│
//! ├──────────────┬────────────────────┬───────────────────┤
//! │  Scheduler   │   Timer List       │  Sync Primitive   │
//! │  scheduler.rs│   timer.rs         │  sync.rs           │
//! │  ─ run()     │   ─ start/stop     │  ─ critical()      │
//! │  ─ tick()    │   ─ tick_handle()  │                    │
//! ├──────────────┴────────────────────┴───────────────────┤
//! │         Task & Event Model (tcb.rs, event.rs)            │
//! │    Tcb · Event · Hooks                                   │
//! ├────────────────────────────────────────────────────────┤
//! │            Arch Port (arch/cortex_m4.rs, optional)       │
//! │    SysTick config · DWT timestamp · idle                │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dispatch model
//!
//! Each task owns a 32-bit `flag` word, one bit per bound [`event::Event`].
//! Posting an event ORs its bit into the owning task's flag word;
//! [`scheduler::Scheduler::run`] scans the task table in priority order,
//! dispatching the first task whose flag word is nonzero and restarting
//! the scan from the top afterward. A task body inspects
//! [`event::Event::assert`] against the snapshot it was dispatched with
//! to tell which of its bound events fired.
//!
//! ## Memory model
//!
//! - No heap, no `alloc` — every task table and timer list is statically
//!   sized via const generics.
//! - No per-task stacks — task bodies are plain function calls.
//! - Critical sections go through the [`critical-section`](critical_section)
//!   crate, keeping this crate free of any assumption about what
//!   "critical section" means on a given target.

#![cfg_attr(not(test), no_std)]

pub mod arch;
pub mod config;
pub mod event;
pub mod hooks;
pub mod kernel;
pub mod scheduler;
pub mod sync;
pub mod tcb;
pub mod timer;
