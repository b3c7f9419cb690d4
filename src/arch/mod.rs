//! # Architecture Abstraction Layer
//!
//! Hardware-specific code lives here, gated behind per-target features,
//! so the rest of the crate stays portable `no_std` with no assumptions
//! about a particular microcontroller.

#[cfg(feature = "cortex-m4")]
pub mod cortex_m4;
