//! Devices attached to the simulated SoC: UART PHYs on the bridge's far
//! side, interrupt sources, and the host-side driver for the register window.

pub mod host;
pub mod irq;
pub mod loopback;

#[cfg(feature = "tcp-uart")]
pub mod tcp;
